use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::fs;

/// Key-value store of JSON documents, one per project.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<Value>>;

    async fn save(&self, key: &str, document: &Value) -> Result<()>;

    /// Removes the document. A missing document is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Stores each document as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn document_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
            bail!("Invalid history key: {key:?}");
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl HistoryStore for JsonFileStore {
    async fn load(&self, key: &str) -> Result<Option<Value>> {
        let path = self.document_path(key)?;
        let json = match fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read history file {path:?}"))
            }
        };
        let document = serde_json::from_str(&json)
            .with_context(|| format!("failed to deserialize history file {path:?}"))?;
        Ok(Some(document))
    }

    async fn save(&self, key: &str, document: &Value) -> Result<()> {
        let path = self.document_path(key)?;
        fs::create_dir_all(&self.dir)
            .await
            .context("failed to create history directory")?;
        let json = serde_json::to_string_pretty(document).context("failed to serialize history")?;
        fs::write(&path, json)
            .await
            .with_context(|| format!("failed to write history file {path:?}"))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.document_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("failed to delete history file {path:?}")),
        }
    }
}

/// In-process store, for embedding the engine without a history directory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<Value>> {
        let documents = self
            .documents
            .lock()
            .map_err(|_| anyhow::anyhow!("history store lock poisoned"))?;
        Ok(documents.get(key).cloned())
    }

    async fn save(&self, key: &str, document: &Value) -> Result<()> {
        let mut documents = self
            .documents
            .lock()
            .map_err(|_| anyhow::anyhow!("history store lock poisoned"))?;
        documents.insert(key.to_string(), document.clone());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut documents = self
            .documents
            .lock()
            .map_err(|_| anyhow::anyhow!("history store lock poisoned"))?;
        documents.remove(key);
        Ok(())
    }
}
