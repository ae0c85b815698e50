use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;

use crate::history::entry::HistoryEntry;
use crate::history::store::HistoryStore;

/// Bounded, newest-first journal per project.
///
/// Appending is a read-modify-write of the whole document. Concurrent
/// appends for the same project can lose an entry; callers that mutate one
/// project concurrently must serialize themselves.
#[derive(Clone)]
pub struct OperationHistoryLog {
    store: Arc<dyn HistoryStore>,
    max_entries: usize,
}

impl OperationHistoryLog {
    pub fn new(store: Arc<dyn HistoryStore>, max_entries: usize) -> Self {
        Self { store, max_entries }
    }

    pub async fn append(&self, project: &str, entry: HistoryEntry) -> Result<()> {
        let mut entries = self.load(project).await?;

        let mut stamped = entry;
        stamped.timestamp = Utc::now();
        entries.insert(0, stamped);
        entries.truncate(self.max_entries);

        let document = serde_json::to_value(&entries).context("failed to serialize history")?;
        self.store.save(project, &document).await
    }

    pub async fn load(&self, project: &str) -> Result<Vec<HistoryEntry>> {
        let Some(document) = self.store.load(project).await? else {
            return Ok(Vec::new());
        };
        serde_json::from_value(document)
            .with_context(|| format!("history for {project} is not a list of entries"))
    }

    pub async fn clear(&self, project: &str) -> Result<()> {
        self.store.delete(project).await
    }
}
