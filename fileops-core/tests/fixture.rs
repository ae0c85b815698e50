use fileops_core::{FileOpsEngine, Settings};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct Fixture {
    pub engine: FileOpsEngine,
    pub data_dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let data_dir = TempDir::new().unwrap();
        let settings = Settings::rooted_at(data_dir.path());
        std::fs::create_dir_all(&settings.data_root).unwrap();

        Fixture {
            engine: FileOpsEngine::from_settings(settings),
            data_dir,
        }
    }

    /// Creates an empty project directory and returns its root.
    pub fn project(&self, name: &str) -> PathBuf {
        let root = self.engine.settings().data_root.join(name);
        std::fs::create_dir_all(&root).unwrap();
        root
    }

    #[allow(dead_code)]
    pub fn write(&self, root: &Path, file: &str, content: &str) {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[allow(dead_code)]
    pub fn history_file(&self, project: &str) -> PathBuf {
        self.engine
            .settings()
            .history_dir
            .join(format!("{project}.json"))
    }
}

#[allow(dead_code)]
pub fn backups(dir: &Path, name: &str) -> Vec<PathBuf> {
    let prefix = format!("{name}.backup.");
    let mut found: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().starts_with(&prefix))
                .unwrap_or(false)
        })
        .collect();
    found.sort();
    found
}

/// Runs `test` against a fresh fixture.
#[allow(dead_code)]
pub async fn run<F, Fut>(test: F)
where
    F: FnOnce(Fixture) -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    test(Fixture::new()).await
}
