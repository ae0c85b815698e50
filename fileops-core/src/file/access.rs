use crate::file::resolver::confine;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// File I/O confined to one project root. Every path handed in is relative
/// to the root and is rejected if it would escape it.
#[derive(Debug, Clone)]
pub struct FileAccessManager {
    root: PathBuf,
}

impl FileAccessManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, file_path: &str) -> Result<PathBuf> {
        confine(&self.root, file_path)
    }

    pub async fn read_file(&self, file_path: &str) -> Result<String> {
        let path = self.existing_file(file_path).await?;
        fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read file: {file_path}"))
    }

    pub async fn write_file(&self, file_path: &str, content: &str) -> Result<()> {
        let path = self.resolve(file_path)?;
        create_parent(&path, file_path).await?;
        fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write file: {file_path}"))
    }

    /// Copies `from` to `to`, creating parent directories of `to`. An
    /// existing `to` is never overwritten.
    pub async fn copy_file(&self, from: &str, to: &str) -> Result<u64> {
        let source = self.existing_file(from).await?;
        let target = self.vacant_target(to).await?;
        create_parent(&target, to).await?;
        fs::copy(&source, &target)
            .await
            .with_context(|| format!("Failed to copy {from} to {to}"))
    }

    /// Renames `from` to `to`, creating parent directories of `to`. An
    /// existing `to` is never overwritten.
    pub async fn move_file(&self, from: &str, to: &str) -> Result<()> {
        let source = self.existing_file(from).await?;
        let target = self.vacant_target(to).await?;
        create_parent(&target, to).await?;
        fs::rename(&source, &target)
            .await
            .with_context(|| format!("Failed to move {from} to {to}"))
    }

    pub async fn delete_file(&self, file_path: &str) -> Result<()> {
        let path = self.existing_file(file_path).await?;
        fs::remove_file(&path)
            .await
            .with_context(|| format!("Failed to delete file: {file_path}"))
    }

    pub async fn file_exists(&self, file_path: &str) -> Result<bool> {
        let path = self.resolve(file_path)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    /// Resolves `file_path` and fails if anything, even a dangling symlink,
    /// already sits there.
    async fn vacant_target(&self, file_path: &str) -> Result<PathBuf> {
        let path = self.resolve(file_path)?;
        match fs::symlink_metadata(&path).await {
            Ok(_) => bail!("Target already exists: {file_path}"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(path),
            Err(e) => Err(e).with_context(|| format!("Failed to check target: {file_path}")),
        }
    }

    async fn existing_file(&self, file_path: &str) -> Result<PathBuf> {
        let path = self.resolve(file_path)?;

        let metadata = match fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                bail!("File not found: {file_path}")
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to get metadata for: {file_path}"))
            }
        };

        if !metadata.is_file() {
            bail!("Path is not a file: {file_path}");
        }
        Ok(path)
    }
}

async fn create_parent(path: &Path, display: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create parent directories for: {display}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_read_file_success() {
        let temp = tempdir().unwrap();
        let manager = FileAccessManager::new(temp.path());

        std_fs::write(temp.path().join("test.txt"), "content").unwrap();
        let content = manager.read_file("test.txt").await.unwrap();
        assert_eq!(content, "content");
    }

    #[tokio::test]
    async fn test_read_file_not_found() {
        let temp = tempdir().unwrap();
        let manager = FileAccessManager::new(temp.path());

        let err = manager.read_file("nonexistent.txt").await.unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }

    #[tokio::test]
    async fn test_read_file_not_file() {
        let temp = tempdir().unwrap();
        let manager = FileAccessManager::new(temp.path());

        std_fs::create_dir(temp.path().join("dir")).unwrap();
        let err = manager.read_file("dir").await.unwrap_err();
        assert!(err.to_string().contains("Path is not a file"));
    }

    #[tokio::test]
    async fn test_read_file_outside_root() {
        let temp = tempdir().unwrap();
        let project = temp.path().join("project");
        std_fs::create_dir(&project).unwrap();
        std_fs::write(temp.path().join("secret.txt"), "secret").unwrap();
        let manager = FileAccessManager::new(&project);

        let err = manager.read_file("../secret.txt").await.unwrap_err();
        assert!(err.to_string().contains("escapes project root"));
    }

    #[tokio::test]
    async fn test_write_file_creates_parents() {
        let temp = tempdir().unwrap();
        let manager = FileAccessManager::new(temp.path());

        manager.write_file("subdir/test.txt", "content").await.unwrap();
        let path = temp.path().join("subdir/test.txt");
        assert_eq!(std_fs::read_to_string(path).unwrap(), "content");
    }

    #[tokio::test]
    async fn test_copy_and_move() {
        let temp = tempdir().unwrap();
        let manager = FileAccessManager::new(temp.path());
        std_fs::write(temp.path().join("a.txt"), "abc").unwrap();

        let copied = manager.copy_file("a.txt", "copies/a.txt").await.unwrap();
        assert_eq!(copied, 3);
        assert!(temp.path().join("a.txt").exists());
        assert!(temp.path().join("copies/a.txt").exists());

        manager.move_file("a.txt", "moved/deep/a.txt").await.unwrap();
        assert!(!temp.path().join("a.txt").exists());
        assert_eq!(
            std_fs::read_to_string(temp.path().join("moved/deep/a.txt")).unwrap(),
            "abc"
        );
    }

    #[tokio::test]
    async fn test_copy_and_move_never_overwrite() {
        let temp = tempdir().unwrap();
        let manager = FileAccessManager::new(temp.path());
        std_fs::write(temp.path().join("a.txt"), "new").unwrap();
        std_fs::write(temp.path().join("b.txt"), "keep me").unwrap();

        let err = manager.copy_file("a.txt", "b.txt").await.unwrap_err();
        assert!(err.to_string().contains("Target already exists: b.txt"));
        let err = manager.move_file("a.txt", "b.txt").await.unwrap_err();
        assert!(err.to_string().contains("Target already exists: b.txt"));

        assert_eq!(std_fs::read_to_string(temp.path().join("b.txt")).unwrap(), "keep me");
        assert_eq!(std_fs::read_to_string(temp.path().join("a.txt")).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_delete_file() {
        let temp = tempdir().unwrap();
        let manager = FileAccessManager::new(temp.path());
        let path = temp.path().join("test.txt");
        std_fs::write(&path, "content").unwrap();

        manager.delete_file("test.txt").await.unwrap();
        assert!(!path.exists());

        let err = manager.delete_file("test.txt").await.unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }

    #[tokio::test]
    async fn test_delete_refuses_directory() {
        let temp = tempdir().unwrap();
        let manager = FileAccessManager::new(temp.path());
        std_fs::create_dir(temp.path().join("dir")).unwrap();

        assert!(manager.delete_file("dir").await.is_err());
        assert!(temp.path().join("dir").exists());
    }

    #[tokio::test]
    async fn test_file_exists() {
        let temp = tempdir().unwrap();
        let manager = FileAccessManager::new(temp.path());
        std_fs::write(temp.path().join("test.txt"), "content").unwrap();

        assert!(manager.file_exists("test.txt").await.unwrap());
        assert!(!manager.file_exists("other.txt").await.unwrap());
    }
}
