use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs;

use crate::file::category::extension_of;
use crate::file::resolver::relative_to;

/// One entry of a project tree snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FileNode {
    #[serde(rename_all = "camelCase")]
    File {
        name: String,
        path: String,
        size: u64,
        modified_at: Option<DateTime<Utc>>,
        extension: String,
    },
    #[serde(rename_all = "camelCase")]
    Directory {
        name: String,
        path: String,
        /// Sum of the children's sizes, not a stat of the directory itself.
        size: u64,
        children: Vec<FileNode>,
    },
}

impl FileNode {
    pub fn name(&self) -> &str {
        match self {
            FileNode::File { name, .. } | FileNode::Directory { name, .. } => name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            FileNode::File { path, .. } | FileNode::Directory { path, .. } => path,
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            FileNode::File { size, .. } | FileNode::Directory { size, .. } => *size,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, FileNode::Directory { .. })
    }

    pub fn children(&self) -> &[FileNode] {
        match self {
            FileNode::Directory { children, .. } => children,
            FileNode::File { .. } => &[],
        }
    }
}

type LevelFuture<'a> = Pin<Box<dyn Future<Output = Vec<FileNode>> + Send + 'a>>;

/// Builds a fresh tree for `root`. Directories listed at depth `max_depth`
/// are emitted with no children.
///
/// The build never fails: an unreadable directory yields no children and an
/// entry whose metadata cannot be read is left out. Symlinks are never
/// followed and are not listed, the same as in search.
pub async fn build_tree(root: &Path, max_depth: usize) -> FileNode {
    let children = read_level(root, root, 0, max_depth).await;
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    FileNode::Directory {
        name,
        path: String::new(),
        size: children.iter().map(FileNode::size).sum(),
        children,
    }
}

fn read_level<'a>(root: &'a Path, dir: &'a Path, depth: usize, max_depth: usize) -> LevelFuture<'a> {
    Box::pin(async move {
        let entries = match list_entries(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Skipping unreadable directory {}: {e:?}", dir.display());
                return Vec::new();
            }
        };

        let mut nodes = Vec::with_capacity(entries.len());
        for path in entries {
            let metadata = match fs::symlink_metadata(&path).await {
                Ok(metadata) if metadata.file_type().is_symlink() => {
                    tracing::debug!("Skipping symlink {}", path.display());
                    continue;
                }
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::debug!("Skipping {}: {e}", path.display());
                    continue;
                }
            };

            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let rel = relative_to(root, &path);

            if metadata.is_dir() {
                let children = if depth < max_depth {
                    read_level(root, &path, depth + 1, max_depth).await
                } else {
                    Vec::new()
                };
                nodes.push(FileNode::Directory {
                    name,
                    path: rel,
                    size: children.iter().map(FileNode::size).sum(),
                    children,
                });
            } else {
                nodes.push(FileNode::File {
                    extension: extension_of(&name),
                    name,
                    path: rel,
                    size: metadata.len(),
                    modified_at: metadata.modified().ok().map(DateTime::<Utc>::from),
                });
            }
        }

        sort_nodes(&mut nodes);
        nodes
    })
}

async fn list_entries(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        paths.push(entry.path());
    }
    Ok(paths)
}

/// Directories first, then files; each group by name, case-sensitive.
fn sort_nodes(nodes: &mut [FileNode]) {
    nodes.sort_by(|a, b| {
        b.is_dir()
            .cmp(&a.is_dir())
            .then_with(|| a.name().cmp(b.name()))
    });
}
