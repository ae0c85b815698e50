use std::path::{Component, Path, PathBuf};

use anyhow::bail;

/// Maps a project name to the directory holding that project's files.
///
/// Resolution is a pure mapping; it never checks that the directory exists.
/// Callers verify existence and report a missing project themselves.
pub trait ProjectResolver: Send + Sync {
    fn resolve(&self, project: &str) -> anyhow::Result<PathBuf>;
}

/// Resolves `<data_root>/<project>`.
#[derive(Debug, Clone)]
pub struct DataRootResolver {
    data_root: PathBuf,
}

impl DataRootResolver {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
        }
    }
}

impl ProjectResolver for DataRootResolver {
    fn resolve(&self, project: &str) -> anyhow::Result<PathBuf> {
        let name = project_name(project)?;
        Ok(self.data_root.join(name))
    }
}

/// A project name must be exactly one normal path component, otherwise
/// `data_root.join(..)` could land outside the data root.
fn project_name(project: &str) -> anyhow::Result<&str> {
    let mut components = Path::new(project).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(project),
        _ => bail!("Invalid project name: {project:?}"),
    }
}

/// Joins a caller supplied relative path onto `root`, refusing anything
/// that could escape it (absolute paths, `..`, drive prefixes).
pub fn confine(root: &Path, relative: &str) -> anyhow::Result<PathBuf> {
    let trimmed = relative.trim_start_matches("./");
    let mut out = root.to_path_buf();
    let mut pushed = false;

    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(name) => {
                out.push(name);
                pushed = true;
            }
            Component::CurDir => {}
            Component::ParentDir => bail!("Path escapes project root: {relative}"),
            Component::RootDir | Component::Prefix(_) => {
                bail!("Path must be relative to the project root: {relative}")
            }
        }
    }

    if !pushed {
        bail!("Path does not name a file: {relative:?}");
    }
    Ok(out)
}

/// Path of `path` relative to `root`, always `/` separated.
pub fn relative_to(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
