/// Build, dependency and version-control directories pruned when a caller
/// asks to exclude ignored files. This is a fixed list; `.gitignore` files
/// are not read.
const IGNORED_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "bower_components",
    "vendor",
    "target",
    "dist",
    "build",
    "out",
    "coverage",
    ".next",
    ".nuxt",
    ".cache",
    "__pycache__",
    ".venv",
    "venv",
    ".idea",
    ".vscode",
];

/// Decides which directory entries a recursive walk skips.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ignored {
    pub exclude_ignored_dirs: bool,
    pub include_hidden: bool,
}

impl Ignored {
    pub fn new(exclude_ignored_dirs: bool, include_hidden: bool) -> Self {
        Self {
            exclude_ignored_dirs,
            include_hidden,
        }
    }

    /// Whether an entry with this file name should be skipped. Directories
    /// are additionally checked against the denylist.
    pub fn is_ignored(&self, name: &str, is_dir: bool) -> bool {
        if !self.include_hidden && name.starts_with('.') {
            return true;
        }
        is_dir && self.exclude_ignored_dirs && is_ignored_dir(name)
    }
}

pub fn is_ignored_dir(name: &str) -> bool {
    IGNORED_DIRS.contains(&name)
}
