use serde::{Deserialize, Serialize};
use strum::VariantArray;

/// Semantic classification of a file by its extension.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::VariantArray,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FileCategory {
    Code,
    Text,
    Config,
    Style,
    Image,
    Document,
    Archive,
    Media,
    Other,
}

const CODE: &[&str] = &[
    "rs", "js", "jsx", "ts", "tsx", "mjs", "cjs", "py", "rb", "go", "java", "kt", "kts", "scala",
    "c", "h", "cc", "cpp", "hpp", "cs", "swift", "m", "php", "pl", "lua", "dart", "vue", "svelte",
    "sh", "bash", "zsh", "ps1", "sql", "html", "htm",
];
const TEXT: &[&str] = &["txt", "md", "markdown", "rst", "adoc", "log", "csv", "tsv"];
const CONFIG: &[&str] = &[
    "json", "jsonc", "yaml", "yml", "toml", "ini", "cfg", "conf", "env", "xml", "properties",
    "lock",
];
const STYLE: &[&str] = &["css", "scss", "sass", "less", "styl"];
const IMAGE: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "ico", "svg", "tif", "tiff",
];
const DOCUMENT: &[&str] = &["pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt"];
const ARCHIVE: &[&str] = &["zip", "tar", "gz", "tgz", "bz2", "xz", "7z", "rar"];
const MEDIA: &[&str] = &["mp3", "wav", "ogg", "flac", "mp4", "mov", "avi", "mkv", "webm"];

/// Extensions readable as text even though no category claims them.
const EXTRA_TEXT: &[&str] = &["gitignore", "dockerignore", "editorconfig", "tex", "diff", "patch"];

impl FileCategory {
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FileCategory::Code => CODE,
            FileCategory::Text => TEXT,
            FileCategory::Config => CONFIG,
            FileCategory::Style => STYLE,
            FileCategory::Image => IMAGE,
            FileCategory::Document => DOCUMENT,
            FileCategory::Archive => ARCHIVE,
            FileCategory::Media => MEDIA,
            FileCategory::Other => &[],
        }
    }

    /// Classifies a lowercase extension without the leading dot.
    pub fn from_extension(extension: &str) -> Self {
        FileCategory::VARIANTS
            .iter()
            .copied()
            .find(|category| category.extensions().contains(&extension))
            .unwrap_or(FileCategory::Other)
    }

    pub fn is_textual(self) -> bool {
        matches!(
            self,
            FileCategory::Code | FileCategory::Text | FileCategory::Config | FileCategory::Style
        )
    }
}

/// Extension of a file name: text after the last `.`, lowercased, empty when
/// there is none. A leading dot alone (`.env`) counts as an extension.
pub fn extension_of(name: &str) -> String {
    match name.rfind('.') {
        Some(idx) => name[idx + 1..].to_lowercase(),
        None => String::new(),
    }
}

pub fn is_text_extension(extension: &str) -> bool {
    FileCategory::from_extension(extension).is_textual() || EXTRA_TEXT.contains(&extension)
}
