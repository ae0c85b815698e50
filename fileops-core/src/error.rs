use thiserror::Error;

/// Failures surfaced to callers of the engine facade. Per-file failures
/// inside a batch are never turned into one of these; they are recorded in
/// the batch result instead.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Operation failed: {0:#}")]
    Fatal(anyhow::Error),
}

impl EngineError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid(what: impl Into<String>) -> Self {
        Self::InvalidArgument(what.into())
    }
}

impl From<anyhow::Error> for EngineError {
    fn from(source: anyhow::Error) -> Self {
        Self::Fatal(source)
    }
}

impl From<std::io::Error> for EngineError {
    fn from(source: std::io::Error) -> Self {
        Self::Fatal(source.into())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
