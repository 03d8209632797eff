use std::path::PathBuf;
use thiserror::Error;

/// Axel core error types
#[derive(Error, Debug)]
pub enum AxelError {
    #[error("Recording already running")]
    AlreadyRecording,

    #[error("Recording not running")]
    NotRecording,

    #[error("Invalid file name: {0:?}")]
    InvalidFileName(String),

    #[error("File already exists: {}", .0.display())]
    FileExists(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Preferences error: {0}")]
    Preferences(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl AxelError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AxelError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for core operations
pub type AxelResult<T> = Result<T, AxelError>;
