use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid endpoint definition: {0}")]
    Schema(#[from] serde_json::Error),

    #[error("endpoint file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid endpoint name: '{0}'")]
    InvalidName(String),

    #[error("already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("invalid header: '{0}' (expected 'Name: value')")]
    InvalidHeader(String),

    #[error("unsupported HTTP method: '{0}' (expected GET, POST, PUT or DELETE)")]
    Dispatch(String),

    #[error("response has no Content-Type header")]
    MissingContentType,

    #[error("failed to decode {encoding} body: {source}")]
    Decode {
        encoding: String,
        #[source]
        source: std::io::Error,
    },

    #[error("body is neither UTF-8 nor Shift_JIS text")]
    UndecodableText,

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid configuration file: {0}")]
    Config(#[from] ini::Error),
}

impl Error {
    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
