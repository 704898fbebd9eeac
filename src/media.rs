use crate::error::{Error, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const EXPECTED_AUDIO_TYPE: &str = "audio/wav";
pub const AUDIO_EXTENSION: &str = "wav";

const FILENAME_FORMAT: &str = "audio_%Y%m%d_%H%M%S";

pub fn persist(bytes: &[u8], content_type: &str, directory: impl AsRef<Path>) -> Result<PathBuf> {
    persist_at(bytes, content_type, directory, Local::now())
}

/// Names are unique per second only; a second payload in the same second replaces the first.
pub fn persist_at(
    bytes: &[u8],
    content_type: &str,
    directory: impl AsRef<Path>,
    timestamp: DateTime<Local>,
) -> Result<PathBuf> {
    let directory = directory.as_ref();
    fs::create_dir_all(directory).map_err(|e| Error::io(directory, e))?;

    if content_type != EXPECTED_AUDIO_TYPE {
        warn!(
            content_type,
            expected = EXPECTED_AUDIO_TYPE,
            "unexpected audio content type, saving anyway"
        );
    }

    let filename = format!("{}.{AUDIO_EXTENSION}", timestamp.format(FILENAME_FORMAT));
    let path = directory.join(filename);
    fs::write(&path, bytes).map_err(|e| Error::io(&path, e))?;

    let path = fs::canonicalize(&path).map_err(|e| Error::io(&path, e))?;
    info!(path = %path.display(), bytes = bytes.len(), "saved media");
    Ok(path)
}
