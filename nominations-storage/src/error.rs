use std::path::PathBuf;

use thiserror::Error;

#[allow(clippy::module_name_repetitions)]
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read storage file {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("Failed to write storage file {0}: {1}")]
    Write(PathBuf, std::io::Error),
    #[error("Storage file {0} is not a JSON object of strings: {1}")]
    Corrupt(PathBuf, serde_json::Error),
    #[error("Failed to encode storage content: {0}")]
    Encode(serde_json::Error),
    #[error("Storage is not writable")]
    ReadOnly,
}
