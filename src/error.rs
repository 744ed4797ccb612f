use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the snapshot store. Both are absorbed at the call
/// site (logged, previous snapshot retained); nothing here aborts the
/// process.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode snapshot {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
