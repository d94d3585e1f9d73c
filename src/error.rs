use std::path::PathBuf;

use thiserror::Error;

//-------------------------------------------------------------------------

/// Errors surfaced by the index engine and the thin command layer wrapped
/// around it. A dedicated `thiserror` enum instead of letting bare
/// `io::Error` or `anyhow::Error` leak across the boundary callers
/// actually need to match on.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("path already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("path not found: {0}")]
    NotFound(PathBuf),

    #[error("bad index format: {0}")]
    BadFormat(String),

    #[error("key {0} already exists")]
    DuplicateKey(u64),

    #[error("bad input: {0}")]
    BadInput(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IndexError>;

//-------------------------------------------------------------------------
