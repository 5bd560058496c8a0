//! Library-level error types. Binaries convert these into `anyhow::Error`
//! at the edge; within `obs-core` every fallible function returns one of
//! these enums so callers can match on specific failure modes.

use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open store file {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read store file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write store file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create store directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt record in {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: CodecError,
    },
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("empty symbol list")]
    NoSymbols,

    #[error("start epoch {start} is after end epoch {end}")]
    InvertedRange { start: i64, end: i64 },

    #[error(transparent)]
    Store(#[from] StoreError),
}
