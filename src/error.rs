use std::io;

use thiserror::Error;

/// Failures at the edges of the crate: the embedded corpus and the config file.
#[derive(Debug, Error)]
pub enum Error {
    #[error("corpus document not found: {0}")]
    CorpusMissing(String),

    #[error("corpus document {file} is malformed: {source}")]
    CorpusMalformed {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("corpus document {0} has no texts")]
    CorpusEmpty(String),

    #[error("config i/o: {0}")]
    Io(#[from] io::Error),

    #[error("config json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
