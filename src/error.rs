use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecommendError {
    #[error("Unknown item: {0}")]
    UnknownItem(String),

    #[error("Invalid page: start {start}, max_results {max_results} (allowed 1..={cap})")]
    InvalidPage {
        start: usize,
        max_results: usize,
        cap: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Corpus snapshot error: {0}")]
    Snapshot(#[from] serde_cbor::Error),

    /// Failure raised by a repository, ledger or corpus store, passed through unchanged
    #[error(transparent)]
    Collaborator(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, RecommendError>;
