use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScopeError>;

#[derive(Debug, Error)]
pub enum ScopeError {
    /// Normalization could not produce a host, address or CIDR.
    #[error("invalid scope item: {0:?}")]
    InvalidToken(String),
    #[error("invalid CIDR {cidr:?}: {reason}")]
    InvalidCidr { cidr: String, reason: String },
    /// Enumerating the block would exceed the configured expansion limit.
    #[error("refusing to expand {cidr}: {size} addresses exceeds the limit of {limit}")]
    ExpansionTooLarge {
        cidr: String,
        size: u128,
        limit: u128,
    },
    #[error("failed to persist {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("scope directory {} is unusable: {source}", path.display())]
    ScopeDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScopeError {
    pub fn invalid_cidr(cidr: &str, reason: impl ToString) -> Self {
        Self::InvalidCidr {
            cidr: cidr.to_string(),
            reason: reason.to_string(),
        }
    }
}
