//! Errors surfaced by the copy-trading core.

use thiserror::Error;

/// Failures returned to callers of registry and outcome operations.
///
/// Policy rejections are not errors; they come back as
/// [`CopyDecision::Rejected`](crate::trading::CopyDecision).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CopyError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("wallet not found: {0}")]
    WalletNotFound(String),

    #[error("trade not found: {0}")]
    TradeNotFound(String),

    #[error("wallet already tracked: {0}")]
    AlreadyExists(String),

    #[error("trade already closed: {0}")]
    AlreadyClosed(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CopyError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::WalletNotFound(_) | Self::TradeNotFound(_))
    }
}

pub type CopyResult<T> = Result<T, CopyError>;
