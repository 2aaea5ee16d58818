//! # Ledger Error Types

use herosword_shared::ObjectId;
use thiserror::Error;

/// Errors returned by ledger collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The transaction was rejected or aborted.
    #[error("call to {target} rejected: {reason}")]
    CallRejected {
        /// Move call target, `package::module::function`.
        target: String,
        /// What the node or contract reported.
        reason: String,
    },

    /// No settlement within the configured bound.
    #[error("call to {target} timed out after {after_ms}ms")]
    Timeout {
        /// Move call target.
        target: String,
        /// The bound that elapsed.
        after_ms: u64,
    },

    /// An object or balance payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The referenced object is not owned by the player.
    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    /// Ledger mode is missing a required setting.
    #[error("ledger not configured: {0}")]
    NotConfigured(String),
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
