//! # Engine Error Types
//!
//! An error from any engine operation means the session was not touched.
//! A destroyed sword is an [`Outcome`](herosword_economy::Outcome), never an
//! error.

use herosword_blockchain::LedgerError;
use herosword_economy::EconomyError;
use thiserror::Error;

/// Errors returned by [`SwordEngine`](crate::SwordEngine) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A progression, balance, config or persistence rule refused the call.
    #[error(transparent)]
    Economy(#[from] EconomyError),

    /// A ledger call failed, was rejected, or did not settle in time.
    ///
    /// Recoverable: the session is unchanged and the caller may retry.
    #[error("remote call {operation} failed: {source}")]
    RemoteCallFailed {
        /// Engine operation that issued the call.
        operation: &'static str,
        /// What the ledger reported.
        source: LedgerError,
    },

    /// The operation needs an active sword and the slot is empty.
    #[error("no active sword")]
    NoActiveSword,
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
