//! Sword identifiers.
//!
//! Simulated swords get a locally allocated counter id, ledger swords carry
//! the 32-byte object id assigned by the chain. The two live in separate enum
//! variants, so a simulated id can never collide with a ledger id.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A Sui object id (32 bytes, rendered as `0x` + 64 hex digits).
pub type ObjectId = B256;

/// Prefix of the text form of a locally allocated id.
const LOCAL_PREFIX: &str = "local-";

/// Unique identifier of one sword instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SwordId {
    /// Allocated by a simulated session.
    Local(u64),
    /// Assigned by the ledger.
    Object(ObjectId),
}

impl SwordId {
    /// Returns the local counter, if this is a simulated id.
    #[inline]
    #[must_use]
    pub const fn local(self) -> Option<u64> {
        match self {
            Self::Local(n) => Some(n),
            Self::Object(_) => None,
        }
    }

    /// Returns the ledger object id, if this is a ledger id.
    #[inline]
    #[must_use]
    pub const fn object(self) -> Option<ObjectId> {
        match self {
            Self::Local(_) => None,
            Self::Object(id) => Some(id),
        }
    }

    /// Returns true for ids allocated by a simulated session.
    #[inline]
    #[must_use]
    pub const fn is_local(self) -> bool {
        matches!(self, Self::Local(_))
    }
}

impl fmt::Display for SwordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(n) => write!(f, "{LOCAL_PREFIX}{n}"),
            Self::Object(id) => {
                f.write_str("0x")?;
                for byte in id.as_slice() {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

/// A string that is neither `local-<n>` nor a 32-byte hex object id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid sword id: {0:?}")]
pub struct ParseSwordIdError(pub String);

impl FromStr for SwordId {
    type Err = ParseSwordIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(counter) = s.strip_prefix(LOCAL_PREFIX) {
            return counter
                .parse::<u64>()
                .map(Self::Local)
                .map_err(|_| ParseSwordIdError(s.to_string()));
        }

        let hex = s.strip_prefix("0x").unwrap_or(s);
        if hex.len() != 64 {
            return Err(ParseSwordIdError(s.to_string()));
        }
        ObjectId::from_str(hex)
            .map(Self::Object)
            .map_err(|_| ParseSwordIdError(s.to_string()))
    }
}

impl TryFrom<String> for SwordId {
    type Error = ParseSwordIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SwordId> for String {
    fn from(value: SwordId) -> Self {
        value.to_string()
    }
}

impl From<ObjectId> for SwordId {
    fn from(value: ObjectId) -> Self {
        Self::Object(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_text_form() {
        let id = SwordId::Local(42);
        assert_eq!(id.to_string(), "local-42");
        assert_eq!("local-42".parse::<SwordId>(), Ok(id));
    }

    #[test]
    fn test_object_text_form() {
        let mut bytes = [0u8; 32];
        bytes[31] = 0xab;
        let id = SwordId::Object(ObjectId::new(bytes));
        let text = id.to_string();
        assert_eq!(text.len(), 66);
        assert!(text.starts_with("0x000"));
        assert!(text.ends_with("ab"));
        assert_eq!(text.parse::<SwordId>(), Ok(id));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!("local-".parse::<SwordId>().is_err());
        assert!("local-x".parse::<SwordId>().is_err());
        assert!("0x1234".parse::<SwordId>().is_err());
        assert!("test-sword-001".parse::<SwordId>().is_err());
    }

    #[test]
    fn test_local_and_object_never_equal() {
        let local = SwordId::Local(0);
        let object = SwordId::Object(ObjectId::ZERO);
        assert_ne!(local, object);
        assert!(local.is_local());
        assert!(!object.is_local());
    }
}
