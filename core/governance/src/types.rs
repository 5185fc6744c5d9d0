// gem/core/governance/src/types.rs

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whitelist state of a node identifier as reported by `isWhite`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WhitelistStatus {
    /// Not on the whitelist
    Absent,
    /// May produce blocks
    Authorized,
    /// May produce blocks with elevated rights
    Privileged,
    /// Any other code the contract returns
    Unknown(U256),
}

impl WhitelistStatus {
    pub fn from_code(code: U256) -> Self {
        if code == U256::zero() {
            WhitelistStatus::Absent
        } else if code == U256::one() {
            WhitelistStatus::Authorized
        } else if code == U256::from(2) {
            WhitelistStatus::Privileged
        } else {
            WhitelistStatus::Unknown(code)
        }
    }

    /// Raw value returned by the contract
    pub fn code(&self) -> U256 {
        match self {
            WhitelistStatus::Absent => U256::zero(),
            WhitelistStatus::Authorized => U256::one(),
            WhitelistStatus::Privileged => U256::from(2),
            WhitelistStatus::Unknown(code) => *code,
        }
    }

    /// Only codes 1 and 2 grant block production
    pub fn is_eligible(&self) -> bool {
        matches!(
            self,
            WhitelistStatus::Authorized | WhitelistStatus::Privileged
        )
    }
}

impl From<U256> for WhitelistStatus {
    fn from(code: U256) -> Self {
        Self::from_code(code)
    }
}

impl fmt::Display for WhitelistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WhitelistStatus::Absent => write!(f, "absent (0)"),
            WhitelistStatus::Authorized => write!(f, "authorized (1)"),
            WhitelistStatus::Privileged => write!(f, "privileged (2)"),
            WhitelistStatus::Unknown(code) => write!(f, "unknown ({})", code),
        }
    }
}

// Carried on the wire as the raw code
impl Serialize for WhitelistStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.code().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WhitelistStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        U256::deserialize(deserializer).map(Self::from_code)
    }
}

/// One row of the contract's node list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhiteListEntry {
    pub node_id: String,
    pub state: WhitelistStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(WhitelistStatus::from_code(U256::zero()), WhitelistStatus::Absent);
        assert_eq!(WhitelistStatus::from_code(U256::one()), WhitelistStatus::Authorized);
        assert_eq!(WhitelistStatus::from_code(U256::from(2)), WhitelistStatus::Privileged);
        assert_eq!(
            WhitelistStatus::from_code(U256::from(3)),
            WhitelistStatus::Unknown(U256::from(3))
        );
    }

    #[test]
    fn test_eligibility() {
        assert!(!WhitelistStatus::Absent.is_eligible());
        assert!(WhitelistStatus::Authorized.is_eligible());
        assert!(WhitelistStatus::Privileged.is_eligible());
        assert!(!WhitelistStatus::Unknown(U256::MAX).is_eligible());
    }

    #[test]
    fn test_code_roundtrip_for_large_values() {
        let status = WhitelistStatus::from(U256::MAX);
        assert_eq!(status.code(), U256::MAX);
        assert_eq!(status.to_string(), format!("unknown ({})", U256::MAX));
    }

    #[test]
    fn test_entry_serializes_raw_code() {
        let entry = WhiteListEntry {
            node_id: "enode-a".into(),
            state: WhitelistStatus::Privileged,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"node_id":"enode-a","state":"0x2"}"#);
        let back: WhiteListEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
