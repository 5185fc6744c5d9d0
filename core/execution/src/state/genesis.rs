// gem/core/execution/src/state/genesis.rs

// Genesis-style allocation files used to seed a StateDB
use crate::state::StateDB;
use crate::types::{Address, ExecutionError};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Pre-funded account with optional code and storage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisAccount {
    #[serde(default)]
    pub balance: U256,

    #[serde(default)]
    pub nonce: u64,

    /// Hex-encoded runtime code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Hex-encoded slot -> value pairs
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub storage: BTreeMap<String, String>,
}

pub type GenesisAlloc = BTreeMap<Address, GenesisAccount>;

/// Parse an allocation from JSON text
pub fn load_alloc(json: &str) -> Result<GenesisAlloc, ExecutionError> {
    serde_json::from_str(json).map_err(|e| ExecutionError::InvalidAlloc(e.to_string()))
}

fn strip_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Parse a hex word of at most 32 bytes; odd lengths are left-padded
fn parse_word(s: &str) -> Result<U256, ExecutionError> {
    let digits = strip_prefix(s);
    let padded = if digits.len() % 2 == 1 {
        format!("0{}", digits)
    } else {
        digits.to_string()
    };
    let bytes = hex::decode(&padded)
        .map_err(|e| ExecutionError::InvalidAlloc(format!("bad word {}: {}", s, e)))?;
    if bytes.len() > 32 {
        return Err(ExecutionError::InvalidAlloc(format!(
            "word {} is longer than 32 bytes",
            s
        )));
    }
    Ok(U256::from_big_endian(&bytes))
}

impl StateDB {
    /// Build a fresh state from an allocation
    pub fn from_alloc(alloc: &GenesisAlloc) -> Result<Self, ExecutionError> {
        let state = Self::new();
        state.apply_alloc(alloc)?;
        Ok(state)
    }

    /// Write every account in `alloc` into this state
    pub fn apply_alloc(&self, alloc: &GenesisAlloc) -> Result<(), ExecutionError> {
        for (address, account) in alloc {
            self.set_balance(*address, account.balance);
            self.set_nonce(*address, account.nonce);

            if let Some(code) = &account.code {
                let code = hex::decode(strip_prefix(code)).map_err(|e| {
                    ExecutionError::InvalidAlloc(format!("bad code for {}: {}", address, e))
                })?;
                if !code.is_empty() {
                    self.set_code(*address, code);
                }
            }

            for (key, value) in &account.storage {
                self.set_storage(*address, parse_word(key)?, parse_word(value)?);
            }
        }
        info!("Applied genesis allocation with {} accounts", alloc.len());
        Ok(())
    }
}
