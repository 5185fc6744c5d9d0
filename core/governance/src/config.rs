// gem/core/governance/src/config.rs

use gem_consensus::Address;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Protocol-reserved address of the governance contract
pub const GOVERNANCE_CONTRACT_ADDRESS: Address = Address([
    0x10, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x01,
]);

pub const GWEI: u64 = 1_000_000_000;

/// Gas offered to every governance query
pub const DEFAULT_GAS_LIMIT: u64 = u64::MAX / 2;

/// Gas price of the synthetic query message (1 Gwei)
pub const DEFAULT_GAS_PRICE: u64 = GWEI;

/// Where and how governance queries are sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceConfig {
    pub contract_address: Address,
    pub gas_limit: u64,
    pub gas_price: U256,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            contract_address: GOVERNANCE_CONTRACT_ADDRESS,
            gas_limit: DEFAULT_GAS_LIMIT,
            gas_price: U256::from(DEFAULT_GAS_PRICE),
        }
    }
}
