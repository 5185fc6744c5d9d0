// gem/core/governance/src/lib.rs

//! Read-only bridge from consensus to the on-chain governance contract.
//!
//! [`InnerContract`] answers whether a node may produce blocks and where
//! block rewards go, by calling the contract at
//! [`GOVERNANCE_CONTRACT_ADDRESS`] against a state snapshot.

pub mod abi;
pub mod calls;
pub mod config;
pub mod context;
pub mod contract;
pub mod error;
pub mod invoker;
pub mod metrics;
pub mod registry;
pub mod types;

pub use abi::{AbiError, Interface, ParamType, Token};
pub use calls::GovernanceCall;
pub use config::{
    GovernanceConfig, DEFAULT_GAS_LIMIT, DEFAULT_GAS_PRICE, GOVERNANCE_CONTRACT_ADDRESS, GWEI,
};
pub use context::{build_evm, CallContext};
pub use contract::InnerContract;
pub use error::GovernanceError;
pub use invoker::invoke;
pub use registry::{governance_interface, init, methods, GOVERNANCE_ABI};
pub use types::{WhiteListEntry, WhitelistStatus};
