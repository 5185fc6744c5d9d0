// gem/core/governance/src/calls.rs

use crate::abi::{AbiError, Interface, Token};
use crate::registry::methods;
use gem_consensus::Address;

/// State-changing governance operations, encoded for submission elsewhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GovernanceCall {
    UpdateCoinbase(Address),
    AddNodeId(String),
    RemoveNodeId(String),
    TransferOwnership(Address),
    AcceptOwnership,
}

impl GovernanceCall {
    pub fn method(&self) -> &'static str {
        match self {
            GovernanceCall::UpdateCoinbase(_) => methods::UPDATE_COINBASE,
            GovernanceCall::AddNodeId(_) => methods::ADD_NODE_ID,
            GovernanceCall::RemoveNodeId(_) => methods::REMOVE_NODE_ID,
            GovernanceCall::TransferOwnership(_) => methods::TRANSFER_OWNERSHIP,
            GovernanceCall::AcceptOwnership => methods::ACCEPT_OWNERSHIP,
        }
    }

    fn args(&self) -> Vec<Token> {
        match self {
            GovernanceCall::UpdateCoinbase(a) | GovernanceCall::TransferOwnership(a) => {
                vec![Token::Address(*a)]
            }
            GovernanceCall::AddNodeId(id) | GovernanceCall::RemoveNodeId(id) => {
                vec![Token::String(id.clone())]
            }
            GovernanceCall::AcceptOwnership => vec![],
        }
    }

    /// Transaction input for this call
    pub fn encode(&self, interface: &Interface) -> Result<Vec<u8>, AbiError> {
        interface.pack(self.method(), &self.args())
    }
}
