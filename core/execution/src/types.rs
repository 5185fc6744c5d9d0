// gem/core/execution/src/types.rs

// Types shared by the state store and the VM adapter
use gem_consensus::types::Hash;
use primitive_types::U256;

pub use gem_consensus::types::Address;

/// Account state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountState {
    pub nonce: u64,
    pub balance: U256,
    /// Zero when the account has no code
    pub code_hash: Hash,
}

impl AccountState {
    pub fn has_code(&self) -> bool {
        !self.code_hash.is_zero()
    }
}

/// Successful VM call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutput {
    pub output: Vec<u8>,
    /// Whole-transaction gas, including the 21000 intrinsic charge
    pub gas_used: u64,
}

/// Execution error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    #[error("Execution reverted: 0x{} (gas used: {gas_used})", hex::encode(.output))]
    Reverted { output: Vec<u8>, gas_used: u64 },

    #[error("Execution halted: {reason} (gas used: {gas_used})")]
    Halted { reason: String, gas_used: u64 },

    #[error("VM error: {0}")]
    Vm(String),

    #[error("Invalid genesis allocation: {0}")]
    InvalidAlloc(String),
}

impl ExecutionError {
    /// Whatever the callee returned before failing
    pub fn partial_output(&self) -> &[u8] {
        match self {
            ExecutionError::Reverted { output, .. } => output,
            _ => &[],
        }
    }

    pub fn gas_used(&self) -> Option<u64> {
        match self {
            ExecutionError::Reverted { gas_used, .. } | ExecutionError::Halted { gas_used, .. } => {
                Some(*gas_used)
            }
            _ => None,
        }
    }
}
