// gem/core/governance/src/error.rs

use crate::abi::AbiError;
use gem_execution::ExecutionError;

/// Governance query error.
///
/// Every variant other than `Configuration` names the contract method that
/// failed, so callers can tell a failed lookup from a negative answer.
#[derive(Debug, thiserror::Error)]
pub enum GovernanceError {
    #[error("Governance interface is unusable: {0}")]
    Configuration(#[source] AbiError),

    #[error("Failed to encode {method} call: {source}")]
    Encoding {
        method: &'static str,
        #[source]
        source: AbiError,
    },

    #[error("{method} call failed: {source}")]
    Execution {
        method: &'static str,
        #[source]
        source: ExecutionError,
    },

    #[error("Failed to decode {method} output: {source}")]
    Decoding {
        method: &'static str,
        #[source]
        source: AbiError,
    },
}

impl GovernanceError {
    /// Contract method involved, if the failure happened during a query
    pub fn method(&self) -> Option<&'static str> {
        match self {
            GovernanceError::Configuration(_) => None,
            GovernanceError::Encoding { method, .. }
            | GovernanceError::Execution { method, .. }
            | GovernanceError::Decoding { method, .. } => Some(method),
        }
    }

    /// Short label used for the query status metric
    pub fn kind(&self) -> &'static str {
        match self {
            GovernanceError::Configuration(_) => "configuration",
            GovernanceError::Encoding { .. } => "encoding",
            GovernanceError::Execution { .. } => "execution",
            GovernanceError::Decoding { .. } => "decoding",
        }
    }
}
