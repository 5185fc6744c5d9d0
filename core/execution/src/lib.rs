// gem/core/execution/src/lib.rs

// Re-export modules
pub mod metrics;
pub mod revm_adapter;
pub mod state;
pub mod types;

pub use types::{AccountState, Address, CallOutput, ExecutionError};

pub use state::{load_alloc, GenesisAccount, GenesisAlloc, StateDB, StateRoot};

pub use revm_adapter::{EvmContext, Message, ReadOnlyEvm, StateDBAdapter};
