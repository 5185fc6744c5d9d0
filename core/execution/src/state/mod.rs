// gem/core/execution/src/state/mod.rs

// State management module
// Handles accounts, code, storage and genesis allocation

pub mod genesis;
pub mod state_db;

pub use genesis::{load_alloc, GenesisAccount, GenesisAlloc};
pub use state_db::{StateDB, StateRoot};
