// gem/core/consensus/src/lib.rs

pub mod chain;
pub mod types;

pub use chain::{ChainReader, HeaderChain, NoHistory};
pub use types::*;
