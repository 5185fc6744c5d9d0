// gem/core/consensus/src/chain.rs

use crate::types::{Hash, Header};
use std::collections::BTreeMap;

/// Read access to canonical block hashes, backing the `BLOCKHASH` opcode
pub trait ChainReader: Send + Sync {
    fn block_hash(&self, number: u64) -> Option<Hash>;
}

/// Chain view with no history; every lookup misses
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHistory;

impl ChainReader for NoHistory {
    fn block_hash(&self, _number: u64) -> Option<Hash> {
        None
    }
}

/// In-memory index of canonical headers by number
#[derive(Debug, Default, Clone)]
pub struct HeaderChain {
    hashes: BTreeMap<u64, Hash>,
}

impl HeaderChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_headers<'a>(headers: impl IntoIterator<Item = &'a Header>) -> Self {
        let mut chain = Self::new();
        for header in headers {
            chain.insert(header);
        }
        chain
    }

    /// Record `header` as canonical at its height, replacing any previous entry
    pub fn insert(&mut self, header: &Header) -> Hash {
        let hash = header.hash();
        self.hashes.insert(header.number, hash);
        hash
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

impl ChainReader for HeaderChain {
    fn block_hash(&self, number: u64) -> Option<Hash> {
        self.hashes.get(&number).copied()
    }
}
