// gem/core/execution/src/state/state_db.rs

// State database holding accounts, contract code and storage
use crate::types::{AccountState, Address};
use dashmap::DashMap;
use gem_consensus::types::{keccak256, Hash};
use primitive_types::U256;
use sha3::{Digest, Keccak256};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// State root hash
pub type StateRoot = Hash;

/// Point-in-time account and storage view that VM calls execute against.
///
/// All accessors take `&self`; the maps are internally synchronised, so a
/// single `StateDB` can be read from several threads at once. Callers that
/// keep writing to a state while queries run should hand the queries a
/// [`StateDB::copy`] instead.
#[derive(Default)]
pub struct StateDB {
    accounts: DashMap<Address, AccountState>,

    /// Storage slots for each account
    storage: DashMap<Address, BTreeMap<U256, U256>>,

    /// Contract code by hash
    code_storage: DashMap<Hash, Vec<u8>>,
}

impl StateDB {
    pub fn new() -> Self {
        Self::default()
    }

    /// Independent deep copy; writes to either side never reach the other
    pub fn copy(&self) -> Self {
        Self {
            accounts: self.accounts.clone(),
            storage: self.storage.clone(),
            code_storage: self.code_storage.clone(),
        }
    }

    pub fn exists(&self, address: &Address) -> bool {
        self.accounts.contains_key(address) || self.storage.contains_key(address)
    }

    pub fn get_account(&self, address: &Address) -> AccountState {
        self.accounts
            .get(address)
            .map(|a| a.clone())
            .unwrap_or_default()
    }

    pub fn get_balance(&self, address: &Address) -> U256 {
        self.get_account(address).balance
    }

    pub fn set_balance(&self, address: Address, balance: U256) {
        self.accounts.entry(address).or_default().balance = balance;
    }

    pub fn get_nonce(&self, address: &Address) -> u64 {
        self.get_account(address).nonce
    }

    pub fn set_nonce(&self, address: Address, nonce: u64) {
        self.accounts.entry(address).or_default().nonce = nonce;
    }

    pub fn get_code_hash(&self, address: &Address) -> Hash {
        self.get_account(address).code_hash
    }

    /// Get contract code by hash
    pub fn get_code(&self, code_hash: &Hash) -> Option<Vec<u8>> {
        self.code_storage.get(code_hash).map(|c| c.clone())
    }

    /// Code deployed at `address`, if any
    pub fn code_at(&self, address: &Address) -> Option<Vec<u8>> {
        let code_hash = self.get_code_hash(address);
        if code_hash.is_zero() {
            return None;
        }
        self.get_code(&code_hash)
    }

    /// Install contract code at `address`, returning its Keccak-256 hash
    pub fn set_code(&self, address: Address, code: Vec<u8>) -> Hash {
        let code_hash = keccak256(&code);
        self.code_storage.insert(code_hash, code);
        self.accounts.entry(address).or_default().code_hash = code_hash;
        debug!("Installed code at {} ({})", address, code_hash);
        code_hash
    }

    /// Get storage value; unset slots read as zero
    pub fn get_storage(&self, address: &Address, key: &U256) -> U256 {
        self.storage
            .get(address)
            .and_then(|slots| slots.get(key).copied())
            .unwrap_or_default()
    }

    /// Set storage value; writing zero clears the slot
    pub fn set_storage(&self, address: Address, key: U256, value: U256) {
        let mut slots = self.storage.entry(address).or_default();
        if value.is_zero() {
            slots.remove(&key);
        } else {
            slots.insert(key, value);
        }
    }

    /// Number of non-zero storage slots held by `address`
    pub fn storage_len(&self, address: &Address) -> usize {
        self.storage.get(address).map(|s| s.len()).unwrap_or(0)
    }

    /// Digest over every account, code hash and storage slot in address order.
    ///
    /// Two states with the same contents always produce the same root, which
    /// makes this suitable for detecting mutation.
    pub fn calculate_state_root(&self) -> StateRoot {
        let addresses: BTreeSet<Address> = self
            .accounts
            .iter()
            .map(|e| *e.key())
            .chain(self.storage.iter().map(|e| *e.key()))
            .collect();

        let mut hasher = Keccak256::new();
        for address in addresses {
            let account = self.get_account(&address);
            let mut word = [0u8; 32];

            hasher.update(address.as_bytes());
            hasher.update(account.nonce.to_be_bytes());
            account.balance.to_big_endian(&mut word);
            hasher.update(word);
            hasher.update(account.code_hash.as_bytes());

            if let Some(slots) = self.storage.get(&address) {
                for (key, value) in slots.iter() {
                    key.to_big_endian(&mut word);
                    hasher.update(word);
                    value.to_big_endian(&mut word);
                    hasher.update(word);
                }
            }
        }
        Hash::new(hasher.finalize().into())
    }
}
