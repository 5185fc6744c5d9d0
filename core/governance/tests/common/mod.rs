// Shared fixtures: a hand-assembled stand-in for the governance contract

#![allow(dead_code)]

use gem_consensus::{keccak256, Address, ChainConfig, Hash, Header, HeaderChain};
use gem_execution::StateDB;
use gem_governance::{governance_interface, methods, InnerContract, GOVERNANCE_CONTRACT_ADDRESS};
use primitive_types::U256;
use std::collections::HashMap;

pub const ADD: u8 = 0x01;
pub const EQ: u8 = 0x14;
pub const SHR: u8 = 0x1c;
pub const SHA3: u8 = 0x20;
pub const CALLER: u8 = 0x33;
pub const CALLDATALOAD: u8 = 0x35;
pub const CALLDATACOPY: u8 = 0x37;
pub const CODECOPY: u8 = 0x39;
pub const GASPRICE: u8 = 0x3a;
pub const COINBASE: u8 = 0x41;
pub const TIMESTAMP: u8 = 0x42;
pub const NUMBER: u8 = 0x43;
pub const DIFFICULTY: u8 = 0x44;
pub const GASLIMIT: u8 = 0x45;
pub const MSTORE: u8 = 0x52;
pub const SLOAD: u8 = 0x54;
pub const SSTORE: u8 = 0x55;
pub const JUMPI: u8 = 0x57;
pub const JUMPDEST: u8 = 0x5b;
pub const PUSH1: u8 = 0x60;
pub const PUSH2: u8 = 0x61;
pub const PUSH4: u8 = 0x63;
pub const DUP1: u8 = 0x80;
pub const DUP2: u8 = 0x81;
pub const SWAP1: u8 = 0x90;
pub const RETURN: u8 = 0xf3;
pub const REVERT: u8 = 0xfd;

/// Storage layout of the stand-in contract
pub const SLOT_COINBASE: u64 = 0;
pub const SLOT_OWNER: u64 = 1;
pub const SLOT_NEW_OWNER: u64 = 2;
/// Bumped on every `isWhite` call
pub const SLOT_QUERY_COUNT: u64 = 3;

/// Raw selectors answered by the stand-in outside its interface
pub const RAW_CALLER: [u8; 4] = [0, 0, 0, 1];
pub const RAW_NUMBER: [u8; 4] = [0, 0, 0, 2];
pub const RAW_TIMESTAMP: [u8; 4] = [0, 0, 0, 3];
pub const RAW_COINBASE: [u8; 4] = [0, 0, 0, 4];
pub const RAW_WRITE: [u8; 4] = [0, 0, 0, 5];
pub const RAW_GASPRICE: [u8; 4] = [0, 0, 0, 6];
pub const RAW_DIFFICULTY: [u8; 4] = [0, 0, 0, 7];
pub const RAW_GASLIMIT: [u8; 4] = [0, 0, 0, 8];

/// Minimal EVM assembler with forward labels
#[derive(Default)]
pub struct Asm {
    code: Vec<u8>,
    labels: HashMap<&'static str, usize>,
    fixups: Vec<(usize, &'static str)>,
}

impl Asm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn op(&mut self, op: u8) -> &mut Self {
        self.code.push(op);
        self
    }

    pub fn push1(&mut self, value: u8) -> &mut Self {
        self.code.extend_from_slice(&[PUSH1, value]);
        self
    }

    pub fn push2(&mut self, value: u16) -> &mut Self {
        self.code.push(PUSH2);
        self.code.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn push4(&mut self, value: [u8; 4]) -> &mut Self {
        self.code.push(PUSH4);
        self.code.extend_from_slice(&value);
        self
    }

    /// PUSH2 of a label's offset, resolved in `finish`
    pub fn push_label(&mut self, name: &'static str) -> &mut Self {
        self.code.push(PUSH2);
        self.fixups.push((self.code.len(), name));
        self.code.extend_from_slice(&[0, 0]);
        self
    }

    /// Jump target
    pub fn label(&mut self, name: &'static str) -> &mut Self {
        self.labels.insert(name, self.code.len());
        self.op(JUMPDEST)
    }

    /// Raw bytes addressed by label, e.g. for CODECOPY
    pub fn data(&mut self, name: &'static str, bytes: &[u8]) -> &mut Self {
        self.labels.insert(name, self.code.len());
        self.code.extend_from_slice(bytes);
        self
    }

    /// Store the top of stack at memory 0 and return that word
    pub fn return_word(&mut self) -> &mut Self {
        self.push1(0)
            .op(MSTORE)
            .push1(0x20)
            .push1(0)
            .op(RETURN)
    }

    pub fn finish(&self) -> Vec<u8> {
        let mut code = self.code.clone();
        for (at, name) in &self.fixups {
            let target = self.labels[name] as u16;
            code[*at..*at + 2].copy_from_slice(&target.to_be_bytes());
        }
        code
    }
}

pub fn word(value: u64) -> Vec<u8> {
    let mut out = [0u8; 32];
    U256::from(value).to_big_endian(&mut out);
    out.to_vec()
}

/// ABI output of `whiteList`: (string node_id, uint256 state)
pub fn white_list_output(node_id: &str, state: u64) -> Vec<u8> {
    let mut out = word(0x40);
    out.extend(word(state));
    out.extend(word(node_id.len() as u64));
    let mut text = node_id.as_bytes().to_vec();
    text.resize((text.len() + 31) / 32 * 32, 0);
    out.extend(text);
    out
}

fn selector(method: &str) -> [u8; 4] {
    governance_interface()
        .unwrap()
        .function(method)
        .unwrap()
        .selector()
}

/// Runtime code of the stand-in governance contract.
///
/// `isWhite(s)` returns the word stored at `keccak256(s)`; the getters read
/// slots 0..=2; `whiteList(0)` returns a fixed entry and any other index
/// reverts.
pub fn governance_code(list_entry: (&str, u64)) -> Vec<u8> {
    let routes: [([u8; 4], &'static str); 13] = [
        (selector(methods::IS_WHITE), "is_white"),
        (selector(methods::GET_COINBASE), "get_coinbase"),
        (selector(methods::OWNER), "owner"),
        (selector(methods::NEW_OWNER), "new_owner"),
        (selector(methods::WHITE_LIST), "white_list"),
        (RAW_CALLER, "raw_caller"),
        (RAW_NUMBER, "raw_number"),
        (RAW_TIMESTAMP, "raw_timestamp"),
        (RAW_COINBASE, "raw_coinbase"),
        (RAW_WRITE, "raw_write"),
        (RAW_GASPRICE, "raw_gasprice"),
        (RAW_DIFFICULTY, "raw_difficulty"),
        (RAW_GASLIMIT, "raw_gaslimit"),
    ];
    let entry = white_list_output(list_entry.0, list_entry.1);

    let mut asm = Asm::new();
    asm.push1(0).op(CALLDATALOAD).push1(0xe0).op(SHR);
    for (sel, target) in routes.iter() {
        asm.op(DUP1).push4(*sel).op(EQ).push_label(*target).op(JUMPI);
    }
    asm.label("fail").push1(0).push1(0).op(REVERT);

    asm.label("is_white")
        // Bump the query counter
        .push1(SLOT_QUERY_COUNT as u8)
        .op(SLOAD)
        .push1(1)
        .op(ADD)
        .push1(SLOT_QUERY_COUNT as u8)
        .op(SSTORE)
        // Copy the string argument to memory 0 and hash it
        .push1(4)
        .op(CALLDATALOAD)
        .push1(4)
        .op(ADD)
        .op(DUP1)
        .op(CALLDATALOAD)
        .op(SWAP1)
        .push1(0x20)
        .op(ADD)
        .op(DUP2)
        .op(SWAP1)
        .push1(0)
        .op(CALLDATACOPY)
        .push1(0)
        .op(SHA3)
        .op(SLOAD)
        .return_word();

    asm.label("get_coinbase")
        .push1(SLOT_COINBASE as u8)
        .op(SLOAD)
        .return_word();
    asm.label("owner").push1(SLOT_OWNER as u8).op(SLOAD).return_word();
    asm.label("new_owner")
        .push1(SLOT_NEW_OWNER as u8)
        .op(SLOAD)
        .return_word();

    asm.label("white_list")
        .push1(4)
        .op(CALLDATALOAD)
        .push_label("fail")
        .op(JUMPI)
        .push2(entry.len() as u16)
        .push_label("entry")
        .push1(0)
        .op(CODECOPY)
        .push2(entry.len() as u16)
        .push1(0)
        .op(RETURN);

    asm.label("raw_caller").op(CALLER).return_word();
    asm.label("raw_number").op(NUMBER).return_word();
    asm.label("raw_timestamp").op(TIMESTAMP).return_word();
    asm.label("raw_coinbase").op(COINBASE).return_word();
    asm.label("raw_gasprice").op(GASPRICE).return_word();
    asm.label("raw_difficulty").op(DIFFICULTY).return_word();
    asm.label("raw_gaslimit").op(GASLIMIT).return_word();
    asm.label("raw_write")
        .op(CALLER)
        .push1(SLOT_COINBASE as u8)
        .op(SSTORE)
        .push1(SLOT_COINBASE as u8)
        .op(SLOAD)
        .return_word();

    asm.data("entry", &entry);
    asm.finish()
}

/// PUSH1 0 PUSH1 0 REVERT
pub const REVERTING_CODE: [u8; 5] = [PUSH1, 0, PUSH1, 0, REVERT];

/// Returns a single byte
pub const SHORT_OUTPUT_CODE: [u8; 5] = [PUSH1, 1, PUSH1, 0, RETURN];

pub const INVALID_CODE: [u8; 1] = [0xfe];

pub fn address_word(address: &Address) -> U256 {
    U256::from_big_endian(&{
        let mut w = [0u8; 32];
        w[12..].copy_from_slice(address.as_bytes());
        w
    })
}

pub fn node_slot(node_id: &str) -> U256 {
    U256::from_big_endian(keccak256(node_id.as_bytes()).as_bytes())
}

pub fn test_header(number: u64) -> Header {
    Header {
        parent_hash: Hash::default(),
        coinbase: Address([0xcb; 20]),
        number,
        timestamp: 1_700_000_000 + number,
        difficulty: U256::from(2),
        gas_limit: 30_000_000,
        mix_digest: Hash::new([0x5a; 32]),
        extra: vec![0u8; 32 + gem_consensus::INNER_EXTRA_SEAL],
    }
}

pub struct Fixture {
    pub state: StateDB,
    pub header: Header,
    pub chain: HeaderChain,
    pub chain_config: ChainConfig,
}

impl Fixture {
    /// Stand-in contract deployed at the governance address
    pub fn new() -> Self {
        Self::with_code(governance_code(("enode-genesis", 1)))
    }

    pub fn with_code(code: Vec<u8>) -> Self {
        let state = StateDB::new();
        state.set_code(GOVERNANCE_CONTRACT_ADDRESS, code);
        Self::with_state(state)
    }

    pub fn with_state(state: StateDB) -> Self {
        let header = test_header(10);
        let ancestors: Vec<Header> = (0..10).map(test_header).collect();
        Self {
            state,
            header,
            chain: HeaderChain::from_headers(&ancestors),
            chain_config: ChainConfig::default(),
        }
    }

    pub fn set_status(&self, node_id: &str, status: U256) {
        self.state
            .set_storage(GOVERNANCE_CONTRACT_ADDRESS, node_slot(node_id), status);
    }

    pub fn set_coinbase(&self, address: Address) {
        self.set_address(SLOT_COINBASE, address);
    }

    pub fn set_owner(&self, address: Address) {
        self.set_address(SLOT_OWNER, address);
    }

    pub fn set_new_owner(&self, address: Address) {
        self.set_address(SLOT_NEW_OWNER, address);
    }

    fn set_address(&self, slot: u64, address: Address) {
        self.state.set_storage(
            GOVERNANCE_CONTRACT_ADDRESS,
            U256::from(slot),
            address_word(&address),
        );
    }

    pub fn contract(&self) -> InnerContract<'_> {
        InnerContract::new(&self.header, &self.chain, &self.state, &self.chain_config).unwrap()
    }
}
