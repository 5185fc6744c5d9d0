// gem/core/governance/src/abi.rs

//! Contract interface descriptions and the ABI codec.
//!
//! Covers the value types contract interfaces in this repository use:
//! `address`, `bool`, `uintN`, `bytesN`, `bytes` and `string`. Arrays, tuples
//! and signed integers are rejected at parse time rather than mis-encoded.

use gem_consensus::{keccak256, Address, Hash};
use primitive_types::U256;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

const WORD: usize = 32;

/// Interface parse, encode and decode failures
#[derive(Debug, thiserror::Error)]
pub enum AbiError {
    #[error("Invalid interface JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported parameter type: {0}")]
    UnsupportedType(String),

    #[error("Unsupported entry type: {0}")]
    UnsupportedEntry(String),

    #[error("Entry of type {0} has no name")]
    MissingName(String),

    #[error("Duplicate {kind}: {name}")]
    Duplicate { kind: &'static str, name: String },

    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Interface mismatch: {0}")]
    Mismatch(String),

    #[error("{method}: expected {expected} arguments, got {got}")]
    ArgumentCount {
        method: String,
        expected: usize,
        got: usize,
    },

    #[error("{method}: argument {index} is not a valid {expected}")]
    ArgumentType {
        method: String,
        index: usize,
        expected: ParamType,
    },

    #[error("Output too short: need {need} bytes, have {have}")]
    ShortOutput { need: usize, have: usize },

    #[error("Offset or length out of range at byte {0}")]
    InvalidOffset(usize),

    #[error("Value out of range for {0}")]
    OutOfRange(ParamType),

    #[error("Invalid UTF-8 in string output")]
    InvalidUtf8,
}

/// Parameter type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    Address,
    Bool,
    /// Unsigned integer of the given bit width
    Uint(usize),
    /// Fixed-size byte array of the given length
    FixedBytes(usize),
    Bytes,
    String,
}

impl ParamType {
    pub fn parse(ty: &str) -> Result<Self, AbiError> {
        let unsupported = || AbiError::UnsupportedType(ty.to_string());
        match ty {
            "address" => Ok(ParamType::Address),
            "bool" => Ok(ParamType::Bool),
            "string" => Ok(ParamType::String),
            "bytes" => Ok(ParamType::Bytes),
            "uint" => Ok(ParamType::Uint(256)),
            _ => {
                if let Some(bits) = ty.strip_prefix("uint") {
                    let bits: usize = bits.parse().map_err(|_| unsupported())?;
                    if bits == 0 || bits > 256 || bits % 8 != 0 {
                        return Err(unsupported());
                    }
                    Ok(ParamType::Uint(bits))
                } else if let Some(len) = ty.strip_prefix("bytes") {
                    let len: usize = len.parse().map_err(|_| unsupported())?;
                    if len == 0 || len > WORD {
                        return Err(unsupported());
                    }
                    Ok(ParamType::FixedBytes(len))
                } else {
                    Err(unsupported())
                }
            }
        }
    }

    /// Dynamic types are encoded out of line behind an offset
    pub fn is_dynamic(&self) -> bool {
        matches!(self, ParamType::Bytes | ParamType::String)
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Address => write!(f, "address"),
            ParamType::Bool => write!(f, "bool"),
            ParamType::Uint(bits) => write!(f, "uint{}", bits),
            ParamType::FixedBytes(len) => write!(f, "bytes{}", len),
            ParamType::Bytes => write!(f, "bytes"),
            ParamType::String => write!(f, "string"),
        }
    }
}

/// Decoded or to-be-encoded value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Address(Address),
    Bool(bool),
    Uint(U256),
    FixedBytes(Vec<u8>),
    Bytes(Vec<u8>),
    String(String),
}

impl Token {
    /// Whether this value can be encoded as `kind`
    pub fn type_check(&self, kind: &ParamType) -> bool {
        match (self, kind) {
            (Token::Address(_), ParamType::Address) => true,
            (Token::Bool(_), ParamType::Bool) => true,
            (Token::Uint(v), ParamType::Uint(bits)) => v.bits() <= *bits,
            (Token::FixedBytes(b), ParamType::FixedBytes(len)) => b.len() == *len,
            (Token::Bytes(_), ParamType::Bytes) => true,
            (Token::String(_), ParamType::String) => true,
            _ => false,
        }
    }

    pub fn into_address(self) -> Option<Address> {
        match self {
            Token::Address(a) => Some(a),
            _ => None,
        }
    }

    pub fn into_uint(self) -> Option<U256> {
        match self {
            Token::Uint(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_bool(self) -> Option<bool> {
        match self {
            Token::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            Token::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Token::Bytes(b) | Token::FixedBytes(b) => Some(b),
            _ => None,
        }
    }
}

/// Named, typed parameter of a function or event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub kind: ParamType,
    /// Only meaningful for event inputs
    pub indexed: bool,
}

fn canonical_types(params: &[Param]) -> String {
    params
        .iter()
        .map(|p| p.kind.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Callable contract method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub inputs: Vec<Param>,
    pub outputs: Vec<Param>,
    /// Declared `constant` or `view`/`pure`
    pub constant: bool,
    selector: [u8; 4],
}

impl Function {
    pub fn new(name: String, inputs: Vec<Param>, outputs: Vec<Param>, constant: bool) -> Self {
        let signature = format!("{}({})", name, canonical_types(&inputs));
        let digest = keccak256(signature.as_bytes());
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&digest.as_bytes()[..4]);
        Self {
            name,
            inputs,
            outputs,
            constant,
            selector,
        }
    }

    /// Canonical signature, e.g. `isWhite(string)`
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, canonical_types(&self.inputs))
    }

    pub fn selector(&self) -> [u8; 4] {
        self.selector
    }

    pub fn input_types(&self) -> Vec<ParamType> {
        self.inputs.iter().map(|p| p.kind.clone()).collect()
    }

    pub fn output_types(&self) -> Vec<ParamType> {
        self.outputs.iter().map(|p| p.kind.clone()).collect()
    }

    /// Selector followed by the encoded arguments
    pub fn encode_input(&self, args: &[Token]) -> Result<Vec<u8>, AbiError> {
        if args.len() != self.inputs.len() {
            return Err(AbiError::ArgumentCount {
                method: self.name.clone(),
                expected: self.inputs.len(),
                got: args.len(),
            });
        }
        for (index, (param, arg)) in self.inputs.iter().zip(args).enumerate() {
            if !arg.type_check(&param.kind) {
                return Err(AbiError::ArgumentType {
                    method: self.name.clone(),
                    index,
                    expected: param.kind.clone(),
                });
            }
        }

        let mut data = self.selector.to_vec();
        data.extend(encode(args));
        Ok(data)
    }

    /// Decode return data against the declared outputs
    pub fn decode_output(&self, data: &[u8]) -> Result<Vec<Token>, AbiError> {
        decode(&self.output_types(), data)
    }
}

/// Contract event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub name: String,
    pub inputs: Vec<Param>,
    pub anonymous: bool,
}

impl Event {
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, canonical_types(&self.inputs))
    }

    /// First log topic of non-anonymous emissions
    pub fn topic(&self) -> Hash {
        keccak256(self.signature().as_bytes())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    #[serde(rename = "type", default = "default_entry_type")]
    kind: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    inputs: Vec<RawParam>,
    #[serde(default)]
    outputs: Vec<RawParam>,
    #[serde(default)]
    constant: Option<bool>,
    #[serde(default)]
    state_mutability: Option<String>,
    #[serde(default)]
    anonymous: bool,
}

#[derive(Deserialize)]
struct RawParam {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    indexed: bool,
}

fn default_entry_type() -> String {
    "function".to_string()
}

fn convert_params(raw: Vec<RawParam>) -> Result<Vec<Param>, AbiError> {
    raw.into_iter()
        .map(|p| {
            Ok(Param {
                kind: ParamType::parse(&p.kind)?,
                name: p.name,
                indexed: p.indexed,
            })
        })
        .collect()
}

/// Parsed contract interface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interface {
    functions: BTreeMap<String, Function>,
    events: BTreeMap<String, Event>,
    constructor: Option<Vec<Param>>,
}

impl Interface {
    /// Parse interface JSON as emitted by Solidity compilers
    pub fn parse(text: &str) -> Result<Self, AbiError> {
        let entries: Vec<RawEntry> = serde_json::from_str(text)?;
        let mut interface = Interface::default();

        for entry in entries {
            match entry.kind.as_str() {
                "function" => {
                    let name = entry
                        .name
                        .ok_or_else(|| AbiError::MissingName(entry.kind.clone()))?;
                    let constant = entry.constant.unwrap_or(false)
                        || matches!(entry.state_mutability.as_deref(), Some("view" | "pure"));
                    let function = Function::new(
                        name.clone(),
                        convert_params(entry.inputs)?,
                        convert_params(entry.outputs)?,
                        constant,
                    );
                    if interface.functions.insert(name.clone(), function).is_some() {
                        return Err(AbiError::Duplicate {
                            kind: "function",
                            name,
                        });
                    }
                }
                "event" => {
                    let name = entry
                        .name
                        .ok_or_else(|| AbiError::MissingName(entry.kind.clone()))?;
                    let event = Event {
                        name: name.clone(),
                        inputs: convert_params(entry.inputs)?,
                        anonymous: entry.anonymous,
                    };
                    if interface.events.insert(name.clone(), event).is_some() {
                        return Err(AbiError::Duplicate { kind: "event", name });
                    }
                }
                "constructor" => {
                    if interface.constructor.is_some() {
                        return Err(AbiError::Duplicate {
                            kind: "constructor",
                            name: String::new(),
                        });
                    }
                    interface.constructor = Some(convert_params(entry.inputs)?);
                }
                // No callable surface to describe
                "fallback" | "receive" => {}
                other => return Err(AbiError::UnsupportedEntry(other.to_string())),
            }
        }

        Ok(interface)
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn event(&self, name: &str) -> Option<&Event> {
        self.events.get(name)
    }

    /// Functions in name order
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.functions.values()
    }

    /// Events in name order
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    pub fn constructor(&self) -> Option<&[Param]> {
        self.constructor.as_deref()
    }

    /// Encode a call to `method`
    pub fn pack(&self, method: &str, args: &[Token]) -> Result<Vec<u8>, AbiError> {
        self.function(method)
            .ok_or_else(|| AbiError::UnknownMethod(method.to_string()))?
            .encode_input(args)
    }

    /// Decode the return data of `method`
    pub fn unpack(&self, method: &str, data: &[u8]) -> Result<Vec<Token>, AbiError> {
        self.function(method)
            .ok_or_else(|| AbiError::UnknownMethod(method.to_string()))?
            .decode_output(data)
    }
}

fn usize_word(value: usize) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&(value as u64).to_be_bytes());
    word
}

fn padded(bytes: &[u8]) -> Vec<u8> {
    let mut out = bytes.to_vec();
    let rem = out.len() % WORD;
    if rem != 0 {
        out.resize(out.len() + WORD - rem, 0);
    }
    out
}

fn static_word(token: &Token) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    match token {
        Token::Address(a) => word[12..].copy_from_slice(a.as_bytes()),
        Token::Bool(b) => word[WORD - 1] = u8::from(*b),
        Token::Uint(v) => v.to_big_endian(&mut word),
        Token::FixedBytes(b) => word[..b.len()].copy_from_slice(b),
        // Dynamic tokens never reach here
        Token::Bytes(_) | Token::String(_) => {}
    }
    word
}

/// Head/tail encoding of `tokens` as a tuple
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    let head_len = WORD * tokens.len();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for token in tokens {
        let dynamic = match token {
            Token::Bytes(b) => Some(b.as_slice()),
            Token::String(s) => Some(s.as_bytes()),
            _ => None,
        };
        match dynamic {
            Some(bytes) => {
                head.extend_from_slice(&usize_word(head_len + tail.len()));
                tail.extend_from_slice(&usize_word(bytes.len()));
                tail.extend(padded(bytes));
            }
            None => head.extend_from_slice(&static_word(token)),
        }
    }

    head.extend(tail);
    head
}

fn read_word(data: &[u8], at: usize) -> Result<&[u8], AbiError> {
    at.checked_add(WORD)
        .and_then(|end| data.get(at..end))
        .ok_or(AbiError::ShortOutput {
            need: at.saturating_add(WORD),
            have: data.len(),
        })
}

/// Offsets and lengths must fit comfortably in a usize
fn read_usize(data: &[u8], at: usize) -> Result<usize, AbiError> {
    let word = read_word(data, at).map_err(|_| AbiError::InvalidOffset(at))?;
    if word[..WORD - 8].iter().any(|&b| b != 0) {
        return Err(AbiError::InvalidOffset(at));
    }
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&word[WORD - 8..]);
    usize::try_from(u64::from_be_bytes(raw)).map_err(|_| AbiError::InvalidOffset(at))
}

fn decode_param(kind: &ParamType, data: &[u8], at: usize) -> Result<Token, AbiError> {
    match kind {
        ParamType::Address => {
            let word = read_word(data, at)?;
            if word[..12].iter().any(|&b| b != 0) {
                return Err(AbiError::OutOfRange(kind.clone()));
            }
            let mut addr = [0u8; 20];
            addr.copy_from_slice(&word[12..]);
            Ok(Token::Address(Address(addr)))
        }
        ParamType::Bool => {
            let word = read_word(data, at)?;
            if word[..WORD - 1].iter().any(|&b| b != 0) || word[WORD - 1] > 1 {
                return Err(AbiError::OutOfRange(kind.clone()));
            }
            Ok(Token::Bool(word[WORD - 1] == 1))
        }
        ParamType::Uint(bits) => {
            let value = U256::from_big_endian(read_word(data, at)?);
            if value.bits() > *bits {
                return Err(AbiError::OutOfRange(kind.clone()));
            }
            Ok(Token::Uint(value))
        }
        ParamType::FixedBytes(len) => {
            let word = read_word(data, at)?;
            if word[*len..].iter().any(|&b| b != 0) {
                return Err(AbiError::OutOfRange(kind.clone()));
            }
            Ok(Token::FixedBytes(word[..*len].to_vec()))
        }
        ParamType::Bytes | ParamType::String => {
            let offset = read_usize(data, at)?;
            let len = read_usize(data, offset)?;
            let start = offset + WORD;
            let bytes = start
                .checked_add(len)
                .and_then(|end| data.get(start..end))
                .ok_or(AbiError::InvalidOffset(offset))?;

            if *kind == ParamType::String {
                let s = String::from_utf8(bytes.to_vec()).map_err(|_| AbiError::InvalidUtf8)?;
                Ok(Token::String(s))
            } else {
                Ok(Token::Bytes(bytes.to_vec()))
            }
        }
    }
}

/// Decode a tuple of `kinds` from `data`
pub fn decode(kinds: &[ParamType], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    let need = WORD * kinds.len();
    if data.len() < need {
        return Err(AbiError::ShortOutput {
            need,
            have: data.len(),
        });
    }

    kinds
        .iter()
        .enumerate()
        .map(|(i, kind)| decode_param(kind, data, i * WORD))
        .collect()
}
