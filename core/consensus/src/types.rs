// gem/core/consensus/src/types.rs

use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

/// Bytes at the tail of `Header::extra` reserved for the producer seal
pub const INNER_EXTRA_SEAL: usize = 64;

/// Error parsing a hex-encoded hash or address
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Invalid length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },
}

fn decode_hex(s: &str) -> Result<Vec<u8>, ParseError> {
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    hex::decode(s).map_err(|e| ParseError::InvalidHex(e.to_string()))
}

/// Keccak-256 digest of `data`
pub fn keccak256(data: &[u8]) -> Hash {
    Hash(Keccak256::digest(data).into())
}

/// Hash type for block identifiers and code hashes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Hash([u8; 32]);

impl Hash {
    pub const ZERO: Hash = Hash([0u8; 32]);

    pub fn new(data: [u8; 32]) -> Self {
        Self(data)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ParseError> {
        let data: [u8; 32] = bytes.try_into().map_err(|_| ParseError::InvalidLength {
            expected: 32,
            got: bytes.len(),
        })?;
        Ok(Self(data))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl FromStr for Hash {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slice(&decode_hex(s)?)
    }
}

impl Serialize for Hash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Account address (20 bytes, Ethereum layout)
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ParseError> {
        let data: [u8; 20] = bytes.try_into().map_err(|_| ParseError::InvalidLength {
            expected: 20,
            got: bytes.len(),
        })?;
        Ok(Self(data))
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slice(&decode_hex(s)?)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// EVM rule set a chain runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fork {
    /// Pre-merge: DIFFICULTY reads the header's difficulty
    #[default]
    London,
    /// DIFFICULTY reads the header's mix digest as prevrandao
    Shanghai,
}

/// Chain-wide parameters consulted when building an execution environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain_id: u64,

    #[serde(default)]
    pub fork: Fork,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: 1,
            fork: Fork::default(),
        }
    }
}

/// Block header fields the execution layer reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub parent_hash: Hash,

    /// Producer of the block and the beneficiary of its fees
    pub coinbase: Address,

    pub number: u64,
    pub timestamp: u64,

    #[serde(default)]
    pub difficulty: U256,

    pub gas_limit: u64,

    #[serde(default)]
    pub mix_digest: Hash,

    /// Vanity bytes followed by the `INNER_EXTRA_SEAL`-byte producer seal
    #[serde(default, with = "hex_bytes")]
    pub extra: Vec<u8>,
}

impl Header {
    /// Keccak-256 over the header fields in declaration order
    pub fn hash(&self) -> Hash {
        let mut difficulty = [0u8; 32];
        self.difficulty.to_big_endian(&mut difficulty);

        let mut hasher = Keccak256::new();
        hasher.update(self.parent_hash.as_bytes());
        hasher.update(self.coinbase.as_bytes());
        hasher.update(self.number.to_be_bytes());
        hasher.update(self.timestamp.to_be_bytes());
        hasher.update(difficulty);
        hasher.update(self.gas_limit.to_be_bytes());
        hasher.update(self.mix_digest.as_bytes());
        hasher.update(&self.extra);
        Hash(hasher.finalize().into())
    }

    /// Extra data preceding the seal
    pub fn vanity(&self) -> &[u8] {
        let end = self.extra.len().saturating_sub(INNER_EXTRA_SEAL);
        &self.extra[..end]
    }

    /// Trailing seal bytes, if the extra data is long enough to hold one
    pub fn seal(&self) -> Option<&[u8]> {
        if self.extra.len() < INNER_EXTRA_SEAL {
            return None;
        }
        Some(&self.extra[self.extra.len() - INNER_EXTRA_SEAL..])
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::decode_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> Header {
        Header {
            parent_hash: Hash::new([7u8; 32]),
            coinbase: Address([0xaa; 20]),
            number: 42,
            timestamp: 1_700_000_000,
            difficulty: U256::from(2),
            gas_limit: 30_000_000,
            mix_digest: Hash::default(),
            extra: vec![0u8; 32 + INNER_EXTRA_SEAL],
        }
    }

    #[test]
    fn test_address_parse_and_display() {
        let addr: Address = "0x1000000000000000000000000000000000000001".parse().unwrap();
        assert_eq!(addr.0[0], 0x10);
        assert_eq!(addr.0[19], 0x01);
        assert_eq!(
            addr.to_string(),
            "0x1000000000000000000000000000000000000001"
        );

        // Prefix is optional
        let bare: Address = "1000000000000000000000000000000000000001".parse().unwrap();
        assert_eq!(addr, bare);
    }

    #[test]
    fn test_address_rejects_bad_input() {
        assert!(matches!(
            "0x1234".parse::<Address>(),
            Err(ParseError::InvalidLength { expected: 20, got: 2 })
        ));
        assert!(matches!(
            "0xzz".parse::<Address>(),
            Err(ParseError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_zero_address() {
        assert!(Address::zero().is_zero());
        assert!(!Address([1; 20]).is_zero());
        assert_eq!(Address::default(), Address::ZERO);
    }

    #[test]
    fn test_header_json_roundtrip() {
        let header = sample_header();
        let json = serde_json::to_string(&header).unwrap();
        assert!(json.contains("\"coinbase\":\"0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\""));

        let parsed: Header = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_header_json_defaults() {
        let json = r#"{
            "coinbase": "0x00000000000000000000000000000000000000aa",
            "number": 1,
            "timestamp": 10,
            "gas_limit": 8000000
        }"#;
        let header: Header = serde_json::from_str(json).unwrap();
        assert_eq!(header.difficulty, U256::zero());
        assert!(header.parent_hash.is_zero());
        assert!(header.extra.is_empty());
    }

    #[test]
    fn test_header_hash_changes_with_fields() {
        let header = sample_header();
        let mut other = header.clone();
        assert_eq!(header.hash(), other.hash());

        other.number += 1;
        assert_ne!(header.hash(), other.hash());
    }

    #[test]
    fn test_seal_split() {
        let mut header = sample_header();
        header.extra = (0..(8 + INNER_EXTRA_SEAL) as u8).collect();

        assert_eq!(header.vanity(), &header.extra[..8]);
        let seal = header.seal().unwrap();
        assert_eq!(seal.len(), INNER_EXTRA_SEAL);
        assert_eq!(seal[0], 8);

        header.extra = vec![1, 2, 3];
        assert!(header.seal().is_none());
        assert_eq!(header.vanity(), &[] as &[u8]);
    }

    #[test]
    fn test_chain_config_fork_names() {
        let cfg: ChainConfig =
            serde_json::from_str(r#"{"chain_id": 5, "fork": "shanghai"}"#).unwrap();
        assert_eq!(cfg.fork, Fork::Shanghai);

        let cfg: ChainConfig = serde_json::from_str(r#"{"chain_id": 5}"#).unwrap();
        assert_eq!(cfg.fork, Fork::London);
        assert_eq!(ChainConfig::default().fork, Fork::London);
    }

    #[test]
    fn test_keccak_empty() {
        // Well-known digest of the empty string
        assert_eq!(
            keccak256(&[]).to_hex(),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }
}
