//! CKB address encoding for the default secp256k1/blake160 lock.
//!
//! Two payload layouts are supported:
//! - short: `0x01 | code_hash_index(0x00) | blake160(pubkey)`, bech32
//! - full: `0x00 | code_hash | hash_type | blake160(pubkey)`, bech32m
use crate::crypto::{PrivateKey, PublicKey};
use crate::error::{Result, WalletError};
use bech32::{ToBase32, Variant};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const CKB_HASH_PERSONALIZATION: &[u8; 16] = b"ckb-default-hash";

/// Type script code hash of the system secp256k1/blake160 lock
pub const SECP256K1_BLAKE160_CODE_HASH: [u8; 32] = [
    0x9b, 0xd7, 0xe0, 0x6f, 0x3e, 0xcf, 0x4b, 0xe0, 0xf2, 0xfc, 0xd2, 0x18, 0x8b, 0x23, 0xf1,
    0xb9, 0xfc, 0xc8, 0x8e, 0x5d, 0x4b, 0x65, 0xa8, 0x63, 0x7b, 0x17, 0x72, 0x3b, 0xbd, 0xa3,
    0xcc, 0xe8,
];

const PAYLOAD_FULL: u8 = 0x00;
const PAYLOAD_SHORT: u8 = 0x01;
const SECP256K1_BLAKE160_INDEX: u8 = 0x00;
const HASH_TYPE_TYPE: u8 = 0x01;

/// BLAKE2b-256 with the CKB personalization
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let hash = blake2b_simd::Params::new()
        .hash_length(32)
        .personal(CKB_HASH_PERSONALIZATION)
        .hash(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(hash.as_bytes());
    out
}

/// First 20 bytes of [`blake2b_256`]
pub fn blake160(data: &[u8]) -> [u8; 20] {
    let mut out = [0u8; 20];
    out.copy_from_slice(&blake2b_256(data)[..20]);
    out
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    pub fn hrp(self) -> &'static str {
        match self {
            Network::Mainnet => "ckb",
            Network::Testnet => "ckt",
        }
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "ckb" => Ok(Network::Mainnet),
            "testnet" | "ckt" => Ok(Network::Testnet),
            other => Err(format!("unknown network `{}` (expected mainnet or testnet)", other)),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => f.write_str("mainnet"),
            Network::Testnet => f.write_str("testnet"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFormat {
    #[default]
    Short,
    Full,
}

impl FromStr for AddressFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "short" => Ok(AddressFormat::Short),
            "full" => Ok(AddressFormat::Full),
            other => Err(format!("unknown address format `{}` (expected short or full)", other)),
        }
    }
}

impl fmt::Display for AddressFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFormat::Short => f.write_str("short"),
            AddressFormat::Full => f.write_str("full"),
        }
    }
}

/// Turns a private key into the chain's address string
pub trait AddressEncoder {
    fn encode(&self, key: &PrivateKey) -> Result<String>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CkbAddressEncoder {
    network: Network,
    format: AddressFormat,
}

impl CkbAddressEncoder {
    pub fn new(network: Network, format: AddressFormat) -> Self {
        CkbAddressEncoder { network, format }
    }

    pub fn encode_public_key(&self, public_key: &PublicKey) -> Result<String> {
        self.encode_args(&blake160(&public_key.to_compressed()))
    }

    /// Encode the lock args (a blake160 public key hash)
    pub fn encode_args(&self, args: &[u8; 20]) -> Result<String> {
        let (payload, variant) = match self.format {
            AddressFormat::Short => {
                let mut payload = Vec::with_capacity(2 + args.len());
                payload.push(PAYLOAD_SHORT);
                payload.push(SECP256K1_BLAKE160_INDEX);
                payload.extend_from_slice(args);
                (payload, Variant::Bech32)
            }
            AddressFormat::Full => {
                let mut payload = Vec::with_capacity(2 + SECP256K1_BLAKE160_CODE_HASH.len() + args.len());
                payload.push(PAYLOAD_FULL);
                payload.extend_from_slice(&SECP256K1_BLAKE160_CODE_HASH);
                payload.push(HASH_TYPE_TYPE);
                payload.extend_from_slice(args);
                (payload, Variant::Bech32m)
            }
        };
        bech32::encode(self.network.hrp(), payload.to_base32(), variant)
            .map_err(|e| WalletError::Address(e.to_string()))
    }
}

impl AddressEncoder for CkbAddressEncoder {
    fn encode(&self, key: &PrivateKey) -> Result<String> {
        self.encode_public_key(&key.public_key())
    }
}
