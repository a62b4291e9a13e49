use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("wallet count must be a positive integer, got `{0}`")]
    InvalidCount(String),
    #[error("entropy source unavailable: {0}")]
    Entropy(String),
    #[error("invalid mnemonic: {0}")]
    Mnemonic(#[from] bip39::Error),
    #[error("key derivation failed: {0}")]
    Derivation(#[from] bip32::Error),
    #[error("invalid private key: {0}")]
    Key(String),
    #[error("address encoding failed: {0}")]
    Address(String),
    #[error("{field} does not match the value re-derived from it")]
    Mismatch { field: &'static str },
    #[error("{field} contains a character reserved by the CSV layout")]
    UnsafeField { field: &'static str },
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, WalletError>;
