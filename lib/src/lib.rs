pub mod address;
pub mod batch;
pub mod crypto;
pub mod error;
pub mod generator;
pub mod types;
pub mod util;

pub use error::{Result, WalletError};

/// BIP-44 path of the single key every wallet exposes (coin type 309 is CKB)
pub const DERIVATION_PATH: &str = "m/44'/309'/0'/0/0";
/// 128 bits of entropy, i.e. a 12 word mnemonic
pub const ENTROPY_BYTES: usize = 16;
/// Header line of every batch file
pub const CSV_HEADER: &str = "mnemonic,seed,privateKey,address";
