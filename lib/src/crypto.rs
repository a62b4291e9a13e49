use crate::error::{Result, WalletError};
use crate::{DERIVATION_PATH, ENTROPY_BYTES};
use bip32::{DerivationPath, XPrv};
use bip39::{Language, Mnemonic};
use k256::ecdsa::{SigningKey, VerifyingKey};
use rand::TryRngCore;
use rand::rngs::OsRng;
use std::fmt;

/// Source of the raw entropy a mnemonic is built from
pub trait EntropySource {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()>;
}

/// Operating system CSPRNG
#[derive(Clone, Copy, Debug, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| WalletError::Entropy(e.to_string()))
    }
}

/// Replays a fixed byte pattern, wrapping around at the end.
/// Useful for reproducible runs; never use it for real wallets.
#[derive(Clone, Debug)]
pub struct FixedEntropy {
    bytes: Vec<u8>,
    pos: usize,
}

impl FixedEntropy {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        FixedEntropy {
            bytes: bytes.into(),
            pos: 0,
        }
    }
}

impl EntropySource for FixedEntropy {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.bytes.is_empty() {
            return Err(WalletError::Entropy("fixed entropy pattern is empty".into()));
        }
        for byte in buf.iter_mut() {
            *byte = self.bytes[self.pos];
            self.pos = (self.pos + 1) % self.bytes.len();
        }
        Ok(())
    }
}

/// Generate a fresh 12 word English mnemonic from `entropy`
pub fn generate_mnemonic<E: EntropySource + ?Sized>(entropy: &mut E) -> Result<Mnemonic> {
    let mut buf = [0u8; ENTROPY_BYTES];
    entropy.fill(&mut buf)?;
    let mnemonic = Mnemonic::from_entropy_in(Language::English, &buf)?;
    buf.fill(0);
    Ok(mnemonic)
}

/// Parse a phrase, checking words and checksum
pub fn parse_mnemonic(phrase: &str) -> Result<Mnemonic> {
    Ok(Mnemonic::parse_in_normalized(Language::English, phrase)?)
}

/// BIP-39 seed with the empty passphrase
pub fn mnemonic_to_seed(mnemonic: &Mnemonic) -> [u8; 64] {
    mnemonic.to_seed("")
}

/// Derives the wallet's private key from a BIP-39 seed
pub trait KeyDeriver {
    fn derive(&self, seed: &[u8]) -> Result<PrivateKey>;
}

/// BIP-32 derivation along `m/44'/309'/0'/0/0`
#[derive(Clone, Copy, Debug, Default)]
pub struct Bip44Deriver;

impl KeyDeriver for Bip44Deriver {
    fn derive(&self, seed: &[u8]) -> Result<PrivateKey> {
        let path: DerivationPath = DERIVATION_PATH.parse()?;
        let child = XPrv::derive_from_path(seed, &path)?;
        Ok(PrivateKey(child.private_key().clone()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    /// 33 byte SEC1 compressed encoding
    pub fn to_compressed(&self) -> Vec<u8> {
        self.0.to_encoded_point(true).as_bytes().to_vec()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_compressed())
    }
}

#[derive(Clone)]
pub struct PrivateKey(SigningKey);

impl PrivateKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        SigningKey::from_slice(bytes)
            .map(PrivateKey)
            .map_err(|e| WalletError::Key(e.to_string()))
    }

    /// Parse the `0x`-prefixed form produced by [`PrivateKey::to_hex`]
    pub fn from_hex(s: &str) -> Result<Self> {
        if !is_private_key_hex(s) {
            return Err(WalletError::Key("expected 0x followed by 64 hex digits".into()));
        }
        let bytes = hex::decode(&s[2..]).map_err(|e| WalletError::Key(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Lowercase hex of the 32 byte scalar with a `0x` prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0.to_bytes()))
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.0.verifying_key().clone())
    }
}

// keep secrets out of debug output
impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

/// `0x` followed by exactly 64 lowercase hex digits
pub fn is_private_key_hex(s: &str) -> bool {
    s.strip_prefix("0x").is_some_and(|digits| {
        digits.len() == 64 && digits.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bip32::ChildNumber;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    const ABANDON_SEED: &str = "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc19a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4";

    #[test]
    fn test_zero_entropy_gives_reference_mnemonic() {
        let mut entropy = FixedEntropy::new(vec![0u8]);
        let mnemonic = generate_mnemonic(&mut entropy).unwrap();
        assert_eq!(mnemonic.to_string(), ABANDON);
        assert_eq!(mnemonic.word_count(), 12);
    }

    #[test]
    fn test_seed_matches_reference_vector() {
        let mnemonic = parse_mnemonic(ABANDON).unwrap();
        assert_eq!(hex::encode(mnemonic_to_seed(&mnemonic)), ABANDON_SEED);
    }

    #[test]
    fn test_fixed_entropy_wraps_around() {
        let mut entropy = FixedEntropy::new(vec![1u8, 2, 3]);
        let mut buf = [0u8; 5];
        entropy.fill(&mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 1, 2]);
        entropy.fill(&mut buf[..2]).unwrap();
        assert_eq!(&buf[..2], &[3, 1]);
    }

    #[test]
    fn test_empty_fixed_entropy_fails() {
        let mut entropy = FixedEntropy::new(Vec::new());
        assert!(matches!(
            generate_mnemonic(&mut entropy),
            Err(WalletError::Entropy(_))
        ));
    }

    #[test]
    fn test_os_entropy_produces_distinct_mnemonics() {
        let first = generate_mnemonic(&mut OsEntropy).unwrap();
        let second = generate_mnemonic(&mut OsEntropy).unwrap();
        assert_ne!(first, second);
        assert!(parse_mnemonic(&first.to_string()).is_ok());
    }

    #[test]
    fn test_parse_mnemonic_rejects_bad_checksum() {
        let bad = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon";
        assert!(matches!(parse_mnemonic(bad), Err(WalletError::Mnemonic(_))));
        assert!(parse_mnemonic("not a valid mnemonic phrase").is_err());
    }

    #[test]
    fn test_derivation_follows_hardened_path() {
        let seed = mnemonic_to_seed(&parse_mnemonic(ABANDON).unwrap());

        let mut expected = XPrv::new(seed).unwrap();
        for (index, hardened) in [(44, true), (309, true), (0, true), (0, false), (0, false)] {
            expected = expected
                .derive_child(ChildNumber::new(index, hardened).unwrap())
                .unwrap();
        }

        let key = Bip44Deriver.derive(&seed).unwrap();
        assert_eq!(
            key.to_hex(),
            format!("0x{}", hex::encode(expected.private_key().to_bytes()))
        );
    }

    #[test]
    fn test_hardened_and_normal_paths_differ() {
        let seed = mnemonic_to_seed(&parse_mnemonic(ABANDON).unwrap());
        let normal: DerivationPath = "m/44/309/0/0/0".parse().unwrap();
        let unhardened = XPrv::derive_from_path(seed, &normal).unwrap();
        let key = Bip44Deriver.derive(&seed).unwrap();
        assert_ne!(
            key.to_hex(),
            format!("0x{}", hex::encode(unhardened.private_key().to_bytes()))
        );
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let seed = mnemonic_to_seed(&parse_mnemonic(ABANDON).unwrap());
        let key1 = Bip44Deriver.derive(&seed).unwrap();
        let key2 = Bip44Deriver.derive(&seed).unwrap();
        assert_eq!(key1.to_hex(), key2.to_hex());
        assert_eq!(key1.public_key(), key2.public_key());
    }

    #[test]
    fn test_private_key_hex_round_trip() {
        let hex_key = "0xe79f3207ea4980b7fed79956d5934249ceac4751a4fae01a0f7c4a96884bc4e3";
        let key = PrivateKey::from_hex(hex_key).unwrap();
        assert_eq!(key.to_hex(), hex_key);
        assert_eq!(
            key.public_key().to_hex(),
            "024a501efd328e062c8675f2365970728c859c592beeefd6be8ead3d901330bc01"
        );
    }

    #[test]
    fn test_private_key_hex_pattern() {
        assert!(is_private_key_hex(&format!("0x{}", "ab".repeat(32))));
        assert!(!is_private_key_hex(&"ab".repeat(32)));
        assert!(!is_private_key_hex(&format!("0x{}", "AB".repeat(32))));
        assert!(!is_private_key_hex(&format!("0x{}", "ab".repeat(31))));
        assert!(!is_private_key_hex(&format!("0x{}g", "a".repeat(63))));
    }

    #[test]
    fn test_zero_scalar_is_rejected() {
        let zero = format!("0x{}", "00".repeat(32));
        assert!(matches!(PrivateKey::from_hex(&zero), Err(WalletError::Key(_))));
    }

    #[test]
    fn test_debug_hides_private_key() {
        let key = PrivateKey::from_hex(
            "0xe79f3207ea4980b7fed79956d5934249ceac4751a4fae01a0f7c4a96884bc4e3",
        )
        .unwrap();
        assert_eq!(format!("{:?}", key), "PrivateKey(..)");
    }
}
