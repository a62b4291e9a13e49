use crate::address::AddressEncoder;
use crate::crypto::{self, KeyDeriver, PrivateKey};
use crate::error::{Result, WalletError};
use std::fmt;

/// One generated wallet, rendered as the strings that go into the batch file.
///
/// Every field is derived from the previous one:
/// mnemonic -> seed -> private key -> address.
#[derive(Clone, PartialEq, Eq)]
pub struct WalletRecord {
    mnemonic: String,
    seed: String,
    private_key: String,
    address: String,
}

impl WalletRecord {
    /// Build a record, refusing any field that would break the row layout
    pub fn new(
        mnemonic: impl Into<String>,
        seed: impl Into<String>,
        private_key: impl Into<String>,
        address: impl Into<String>,
    ) -> Result<Self> {
        let record = WalletRecord {
            mnemonic: mnemonic.into(),
            seed: seed.into(),
            private_key: private_key.into(),
            address: address.into(),
        };
        for (name, value) in record.fields() {
            if value.contains([',', '"', '\r', '\n']) {
                return Err(WalletError::UnsafeField { field: name });
            }
        }
        Ok(record)
    }

    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Column name and value pairs in file order
    pub fn fields(&self) -> [(&'static str, &str); 4] {
        [
            ("mnemonic", self.mnemonic.as_str()),
            ("seed", self.seed.as_str()),
            ("privateKey", self.private_key.as_str()),
            ("address", self.address.as_str()),
        ]
    }

    /// The record as one comma separated line, without the trailing newline
    pub fn to_row(&self) -> String {
        format!(
            "{},{},{},{}",
            self.mnemonic, self.seed, self.private_key, self.address
        )
    }

    /// Re-derive each field from the one before it and compare
    pub fn verify<D, A>(&self, deriver: &D, encoder: &A) -> Result<()>
    where
        D: KeyDeriver + ?Sized,
        A: AddressEncoder + ?Sized,
    {
        let mnemonic = crypto::parse_mnemonic(&self.mnemonic)?;
        let seed = crypto::mnemonic_to_seed(&mnemonic);
        if hex::encode(seed) != self.seed {
            return Err(WalletError::Mismatch { field: "seed" });
        }

        if !crypto::is_private_key_hex(&self.private_key) {
            return Err(WalletError::Mismatch { field: "privateKey" });
        }
        if deriver.derive(&seed)?.to_hex() != self.private_key {
            return Err(WalletError::Mismatch { field: "privateKey" });
        }

        // the address must follow from the stored key alone
        let stored_key = PrivateKey::from_hex(&self.private_key)?;
        if encoder.encode(&stored_key)? != self.address {
            return Err(WalletError::Mismatch { field: "address" });
        }
        Ok(())
    }
}

impl fmt::Debug for WalletRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletRecord")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
