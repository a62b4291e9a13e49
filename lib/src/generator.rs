use crate::address::{AddressEncoder, CkbAddressEncoder};
use crate::crypto::{self, Bip44Deriver, EntropySource, KeyDeriver, OsEntropy};
use crate::error::Result;
use crate::types::WalletRecord;
use tracing::*;

/// Produces wallet records from fresh entropy.
///
/// The three collaborators are injected so that tests can pin the entropy
/// or swap the address scheme without touching the derivation steps.
pub struct WalletGenerator<E, D, A> {
    entropy: E,
    deriver: D,
    encoder: A,
}

/// OS entropy, BIP-44 CKB path, CKB address
pub type CkbWalletGenerator = WalletGenerator<OsEntropy, Bip44Deriver, CkbAddressEncoder>;

impl CkbWalletGenerator {
    pub fn with_encoder(encoder: CkbAddressEncoder) -> Self {
        WalletGenerator::new(OsEntropy, Bip44Deriver, encoder)
    }
}

impl<E, D, A> WalletGenerator<E, D, A>
where
    E: EntropySource,
    D: KeyDeriver,
    A: AddressEncoder,
{
    pub fn new(entropy: E, deriver: D, encoder: A) -> Self {
        WalletGenerator {
            entropy,
            deriver,
            encoder,
        }
    }

    pub fn deriver(&self) -> &D {
        &self.deriver
    }

    pub fn encoder(&self) -> &A {
        &self.encoder
    }

    /// Generate one wallet: mnemonic, seed, private key and address
    pub fn generate(&mut self) -> Result<WalletRecord> {
        let mnemonic = crypto::generate_mnemonic(&mut self.entropy)?;
        let seed = crypto::mnemonic_to_seed(&mnemonic);
        let private_key = self.deriver.derive(&seed)?;
        let address = self.encoder.encode(&private_key)?;
        debug!("generated wallet {}", address);

        WalletRecord::new(
            mnemonic.to_string(),
            hex::encode(seed),
            private_key.to_hex(),
            address,
        )
    }
}
