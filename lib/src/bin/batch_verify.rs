use ckblib::address::{AddressFormat, CkbAddressEncoder, Network};
use ckblib::batch::WalletBatch;
use ckblib::crypto::Bip44Deriver;
use ckblib::util::Saveable;
use std::env;
use std::process;

const USAGE: &str = "Usage: batch_verify <path to wallet csv> [mainnet|testnet] [short|full]";

fn main() {
    let path = if let Some(arg) = env::args().nth(1) {
        arg
    } else {
        eprintln!("{}", USAGE);
        process::exit(1);
    };

    let network = match env::args().nth(2).map(|s| s.parse::<Network>()).transpose() {
        Ok(network) => network.unwrap_or_default(),
        Err(e) => {
            eprintln!("{}\n{}", e, USAGE);
            process::exit(1);
        }
    };
    let format = match env::args().nth(3).map(|s| s.parse::<AddressFormat>()).transpose() {
        Ok(format) => format.unwrap_or_default(),
        Err(e) => {
            eprintln!("{}\n{}", e, USAGE);
            process::exit(1);
        }
    };

    let batch = match WalletBatch::load_from_file(&path) {
        Ok(batch) => batch,
        Err(e) => {
            eprintln!("Failed to load {}: {}", path, e);
            process::exit(1);
        }
    };

    let encoder = CkbAddressEncoder::new(network, format);
    let mut failures = 0;
    for (index, record) in batch.records().iter().enumerate() {
        if let Err(e) = record.verify(&Bip44Deriver, &encoder) {
            eprintln!("row {} ({}): {}", index + 1, record.address(), e);
            failures += 1;
        }
    }

    if failures > 0 {
        eprintln!("{} of {} wallets failed verification", failures, batch.len());
        process::exit(1);
    }
    println!("{} wallets verified in {}", batch.len(), path);
}
