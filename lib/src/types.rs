mod record;

pub use record::WalletRecord;
