use crate::CSV_HEADER;
use crate::address::AddressEncoder;
use crate::crypto::{EntropySource, KeyDeriver};
use crate::error::{Result, WalletError};
use crate::generator::WalletGenerator;
use crate::types::WalletRecord;
use crate::util::Saveable;
use chrono::{Local, NaiveDateTime};
use std::fs;
use std::io::{
    BufRead, BufReader, BufWriter, Error as IoError, ErrorKind as IoErrorKind, Read,
    Result as IoResult, Write,
};
use std::path::{Path, PathBuf};
use tracing::*;

/// Where the batch writer gets "now" from
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the local time zone
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Parse a wallet count: digits only, strictly positive
pub fn parse_count(s: &str) -> Result<usize> {
    let digits = s.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(WalletError::InvalidCount(s.to_string()));
    }
    match digits.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(WalletError::InvalidCount(s.to_string())),
    }
}

/// `wallets_<yyyymmdd>_<HHMMSS>.csv`
pub fn batch_file_name(at: &NaiveDateTime) -> String {
    format!("wallets_{}.csv", at.format("%Y%m%d_%H%M%S"))
}

/// Records of one run, in generation order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WalletBatch {
    records: Vec<WalletRecord>,
}

impl WalletBatch {
    pub fn new() -> Self {
        WalletBatch::default()
    }

    pub fn push(&mut self, record: WalletRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[WalletRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Saveable for WalletBatch {
    fn load<I: Read>(reader: I) -> IoResult<Self> {
        let mut lines = BufReader::new(reader).lines();
        let header = lines.next().transpose()?;
        if header.as_deref() != Some(CSV_HEADER) {
            return Err(IoError::new(
                IoErrorKind::InvalidData,
                "missing wallet batch header",
            ));
        }

        let mut batch = WalletBatch::new();
        for (index, line) in lines.enumerate() {
            let line = line?;
            let fields: Vec<&str> = line.split(',').collect();
            let &[mnemonic, seed, private_key, address] = fields.as_slice() else {
                return Err(IoError::new(
                    IoErrorKind::InvalidData,
                    format!("row {} has {} fields, expected 4", index + 1, fields.len()),
                ));
            };
            let record = WalletRecord::new(mnemonic, seed, private_key, address)
                .map_err(|e| IoError::new(IoErrorKind::InvalidData, e.to_string()))?;
            batch.push(record);
        }
        Ok(batch)
    }

    fn save<O: Write>(&self, writer: O) -> IoResult<()> {
        let mut writer = BufWriter::new(writer);
        writeln!(writer, "{}", CSV_HEADER)?;
        for record in &self.records {
            writeln!(writer, "{}", record.to_row())?;
        }
        writer.flush()
    }
}

/// Generates a batch of wallets and writes it to a timestamped file
pub struct BatchWriter<C> {
    dir: PathBuf,
    clock: C,
    verify: bool,
}

impl BatchWriter<LocalClock> {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        BatchWriter::new(dir, LocalClock)
    }
}

impl<C: Clock> BatchWriter<C> {
    pub fn new(dir: impl Into<PathBuf>, clock: C) -> Self {
        BatchWriter {
            dir: dir.into(),
            clock,
            verify: false,
        }
    }

    /// Re-derive every record before anything is written
    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Generate `n` wallets and write them to a single file, returning its path
    pub fn write_batch<E, D, A>(
        &self,
        generator: &mut WalletGenerator<E, D, A>,
        n: usize,
    ) -> Result<PathBuf>
    where
        E: EntropySource,
        D: KeyDeriver,
        A: AddressEncoder,
    {
        if n == 0 {
            return Err(WalletError::InvalidCount(n.to_string()));
        }

        info!("generating {} wallets", n);
        let mut batch = WalletBatch::new();
        for _ in 0..n {
            let record = generator.generate()?;
            if self.verify {
                record.verify(generator.deriver(), generator.encoder())?;
            }
            batch.push(record);
        }
        if self.verify {
            debug!("all {} wallets verified", batch.len());
        }

        let path = self.dir.join(batch_file_name(&self.clock.now()));
        write_replacing(&batch, &path)?;
        info!("wrote {} wallets to {}", batch.len(), path.display());
        Ok(path)
    }
}

// stage next to the target and rename, so a failed write leaves no truncated csv behind
fn write_replacing(batch: &WalletBatch, path: &Path) -> Result<()> {
    let staging = path.with_extension("csv.tmp");
    let written = batch
        .save_to_file(&staging)
        .and_then(|()| fs::rename(&staging, path));
    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(&staging) {
            debug!("could not remove {}: {}", staging.display(), cleanup);
        }
        return Err(e.into());
    }
    Ok(())
}
