use anyhow::{Context, Result};
use ckblib::address::{AddressFormat, CkbAddressEncoder, Network};
use ckblib::batch::{self, BatchWriter};
use ckblib::generator::CkbWalletGenerator;
use clap::Parser;
use config::Config;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::*;

mod config;
mod util;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate a batch of CKB wallets into a timestamped CSV file", long_about = None)]
struct Cli {
    /// Number of wallets to generate
    #[arg(value_name = "COUNT", allow_negative_numbers = true, value_parser = batch::parse_count)]
    count: usize,
    /// TOML file with default settings
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Directory the CSV file is written to [default: .]
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
    /// Address network: mainnet (ckb) or testnet (ckt) [default: mainnet]
    #[arg(long, value_name = "NETWORK")]
    network: Option<Network>,
    /// Address payload: short or full [default: short]
    #[arg(long, value_name = "FORMAT")]
    address_format: Option<AddressFormat>,
    /// Re-derive every wallet before writing the file
    #[arg(long)]
    verify: bool,
}

impl Cli {
    fn overrides(&self) -> Config {
        Config {
            output_dir: self.output_dir.clone(),
            network: self.network,
            address_format: self.address_format,
            verify: self.verify.then_some(true),
        }
    }
}

fn generate(cli: &Cli) -> Result<PathBuf> {
    let file_config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let settings = cli.overrides().or(file_config).into_settings();
    debug!("settings: {:?}", settings);

    let encoder = CkbAddressEncoder::new(settings.network, settings.address_format);
    let mut generator = CkbWalletGenerator::with_encoder(encoder);
    BatchWriter::in_dir(&settings.output_dir)
        .verify(settings.verify)
        .write_batch(&mut generator, cli.count)
        .with_context(|| {
            format!(
                "failed to write {} wallets to {}",
                cli.count,
                settings.output_dir.display()
            )
        })
}

/// Parse `args`, generate the batch and report; returns the process exit code
fn run<I, T>(args: I) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            if let Err(io) = e.print() {
                debug!("could not print usage error: {}", io);
            }
            return if e.use_stderr() { 1 } else { 0 };
        }
    };

    match generate(&cli) {
        Ok(path) => {
            println!("Wallet addresses saved to {}", path.display());
            0
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

fn main() -> ExitCode {
    util::setup_panic_hook();
    if let Err(e) = util::init_tracing() {
        eprintln!("failed to initialize logging: {:#}", e);
    }
    ExitCode::from(run(std::env::args_os()))
}
