use anyhow::{Context, Result};
use ckblib::address::{AddressFormat, Network};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings that may come from the command line or a TOML file.
/// Unset fields fall through to the next layer, then to the defaults.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub output_dir: Option<PathBuf>,
    pub network: Option<Network>,
    pub address_format: Option<AddressFormat>,
    pub verify: Option<bool>,
}

/// Fully resolved settings for one run
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub network: Network,
    pub address_format: AddressFormat,
    pub verify: bool,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&config_str)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Keep the fields set here, take the rest from `fallback`
    pub fn or(self, fallback: Config) -> Config {
        Config {
            output_dir: self.output_dir.or(fallback.output_dir),
            network: self.network.or(fallback.network),
            address_format: self.address_format.or(fallback.address_format),
            verify: self.verify.or(fallback.verify),
        }
    }

    pub fn into_settings(self) -> Settings {
        Settings {
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from(".")),
            network: self.network.unwrap_or_default(),
            address_format: self.address_format.unwrap_or_default(),
            verify: self.verify.unwrap_or(false),
        }
    }
}
