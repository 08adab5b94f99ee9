use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::info;

use crate::{
    directory::{default_roster, Seed},
    domain::ledger::LedgerLimits,
    error::Result,
};

pub const DEFAULT_STATEMENT_LENGTH: usize = 3;

#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
#[serde(default)]
pub struct Config {
    /// Directory holding one `<account number>_data.txt` file per account.
    pub data_dir: PathBuf,
    pub ledger: LedgerLimits,
    /// Number of entries shown on a mini statement.
    pub statement_length: usize,
    pub accounts: Vec<Seed>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            ledger: LedgerLimits::default(),
            statement_length: DEFAULT_STATEMENT_LENGTH,
            accounts: default_roster(),
        }
    }
}

impl Config {
    /// Reads a JSON config file. Omitted keys take their defaults and a missing file
    /// yields [`Config::default`].
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(data) => {
                info!(path = %path.display(), "loading configuration");
                Self::from_json(&data)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no configuration file, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }
}
