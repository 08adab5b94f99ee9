//! Account persistence and transaction ledger for a single-session banking terminal.
//!
//! An [`AccountDirectory`] is bootstrapped from a fixed roster; each entry is an
//! [`AccountStore`] that loads its own document from a [`Storage`] medium and rewrites it
//! after every committed mutation.

pub mod atm;
pub mod config;
pub mod csv;
pub mod directory;
pub mod domain;
pub mod error;
pub mod storage;
pub mod store;

use std::sync::Once;

pub use config::Config;
pub use directory::{AccountDirectory, Seed};
pub use domain::account::{Account, BalanceOperations, Pin, StatementReporting};
pub use error::{Error, Result};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::AccountStore;

static TRACING_INIT: Once = Once::new();

/// Installs the global `tracing` subscriber on stderr. `RUST_LOG` overrides the default
/// `finserve=warn` filter.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("finserve=warn"));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}
