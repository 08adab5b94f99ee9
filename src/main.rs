use std::{io, path::Path, process::ExitCode};

use finserve::{atm::Atm, AccountDirectory, Config, Error, FileStorage};

fn main() -> ExitCode {
    finserve::init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = ?err, "terminal stopped");
            eprintln!("finserve: {err}");
            ExitCode::FAILURE
        }
    }
}

/// An optional single argument names a JSON config file.
fn run() -> finserve::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(Path::new(&path))?,
        None => Config::default(),
    };

    let storage = FileStorage::new(config.data_dir.clone())?;
    let mut directory = AccountDirectory::bootstrap(&config.accounts, config.ledger, storage)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    Atm::new(&mut directory, stdin.lock(), stdout.lock())
        .with_statement_length(config.statement_length)
        .run()
        .map_err(Error::TerminalError)?;

    Ok(())
}
