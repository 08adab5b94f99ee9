use std::{
    io::{BufRead, BufReader, Read, Write},
    str::FromStr,
};

use csv::{QuoteStyle, WriterBuilder};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::{
    domain::{
        account::{Account, BalanceOperations, Pin},
        ledger::{Admission, Ledger},
        transaction::LedgerEntry,
    },
    error::{Error, Result},
};

/// Number of header lines preceding the ledger rows.
const HEADER_LINES: u64 = 4;

/// Write an account document: number, holder, pin and balance on their own lines,
/// followed by one `kind,amount,timestamp` row per ledger entry, oldest first.
pub fn write(account: &Account, mut writer: impl Write) -> Result<()> {
    writeln!(writer, "{}", account.number())?;
    writeln!(writer, "{}", account.holder())?;
    writeln!(writer, "{}", account.pin())?;
    writeln!(writer, "{}", account.balance())?;

    let mut rows = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .from_writer(writer);

    for entry in account.ledger().iter() {
        rows.serialize(entry)?;
    }

    rows.flush()?;
    Ok(())
}

/// Parse an account document written by [`write`].
///
/// `seed` supplies the account number the document is stored under and the ledger
/// limits. Header lines must be well formed. Each ledger row is one line, decoded with
/// [`LedgerEntry::decode`]; rows that fail to parse are skipped and the rest go through
/// [`Ledger::push`], so the capacity policy decides which rows survive an oversized file.
pub fn read(reader: impl Read, seed: &Account) -> Result<Account> {
    let mut reader = BufReader::new(reader);
    let key = seed.number();

    let number = header_line(&mut reader, key, "account number")?;
    let holder = header_line(&mut reader, key, "holder name")?;
    let pin: Pin = parse_header(&mut reader, key, "pin")?;
    let balance: Decimal = parse_header(&mut reader, key, "balance")?;

    if balance < Decimal::ZERO {
        return Err(corrupt(key, format!("negative balance {balance}")));
    }
    if number != key {
        warn!(account = %key, stored = %number, "stored account number differs from file key");
    }

    let mut ledger = Ledger::new(seed.ledger().limits());

    for (index, row) in reader.split(b'\n').enumerate() {
        let row = row?;
        let line = HEADER_LINES + 1 + index as u64;

        if row.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        let entry = LedgerEntry::decode(&String::from_utf8_lossy(&row));
        if entry.is_void() {
            warn!(account = %key, line, "skipping malformed ledger row");
            continue;
        }

        match ledger.push(entry) {
            Admission::Appended => {}
            Admission::Evicted(_) => {
                debug!(account = %key, line, "ledger capacity reached, evicted oldest row")
            }
            Admission::Dropped(_) => {
                debug!(account = %key, line, "ledger capacity reached, dropped row")
            }
        }
    }

    Ok(Account::with_state(key, holder, pin, balance, ledger))
}

fn header_line(reader: &mut impl BufRead, account: &str, field: &str) -> Result<String> {
    let mut line = String::new();

    if reader.read_line(&mut line)? == 0 {
        return Err(corrupt(account, format!("missing {field}")));
    }

    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

fn parse_header<T: FromStr>(reader: &mut impl BufRead, account: &str, field: &str) -> Result<T> {
    let value = header_line(reader, account, field)?;

    value
        .trim()
        .parse()
        .map_err(|_| corrupt(account, format!("invalid {field} `{value}`")))
}

fn corrupt(account: &str, reason: String) -> Error {
    Error::CorruptRecord {
        account: account.to_owned(),
        reason,
    }
}
