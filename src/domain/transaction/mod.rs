use std::{fmt, str::FromStr};

use chrono::Local;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Local date-time layout used for every ledger timestamp, e.g. `16-10-2026 03:04:05 PM`.
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %I:%M:%S %p";

const DELIMITER: char = ',';

#[derive(Debug, Serialize, Hash, PartialEq, Eq, Clone, Copy, Default)]
pub enum TransactionKind {
    #[default]
    Deposit,
    Withdraw,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Withdraw => "Withdraw",
        }
    }

    /// Effect of an entry of this kind on the balance.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            TransactionKind::Deposit => amount,
            TransactionKind::Withdraw => -amount,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = ParseEntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Deposit" => Ok(TransactionKind::Deposit),
            "Withdraw" => Ok(TransactionKind::Withdraw),
            other => Err(ParseEntryError::UnknownKind(other.to_owned())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseEntryError {
    #[error("expected `kind,amount,timestamp`")]
    MissingField,
    #[error("unknown transaction kind `{0}`")]
    UnknownKind(String),
    #[error("`{0}` is not a non-negative decimal amount")]
    InvalidAmount(String),
}

/// One committed deposit or withdrawal.
///
/// Field order matters: rows are serialized positionally as `kind,amount,timestamp`.
#[derive(Debug, Serialize, Hash, PartialEq, Eq, Clone, Default)]
pub struct LedgerEntry {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub timestamp: String,
}

impl LedgerEntry {
    pub fn new(kind: TransactionKind, amount: Decimal, timestamp: impl Into<String>) -> Self {
        Self {
            kind,
            amount,
            timestamp: timestamp.into(),
        }
    }

    /// Stamps the entry with the current local time.
    pub fn now(kind: TransactionKind, amount: Decimal) -> Self {
        Self::new(kind, amount, Local::now().format(TIMESTAMP_FORMAT).to_string())
    }

    /// Signed effect on the balance.
    pub fn effect(&self) -> Decimal {
        self.kind.signed(self.amount)
    }

    /// The placeholder produced by [`LedgerEntry::decode`] for an unreadable line.
    ///
    /// Committed entries always carry a positive amount, so a zero amount identifies it.
    pub fn is_void(&self) -> bool {
        self.amount.is_zero() && self.timestamp.is_empty()
    }

    pub fn encode(&self) -> String {
        format!(
            "{}{DELIMITER}{}{DELIMITER}{}\n",
            self.kind, self.amount, self.timestamp
        )
    }

    /// Lenient counterpart of [`FromStr`]: a corrupt line becomes the void entry.
    pub fn decode(line: &str) -> Self {
        line.parse().unwrap_or_default()
    }

    fn from_fields(kind: &str, amount: &str, timestamp: &str) -> Result<Self, ParseEntryError> {
        let kind = kind.parse()?;
        let amount = amount
            .trim()
            .parse::<Decimal>()
            .ok()
            .filter(|amount| !amount.is_sign_negative())
            .ok_or_else(|| ParseEntryError::InvalidAmount(amount.to_owned()))?;

        Ok(Self::new(kind, amount, timestamp))
    }
}

impl FromStr for LedgerEntry {
    type Err = ParseEntryError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (kind, rest) = line
            .split_once(DELIMITER)
            .ok_or(ParseEntryError::MissingField)?;
        let (amount, timestamp) = rest
            .split_once(DELIMITER)
            .ok_or(ParseEntryError::MissingField)?;

        Self::from_fields(kind, amount, timestamp)
    }
}
