use rust_decimal::Decimal;
use tracing::debug;

use super::{
    error::{Error, Result},
    ledger::{Admission, Ledger},
    transaction::{LedgerEntry, TransactionKind},
};

pub type Pin = u32;

/// Deposit, withdraw and balance inquiry.
pub trait BalanceOperations {
    type Error;

    /// Credits `amount` and returns the new balance.
    fn deposit(&mut self, amount: Decimal) -> std::result::Result<Decimal, Self::Error>;

    /// Debits `amount` and returns the new balance.
    fn withdraw(&mut self, amount: Decimal) -> std::result::Result<Decimal, Self::Error>;

    fn balance(&self) -> Decimal;
}

/// Read-only views over the transaction log.
pub trait StatementReporting {
    /// Last `min(n, len)` entries, oldest first. The result is a snapshot.
    fn recent_history(&self, n: usize) -> Vec<LedgerEntry>;

    fn full_history(&self) -> Vec<LedgerEntry>;
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Account {
    number: String,
    holder: String,
    pin: Pin,
    balance: Decimal,
    ledger: Ledger,
}

impl Account {
    /// A fresh account with a zero balance and an empty ledger.
    pub fn new(
        number: impl Into<String>,
        holder: impl Into<String>,
        pin: Pin,
        ledger: Ledger,
    ) -> Self {
        Self::with_state(number, holder, pin, Decimal::ZERO, ledger)
    }

    pub fn with_state(
        number: impl Into<String>,
        holder: impl Into<String>,
        pin: Pin,
        balance: Decimal,
        ledger: Ledger,
    ) -> Self {
        Self {
            number: number.into(),
            holder: holder.into(),
            pin,
            balance,
            ledger,
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }

    pub fn pin(&self) -> Pin {
        self.pin
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn matches(&self, number: &str, pin: Pin) -> bool {
        self.number == number && self.pin == pin
    }

    pub fn change_pin(&mut self, old: Pin, new: Pin) -> Result<()> {
        if old != self.pin {
            return Err(Error::IncorrectPin {
                account: self.number.clone(),
            });
        }

        self.pin = new;
        Ok(())
    }

    fn record(&mut self, kind: TransactionKind, amount: Decimal) {
        match self.ledger.push(LedgerEntry::now(kind, amount)) {
            Admission::Appended => {}
            Admission::Evicted(entry) => {
                debug!(account = %self.number, evicted = ?entry, "ledger full, evicted oldest entry");
            }
            Admission::Dropped(entry) => {
                debug!(account = %self.number, dropped = ?entry, "ledger full, entry not retained");
            }
        }
    }
}

fn ensure_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

impl BalanceOperations for Account {
    type Error = Error;

    fn deposit(&mut self, amount: Decimal) -> Result<Decimal> {
        ensure_positive(amount)?;

        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| Error::AmountTooLarge {
                account: self.number.clone(),
                amount,
            })?;
        self.record(TransactionKind::Deposit, amount);
        Ok(self.balance)
    }

    fn withdraw(&mut self, amount: Decimal) -> Result<Decimal> {
        ensure_positive(amount)?;

        if amount > self.balance {
            return Err(Error::InsufficientFunds {
                account: self.number.clone(),
                requested: amount,
                available: self.balance,
            });
        }

        // amount <= balance, so this cannot underflow.
        self.balance -= amount;
        self.record(TransactionKind::Withdraw, amount);
        Ok(self.balance)
    }

    fn balance(&self) -> Decimal {
        self.balance
    }
}

impl StatementReporting for Account {
    fn recent_history(&self, n: usize) -> Vec<LedgerEntry> {
        self.ledger.recent(n)
    }

    fn full_history(&self) -> Vec<LedgerEntry> {
        self.ledger.to_vec()
    }
}
