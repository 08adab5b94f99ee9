use rust_decimal::Decimal;
use tracing::info;

use crate::{
    domain::{
        account::{Account, BalanceOperations, Pin, StatementReporting},
        transaction::LedgerEntry,
    },
    error::{Error, Result},
    storage::Storage,
};

/// An account together with the storage its state is persisted to.
///
/// Every successful mutation rewrites the account document before returning. If that
/// write fails the mutation stays applied in memory and [`Error::StorageFailure`] is
/// returned.
#[derive(Debug)]
pub struct AccountStore<S> {
    account: Account,
    storage: S,
}

impl<S: Storage> AccountStore<S> {
    pub fn new(account: Account, storage: S) -> Self {
        Self { account, storage }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn number(&self) -> &str {
        self.account.number()
    }

    pub fn holder(&self) -> &str {
        self.account.holder()
    }

    /// Replaces the in-memory state with the persisted document, if there is one.
    ///
    /// Returns whether persisted state was found. A missing document leaves the
    /// bootstrap identity and zero balance in place.
    pub fn load(&mut self) -> Result<bool> {
        let Some(document) = self.storage.read(self.account.number())? else {
            info!(account = %self.account.number(), "no persisted state, starting empty");
            return Ok(false);
        };

        self.account = crate::csv::read(document.as_slice(), &self.account)?;
        info!(
            account = %self.account.number(),
            balance = %self.account.balance(),
            entries = self.account.ledger().len(),
            "loaded account"
        );
        Ok(true)
    }

    pub fn save(&self) -> Result<()> {
        let number = self.account.number();
        let mut document = Vec::new();
        crate::csv::write(&self.account, &mut document)?;

        self.storage
            .write(number, &document)
            .map_err(|source| Error::StorageFailure {
                account: number.to_owned(),
                source,
            })?;

        info!(account = %number, "saved account");
        Ok(())
    }

    pub fn authenticate(&self, number: &str, pin: Pin) -> bool {
        self.account.matches(number, pin)
    }

    pub fn change_pin(&mut self, old: Pin, new: Pin) -> Result<()> {
        self.account.change_pin(old, new)?;
        self.save()
    }
}

impl<S: Storage> BalanceOperations for AccountStore<S> {
    type Error = Error;

    fn deposit(&mut self, amount: Decimal) -> Result<Decimal> {
        let balance = self.account.deposit(amount)?;
        self.save()?;
        Ok(balance)
    }

    fn withdraw(&mut self, amount: Decimal) -> Result<Decimal> {
        let balance = self.account.withdraw(amount)?;
        self.save()?;
        Ok(balance)
    }

    fn balance(&self) -> Decimal {
        self.account.balance()
    }
}

impl<S> StatementReporting for AccountStore<S> {
    fn recent_history(&self, n: usize) -> Vec<LedgerEntry> {
        self.account.recent_history(n)
    }

    fn full_history(&self) -> Vec<LedgerEntry> {
        self.account.full_history()
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use rust_decimal_macros::dec;

    use super::*;
    use crate::{
        domain::{self, ledger::Ledger},
        storage::MemoryStorage,
    };

    struct ReadOnlyStorage;

    impl Storage for ReadOnlyStorage {
        fn read(&self, _: &str) -> io::Result<Option<Vec<u8>>> {
            Ok(None)
        }

        fn write(&self, _: &str, _: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    fn store(storage: MemoryStorage) -> AccountStore<MemoryStorage> {
        AccountStore::new(
            Account::new("12345678912", "Hasnain Ali", 3333, Ledger::default()),
            storage,
        )
    }

    #[test]
    fn load_without_document_keeps_bootstrap_identity() {
        let mut store = store(MemoryStorage::new());

        assert!(!store.load().unwrap());
        assert_eq!(store.holder(), "Hasnain Ali");
        assert_eq!(store.balance(), Decimal::ZERO);
    }

    #[test]
    fn deposit_persists_before_returning() {
        let storage = MemoryStorage::new();
        let mut store = store(storage.clone());

        assert_eq!(store.deposit(dec!(500)).unwrap(), dec!(500));

        let document = storage.document("12345678912").unwrap();
        assert!(document.starts_with("12345678912\nHasnain Ali\n3333\n500\nDeposit,500,"));
    }

    #[test]
    fn rejected_mutations_do_not_write() {
        let storage = MemoryStorage::new();
        let mut store = store(storage.clone());

        let err = store.withdraw(dec!(1)).unwrap_err();

        assert!(matches!(
            err,
            Error::BusinessError(domain::error::Error::InsufficientFunds { .. })
        ));
        assert!(storage.document("12345678912").is_none());
    }

    #[test]
    fn overflowing_deposit_keeps_last_saved_document() {
        let storage = MemoryStorage::new();
        let mut store = store(storage.clone());
        store.deposit(Decimal::MAX).unwrap();
        let saved = storage.document("12345678912").unwrap();

        let err = store.deposit(dec!(0.5)).unwrap_err();

        assert!(matches!(
            err,
            Error::BusinessError(domain::error::Error::AmountTooLarge { .. })
        ));
        assert_eq!(storage.document("12345678912").unwrap(), saved);

        let mut reloaded = self::store(storage);
        reloaded.load().unwrap();
        assert_eq!(reloaded.balance(), Decimal::MAX);
    }

    #[test]
    fn change_pin_persists_new_pin() {
        let storage = MemoryStorage::new();
        let mut store = store(storage.clone());

        store.change_pin(3333, 4444).unwrap();

        let mut reloaded = self::store(storage);
        reloaded.load().unwrap();
        assert!(reloaded.authenticate("12345678912", 4444));
        assert!(!reloaded.authenticate("12345678912", 3333));
    }

    #[test]
    fn wrong_old_pin_is_reported_and_not_persisted() {
        let storage = MemoryStorage::new();
        let mut store = store(storage.clone());

        let err = store.change_pin(1234, 4444).unwrap_err();

        assert!(matches!(
            err,
            Error::BusinessError(domain::error::Error::IncorrectPin { .. })
        ));
        assert!(store.authenticate("12345678912", 3333));
        assert!(storage.document("12345678912").is_none());
    }

    #[test]
    fn storage_failure_keeps_in_memory_change() {
        let mut store = AccountStore::new(
            Account::new("12345678912", "Hasnain Ali", 3333, Ledger::default()),
            ReadOnlyStorage,
        );

        let err = store.deposit(dec!(50)).unwrap_err();

        assert!(err.is_storage_failure());
        assert_eq!(store.balance(), dec!(50));
        assert_eq!(store.full_history().len(), 1);
    }

    #[test]
    fn reload_reproduces_five_transactions() {
        let storage = MemoryStorage::new();
        let mut store = store(storage.clone());
        store.deposit(dec!(1000)).unwrap();
        store.withdraw(dec!(250.50)).unwrap();
        store.deposit(dec!(75.25)).unwrap();
        store.withdraw(dec!(100)).unwrap();
        store.deposit(dec!(0.01)).unwrap();

        let mut reloaded = self::store(storage);
        assert!(reloaded.load().unwrap());

        assert_eq!(reloaded.balance(), dec!(724.76));
        assert_eq!(reloaded.full_history(), store.full_history());
        assert_eq!(reloaded.account(), store.account());
    }
}
