use itertools::Itertools;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    domain::{
        self,
        account::{Account, Pin},
        ledger::{Ledger, LedgerLimits},
    },
    error::{Error, Result},
    storage::Storage,
    store::AccountStore,
};

/// Bootstrap identity of a rostered account.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
pub struct Seed {
    pub number: String,
    pub holder: String,
    pub pin: Pin,
}

impl Seed {
    pub fn new(number: impl Into<String>, holder: impl Into<String>, pin: Pin) -> Self {
        Self {
            number: number.into(),
            holder: holder.into(),
            pin,
        }
    }
}

/// The built-in roster used when no configuration overrides it.
pub fn default_roster() -> Vec<Seed> {
    vec![
        Seed::new("12345678910", "M Sohaib", 1111),
        Seed::new("12345678911", "Ahsan Manzoor", 2222),
        Seed::new("12345678912", "Hasnain Ali", 3333),
    ]
}

/// Fixed set of accounts, built once at startup.
#[derive(Debug)]
pub struct AccountDirectory<S> {
    accounts: Vec<AccountStore<S>>,
}

impl<S: Storage + Clone> AccountDirectory<S> {
    /// Builds one store per seed and loads any state already persisted for it.
    pub fn bootstrap(seeds: &[Seed], limits: LedgerLimits, storage: S) -> Result<Self> {
        if let Some(number) = seeds.iter().map(|seed| &seed.number).duplicates().next() {
            return Err(Error::DuplicateAccount(number.clone()));
        }

        let accounts = seeds
            .iter()
            .map(|seed| -> Result<AccountStore<S>> {
                let ledger = Ledger::new(limits);
                let account = Account::new(&seed.number, &seed.holder, seed.pin, ledger);
                let mut store = AccountStore::new(account, storage.clone());
                store.load()?;
                Ok(store)
            })
            .collect::<Result<Vec<_>>>()?;

        info!(accounts = accounts.len(), "account directory ready");
        Ok(Self { accounts })
    }
}

impl<S: Storage> AccountDirectory<S> {
    /// The store whose number and PIN both match, if any.
    pub fn authenticate(&mut self, number: &str, pin: Pin) -> Option<&mut AccountStore<S>> {
        let found = self
            .accounts
            .iter_mut()
            .find(|store| store.authenticate(number, pin));

        if found.is_none() {
            warn!(account = %number, "authentication failed");
        }
        found
    }

    /// Like [`AccountDirectory::authenticate`], reporting a miss as
    /// [`AuthenticationFailure`](crate::domain::error::Error::AuthenticationFailure).
    pub fn login(&mut self, number: &str, pin: Pin) -> Result<&mut AccountStore<S>> {
        self.authenticate(number, pin)
            .ok_or_else(|| domain::error::Error::AuthenticationFailure.into())
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountStore<S>> {
        self.accounts.iter()
    }
}
