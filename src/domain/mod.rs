pub mod account;
pub mod error;
pub mod ledger;
pub mod transaction;
