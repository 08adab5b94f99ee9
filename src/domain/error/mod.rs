use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("amount must be positive, got {amount}")]
    InvalidAmount { amount: Decimal },
    #[error("withdrawal of {requested} exceeds the balance of {available} in account {account}")]
    InsufficientFunds {
        account: String,
        requested: Decimal,
        available: Decimal,
    },
    #[error("depositing {amount} would exceed the largest balance account {account} can hold")]
    AmountTooLarge { account: String, amount: Decimal },
    #[error("incorrect PIN for account {account}")]
    IncorrectPin { account: String },
    #[error("no account matches the supplied credentials")]
    AuthenticationFailure,
}

pub type Result<T> = std::result::Result<T, Error>;
