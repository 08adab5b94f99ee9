use std::io::{self, BufRead, Write};

use rust_decimal::Decimal;
use tracing::{debug, error};

use crate::{
    config::DEFAULT_STATEMENT_LENGTH,
    directory::AccountDirectory,
    domain::{
        account::{BalanceOperations, Pin, StatementReporting},
        error::Error as Rejected,
        transaction::LedgerEntry,
    },
    error::Error,
    storage::Storage,
    store::AccountStore,
};

const BRAND: &str = "FinServe360";
const RULE: &str = "---------------------------------------------------------";

/// Interactive terminal: a login loop handing each authenticated user a menu session.
///
/// Only one session is active at a time; it ends on logout or end of input.
pub struct Atm<'d, S, R, W> {
    directory: &'d mut AccountDirectory<S>,
    input: R,
    output: W,
    statement_length: usize,
}

impl<'d, S, R, W> Atm<'d, S, R, W>
where
    S: Storage,
    R: BufRead,
    W: Write,
{
    pub fn new(directory: &'d mut AccountDirectory<S>, input: R, output: W) -> Self {
        Self {
            directory,
            input,
            output,
            statement_length: DEFAULT_STATEMENT_LENGTH,
        }
    }

    pub fn with_statement_length(mut self, statement_length: usize) -> Self {
        self.statement_length = statement_length;
        self
    }

    pub fn run(&mut self) -> io::Result<()> {
        loop {
            write!(self.output, "\n=== {BRAND} ===\n1. Login\n2. Exit\nChoose: ")?;
            let Some(choice) = read_line(&mut self.input, &mut self.output)? else {
                break;
            };

            match choice.as_str() {
                "1" => self.login()?,
                "2" => break,
                _ => writeln!(self.output, "Invalid option!")?,
            }
        }

        writeln!(self.output, "\nThank you for using {BRAND}!")?;
        self.output.flush()
    }

    fn login(&mut self) -> io::Result<()> {
        let Some(number) = prompt(&mut self.input, &mut self.output, "Account Number: ")? else {
            return Ok(());
        };
        let Some(pin) = prompt(&mut self.input, &mut self.output, "PIN: ")? else {
            return Ok(());
        };

        let Ok(pin) = pin.parse::<Pin>() else {
            return writeln!(self.output, "Invalid login!");
        };
        let store = match self.directory.login(&number, pin) {
            Ok(store) => store,
            Err(err) => {
                debug!(error = %err, "login rejected");
                return writeln!(self.output, "Invalid login!");
            }
        };

        Session {
            store,
            input: &mut self.input,
            output: &mut self.output,
            statement_length: self.statement_length,
        }
        .run()
    }
}

struct Session<'a, S, R, W> {
    store: &'a mut AccountStore<S>,
    input: &'a mut R,
    output: &'a mut W,
    statement_length: usize,
}

impl<S, R, W> Session<'_, S, R, W>
where
    S: Storage,
    R: BufRead,
    W: Write,
{
    fn run(mut self) -> io::Result<()> {
        writeln!(self.output, "\nWelcome, {}!", self.store.holder())?;

        loop {
            write!(
                self.output,
                "\n--- Menu ---\n\
                 1. Balance\n\
                 2. Deposit\n\
                 3. Withdraw\n\
                 4. Mini Statement\n\
                 5. Transaction History\n\
                 6. Change PIN\n\
                 7. Logout\n\
                 Choose: "
            )?;
            let Some(choice) = read_line(&mut *self.input, &mut *self.output)? else {
                return Ok(());
            };

            match choice.as_str() {
                "1" => writeln!(self.output, "Balance: Rs {}", self.store.balance())?,
                "2" => self.deposit()?,
                "3" => self.withdraw()?,
                "4" => self.mini_statement()?,
                "5" => self.full_history()?,
                "6" => self.change_pin()?,
                "7" => {
                    writeln!(self.output, "Logged out!")?;
                    return Ok(());
                }
                _ => writeln!(self.output, "Invalid choice!")?,
            }
        }
    }

    fn deposit(&mut self) -> io::Result<()> {
        let Some(amount) = self.read_amount()? else {
            return Ok(());
        };

        match self.store.deposit(amount) {
            Ok(balance) => writeln!(self.output, "Deposited Rs {amount}. Balance: Rs {balance}"),
            Err(err) => self.report(&err),
        }
    }

    fn withdraw(&mut self) -> io::Result<()> {
        let Some(amount) = self.read_amount()? else {
            return Ok(());
        };

        match self.store.withdraw(amount) {
            Ok(balance) => writeln!(self.output, "Withdrawn Rs {amount}. Balance: Rs {balance}"),
            Err(err) => self.report(&err),
        }
    }

    fn mini_statement(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n--- Mini Statement ---")?;
        writeln!(self.output, "Name       : {}", self.store.holder())?;
        writeln!(self.output, "Account No : {}", self.store.number())?;
        writeln!(self.output, "Balance    : Rs {}", self.store.balance())?;
        writeln!(self.output, "\nLast {} Transactions:", self.statement_length)?;

        write_table(
            &mut *self.output,
            &self.store.recent_history(self.statement_length),
        )
    }

    fn full_history(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n--- Transaction History ---")?;
        write_table(&mut *self.output, &self.store.full_history())
    }

    fn change_pin(&mut self) -> io::Result<()> {
        let Some(old) = self.read_pin("Current PIN: ")? else {
            return Ok(());
        };
        let Some(new) = self.read_pin("New PIN: ")? else {
            return Ok(());
        };

        match self.store.change_pin(old, new) {
            Ok(()) => writeln!(self.output, "PIN changed successfully!"),
            Err(err) => self.report(&err),
        }
    }

    /// `None` on end of input or when the answer is not a decimal.
    fn read_amount(&mut self) -> io::Result<Option<Decimal>> {
        let Some(answer) = prompt(&mut *self.input, &mut *self.output, "Amount: ")? else {
            return Ok(None);
        };

        match answer.parse() {
            Ok(amount) => Ok(Some(amount)),
            Err(_) => {
                writeln!(self.output, "Invalid amount!")?;
                Ok(None)
            }
        }
    }

    fn read_pin(&mut self, label: &str) -> io::Result<Option<Pin>> {
        let Some(answer) = prompt(&mut *self.input, &mut *self.output, label)? else {
            return Ok(None);
        };

        match answer.parse() {
            Ok(pin) => Ok(Some(pin)),
            Err(_) => {
                writeln!(self.output, "Invalid PIN!")?;
                Ok(None)
            }
        }
    }

    fn report(&mut self, err: &Error) -> io::Result<()> {
        match err {
            Error::BusinessError(Rejected::InvalidAmount { .. }) => {
                writeln!(self.output, "Invalid amount!")
            }
            Error::BusinessError(Rejected::AmountTooLarge { .. }) => {
                writeln!(self.output, "Amount too large!")
            }
            Error::BusinessError(Rejected::InsufficientFunds { .. }) => {
                writeln!(self.output, "Insufficient balance!")
            }
            Error::BusinessError(Rejected::IncorrectPin { .. }) => {
                writeln!(self.output, "Incorrect PIN!")
            }
            err => {
                error!(account = %self.store.number(), error = ?err, "operation failed");
                writeln!(self.output, "Warning: {err}.")
            }
        }
    }
}

fn write_table(output: &mut impl Write, entries: &[LedgerEntry]) -> io::Result<()> {
    writeln!(output, "{:<15}{:<15}{}", "Type", "Amount", "Time")?;
    writeln!(output, "{RULE}")?;

    if entries.is_empty() {
        return writeln!(output, "No transactions yet.");
    }

    for entry in entries {
        writeln!(
            output,
            "{:<15}{:<15}{}",
            entry.kind,
            entry.amount.to_string(),
            entry.timestamp
        )?;
    }
    Ok(())
}

fn prompt(
    input: &mut impl BufRead,
    output: &mut impl Write,
    label: &str,
) -> io::Result<Option<String>> {
    write!(output, "{label}")?;
    read_line(input, output)
}

/// Flushes pending output, then reads one trimmed line. `None` at end of input.
fn read_line(input: &mut impl BufRead, output: &mut impl Write) -> io::Result<Option<String>> {
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}
