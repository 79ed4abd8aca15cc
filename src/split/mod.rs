//! Expense-split ledger: partners share expenses, balances are derived on
//! demand, and debts are netted into a short list of payment proposals.

pub mod account;
pub mod balance;
pub mod csv_io;
pub mod line;
pub mod netting;
pub mod partner;

pub use account::{PaymentProposal, SplitAccount};
pub use balance::PartnerTotal;
pub use line::{AccountLine, PartnerPayment, PartnerWeight};
pub use netting::{propose_payments, Transfer};
pub use partner::Partner;

use thiserror::Error;
use uuid::Uuid;

pub type SplitResult<T> = Result<T, SplitError>;

/// Failures raised by split-account operations.
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("partner named `{0}` not found")]
    UnknownPartnerName(String),
    #[error("payment proposal `{0}` not found")]
    UnknownProposal(Uuid),
    #[error("CSV import failed: {0}")]
    Csv(String),
}
