//! Settlement engine for a group expense-splitting application.
//!
//! Given an event's participants and expense records (each with payers and
//! weighted beneficiaries), the engine computes every participant's net
//! balance, derives a short settlement plan that zeroes all balances, and
//! tracks peer-confirmed payment requests against that plan.
//!
//! The calculator and planner are pure, synchronous functions over data the
//! caller already materialized; they perform no I/O and hold no state. The
//! [`PaymentLedger`] is the only stateful component. All monetary values are
//! integer minor units ([`Money`]), so the zero-sum invariant is exact, not
//! approximate.

pub use balances::{ParticipantBalance, compute_balances};
pub use commands::{ExpenseDraft, SplitMode};
pub use currency::Currency;
pub use error::EngineError;
pub use expense::{Beneficiary, ExpenseKind, ExpenseRecord, Payer};
pub use ledger::{PENDING_MATCH_EPSILON, PaymentLedger, PaymentRequest, RequestStatus};
pub use money::Money;
pub use participant::{BankInfo, Participant};
pub use settlement::{PlanItem, compute_plan};
pub use summary::{EventSummary, event_summary};

mod balances;
mod commands;
mod currency;
mod error;
mod expense;
mod ledger;
mod money;
mod participant;
mod settlement;
mod summary;

pub type ResultEngine<T> = Result<T, EngineError>;
