//! The ledger calculations: running balances and the aggregates built on them.
//!
//! Everything in this module is a pure function of its inputs. Callers read
//! the transactions from the database first and pass them in.

mod amount;
mod balance;
mod summary;

pub use amount::parse_amount;
pub use balance::{BalancedTransaction, DEFAULT_STARTING_BALANCE, compute_balances, current_balance};
pub use summary::{MonthlySummary, PeriodTotals, YearMonth, trend_percentage};
