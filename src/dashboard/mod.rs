//! Dashboard module
//!
//! Provides an overview page showing the current balance, this month's
//! debits and credits compared with last month, and the latest transactions.

mod cards;
mod handlers;

pub use handlers::get_dashboard_page;
