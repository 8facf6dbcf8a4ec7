//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - View handlers for the transaction pages, forms and the CSV export

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod detail_page;
mod edit_endpoint;
mod edit_page;
mod export;
mod form;
mod query;
mod transactions_page;
mod view;

pub use core::{
    Transaction, TransactionBuilder, count_transactions, create_transaction,
    create_transaction_table, delete_all_transactions, get_all_transactions, get_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_create_transaction_page;
pub use delete_endpoint::delete_transaction_endpoint;
pub use detail_page::get_transaction_detail_page;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use export::export_transactions_csv;
pub use transactions_page::get_transactions_page;

pub(crate) use view::{balance_class, format_date};
