//! Defines the route handler for the page that displays the ledger as a table.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::{
    AppState, Error,
    ledger::{PeriodTotals, compute_balances, current_balance},
    pagination::{Page, PaginationConfig},
};

use super::{
    core::get_all_transactions,
    query::{TransactionsQuery, filter_transactions, sort_transactions},
    view::{LedgerSummary, TransactionsPage, transactions_view},
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The database connection for reading the ledger.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The balance before the earliest transaction.
    pub starting_balance: Decimal,
    /// The default page size and the number of page links.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            starting_balance: state.starting_balance,
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Render the ledger with running totals, filtered, sorted and paged as
/// requested by `query`.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_transactions(&connection)
            .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?
    };

    let ledger = compute_balances(transactions, state.starting_balance);
    let summary = LedgerSummary {
        balance: current_balance(&ledger, state.starting_balance),
        totals: PeriodTotals::of(ledger.iter().map(|balanced| &balanced.transaction)),
        transaction_count: ledger.len(),
    };

    let mut rows = filter_transactions(ledger, &query);
    sort_transactions(&mut rows, query.sort, query.order);

    let config = &state.pagination_config;
    let page = Page::new(
        query.page.unwrap_or(config.default_page),
        query.per_page.unwrap_or(config.default_page_size),
        rows.len() as u64,
    );

    Ok(transactions_view(TransactionsPage {
        rows: page.slice(&rows),
        page,
        max_pages: config.max_pages,
        query: &query,
        summary,
    })
    .into_response())
}
