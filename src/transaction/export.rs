//! Defines the endpoint for downloading the ledger as a CSV file.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    AppState, Error,
    html::format_amount,
    ledger::{BalancedTransaction, compute_balances},
    timezone::local_now,
};

use super::{
    core::get_all_transactions,
    query::{TransactionsQuery, filter_transactions},
    view::format_date,
};

/// Spreadsheet programs need the byte order mark to detect UTF-8.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const HEADER: [&str; 7] = [
    "Date",
    "Notes",
    "Category",
    "Payment method",
    "Debit",
    "Credit",
    "Total",
];

const FILE_NAME_FORMAT: &[BorrowedFormatItem] = format_description!(
    "transactions_[year]-[month padding:zero]-[day padding:zero]_[hour padding:zero]-[minute padding:zero].csv"
);

/// The state needed to export the ledger.
#[derive(Debug, Clone)]
pub struct ExportState {
    /// The database connection for reading the ledger.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The balance before the earliest transaction.
    pub starting_balance: Decimal,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            starting_balance: state.starting_balance,
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler that sends the ledger with running totals as a CSV
/// attachment.
///
/// Rows are in chronological order. Only the search text of the query is
/// used, sorting and paging are ignored.
pub async fn export_transactions_csv(
    State(state): State<ExportState>,
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

    let rows = filter_transactions(
        compute_balances(transactions, state.starting_balance),
        &query,
    );
    let body = write_ledger_csv(&rows)
        .inspect_err(|error| tracing::error!("could not write CSV export: {error}"))?;
    let file_name = export_file_name(local_now(&state.local_timezone)?);

    tracing::info!("exported {} transactions to {file_name}", rows.len());

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response())
}

fn export_file_name(now: OffsetDateTime) -> String {
    now.format(FILE_NAME_FORMAT)
        .unwrap_or_else(|_| "transactions.csv".to_owned())
}

fn format_optional_amount(amount: Decimal) -> String {
    if amount.is_zero() {
        String::new()
    } else {
        format_amount(amount)
    }
}

/// Write `rows` as semicolon separated values, prefixed with a UTF-8 byte
/// order mark.
pub fn write_ledger_csv(rows: &[BalancedTransaction]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(UTF8_BOM.to_vec());

    writer.write_record(HEADER)?;

    for row in rows {
        let transaction = &row.transaction;
        writer.write_record([
            format_date(transaction.date),
            transaction.notes.clone(),
            transaction.category.clone().unwrap_or_default(),
            transaction.payment_method.clone().unwrap_or_default(),
            format_optional_amount(transaction.debit),
            format_optional_amount(transaction.credit),
            format_amount(row.total),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvExportError(error.to_string()))
}
