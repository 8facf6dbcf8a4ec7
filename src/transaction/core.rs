//! Defines the core data model and database queries for transactions.

use rusqlite::{Connection, Row, params, types::ValueRef};
use rust_decimal::Decimal;
use serde::Serialize;
use time::{Date, OffsetDateTime};

use crate::{Error, database_id::TransactionId, ledger::parse_amount};

// ============================================================================
// MODELS
// ============================================================================

/// A movement of money in or out of the account.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// When the transaction happened. This is the date used to order the
    /// ledger, not the time the transaction was recorded.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub notes: String,
    /// The money that left the account.
    pub debit: Decimal,
    /// The money that entered the account.
    pub credit: Decimal,
    /// An optional label such as "Food" or "Housing".
    pub category: Option<String>,
    /// An optional label such as "Card" or "Transfer".
    pub payment_method: Option<String>,
    /// When the transaction was first recorded.
    pub created_at: OffsetDateTime,
    /// When the transaction was last changed.
    pub updated_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction with zero debit and credit.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(date: Date, notes: &str) -> TransactionBuilder {
        TransactionBuilder {
            date,
            notes: notes.to_owned(),
            debit: Decimal::ZERO,
            credit: Decimal::ZERO,
            category: None,
            payment_method: None,
        }
    }
}

/// The user-editable fields of a [Transaction].
///
/// Used both to insert new transactions and to replace the fields of an
/// existing one.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub notes: String,
    /// The money that left the account.
    pub debit: Decimal,
    /// The money that entered the account.
    pub credit: Decimal,
    /// An optional category label.
    pub category: Option<String>,
    /// An optional payment method label.
    pub payment_method: Option<String>,
}

impl TransactionBuilder {
    /// Set the debit amount.
    pub fn debit(mut self, debit: Decimal) -> Self {
        self.debit = debit;
        self
    }

    /// Set the credit amount.
    pub fn credit(mut self, credit: Decimal) -> Self {
        self.credit = credit;
        self
    }

    /// Set the category label.
    pub fn category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    /// Set the payment method label.
    pub fn payment_method(mut self, payment_method: Option<String>) -> Self {
        self.payment_method = payment_method;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const TRANSACTION_COLUMNS: &str =
    "id, date, notes, debit, credit, category, payment_method, created_at, updated_at";

/// Create a new transaction in the database from a builder.
///
/// Amounts are stored as decimal strings so that no precision is lost.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let now = OffsetDateTime::now_utc();

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" \
                (date, notes, debit, credit, category, payment_method, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) \
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            params![
                builder.date,
                builder.notes,
                builder.debit.to_string(),
                builder.credit.to_string(),
                builder.category,
                builder.payment_method,
                now,
            ],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve every transaction in chronological order (date, then ID).
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" ORDER BY date ASC, id ASC"
        ))?
        .query_map([], map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

/// Replace the user-editable fields of the transaction `id`.
///
/// The ID and creation time are kept, the update time is refreshed.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "UPDATE \"transaction\" \
             SET date = ?1, notes = ?2, debit = ?3, credit = ?4, category = ?5, \
                 payment_method = ?6, updated_at = ?7 \
             WHERE id = ?8 \
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            params![
                builder.date,
                builder.notes,
                builder.debit.to_string(),
                builder.credit.to_string(),
                builder.category,
                builder.payment_method,
                OffsetDateTime::now_utc(),
                id,
            ],
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
            error => error.into(),
        })
}

/// Delete the transaction `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = :id",
        &[(":id", &id)],
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Delete every transaction, returning how many were deleted.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn delete_all_transactions(connection: &Connection) -> Result<usize, Error> {
    connection
        .execute("DELETE FROM \"transaction\"", ())
        .map_err(Error::from)
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                notes TEXT NOT NULL,
                debit TEXT NOT NULL DEFAULT '0.00',
                credit TEXT NOT NULL DEFAULT '0.00',
                category TEXT,
                payment_method TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    // Used to read the ledger in chronological order.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date_id ON \"transaction\"(date, id);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// Amount columns that do not hold a number are read as zero.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        date: row.get(1)?,
        notes: row.get(2)?,
        debit: map_amount(row.get_ref(3)?),
        credit: map_amount(row.get_ref(4)?),
        category: row.get(5)?,
        payment_method: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn map_amount(value: ValueRef<'_>) -> Decimal {
    match value {
        ValueRef::Text(text) => std::str::from_utf8(text)
            .map(parse_amount)
            .unwrap_or(Decimal::ZERO),
        ValueRef::Integer(integer) => Decimal::from(integer),
        ValueRef::Real(real) => Decimal::from_f64_retain(real).unwrap_or(Decimal::ZERO),
        ValueRef::Null | ValueRef::Blob(_) => Decimal::ZERO,
    }
}

// ============================================================================
// TESTS
// ============================================================================
