//! Defines the endpoint that deletes every transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{AppState, Error, transaction::delete_all_transactions};

/// The state needed to reset the ledger.
#[derive(Debug, Clone)]
pub struct ResetState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ResetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The JSON body sent in response to a reset.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ResetResponse {
    /// Whether the transactions were deleted.
    pub success: bool,
    /// A short description of the outcome.
    pub message: String,
}

fn delete_everything(state: &ResetState) -> Result<usize, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_all_transactions(&connection)
}

/// A route handler that deletes every transaction, leaving only the starting
/// balance.
pub async fn reset_ledger_endpoint(State(state): State<ResetState>) -> Response {
    match delete_everything(&state) {
        Ok(deleted_count) => {
            tracing::info!("reset ledger, deleted {deleted_count} transactions");

            Json(ResetResponse {
                success: true,
                message: "Database reset".to_owned(),
            })
            .into_response()
        }
        Err(error) => {
            tracing::error!("could not reset ledger: {error}");

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ResetResponse {
                    success: false,
                    message: "Could not reset the database".to_owned(),
                }),
            )
                .into_response()
        }
    }
}
