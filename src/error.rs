//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The notes of a transaction were empty or only whitespace.
    #[error("transaction notes cannot be empty")]
    EmptyNotes,

    /// The amount entered for a transaction was zero or negative.
    ///
    /// The direction of a transaction is given by its kind (debit or credit),
    /// so amounts entered in the form must be strictly positive.
    #[error("{0} is not a valid amount, amounts must be greater than zero")]
    InvalidAmount(String),

    /// A key that the calculator does not have was pressed.
    #[error("\"{0}\" is not a calculator key")]
    InvalidCalculatorKey(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The transactions could not be written as CSV.
    #[error("could not write the CSV export: {0}")]
    CsvExportError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::CsvExportError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::EmptyNotes => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: "Notes are required".to_owned(),
                    details: "Describe what the transaction was for, e.g. \"Groceries\"."
                        .to_owned(),
                },
            ),
            Error::InvalidAmount(amount) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: "Invalid amount".to_owned(),
                    details: format!(
                        "\"{amount}\" is not a valid amount. \
                        Enter a number greater than zero and choose debit or credit."
                    ),
                },
            ),
            Error::InvalidCalculatorKey(key) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: "Unknown key".to_owned(),
                    details: format!("The calculator does not have a \"{key}\" key."),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::NotFound | Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update transaction".to_owned(),
                    details: "The transaction could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete transaction".to_owned(),
                    details: "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted."
                        .to_owned(),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::Error;

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }

    #[test]
    fn validation_errors_are_unprocessable() {
        for error in [Error::EmptyNotes, Error::InvalidAmount("-5".to_owned())] {
            assert_eq!(
                error.into_alert_response().status(),
                StatusCode::UNPROCESSABLE_ENTITY
            );
        }
    }

    #[test]
    fn missing_transactions_are_not_found() {
        for error in [
            Error::UpdateMissingTransaction,
            Error::DeleteMissingTransaction,
        ] {
            assert_eq!(error.into_alert_response().status(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn page_errors_render_status() {
        assert_eq!(Error::NotFound.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::DatabaseLockError.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
