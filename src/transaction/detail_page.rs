//! Defines the route handler for the page showing a single transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    html::{
        BADGE_STYLE, CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, edit_delete_action_links,
        format_currency,
    },
    ledger::{BalancedTransaction, compute_balances},
    navigation::NavBar,
    transaction::{
        core::get_all_transactions,
        view::{balance_class, date_datetime_attr, format_date, with_redirect_url},
    },
};

/// The state needed for the transaction detail page.
#[derive(Debug, Clone)]
pub struct TransactionDetailState {
    /// The database connection for reading the ledger.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The balance before the earliest transaction.
    pub starting_balance: Decimal,
}

impl FromRef<AppState> for TransactionDetailState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            starting_balance: state.starting_balance,
        }
    }
}

/// Renders a single transaction with the balance right after it.
///
/// The running total depends on every earlier transaction, so the whole
/// ledger is read to compute it.
pub async fn get_transaction_detail_page(
    State(state): State<TransactionDetailState>,
    Path(transaction_id): Path<TransactionId>,
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

    let balanced = compute_balances(transactions, state.starting_balance)
        .into_iter()
        .find(|balanced| balanced.transaction.id == transaction_id)
        .ok_or(Error::NotFound)
        .inspect_err(|_| tracing::debug!("transaction {transaction_id} does not exist"))?;

    Ok(transaction_detail_view(&balanced).into_response())
}

fn transaction_detail_view(balanced: &BalancedTransaction) -> Markup {
    let transaction = &balanced.transaction;
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_url = with_redirect_url(
        &format_endpoint(endpoints::TRANSACTION, transaction.id),
        endpoints::TRANSACTIONS_VIEW,
    );
    let confirm_message = format!(
        "Are you sure you want to delete the transaction '{}'? This cannot be undone.",
        transaction.notes
    );

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            article class={ (CARD_STYLE) " w-full max-w-md" } data-transaction-detail=(transaction.id)
            {
                header class="flex justify-between items-start gap-4"
                {
                    h1 class="text-xl font-bold break-words" { (transaction.notes) }

                    @if let Some(category) = &transaction.category {
                        span class=(BADGE_STYLE) { (category) }
                    }
                }

                dl class="grid grid-cols-2 gap-2 mt-4 text-sm"
                {
                    dt class="text-gray-600 dark:text-gray-400" { "Date" }
                    dd
                    {
                        time datetime=(date_datetime_attr(transaction.date)) { (format_date(transaction.date)) }
                    }

                    dt class="text-gray-600 dark:text-gray-400" { "Payment Method" }
                    dd { (transaction.payment_method.as_deref().unwrap_or("-")) }

                    dt class="text-gray-600 dark:text-gray-400" { "Debit" }
                    dd class="text-red-700 dark:text-red-300" data-debit { (format_currency(transaction.debit)) }

                    dt class="text-gray-600 dark:text-gray-400" { "Credit" }
                    dd class="text-green-700 dark:text-green-300" data-credit { (format_currency(transaction.credit)) }

                    dt class="text-gray-600 dark:text-gray-400" { "Balance After" }
                    dd class={ "font-semibold " (balance_class(balanced.total)) } data-total
                    {
                        (format_currency(balanced.total))
                    }
                }

                footer class="flex gap-4 mt-4"
                {
                    (edit_delete_action_links(
                        &edit_url,
                        &delete_url,
                        &confirm_message,
                        "closest article",
                        "outerHTML",
                    ))

                    a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Back to Transactions" }
                }
            }
        }
    };

    base("Transaction", &[], &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        db::initialize,
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
        transaction::{Transaction, create_transaction},
    };

    use super::{TransactionDetailState, get_transaction_detail_page};

    fn get_test_state() -> TransactionDetailState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        TransactionDetailState {
            db_connection: Arc::new(Mutex::new(conn)),
            starting_balance: dec!(100),
        }
    }

    #[tokio::test]
    async fn shows_running_total_of_transaction() {
        let state = get_test_state();
        {
            let conn = state.db_connection.lock().unwrap();
            // Inserted out of order so that the ID order differs from the date order.
            create_transaction(
                Transaction::build(date!(2025 - 02 - 01), "Later").debit(dec!(10)),
                &conn,
            )
            .unwrap();
            create_transaction(
                Transaction::build(date!(2025 - 01 - 01), "Earlier").credit(dec!(25.5)),
                &conn,
            )
            .unwrap();
        }

        let response = get_transaction_detail_page(State(state), Path(1))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let total_selector = Selector::parse("dd[data-total]").unwrap();
        let total = html
            .select(&total_selector)
            .next()
            .expect("could not find running total")
            .text()
            .collect::<String>();
        assert_eq!(total.trim(), "$115.50");
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let state = get_test_state();

        let response = get_transaction_detail_page(State(state), Path(42))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
