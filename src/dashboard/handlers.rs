//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for the dashboard page
//! - HTML view functions for rendering the dashboard UI
//! - State and query types used by the handler

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::{Arc, Mutex};

use crate::{
    AppState, Error,
    dashboard::cards::{month_name, summary_cards_view},
    endpoints::{self, format_endpoint},
    html::{
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency, link,
    },
    ledger::{BalancedTransaction, MonthlySummary, YearMonth, compute_balances, current_balance},
    navigation::NavBar,
    timezone::local_today,
    transaction::{balance_class, format_date, get_all_transactions},
};

/// The number of transactions listed under "Recent Transactions".
const RECENT_TRANSACTIONS_LIMIT: usize = 10;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading the ledger.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The balance before the earliest transaction.
    pub starting_balance: Decimal,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            starting_balance: state.starting_balance,
        }
    }
}

/// The query parameters accepted by the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Only list recent transactions whose notes contain this text.
    #[serde(default)]
    pub q: Option<String>,
}

/// Display a page with an overview of the ledger.
///
/// The summary cards always describe the whole ledger, the search text only
/// narrows the list of recent transactions.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
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

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    if transactions.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar, state.starting_balance).into_response());
    }

    let today = local_today(&state.local_timezone)?;
    let monthly_summary = MonthlySummary::new(&transactions, YearMonth::of(today));
    let ledger = compute_balances(transactions, state.starting_balance);
    let balance = current_balance(&ledger, state.starting_balance);

    let search_text = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty());
    let search_text_lower = search_text.map(str::to_lowercase);
    let recent: Vec<&BalancedTransaction> = ledger
        .iter()
        .rev()
        .filter(|balanced| match &search_text_lower {
            Some(text) => balanced.transaction.notes.to_lowercase().contains(text),
            None => true,
        })
        .take(RECENT_TRANSACTIONS_LIMIT)
        .collect();

    Ok(dashboard_view(
        nav_bar,
        balance,
        &monthly_summary,
        &recent,
        search_text,
    )
    .into_response())
}

/// Renders the dashboard page when no transaction data exists.
fn dashboard_no_data_view(nav_bar: NavBar, starting_balance: Decimal) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "adding a transaction");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p data-empty-state="true"
            {
                "Your balance is " (format_currency(starting_balance)) ". Get started by "
                (new_transaction_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

fn dashboard_view(
    nav_bar: NavBar,
    balance: Decimal,
    monthly_summary: &MonthlySummary,
    recent: &[&BalancedTransaction],
    search_text: Option<&str>,
) -> Markup {
    let nav_bar = nav_bar.into_html();
    let month_label = format!(
        "{} {}",
        month_name(monthly_summary.month.month),
        monthly_summary.month.year
    );

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center gap-6 px-2 lg:px-6 py-4 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            header class="flex justify-between items-end w-full"
            {
                h1 class="text-2xl font-bold" { "Dashboard" }
                span class="text-sm text-gray-600 dark:text-gray-400" { (month_label) }
            }

            (summary_cards_view(balance, monthly_summary))

            section class="w-full space-y-4"
            {
                div class="flex justify-between items-baseline flex-wrap gap-2"
                {
                    h3 class="text-xl font-semibold" { "Recent Transactions" }

                    a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "View all" }
                }

                form method="get" action=(endpoints::DASHBOARD_VIEW) role="search"
                {
                    label for="dashboard-search" class="sr-only" { "Search notes" }
                    input
                        type="search"
                        id="dashboard-search"
                        name="q"
                        placeholder="Search notes"
                        value=[search_text]
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                (recent_transactions_table(recent))
            }
        }
    );

    base("Dashboard", &[], &content)
}

fn recent_transactions_table(recent: &[&BalancedTransaction]) -> Markup {
    html! {
        div class="relative overflow-x-auto rounded bg-gray-50 dark:bg-gray-800"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Notes" }
                        th scope="col" class="px-6 py-4 text-right" { "Amount" }
                        th scope="col" class="px-6 py-4 text-right" { "Total" }
                    }
                }

                tbody
                {
                    @for balanced in recent {
                        (recent_transaction_row(balanced))
                    }

                    @if recent.is_empty() {
                        tr
                        {
                            td colspan="4" class="px-6 py-4 text-center" data-empty-search="true"
                            {
                                "No transactions match your search."
                            }
                        }
                    }
                }
            }
        }
    }
}

fn recent_transaction_row(balanced: &BalancedTransaction) -> Markup {
    let transaction = &balanced.transaction;
    let detail_url = format_endpoint(endpoints::TRANSACTION_VIEW, transaction.id);
    let amount = transaction.credit.saturating_sub(transaction.debit);

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE) { (format_date(transaction.date)) }
            td class=(TABLE_CELL_STYLE)
            {
                a href=(detail_url) class=(LINK_STYLE) { (transaction.notes) }
            }
            td class={ "px-6 py-4 text-right " (balance_class(amount)) }
            {
                (format_currency(amount))
            }
            td class="px-6 py-4 text-right font-semibold" data-total
            {
                (format_currency(balanced.total))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use scraper::{Html, Selector};
    use time::{Duration, OffsetDateTime};

    use crate::{
        db::initialize,
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
        transaction::{Transaction, create_transaction},
    };

    use super::{DashboardQuery, DashboardState, get_dashboard_page};

    fn get_test_state() -> DashboardState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        DashboardState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
            starting_balance: dec!(100),
        }
    }

    fn card_value(html: &Html, card: &str) -> String {
        let selector =
            Selector::parse(&format!("[data-dashboard-card='{card}'] [data-value]")).unwrap();
        html.select(&selector)
            .next()
            .unwrap_or_else(|| panic!("could not find card {card}"))
            .text()
            .collect::<String>()
            .trim()
            .to_owned()
    }

    fn card_trend(html: &Html, card: &str) -> String {
        let selector =
            Selector::parse(&format!("[data-dashboard-card='{card}'] [data-trend]")).unwrap();
        html.select(&selector)
            .next()
            .unwrap_or_else(|| panic!("could not find trend for card {card}"))
            .text()
            .collect::<String>()
            .trim()
            .to_owned()
    }

    #[tokio::test]
    async fn shows_empty_state_without_transactions() {
        let state = get_test_state();

        let response = get_dashboard_page(State(state), Query(DashboardQuery::default()))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let selector = Selector::parse("[data-empty-state]").unwrap();
        let empty_state = html
            .select(&selector)
            .next()
            .expect("could not find empty state");
        assert!(empty_state.text().collect::<String>().contains("$100.00"));
    }

    #[tokio::test]
    async fn shows_balance_and_current_month_totals() {
        let state = get_test_state();
        let today = OffsetDateTime::now_utc().date();
        {
            let conn = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(today, "Lunch").debit(dec!(12.5)),
                &conn,
            )
            .unwrap();
            create_transaction(
                Transaction::build(today, "Refund").credit(dec!(20)),
                &conn,
            )
            .unwrap();
            // Two months ago never falls in the current or previous month.
            create_transaction(
                Transaction::build(today - Duration::days(70), "Old").debit(dec!(50)),
                &conn,
            )
            .unwrap();
        }

        let response = get_dashboard_page(State(state), Query(DashboardQuery::default()))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(card_value(&html, "balance"), "$57.50");
        assert_eq!(card_value(&html, "debits"), "$12.50");
        assert_eq!(card_value(&html, "credits"), "$20.00");
        assert_eq!(card_value(&html, "net"), "$7.50");
        assert_eq!(card_trend(&html, "debits"), "+100.0% vs last month");
    }

    #[tokio::test]
    async fn search_narrows_recent_transactions() {
        let state = get_test_state();
        let today = OffsetDateTime::now_utc().date();
        {
            let conn = state.db_connection.lock().unwrap();
            create_transaction(Transaction::build(today, "Coffee").debit(dec!(4)), &conn).unwrap();
            create_transaction(Transaction::build(today, "Books").debit(dec!(30)), &conn).unwrap();
        }

        let response = get_dashboard_page(
            State(state),
            Query(DashboardQuery {
                q: Some("COFFEE".to_owned()),
            }),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        let row_selector = Selector::parse("tr[data-transaction-row]").unwrap();
        let rows: Vec<_> = html.select(&row_selector).collect();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].text().collect::<String>().contains("Coffee"));
        assert_eq!(card_value(&html, "balance"), "$66.00");
    }
}
