//! HTML rendering for the transactions page.

use axum::http::Uri;
use maud::{Markup, html};
use rust_decimal::Decimal;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    endpoints::{self, format_endpoint},
    html::{
        BADGE_STYLE, CARD_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, edit_delete_action_links,
        format_currency,
    },
    ledger::{BalancedTransaction, PeriodTotals},
    navigation::NavBar,
    pagination::{Page, pagination_view},
};

use super::query::{SortColumn, SortOrder, TransactionsQuery};

/// The max number of graphemes to display in the transaction table rows before
/// truncating and displaying ellipses.
const MAX_NOTES_GRAPHEMES: usize = 32;

/// Dates as they are shown to people, e.g. "07/03/2025".
pub(crate) const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[day padding:zero]/[month repr:numerical padding:zero]/[year]");

const HTML_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month repr:numerical padding:zero]-[day padding:zero]");

pub(crate) fn format_date(date: Date) -> String {
    date.format(DISPLAY_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

pub(crate) fn date_datetime_attr(date: Date) -> String {
    date.format(HTML_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

pub(crate) fn balance_class(amount: Decimal) -> &'static str {
    if amount.is_sign_negative() && !amount.is_zero() {
        "text-red-700 dark:text-red-300"
    } else {
        "text-green-700 dark:text-green-300"
    }
}

/// The figures shown in the cards above the transactions table.
///
/// These describe the whole ledger and ignore the search text.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LedgerSummary {
    pub balance: Decimal,
    pub totals: PeriodTotals,
    pub transaction_count: usize,
}

/// Everything the transactions page displays.
pub(crate) struct TransactionsPage<'a> {
    /// The rows on the current page, already filtered and sorted.
    pub rows: &'a [BalancedTransaction],
    pub page: Page,
    pub max_pages: u64,
    pub query: &'a TransactionsQuery,
    pub summary: LedgerSummary,
}

pub(crate) fn transactions_view(page_data: TransactionsPage<'_>) -> Markup {
    let create_transaction_route = Uri::from_static(endpoints::NEW_TRANSACTION_VIEW);
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let query = page_data.query;
    let current_url = query.to_url(endpoints::TRANSACTIONS_VIEW);
    let export_url = TransactionsQuery {
        q: query.search_text().map(str::to_owned),
        ..Default::default()
    }
    .to_url(endpoints::EXPORT_CSV);
    let pagination = pagination_view(&page_data.page, page_data.max_pages, |number| {
        query.with_page(number).to_url(endpoints::TRANSACTIONS_VIEW)
    });

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl" id="transactions-content"
            {
                header class="flex justify-between flex-wrap items-end gap-2"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(export_url) class=(LINK_STYLE) download
                    {
                        "Export CSV"
                    }

                    a href=(create_transaction_route) class=(LINK_STYLE)
                    {
                        "Create Transaction"
                    }
                }

                (summary_cards_view(&page_data.summary))

                (search_form_view(query))

                div class="relative overflow-x-auto rounded bg-gray-50 dark:bg-gray-800"
                {
                    table class="w-full my-2 text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                (sort_header_view(query, SortColumn::Date, false))
                                (sort_header_view(query, SortColumn::Notes, false))
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Payment Method" }
                                (sort_header_view(query, SortColumn::Debit, true))
                                (sort_header_view(query, SortColumn::Credit, true))
                                (sort_header_view(query, SortColumn::Total, true))
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for row in page_data.rows {
                                (transaction_row_view(row, &current_url))
                            }

                            @if page_data.rows.is_empty() {
                                tr
                                {
                                    td
                                        colspan="8"
                                        data-empty-state="true"
                                        class="px-6 py-4 text-center"
                                    {
                                        @if query.search_text().is_some() {
                                            "No transactions match your search."
                                        } @else {
                                            "No transactions yet. "
                                            a href=(create_transaction_route) class=(LINK_STYLE)
                                            {
                                                "Create one"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                (pagination)
            }
        }
    };

    base("Transactions", &[], &content)
}

fn summary_cards_view(summary: &LedgerSummary) -> Markup {
    let count = summary.transaction_count.to_string();
    let cards = [
        ("balance", "Current Balance", format_currency(summary.balance)),
        ("debits", "Total Debits", format_currency(summary.totals.debit)),
        ("credits", "Total Credits", format_currency(summary.totals.credit)),
        ("count", "Transactions", count),
    ];

    html! {
        div class="grid grid-cols-2 lg:grid-cols-4 gap-4"
        {
            @for (name, label, value) in cards {
                div class=(CARD_STYLE) data-summary-card=(name)
                {
                    span class="text-sm text-gray-600 dark:text-gray-400" { (label) }
                    span
                        class={
                            "text-lg font-semibold "
                            (if name == "balance" { balance_class(summary.balance) } else { "" })
                        }
                    {
                        (value)
                    }
                }
            }
        }
    }
}

fn search_form_view(query: &TransactionsQuery) -> Markup {
    html! {
        form
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            role="search"
            class="flex gap-2"
        {
            input type="hidden" name="sort" value=(query.sort.as_query_value());
            input type="hidden" name="order" value=(query.order.as_query_value());

            label for="search" class="sr-only" { "Search notes" }
            input
                type="search"
                id="search"
                name="q"
                placeholder="Search notes"
                value=[query.search_text()]
                class=(FORM_TEXT_INPUT_STYLE);

            button type="submit" class="px-4 py-2 bg-blue-500 hover:bg-blue-600 text-white rounded"
            {
                "Search"
            }
        }
    }
}

fn sort_header_view(query: &TransactionsQuery, column: SortColumn, align_right: bool) -> Markup {
    let is_active = query.sort == column;
    let sort_url = query
        .toggle_sort(column)
        .to_url(endpoints::TRANSACTIONS_VIEW);
    let aria_sort = match (is_active, query.order) {
        (false, _) => "none",
        (true, SortOrder::Ascending) => "ascending",
        (true, SortOrder::Descending) => "descending",
    };
    let arrow = match (is_active, query.order) {
        (false, _) => "",
        (true, SortOrder::Ascending) => " ▲",
        (true, SortOrder::Descending) => " ▼",
    };

    html! {
        th
            scope="col"
            aria-sort=(aria_sort)
            class={ (TABLE_CELL_STYLE) (if align_right { " text-right" } else { "" }) }
        {
            a href=(sort_url) data-sort-column=(column.as_query_value()) class="hover:underline"
            {
                (column.label()) (arrow)
            }
        }
    }
}

fn transaction_row_view(row: &BalancedTransaction, redirect_url: &str) -> Markup {
    let transaction = &row.transaction;
    let (notes, tooltip) = format_notes(&transaction.notes);
    let detail_url = format_endpoint(endpoints::TRANSACTION_VIEW, transaction.id);
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_url = with_redirect_url(
        &format_endpoint(endpoints::TRANSACTION, transaction.id),
        redirect_url,
    );
    let confirm_message = format!(
        "Are you sure you want to delete the transaction '{}'? This cannot be undone.",
        transaction.notes
    );

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(date_datetime_attr(transaction.date)) { (format_date(transaction.date)) }
            }
            td class=(TABLE_CELL_STYLE) title=[tooltip]
            {
                a href=(detail_url) class=(LINK_STYLE) { (notes) }
            }
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(category) = &transaction.category {
                    span class=(BADGE_STYLE) { (category) }
                } @else {
                    span class="text-gray-400 dark:text-gray-500" { "-" }
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                (transaction.payment_method.as_deref().unwrap_or("-"))
            }
            td class="px-6 py-4 text-right text-red-700 dark:text-red-300" data-debit
            {
                @if !transaction.debit.is_zero() { (format_currency(transaction.debit)) }
            }
            td class="px-6 py-4 text-right text-green-700 dark:text-green-300" data-credit
            {
                @if !transaction.credit.is_zero() { (format_currency(transaction.credit)) }
            }
            td class={ "px-6 py-4 text-right font-semibold " (balance_class(row.total)) } data-total
            {
                (format_currency(row.total))
            }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    (edit_delete_action_links(
                        &edit_url,
                        &delete_url,
                        &confirm_message,
                        "closest tr",
                        "outerHTML",
                    ))
                }
            }
        }
    }
}

/// Append `redirect_url` to `url` as the `redirect_url` query parameter.
pub(crate) fn with_redirect_url(url: &str, redirect_url: &str) -> String {
    match serde_urlencoded::to_string([("redirect_url", redirect_url)]) {
        Ok(query) => format!("{url}?{query}"),
        Err(error) => {
            tracing::warn!("could not encode redirect URL {redirect_url}: {error}");
            url.to_owned()
        }
    }
}

fn format_notes(notes: &str) -> (String, Option<&str>) {
    let notes_length = notes.graphemes(true).count();

    if notes_length <= MAX_NOTES_GRAPHEMES {
        (notes.to_owned(), None)
    } else {
        let truncated: String = notes
            .graphemes(true)
            .take(MAX_NOTES_GRAPHEMES - 3)
            .collect();
        (truncated + "...", Some(notes))
    }
}
