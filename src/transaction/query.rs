//! Query parameters of the transactions page and the filtering and sorting
//! they select.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::ledger::BalancedTransaction;

/// The column the transactions table is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    #[default]
    Date,
    Notes,
    Debit,
    Credit,
    Total,
}

impl SortColumn {
    pub const ALL: [SortColumn; 5] = [
        SortColumn::Date,
        SortColumn::Notes,
        SortColumn::Debit,
        SortColumn::Credit,
        SortColumn::Total,
    ];

    pub fn as_query_value(self) -> &'static str {
        match self {
            SortColumn::Date => "date",
            SortColumn::Notes => "notes",
            SortColumn::Debit => "debit",
            SortColumn::Credit => "credit",
            SortColumn::Total => "total",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortColumn::Date => "Date",
            SortColumn::Notes => "Notes",
            SortColumn::Debit => "Debit",
            SortColumn::Credit => "Credit",
            SortColumn::Total => "Total",
        }
    }

    fn compare(self, a: &BalancedTransaction, b: &BalancedTransaction) -> Ordering {
        match self {
            SortColumn::Date => a.transaction.date.cmp(&b.transaction.date),
            SortColumn::Notes => a
                .transaction
                .notes
                .to_lowercase()
                .cmp(&b.transaction.notes.to_lowercase()),
            SortColumn::Debit => a.transaction.debit.cmp(&b.transaction.debit),
            SortColumn::Credit => a.transaction.credit.cmp(&b.transaction.credit),
            SortColumn::Total => a.total.cmp(&b.total),
        }
    }
}

/// The direction of a sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    pub fn as_query_value(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// The query parameters accepted by the transactions page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionsQuery {
    /// Only show transactions whose notes contain this text, ignoring case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default)]
    pub sort: SortColumn,
    #[serde(default)]
    pub order: SortOrder,
    /// The 1-based page number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    /// The number of rows per page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
}

impl TransactionsQuery {
    /// The search text with surrounding whitespace removed, `None` when blank.
    pub fn search_text(&self) -> Option<&str> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// Encode the query as a URL for `route`.
    pub fn to_url(&self, route: &str) -> String {
        match serde_urlencoded::to_string(self) {
            Ok(query) if !query.is_empty() => format!("{route}?{query}"),
            _ => route.to_owned(),
        }
    }

    /// The same query showing `page`.
    pub fn with_page(&self, page: u64) -> Self {
        Self {
            page: Some(page),
            ..self.clone()
        }
    }

    /// The query for a click on the header of `column`.
    ///
    /// Clicking the column the table is already sorted by flips the order,
    /// clicking another column sorts it descending. Either way the table
    /// returns to the first page.
    pub fn toggle_sort(&self, column: SortColumn) -> Self {
        let order = if self.sort == column {
            self.order.reverse()
        } else {
            SortOrder::Descending
        };

        Self {
            sort: column,
            order,
            page: None,
            ..self.clone()
        }
    }
}

/// Whether the notes of `balanced` contain `search_text`, ignoring case.
pub fn matches_search(balanced: &BalancedTransaction, search_text: &str) -> bool {
    balanced
        .transaction
        .notes
        .to_lowercase()
        .contains(&search_text.to_lowercase())
}

/// Keep the transactions matching the search text of `query`, if any.
pub fn filter_transactions(
    ledger: Vec<BalancedTransaction>,
    query: &TransactionsQuery,
) -> Vec<BalancedTransaction> {
    match query.search_text() {
        Some(search_text) => ledger
            .into_iter()
            .filter(|balanced| matches_search(balanced, search_text))
            .collect(),
        None => ledger,
    }
}

/// Sort `rows` by `column` in `order`.
///
/// `rows` must be in chronological order, as returned by
/// [crate::ledger::compute_balances]. Rows with equal keys keep their
/// chronological order, reversed when sorting descending.
pub fn sort_transactions(rows: &mut [BalancedTransaction], column: SortColumn, order: SortOrder) {
    rows.sort_by(|a, b| column.compare(a, b));

    if order == SortOrder::Descending {
        rows.reverse();
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::{Date, OffsetDateTime, macros::date};

    use crate::{
        ledger::{BalancedTransaction, compute_balances},
        transaction::Transaction,
    };

    use super::{
        SortColumn, SortOrder, TransactionsQuery, filter_transactions, sort_transactions,
    };

    fn transaction(id: i64, date: Date, notes: &str, debit: Decimal) -> Transaction {
        Transaction {
            id,
            date,
            notes: notes.to_owned(),
            debit,
            credit: Decimal::ZERO,
            category: None,
            payment_method: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn ledger() -> Vec<BalancedTransaction> {
        compute_balances(
            vec![
                transaction(1, date!(2025 - 01 - 01), "Rent", dec!(800)),
                transaction(2, date!(2025 - 01 - 02), "groceries", dec!(50)),
                transaction(3, date!(2025 - 01 - 02), "Coffee", dec!(4)),
                transaction(4, date!(2025 - 01 - 03), "More Groceries", dec!(20)),
            ],
            dec!(1000),
        )
    }

    fn ids(rows: &[BalancedTransaction]) -> Vec<i64> {
        rows.iter().map(|row| row.transaction.id).collect()
    }

    #[test]
    fn search_is_case_insensitive() {
        let query = TransactionsQuery {
            q: Some(" GROCERIES ".to_owned()),
            ..Default::default()
        };

        let rows = filter_transactions(ledger(), &query);

        assert_eq!(ids(&rows), vec![2, 4]);
    }

    #[test]
    fn filtering_keeps_running_totals_of_full_ledger() {
        let query = TransactionsQuery {
            q: Some("coffee".to_owned()),
            ..Default::default()
        };

        let rows = filter_transactions(ledger(), &query);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total, dec!(146));
    }

    #[test]
    fn blank_search_keeps_everything() {
        let query = TransactionsQuery {
            q: Some("   ".to_owned()),
            ..Default::default()
        };

        assert_eq!(filter_transactions(ledger(), &query).len(), 4);
    }

    #[test]
    fn default_sort_is_newest_first() {
        let mut rows = ledger();

        sort_transactions(&mut rows, SortColumn::default(), SortOrder::default());

        assert_eq!(ids(&rows), vec![4, 3, 2, 1]);
    }

    #[test]
    fn equal_keys_keep_chronological_order() {
        let mut rows = ledger();

        sort_transactions(&mut rows, SortColumn::Date, SortOrder::Ascending);

        assert_eq!(ids(&rows), vec![1, 2, 3, 4]);
    }

    #[test]
    fn sorts_by_each_column() {
        let cases = [
            (SortColumn::Notes, SortOrder::Ascending, vec![3, 2, 4, 1]),
            (SortColumn::Debit, SortOrder::Descending, vec![1, 2, 4, 3]),
            (SortColumn::Total, SortOrder::Ascending, vec![4, 3, 2, 1]),
        ];

        for (column, order, want) in cases {
            let mut rows = ledger();

            sort_transactions(&mut rows, column, order);

            assert_eq!(ids(&rows), want, "sorting by {column:?} {order:?}");
        }
    }

    #[test]
    fn query_round_trips_through_url() {
        let query = TransactionsQuery {
            q: Some("rent & bills".to_owned()),
            sort: SortColumn::Total,
            order: SortOrder::Ascending,
            page: Some(3),
            per_page: None,
        };

        let url = query.to_url("/transactions");

        assert_eq!(
            url,
            "/transactions?q=rent+%26+bills&sort=total&order=ascending&page=3"
        );
    }

    #[test]
    fn toggling_sort_flips_order_and_resets_page() {
        let query = TransactionsQuery {
            page: Some(4),
            ..Default::default()
        };

        let same_column = query.toggle_sort(SortColumn::Date);
        let other_column = query.toggle_sort(SortColumn::Notes);

        assert_eq!(same_column.order, SortOrder::Ascending);
        assert_eq!(same_column.page, None);
        assert_eq!(other_column.sort, SortColumn::Notes);
        assert_eq!(other_column.order, SortOrder::Descending);
    }
}
