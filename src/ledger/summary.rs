//! Aggregates over the ledger used by the summary cards.

use rust_decimal::Decimal;
use time::{Date, Month};

use crate::transaction::Transaction;

/// The sum of debits and credits over a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PeriodTotals {
    /// Total money out.
    pub debit: Decimal,
    /// Total money in.
    pub credit: Decimal,
}

impl PeriodTotals {
    /// Sum the debits and credits of `transactions`.
    pub fn of<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        transactions
            .into_iter()
            .fold(Self::default(), |totals, transaction| Self {
                debit: totals.debit.saturating_add(transaction.debit),
                credit: totals.credit.saturating_add(transaction.credit),
            })
    }

    /// Credits minus debits.
    pub fn net(&self) -> Decimal {
        self.credit.saturating_sub(self.debit)
    }
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    pub year: i32,
    pub month: Month,
}

impl YearMonth {
    /// The month that `date` falls in.
    pub fn of(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month before this one.
    pub fn previous(self) -> Self {
        match self.month {
            Month::January => Self {
                year: self.year - 1,
                month: Month::December,
            },
            month => Self {
                year: self.year,
                month: month.previous(),
            },
        }
    }

    /// Whether `date` falls in this month.
    pub fn contains(self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

/// Percentage change from `previous` to `current`.
///
/// When `previous` is zero the change is defined as 100%, whatever `current` is.
pub fn trend_percentage(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        return Decimal::ONE_HUNDRED;
    }

    let change = current.saturating_sub(previous);

    change
        .checked_div(previous)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or_else(|| {
            if change.is_sign_negative() != previous.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            }
        })
}

/// Debit and credit totals for a month compared with the month before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlySummary {
    pub month: YearMonth,
    pub current: PeriodTotals,
    pub previous: PeriodTotals,
}

impl MonthlySummary {
    /// Summarise `transactions` for `month` and the month before it.
    pub fn new(transactions: &[Transaction], month: YearMonth) -> Self {
        let previous_month = month.previous();

        Self {
            month,
            current: PeriodTotals::of(
                transactions
                    .iter()
                    .filter(|transaction| month.contains(transaction.date)),
            ),
            previous: PeriodTotals::of(
                transactions
                    .iter()
                    .filter(|transaction| previous_month.contains(transaction.date)),
            ),
        }
    }

    /// Percentage change in spending against the previous month.
    pub fn debit_trend(&self) -> Decimal {
        trend_percentage(self.current.debit, self.previous.debit)
    }

    /// Percentage change in income against the previous month.
    pub fn credit_trend(&self) -> Decimal {
        trend_percentage(self.current.credit, self.previous.credit)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::{Date, Month, OffsetDateTime, macros::date};

    use crate::transaction::Transaction;

    use super::{MonthlySummary, PeriodTotals, YearMonth, trend_percentage};

    fn transaction(date: Date, debit: Decimal, credit: Decimal) -> Transaction {
        Transaction {
            id: 0,
            date,
            notes: "test".to_owned(),
            debit,
            credit,
            category: None,
            payment_method: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn trend_is_one_hundred_when_previous_is_zero() {
        assert_eq!(trend_percentage(dec!(250), Decimal::ZERO), dec!(100));
        assert_eq!(trend_percentage(Decimal::ZERO, Decimal::ZERO), dec!(100));
    }

    #[test]
    fn trend_is_relative_change() {
        assert_eq!(trend_percentage(dec!(150), dec!(100)), dec!(50));
        assert_eq!(trend_percentage(dec!(75), dec!(100)), dec!(-25));
        assert_eq!(trend_percentage(dec!(100), dec!(100)), dec!(0));
    }

    #[test]
    fn period_totals_sum_both_sides() {
        let transactions = [
            transaction(date!(2025 - 01 - 01), dec!(10.10), dec!(0)),
            transaction(date!(2025 - 01 - 02), dec!(0), dec!(20.20)),
            transaction(date!(2025 - 01 - 03), dec!(5), dec!(1)),
        ];

        let totals = PeriodTotals::of(&transactions);

        assert_eq!(totals.debit, dec!(15.10));
        assert_eq!(totals.credit, dec!(21.20));
        assert_eq!(totals.net(), dec!(6.10));
    }

    #[test]
    fn previous_month_wraps_year() {
        let january = YearMonth {
            year: 2025,
            month: Month::January,
        };

        assert_eq!(
            january.previous(),
            YearMonth {
                year: 2024,
                month: Month::December
            }
        );
    }

    #[test]
    fn monthly_summary_filters_by_month() {
        let transactions = [
            transaction(date!(2025 - 02 - 28), dec!(40), dec!(0)),
            transaction(date!(2025 - 03 - 01), dec!(60), dec!(0)),
            transaction(date!(2025 - 03 - 15), dec!(0), dec!(500)),
            transaction(date!(2024 - 03 - 15), dec!(999), dec!(999)),
        ];

        let summary = MonthlySummary::new(&transactions, YearMonth::of(date!(2025 - 03 - 20)));

        assert_eq!(summary.current.debit, dec!(60));
        assert_eq!(summary.current.credit, dec!(500));
        assert_eq!(summary.previous.debit, dec!(40));
        assert_eq!(summary.previous.credit, dec!(0));
        assert_eq!(summary.debit_trend(), dec!(50));
        assert_eq!(summary.credit_trend(), dec!(100));
    }
}
