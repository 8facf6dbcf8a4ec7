//! Card components for the dashboard summary.
//!
//! Provides cards showing:
//! - The current balance
//! - This month's debits and credits with the change from last month
//! - This month's net (credits minus debits)

use maud::{Markup, html};
use rust_decimal::{Decimal, RoundingStrategy};
use time::Month;

use crate::{
    html::{CARD_STYLE, format_currency},
    ledger::MonthlySummary,
    transaction::balance_class,
};

/// Whether an increase in a figure is good or bad news.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrendMeaning {
    /// More money coming in.
    HigherIsBetter,
    /// More money going out.
    LowerIsBetter,
}

/// Formats a trend percentage with a sign and one decimal place, e.g. "+12.5%".
///
/// Avoids displaying "-0.0%".
pub(super) fn format_trend(trend: Decimal) -> String {
    let rounded = trend.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);

    if rounded.is_zero() {
        "0.0%".to_owned()
    } else if rounded.is_sign_negative() {
        format!("{rounded:.1}%")
    } else {
        format!("+{rounded:.1}%")
    }
}

fn trend_class(trend: Decimal, meaning: TrendMeaning) -> &'static str {
    let is_up = trend.is_sign_positive() && !trend.is_zero();

    if trend.is_zero() {
        "text-gray-600 dark:text-gray-400"
    } else if is_up == (meaning == TrendMeaning::HigherIsBetter) {
        "text-green-600 dark:text-green-400"
    } else {
        "text-red-600 dark:text-red-400"
    }
}

pub(super) fn month_name(month: Month) -> &'static str {
    match month {
        Month::January => "January",
        Month::February => "February",
        Month::March => "March",
        Month::April => "April",
        Month::May => "May",
        Month::June => "June",
        Month::July => "July",
        Month::August => "August",
        Month::September => "September",
        Month::October => "October",
        Month::November => "November",
        Month::December => "December",
    }
}

/// Renders the grid of summary cards.
pub(super) fn summary_cards_view(balance: Decimal, summary: &MonthlySummary) -> Markup {
    let net = summary.current.net();

    html! {
        section class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4 w-full"
        {
            div class=(CARD_STYLE) data-dashboard-card="balance"
            {
                h3 class="text-sm text-gray-600 dark:text-gray-400" { "Current Balance" }
                span class={ "text-2xl font-bold " (balance_class(balance)) } data-value
                {
                    (format_currency(balance))
                }
            }

            (trend_card(
                "debits",
                "Debits This Month",
                summary.current.debit,
                summary.debit_trend(),
                TrendMeaning::LowerIsBetter,
            ))

            (trend_card(
                "credits",
                "Credits This Month",
                summary.current.credit,
                summary.credit_trend(),
                TrendMeaning::HigherIsBetter,
            ))

            div class=(CARD_STYLE) data-dashboard-card="net"
            {
                h3 class="text-sm text-gray-600 dark:text-gray-400" { "Net This Month" }
                span class={ "text-2xl font-bold " (balance_class(net)) } data-value
                {
                    (format_currency(net))
                }
            }
        }
    }
}

fn trend_card(
    name: &str,
    title: &str,
    amount: Decimal,
    trend: Decimal,
    meaning: TrendMeaning,
) -> Markup {
    html! {
        div class=(CARD_STYLE) data-dashboard-card=(name)
        {
            h3 class="text-sm text-gray-600 dark:text-gray-400" { (title) }
            span class="text-2xl font-bold" data-value { (format_currency(amount)) }
            span class={ "text-sm " (trend_class(trend, meaning)) } data-trend
            {
                (format_trend(trend)) " vs last month"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::{TrendMeaning, format_trend, trend_class};

    #[test]
    fn trend_has_sign_and_one_decimal() {
        assert_eq!(format_trend(dec!(100)), "+100.0%");
        assert_eq!(format_trend(dec!(-12.345)), "-12.3%");
        assert_eq!(format_trend(dec!(0.04)), "0.0%");
        assert_eq!(format_trend(dec!(-0.04)), "0.0%");
    }

    #[test]
    fn spending_more_is_red() {
        assert!(trend_class(dec!(10), TrendMeaning::LowerIsBetter).contains("red"));
        assert!(trend_class(dec!(-10), TrendMeaning::LowerIsBetter).contains("green"));
        assert!(trend_class(dec!(10), TrendMeaning::HigherIsBetter).contains("green"));
    }
}
