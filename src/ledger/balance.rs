//! The running balance calculation.
//!
//! Balances are never stored. Any insert, update or delete can change the
//! balance of every later transaction, so the whole ledger is recomputed from
//! the starting balance on each read.

use rust_decimal::Decimal;

use crate::transaction::Transaction;

/// The balance assumed to exist before the earliest transaction.
pub const DEFAULT_STARTING_BALANCE: Decimal = Decimal::ONE_THOUSAND;

/// A transaction annotated with the account balance immediately after it.
#[derive(Debug, Clone, PartialEq)]
pub struct BalancedTransaction {
    /// The transaction as read from the database.
    pub transaction: Transaction,
    /// The running balance after applying this transaction and every
    /// transaction before it in chronological order.
    pub total: Decimal,
}

/// Annotate `transactions` with their running balances.
///
/// Transactions are applied in chronological order: by date, then by ID for
/// transactions on the same date. Each one subtracts its debit from and adds
/// its credit to the running balance, which starts at `starting_balance`.
/// Both sides are applied, even if a transaction has a debit and a credit.
///
/// The returned list is in chronological order. Callers may reorder it for
/// display, the totals stay valid.
pub fn compute_balances(
    mut transactions: Vec<Transaction>,
    starting_balance: Decimal,
) -> Vec<BalancedTransaction> {
    transactions.sort_by_key(|transaction| (transaction.date, transaction.id));

    let mut running_balance = starting_balance;

    transactions
        .into_iter()
        .map(|transaction| {
            running_balance = running_balance
                .saturating_sub(transaction.debit)
                .saturating_add(transaction.credit);

            BalancedTransaction {
                transaction,
                total: running_balance,
            }
        })
        .collect()
}

/// The current account balance.
///
/// `ledger` must be in chronological order, as returned by
/// [compute_balances]. An empty ledger has the starting balance.
pub fn current_balance(ledger: &[BalancedTransaction], starting_balance: Decimal) -> Decimal {
    ledger
        .last()
        .map(|balanced| balanced.total)
        .unwrap_or(starting_balance)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::{Date, OffsetDateTime, macros::date};

    use crate::{ledger::parse_amount, transaction::Transaction};

    use super::{DEFAULT_STARTING_BALANCE, compute_balances, current_balance};

    fn transaction(id: i64, date: Date, debit: Decimal, credit: Decimal) -> Transaction {
        Transaction {
            id,
            date,
            notes: format!("transaction {id}"),
            debit,
            credit,
            category: None,
            payment_method: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn three_transactions() -> Vec<Transaction> {
        vec![
            transaction(1, date!(2025 - 01 - 01), dec!(100), dec!(0)),
            transaction(2, date!(2025 - 01 - 02), dec!(0), dec!(50)),
            transaction(3, date!(2025 - 01 - 03), dec!(30), dec!(0)),
        ]
    }

    fn totals_by_id(transactions: Vec<Transaction>) -> Vec<(i64, Decimal)> {
        let mut totals: Vec<_> = compute_balances(transactions, DEFAULT_STARTING_BALANCE)
            .into_iter()
            .map(|balanced| (balanced.transaction.id, balanced.total))
            .collect();
        totals.sort_by_key(|(id, _)| *id);
        totals
    }

    #[test]
    fn empty_ledger_gives_empty_result() {
        for starting_balance in [Decimal::ZERO, dec!(1000), dec!(-42.5)] {
            assert!(compute_balances(Vec::new(), starting_balance).is_empty());
        }
    }

    #[test]
    fn accumulates_in_chronological_order() {
        let totals: Vec<_> = compute_balances(three_transactions(), dec!(1000))
            .into_iter()
            .map(|balanced| balanced.total)
            .collect();

        assert_eq!(totals, vec![dec!(900), dec!(950), dec!(920)]);
    }

    #[test]
    fn default_starting_balance_is_one_thousand() {
        assert_eq!(DEFAULT_STARTING_BALANCE, dec!(1000));
    }

    #[test]
    fn input_order_does_not_change_totals() {
        let want = totals_by_id(three_transactions());
        let permutations = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];

        for permutation in permutations {
            let original = three_transactions();
            let shuffled = permutation.iter().map(|&i| original[i].clone()).collect();

            assert_eq!(
                totals_by_id(shuffled),
                want,
                "totals differ for input order {permutation:?}"
            );
        }
    }

    #[test]
    fn equal_dates_are_ordered_by_id() {
        let same_day = date!(2025 - 03 - 10);
        let transactions = vec![
            transaction(7, same_day, dec!(10), dec!(0)),
            transaction(3, same_day, dec!(0), dec!(25)),
        ];

        let got: Vec<_> = compute_balances(transactions, dec!(100))
            .into_iter()
            .map(|balanced| (balanced.transaction.id, balanced.total))
            .collect();

        assert_eq!(got, vec![(3, dec!(125)), (7, dec!(115))]);
    }

    #[test]
    fn inserting_earlier_transaction_shifts_every_later_total() {
        let before = totals_by_id(three_transactions());
        let mut ledger = three_transactions();
        let earlier = transaction(4, date!(2024 - 12 - 31), dec!(12.34), dec!(2));
        let net_effect = earlier.credit - earlier.debit;
        ledger.push(earlier);

        let after = totals_by_id(ledger);

        assert_eq!(after.len(), 4);
        assert_eq!(after[3], (4, dec!(1000) + net_effect));
        for ((id, old_total), (new_id, new_total)) in before.iter().zip(&after) {
            assert_eq!(id, new_id);
            assert_eq!(*new_total, *old_total + net_effect);
        }
    }

    #[test]
    fn updating_a_transaction_changes_later_totals_only() {
        let mut ledger = three_transactions();
        ledger[1].credit = dec!(80);

        let totals = totals_by_id(ledger);

        assert_eq!(
            totals,
            vec![(1, dec!(900)), (2, dec!(980)), (3, dec!(950))]
        );
    }

    #[test]
    fn deleting_a_transaction_changes_later_totals() {
        let mut ledger = three_transactions();
        ledger.remove(0);

        let totals = totals_by_id(ledger);

        assert_eq!(totals, vec![(2, dec!(1050)), (3, dec!(1020))]);
    }

    #[test]
    fn debit_and_credit_are_both_applied() {
        let ledger = vec![transaction(1, date!(2025 - 01 - 01), dec!(40), dec!(15))];

        let balanced = compute_balances(ledger, dec!(100));

        assert_eq!(balanced[0].total, dec!(75));
    }

    #[test]
    fn malformed_amount_counts_as_zero() {
        let ledger = vec![
            transaction(1, date!(2025 - 01 - 01), parse_amount("abc"), dec!(0)),
            transaction(2, date!(2025 - 01 - 02), dec!(10), parse_amount("")),
        ];

        let totals: Vec<_> = compute_balances(ledger, dec!(1000))
            .into_iter()
            .map(|balanced| balanced.total)
            .collect();

        assert_eq!(totals, vec![dec!(1000), dec!(990)]);
    }

    #[test]
    fn recomputing_is_idempotent() {
        let first = compute_balances(three_transactions(), dec!(1000));
        let second = compute_balances(three_transactions(), dec!(1000));

        assert_eq!(first, second);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.total.serialize(), b.total.serialize());
        }
    }

    #[test]
    fn current_balance_is_last_total_or_starting_balance() {
        let ledger = compute_balances(three_transactions(), dec!(1000));

        assert_eq!(current_balance(&ledger, dec!(1000)), dec!(920));
        assert_eq!(current_balance(&[], dec!(1000)), dec!(1000));
    }

    #[test]
    fn decimal_amounts_do_not_drift() {
        let ledger = (1..=10)
            .map(|id| transaction(id, date!(2025 - 01 - 01), dec!(0.1), dec!(0)))
            .collect();

        let balanced = compute_balances(ledger, dec!(1));

        assert_eq!(balanced.last().map(|b| b.total), Some(dec!(0)));
    }
}
