//! Property tests for the balance and statement folds.

use chrono::NaiveDate;
use defter_shared::types::EntryId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance::{BalanceSummary, signed_amount};
use super::statement::{StatementEntry, build_rows};
use super::types::{Direction, EntryKind};

/// Strategy for generating positive decimal amounts.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for generating directions.
fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Borc), Just(Direction::Alacak)]
}

/// Strategy for generating forward entry kinds.
fn forward_kind_strategy() -> impl Strategy<Value = EntryKind> {
    prop_oneof![
        Just(EntryKind::Sale),
        Just(EntryKind::Purchase),
        Just(EntryKind::Payment),
    ]
}

/// Strategy for generating (direction, amount) journal lines.
fn lines_strategy(max_len: usize) -> impl Strategy<Value = Vec<(Direction, Decimal)>> {
    prop::collection::vec((direction_strategy(), amount_strategy()), 1..=max_len)
}

fn statement_entry(kind: EntryKind, direction: Direction, amount: Decimal) -> StatementEntry {
    StatementEntry {
        id: EntryId::new(),
        entry_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        kind,
        direction,
        amount,
        sale_no: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// For any set of entries, `bakiye` equals the sum of borc amounts minus
    /// the sum of alacak amounts.
    #[test]
    fn prop_accounting_identity(lines in lines_strategy(30)) {
        let summary = BalanceSummary::from_entries(lines.iter().copied());

        let borc: Decimal = lines
            .iter()
            .filter(|(d, _)| *d == Direction::Borc)
            .map(|(_, a)| *a)
            .sum();
        let alacak: Decimal = lines
            .iter()
            .filter(|(d, _)| *d == Direction::Alacak)
            .map(|(_, a)| *a)
            .sum();

        prop_assert_eq!(summary.borc, borc);
        prop_assert_eq!(summary.alacak, alacak);
        prop_assert_eq!(summary.bakiye, borc - alacak);
    }

    /// For any entry, the pair {entry, compensating entry} contributes zero
    /// to the balance.
    #[test]
    fn prop_reversal_pair_nets_to_zero(
        direction in direction_strategy(),
        amount in amount_strategy(),
    ) {
        let net = signed_amount(direction, amount)
            + signed_amount(direction.opposite(), amount);
        prop_assert_eq!(net, Decimal::ZERO);
    }

    /// For any forward kind, its cancel kind posts the opposite natural
    /// direction with the same amount, so the pair nets to zero.
    #[test]
    fn prop_cancel_kind_nets_to_zero(
        kind in forward_kind_strategy(),
        amount in amount_strategy(),
    ) {
        let cancel = kind.reversal_kind().unwrap();
        let net = signed_amount(kind.natural_direction(), amount)
            + signed_amount(cancel.natural_direction(), amount);
        prop_assert_eq!(net, Decimal::ZERO);
    }

    /// The summary fold is order-independent.
    #[test]
    fn prop_fold_order_independent(lines in lines_strategy(20)) {
        let forward = BalanceSummary::from_entries(lines.iter().copied());
        let reversed = BalanceSummary::from_entries(lines.iter().rev().copied());

        prop_assert_eq!(forward, reversed);
    }

    /// The statement's final running bakiye always agrees with the balance
    /// calculator over the same entries: one fold, two call sites.
    #[test]
    fn prop_statement_agrees_with_balance(lines in lines_strategy(30)) {
        let summary = BalanceSummary::from_entries(lines.iter().copied());
        let entries = lines
            .iter()
            .map(|(d, a)| statement_entry(EntryKind::Payment, *d, *a))
            .collect();

        let rows = build_rows(entries);
        prop_assert_eq!(rows.last().unwrap().bakiye, summary.bakiye);
    }

    /// Each statement row's bakiye equals the previous row's bakiye plus the
    /// row's signed amount.
    #[test]
    fn prop_running_balance_chain(lines in lines_strategy(30)) {
        let entries = lines
            .iter()
            .map(|(d, a)| statement_entry(EntryKind::Payment, *d, *a))
            .collect();
        let rows = build_rows(entries);

        let mut previous = Decimal::ZERO;
        for row in &rows {
            prop_assert_eq!(row.bakiye, previous + signed_amount(row.direction, row.amount));
            previous = row.bakiye;
        }
    }

    /// Statement projection never drops or invents rows.
    #[test]
    fn prop_statement_preserves_row_count(lines in lines_strategy(30)) {
        let entries: Vec<_> = lines
            .iter()
            .map(|(d, a)| statement_entry(EntryKind::Payment, *d, *a))
            .collect();
        let expected = entries.len();

        prop_assert_eq!(build_rows(entries).len(), expected);
    }
}
