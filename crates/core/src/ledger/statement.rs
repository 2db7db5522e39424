//! Statement (ekstre) projection.
//!
//! A chronological view of an account's journal with a running bakiye per
//! row. The running fold is `signed_amount`, the same function the balance
//! calculator uses, so the last row of a statement always agrees with the
//! balance endpoint over the same range.

use chrono::NaiveDate;
use defter_shared::types::EntryId;
use rust_decimal::Decimal;
use serde::Serialize;

use super::balance::signed_amount;
use super::types::{Direction, EntryKind};

/// Journal facts a statement row is projected from.
///
/// Callers pass entries already filtered to scope and range and ordered by
/// `entry_date` ascending (creation order as tiebreak).
#[derive(Debug, Clone)]
pub struct StatementEntry {
    /// Entry ID.
    pub id: EntryId,
    /// Commercial date.
    pub entry_date: NaiveDate,
    /// Entry kind.
    pub kind: EntryKind,
    /// Posting direction.
    pub direction: Direction,
    /// Amount in home currency.
    pub amount: Decimal,
    /// Correlation id, if any.
    pub sale_no: Option<String>,
}

/// One row of an account statement.
#[derive(Debug, Clone, Serialize)]
pub struct StatementRow {
    /// Entry ID.
    pub id: EntryId,
    /// Commercial date.
    pub entry_date: NaiveDate,
    /// Entry kind.
    pub kind: EntryKind,
    /// Posting direction.
    pub direction: Direction,
    /// Amount in home currency.
    pub amount: Decimal,
    /// Running balance after this row.
    pub bakiye: Decimal,
    /// Human-readable description of the row.
    pub aciklama: &'static str,
    /// Correlation id, if any.
    pub sale_no: Option<String>,
}

/// Fixed description lookup for statement rows.
#[must_use]
pub const fn aciklama_for(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Sale => "Satis",
        EntryKind::SaleReturn => "Satis iadesi",
        EntryKind::SaleCancel => "Satis iptali",
        EntryKind::Purchase => "Alis",
        EntryKind::PurchaseCancel => "Alis iptali",
        EntryKind::Payment => "Tahsilat",
        EntryKind::PaymentCancel => "Tahsilat iptali",
    }
}

/// Projects ordered journal entries into statement rows with a running
/// bakiye.
#[must_use]
pub fn build_rows(entries: Vec<StatementEntry>) -> Vec<StatementRow> {
    let mut bakiye = Decimal::ZERO;
    entries
        .into_iter()
        .map(|entry| {
            bakiye += signed_amount(entry.direction, entry.amount);
            StatementRow {
                id: entry.id,
                entry_date: entry.entry_date,
                kind: entry.kind,
                direction: entry.direction,
                amount: entry.amount,
                bakiye,
                aciklama: aciklama_for(entry.kind),
                sale_no: entry.sale_no,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(
        date: (i32, u32, u32),
        kind: EntryKind,
        amount: Decimal,
        sale_no: Option<&str>,
    ) -> StatementEntry {
        StatementEntry {
            id: EntryId::new(),
            entry_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            kind,
            direction: kind.natural_direction(),
            amount,
            sale_no: sale_no.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_statement() {
        assert!(build_rows(vec![]).is_empty());
    }

    #[test]
    fn test_partial_payment_running_balance() {
        // Sale 1000 then payment 400 under one sale_no: -1000 then -600.
        let rows = build_rows(vec![
            entry((2026, 3, 1), EntryKind::Sale, dec!(1000), Some("S-1001")),
            entry((2026, 3, 1), EntryKind::Payment, dec!(400), Some("S-1001")),
        ]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].bakiye, dec!(-1000));
        assert_eq!(rows[1].bakiye, dec!(-600));
    }

    #[test]
    fn test_aciklama_lookup() {
        let rows = build_rows(vec![
            entry((2026, 3, 1), EntryKind::Sale, dec!(100), None),
            entry((2026, 3, 2), EntryKind::SaleReturn, dec!(40), None),
            entry((2026, 3, 3), EntryKind::Payment, dec!(60), None),
        ]);

        assert_eq!(rows[0].aciklama, "Satis");
        assert_eq!(rows[1].aciklama, "Satis iadesi");
        assert_eq!(rows[2].aciklama, "Tahsilat");
    }

    #[test]
    fn test_last_row_matches_balance_fold() {
        use super::super::balance::BalanceSummary;

        let entries = vec![
            entry((2026, 1, 5), EntryKind::Sale, dec!(250), Some("S-1")),
            entry((2026, 1, 9), EntryKind::Purchase, dec!(80), None),
            entry((2026, 1, 12), EntryKind::Payment, dec!(100), Some("S-1")),
        ];
        let summary =
            BalanceSummary::from_entries(entries.iter().map(|e| (e.direction, e.amount)));
        let rows = build_rows(entries);

        assert_eq!(rows.last().unwrap().bakiye, summary.bakiye);
    }
}
