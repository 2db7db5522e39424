//! Input validation and legacy field normalization.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{EntryKind, PostEntryInput};

/// Normalizes the legacy amount aliases to a single amount.
///
/// Old records carried the amount under `total` or `totalTRY` instead of
/// `amount`. The aliases are translated exactly once, here at the boundary;
/// nothing downstream ever branches on them. Priority: `amount`, then
/// `total`, then `total_try`.
///
/// # Errors
///
/// - `MissingAmount` when no alias is present.
/// - `AmountNotPositive` when the resolved amount is zero or negative.
pub fn normalize_amount(
    amount: Option<Decimal>,
    total: Option<Decimal>,
    total_try: Option<Decimal>,
) -> Result<Decimal, LedgerError> {
    let resolved = amount
        .or(total)
        .or(total_try)
        .ok_or(LedgerError::MissingAmount)?;
    if resolved <= Decimal::ZERO {
        return Err(LedgerError::AmountNotPositive);
    }
    Ok(resolved)
}

/// Validates an optional date range.
///
/// # Errors
///
/// Returns `InvalidDateRange` when both bounds are set and start is after end.
pub fn validate_date_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<(), LedgerError> {
    if let (Some(from), Some(to)) = (from, to)
        && from > to
    {
        return Err(LedgerError::InvalidDateRange { from, to });
    }
    Ok(())
}

/// Validates a forward posting input.
///
/// # Errors
///
/// - `NotPostable` for reversal kinds (those are created by cancel/return
///   flows, never posted directly).
/// - `AmountNotPositive` for a non-positive amount.
/// - `MissingSaleNo` for a sale without a correlation id.
/// - `MissingItems` for a sale or purchase without line items.
/// - `InvalidPaidAmount` when a paid amount is non-positive, exceeds the sale
///   amount, or appears on a non-sale kind.
pub fn validate_post_input(input: &PostEntryInput) -> Result<(), LedgerError> {
    if !input.kind.is_forward() {
        return Err(LedgerError::NotPostable(input.kind));
    }
    if input.amount <= Decimal::ZERO {
        return Err(LedgerError::AmountNotPositive);
    }
    for item in &input.items {
        if item.quantity <= Decimal::ZERO || item.unit_price < Decimal::ZERO {
            return Err(LedgerError::AmountNotPositive);
        }
    }
    match input.kind {
        EntryKind::Sale => {
            if input.sale_no.as_deref().is_none_or(str::is_empty) {
                return Err(LedgerError::MissingSaleNo);
            }
            if input.items.is_empty() {
                return Err(LedgerError::MissingItems(input.kind));
            }
            if let Some(paid) = input.paid_amount
                && (paid <= Decimal::ZERO || paid > input.amount)
            {
                return Err(LedgerError::InvalidPaidAmount);
            }
        }
        EntryKind::Purchase => {
            if input.items.is_empty() {
                return Err(LedgerError::MissingItems(input.kind));
            }
            if input.paid_amount.is_some() {
                return Err(LedgerError::InvalidPaidAmount);
            }
        }
        _ => {
            if input.paid_amount.is_some() {
                return Err(LedgerError::InvalidPaidAmount);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::ledger::types::LineItem;

    fn sale_input() -> PostEntryInput {
        PostEntryInput {
            account_id: Uuid::new_v4(),
            kind: EntryKind::Sale,
            amount: dec!(1000),
            currency: "TRY".to_string(),
            fx_rate: Decimal::ONE,
            entry_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            sale_no: Some("S-1001".to_string()),
            note: None,
            items: vec![LineItem {
                product_id: Uuid::new_v4(),
                quantity: dec!(2),
                unit_price: dec!(500),
            }],
            paid_amount: None,
        }
    }

    #[test]
    fn test_normalize_prefers_amount() {
        let result = normalize_amount(Some(dec!(10)), Some(dec!(20)), Some(dec!(30)));
        assert_eq!(result.unwrap(), dec!(10));
    }

    #[test]
    fn test_normalize_falls_back_to_total() {
        let result = normalize_amount(None, Some(dec!(20)), Some(dec!(30)));
        assert_eq!(result.unwrap(), dec!(20));

        let result = normalize_amount(None, None, Some(dec!(30)));
        assert_eq!(result.unwrap(), dec!(30));
    }

    #[test]
    fn test_normalize_missing() {
        assert!(matches!(
            normalize_amount(None, None, None),
            Err(LedgerError::MissingAmount)
        ));
    }

    #[test]
    fn test_normalize_rejects_non_positive() {
        assert!(matches!(
            normalize_amount(Some(dec!(0)), None, None),
            Err(LedgerError::AmountNotPositive)
        ));
        assert!(matches!(
            normalize_amount(Some(dec!(-5)), None, None),
            Err(LedgerError::AmountNotPositive)
        ));
    }

    #[test]
    fn test_date_range() {
        let jan = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let feb = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();

        assert!(validate_date_range(Some(jan), Some(feb)).is_ok());
        assert!(validate_date_range(None, Some(feb)).is_ok());
        assert!(validate_date_range(Some(jan), None).is_ok());
        assert!(matches!(
            validate_date_range(Some(feb), Some(jan)),
            Err(LedgerError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_valid_sale() {
        assert!(validate_post_input(&sale_input()).is_ok());
    }

    #[test]
    fn test_sale_with_partial_payment() {
        let mut input = sale_input();
        input.paid_amount = Some(dec!(400));
        assert!(validate_post_input(&input).is_ok());
    }

    #[test]
    fn test_paid_amount_cannot_exceed_sale() {
        let mut input = sale_input();
        input.paid_amount = Some(dec!(1500));
        assert!(matches!(
            validate_post_input(&input),
            Err(LedgerError::InvalidPaidAmount)
        ));
    }

    #[test]
    fn test_sale_requires_sale_no() {
        let mut input = sale_input();
        input.sale_no = None;
        assert!(matches!(
            validate_post_input(&input),
            Err(LedgerError::MissingSaleNo)
        ));

        let mut input = sale_input();
        input.sale_no = Some(String::new());
        assert!(matches!(
            validate_post_input(&input),
            Err(LedgerError::MissingSaleNo)
        ));
    }

    #[test]
    fn test_sale_requires_items() {
        let mut input = sale_input();
        input.items.clear();
        assert!(matches!(
            validate_post_input(&input),
            Err(LedgerError::MissingItems(EntryKind::Sale))
        ));
    }

    #[test]
    fn test_reversal_kind_not_postable() {
        let mut input = sale_input();
        input.kind = EntryKind::SaleCancel;
        assert!(matches!(
            validate_post_input(&input),
            Err(LedgerError::NotPostable(EntryKind::SaleCancel))
        ));
    }

    #[test]
    fn test_payment_without_items_ok() {
        let mut input = sale_input();
        input.kind = EntryKind::Payment;
        input.sale_no = None;
        input.items.clear();
        assert!(validate_post_input(&input).is_ok());
    }

    #[test]
    fn test_zero_quantity_item_rejected() {
        let mut input = sale_input();
        input.items[0].quantity = Decimal::ZERO;
        assert!(matches!(
            validate_post_input(&input),
            Err(LedgerError::AmountNotPositive)
        ));
    }
}
