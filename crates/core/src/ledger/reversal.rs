//! Reversal state rules for cancel, revert, return, and settlement flows.
//!
//! Reversals never delete or rewrite posted amounts: a cancel posts a
//! compensating entry and flips the original's status, a revert re-activates
//! the original and soft-deletes the compensating entry. Only one level of
//! revert exists; there is no generic undo stack.

use uuid::Uuid;

use super::error::LedgerError;
use super::types::{EntryKind, EntryStatus};

/// Checks that an entry can be cancelled and returns the compensating kind.
///
/// # Errors
///
/// - `NotCancellable` when the kind has no cancel flow (reversal entries are
///   undone via revert, returns via settlement).
/// - `AlreadyCancelled` when the entry is not active.
pub fn ensure_cancellable(
    id: Uuid,
    kind: EntryKind,
    status: EntryStatus,
) -> Result<EntryKind, LedgerError> {
    let reversal = kind.reversal_kind().ok_or(LedgerError::NotCancellable(kind))?;
    match status {
        EntryStatus::Active => Ok(reversal),
        EntryStatus::Cancelled | EntryStatus::Reversed => Err(LedgerError::AlreadyCancelled(id)),
    }
}

/// Checks that an entry is a revertible cancel entry.
///
/// # Errors
///
/// - `NotACancelEntry` when the target is not a compensating cancel entry.
/// - `AlreadyReverted` when the cancel has already been undone.
pub fn ensure_revertible(id: Uuid, kind: EntryKind, status: EntryStatus) -> Result<(), LedgerError> {
    if !kind.is_cancel() {
        return Err(LedgerError::NotACancelEntry(id));
    }
    match status {
        EntryStatus::Active => Ok(()),
        EntryStatus::Reversed | EntryStatus::Cancelled => Err(LedgerError::AlreadyReverted(id)),
    }
}

/// Checks that a sale entry can take a return against it.
///
/// # Errors
///
/// - `NotASale` when the target is not a sale.
/// - `AlreadyCancelled` when the sale is no longer active.
pub fn ensure_returnable(id: Uuid, kind: EntryKind, status: EntryStatus) -> Result<(), LedgerError> {
    if kind != EntryKind::Sale {
        return Err(LedgerError::NotASale(id));
    }
    match status {
        EntryStatus::Active => Ok(()),
        EntryStatus::Cancelled | EntryStatus::Reversed => Err(LedgerError::AlreadyCancelled(id)),
    }
}

/// Checks that a return entry can be settled.
///
/// A return takes exactly one active settlement, refund or offset; the second
/// attempt is a conflict regardless of method.
///
/// # Errors
///
/// - `NotAReturn` when the target is not a sale return.
/// - `AlreadyCancelled` when the return itself is no longer active.
/// - `AlreadySettled` when an active settlement already references it.
pub fn ensure_settleable(
    id: Uuid,
    kind: EntryKind,
    status: EntryStatus,
    has_active_settlement: bool,
) -> Result<(), LedgerError> {
    if kind != EntryKind::SaleReturn {
        return Err(LedgerError::NotAReturn(id));
    }
    if status != EntryStatus::Active {
        return Err(LedgerError::AlreadyCancelled(id));
    }
    if has_active_settlement {
        return Err(LedgerError::AlreadySettled(id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_cancel_active_sale() {
        let result = ensure_cancellable(Uuid::nil(), EntryKind::Sale, EntryStatus::Active);
        assert_eq!(result.unwrap(), EntryKind::SaleCancel);
    }

    #[rstest]
    #[case(EntryKind::Sale, EntryKind::SaleCancel)]
    #[case(EntryKind::Purchase, EntryKind::PurchaseCancel)]
    #[case(EntryKind::Payment, EntryKind::PaymentCancel)]
    fn test_cancel_kind_mapping(#[case] kind: EntryKind, #[case] expected: EntryKind) {
        let result = ensure_cancellable(Uuid::nil(), kind, EntryStatus::Active);
        assert_eq!(result.unwrap(), expected);
    }

    #[test]
    fn test_cancel_already_cancelled() {
        let result = ensure_cancellable(Uuid::nil(), EntryKind::Sale, EntryStatus::Cancelled);
        assert!(matches!(result, Err(LedgerError::AlreadyCancelled(_))));
    }

    #[rstest]
    #[case(EntryKind::SaleCancel)]
    #[case(EntryKind::PurchaseCancel)]
    #[case(EntryKind::PaymentCancel)]
    #[case(EntryKind::SaleReturn)]
    fn test_cancel_of_reversal_rejected(#[case] kind: EntryKind) {
        let result = ensure_cancellable(Uuid::nil(), kind, EntryStatus::Active);
        assert!(matches!(result, Err(LedgerError::NotCancellable(_))));
    }

    #[test]
    fn test_revert_active_cancel() {
        assert!(ensure_revertible(Uuid::nil(), EntryKind::SaleCancel, EntryStatus::Active).is_ok());
    }

    #[test]
    fn test_revert_twice_conflicts() {
        let result = ensure_revertible(Uuid::nil(), EntryKind::SaleCancel, EntryStatus::Reversed);
        assert!(matches!(result, Err(LedgerError::AlreadyReverted(_))));
    }

    #[test]
    fn test_revert_forward_entry_rejected() {
        let result = ensure_revertible(Uuid::nil(), EntryKind::Sale, EntryStatus::Active);
        assert!(matches!(result, Err(LedgerError::NotACancelEntry(_))));
    }

    #[test]
    fn test_return_requires_sale() {
        let result = ensure_returnable(Uuid::nil(), EntryKind::Purchase, EntryStatus::Active);
        assert!(matches!(result, Err(LedgerError::NotASale(_))));
    }

    #[test]
    fn test_return_on_cancelled_sale_rejected() {
        let result = ensure_returnable(Uuid::nil(), EntryKind::Sale, EntryStatus::Cancelled);
        assert!(matches!(result, Err(LedgerError::AlreadyCancelled(_))));
    }

    #[test]
    fn test_settle_once() {
        assert!(
            ensure_settleable(Uuid::nil(), EntryKind::SaleReturn, EntryStatus::Active, false)
                .is_ok()
        );
    }

    #[test]
    fn test_double_settlement_conflicts() {
        let result =
            ensure_settleable(Uuid::nil(), EntryKind::SaleReturn, EntryStatus::Active, true);
        assert!(matches!(result, Err(LedgerError::AlreadySettled(_))));
    }

    #[test]
    fn test_settle_non_return_rejected() {
        let result = ensure_settleable(Uuid::nil(), EntryKind::Sale, EntryStatus::Active, false);
        assert!(matches!(result, Err(LedgerError::NotAReturn(_))));
    }
}
