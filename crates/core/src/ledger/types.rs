//! Journal entry domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Posting direction of a journal entry.
///
/// `Borc` (debit) entries raise the account's bakiye, `Alacak` (credit)
/// entries lower it. The sign convention is fixed: `bakiye = borc - alacak`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Debit entry.
    Borc,
    /// Credit entry.
    Alacak,
}

impl Direction {
    /// Returns the opposite direction.
    ///
    /// A compensating entry always posts opposite to the entry it reverses.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Borc => Self::Alacak,
            Self::Alacak => Self::Borc,
        }
    }
}

/// Semantic kind of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Sale to a customer.
    Sale,
    /// Inventory return against a sale.
    SaleReturn,
    /// Compensating entry cancelling a sale.
    SaleCancel,
    /// Purchase from a supplier.
    Purchase,
    /// Compensating entry cancelling a purchase.
    PurchaseCancel,
    /// Cash movement (tahsilat or refund).
    Payment,
    /// Compensating entry cancelling a payment.
    PaymentCancel,
}

impl EntryKind {
    /// The direction this kind naturally posts with.
    ///
    /// Fixed table; reversal kinds invert their forward counterpart so a
    /// forward/reversal pair always nets to zero.
    #[must_use]
    pub const fn natural_direction(self) -> Direction {
        match self {
            Self::Sale => Direction::Alacak,
            Self::SaleReturn | Self::SaleCancel => Direction::Borc,
            Self::Purchase => Direction::Borc,
            Self::PurchaseCancel => Direction::Alacak,
            Self::Payment => Direction::Borc,
            Self::PaymentCancel => Direction::Alacak,
        }
    }

    /// The compensating kind posted when an entry of this kind is cancelled.
    ///
    /// Returns `None` for kinds that cannot be cancelled directly (reversals
    /// are undone via revert, returns are settled, not cancelled).
    #[must_use]
    pub const fn reversal_kind(self) -> Option<Self> {
        match self {
            Self::Sale => Some(Self::SaleCancel),
            Self::Purchase => Some(Self::PurchaseCancel),
            Self::Payment => Some(Self::PaymentCancel),
            Self::SaleReturn | Self::SaleCancel | Self::PurchaseCancel | Self::PaymentCancel => {
                None
            }
        }
    }

    /// Returns true for forward (caller-postable) kinds.
    #[must_use]
    pub const fn is_forward(self) -> bool {
        matches!(self, Self::Sale | Self::Purchase | Self::Payment)
    }

    /// Returns true for compensating cancel kinds.
    #[must_use]
    pub const fn is_cancel(self) -> bool {
        matches!(
            self,
            Self::SaleCancel | Self::PurchaseCancel | Self::PaymentCancel
        )
    }

    /// Sign of this kind's effect on on-hand stock, per line item unit.
    ///
    /// `None` for pure cash movements. Cancel kinds carry the inverse of the
    /// kind they compensate so stock follows the journal through reversals.
    #[must_use]
    pub const fn stock_sign(self) -> Option<i64> {
        match self {
            Self::Sale => Some(-1),
            Self::SaleCancel | Self::SaleReturn | Self::Purchase => Some(1),
            Self::PurchaseCancel => Some(-1),
            Self::Payment | Self::PaymentCancel => None,
        }
    }
}

/// Lifecycle state of a journal entry.
///
/// Entries are never hard-deleted; these flags are the only mutation a posted
/// row ever sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Entry is in effect.
    Active,
    /// Entry has been cancelled by a compensating entry.
    ///
    /// Cancelled entries stay in the balance fold; the compensating entry
    /// nets them out.
    Cancelled,
    /// A compensating entry that has itself been reverted ("geri al").
    Reversed,
}

/// How a sale return is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementKind {
    /// Cash refunded to the customer.
    Refund,
    /// Offset against the account's open balance (mahsup).
    Offset,
}

/// A structured line item on a sale, purchase, or return entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// The product moved.
    pub product_id: Uuid,
    /// Quantity moved (positive).
    pub quantity: Decimal,
    /// Unit price at posting time.
    pub unit_price: Decimal,
}

/// Input for posting a forward journal entry.
#[derive(Debug, Clone)]
pub struct PostEntryInput {
    /// The counterparty account.
    pub account_id: Uuid,
    /// Entry kind; must be a forward kind.
    pub kind: EntryKind,
    /// Amount in the tenant's home currency (positive).
    pub amount: Decimal,
    /// ISO 4217 currency code (informational).
    pub currency: String,
    /// Exchange rate at posting time (informational).
    pub fx_rate: Decimal,
    /// Commercial date of the entry (backdatable).
    pub entry_date: NaiveDate,
    /// Correlation id grouping entries of one commercial transaction.
    pub sale_no: Option<String>,
    /// Free-text annotation.
    pub note: Option<String>,
    /// Line items (required for sale/purchase, empty for payment).
    pub items: Vec<LineItem>,
    /// For sales: amount collected immediately, posted as a payment entry
    /// under the same sale_no in the same transaction.
    pub paid_amount: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::Borc.opposite(), Direction::Alacak);
        assert_eq!(Direction::Alacak.opposite(), Direction::Borc);
    }

    #[test]
    fn test_reversal_kind_inverts_direction() {
        for kind in [EntryKind::Sale, EntryKind::Purchase, EntryKind::Payment] {
            let reversal = kind.reversal_kind().unwrap();
            assert_eq!(
                reversal.natural_direction(),
                kind.natural_direction().opposite(),
                "reversal of {kind:?} must post opposite"
            );
        }
    }

    #[test]
    fn test_reversal_kinds_are_terminal() {
        assert_eq!(EntryKind::SaleCancel.reversal_kind(), None);
        assert_eq!(EntryKind::PurchaseCancel.reversal_kind(), None);
        assert_eq!(EntryKind::PaymentCancel.reversal_kind(), None);
        assert_eq!(EntryKind::SaleReturn.reversal_kind(), None);
    }

    #[test]
    fn test_forward_kinds() {
        assert!(EntryKind::Sale.is_forward());
        assert!(EntryKind::Purchase.is_forward());
        assert!(EntryKind::Payment.is_forward());
        assert!(!EntryKind::SaleCancel.is_forward());
        assert!(!EntryKind::SaleReturn.is_forward());
    }

    #[test]
    fn test_cancel_stock_sign_inverts_forward() {
        assert_eq!(
            EntryKind::Sale.stock_sign().unwrap(),
            -EntryKind::SaleCancel.stock_sign().unwrap()
        );
        assert_eq!(
            EntryKind::Purchase.stock_sign().unwrap(),
            -EntryKind::PurchaseCancel.stock_sign().unwrap()
        );
        assert_eq!(EntryKind::Payment.stock_sign(), None);
    }
}
