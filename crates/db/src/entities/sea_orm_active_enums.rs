//! Postgres enum types used by the entities.
//!
//! Mirrors the domain enums in `defter-core`; the `From` impls translate at
//! the repository boundary so core stays free of database concerns.

use defter_core::ledger;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Posting direction.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "direction")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Debit.
    #[sea_orm(string_value = "borc")]
    Borc,
    /// Credit.
    #[sea_orm(string_value = "alacak")]
    Alacak,
}

/// Semantic entry kind.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_kind")]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Sale to a customer.
    #[sea_orm(string_value = "sale")]
    Sale,
    /// Inventory return against a sale.
    #[sea_orm(string_value = "sale_return")]
    SaleReturn,
    /// Compensating entry cancelling a sale.
    #[sea_orm(string_value = "sale_cancel")]
    SaleCancel,
    /// Purchase from a supplier.
    #[sea_orm(string_value = "purchase")]
    Purchase,
    /// Compensating entry cancelling a purchase.
    #[sea_orm(string_value = "purchase_cancel")]
    PurchaseCancel,
    /// Cash movement.
    #[sea_orm(string_value = "payment")]
    Payment,
    /// Compensating entry cancelling a payment.
    #[sea_orm(string_value = "payment_cancel")]
    PaymentCancel,
}

/// Entry lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_status")]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Entry is in effect.
    #[sea_orm(string_value = "active")]
    Active,
    /// Entry has been cancelled by a compensating entry.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    /// A compensating entry that has been reverted.
    #[sea_orm(string_value = "reversed")]
    Reversed,
}

/// Settlement method for a sale return.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "settlement_kind")]
#[serde(rename_all = "snake_case")]
pub enum SettlementKind {
    /// Cash refunded to the customer.
    #[sea_orm(string_value = "refund")]
    Refund,
    /// Offset against the open balance (mahsup).
    #[sea_orm(string_value = "offset")]
    Offset,
}

/// Counterparty account kind.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_kind")]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Customer account.
    #[sea_orm(string_value = "customer")]
    Customer,
    /// Supplier account.
    #[sea_orm(string_value = "supplier")]
    Supplier,
}

/// Why a stock movement was written.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "stock_reason")]
#[serde(rename_all = "snake_case")]
pub enum StockReason {
    /// Items shipped on a sale.
    #[sea_orm(string_value = "sale")]
    Sale,
    /// Items received back on a sale return.
    #[sea_orm(string_value = "sale_return")]
    SaleReturn,
    /// Sale cancelled, items restored.
    #[sea_orm(string_value = "sale_cancel")]
    SaleCancel,
    /// Items received on a purchase.
    #[sea_orm(string_value = "purchase")]
    Purchase,
    /// Purchase cancelled, items removed.
    #[sea_orm(string_value = "purchase_cancel")]
    PurchaseCancel,
    /// A cancel was reverted, original effect re-applied.
    #[sea_orm(string_value = "revert")]
    Revert,
    /// Manual adjustment.
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
}

// ============================================================================
// Conversions to/from the core domain enums
// ============================================================================

impl From<ledger::Direction> for Direction {
    fn from(value: ledger::Direction) -> Self {
        match value {
            ledger::Direction::Borc => Self::Borc,
            ledger::Direction::Alacak => Self::Alacak,
        }
    }
}

impl From<Direction> for ledger::Direction {
    fn from(value: Direction) -> Self {
        match value {
            Direction::Borc => Self::Borc,
            Direction::Alacak => Self::Alacak,
        }
    }
}

impl From<ledger::EntryKind> for EntryKind {
    fn from(value: ledger::EntryKind) -> Self {
        match value {
            ledger::EntryKind::Sale => Self::Sale,
            ledger::EntryKind::SaleReturn => Self::SaleReturn,
            ledger::EntryKind::SaleCancel => Self::SaleCancel,
            ledger::EntryKind::Purchase => Self::Purchase,
            ledger::EntryKind::PurchaseCancel => Self::PurchaseCancel,
            ledger::EntryKind::Payment => Self::Payment,
            ledger::EntryKind::PaymentCancel => Self::PaymentCancel,
        }
    }
}

impl From<EntryKind> for ledger::EntryKind {
    fn from(value: EntryKind) -> Self {
        match value {
            EntryKind::Sale => Self::Sale,
            EntryKind::SaleReturn => Self::SaleReturn,
            EntryKind::SaleCancel => Self::SaleCancel,
            EntryKind::Purchase => Self::Purchase,
            EntryKind::PurchaseCancel => Self::PurchaseCancel,
            EntryKind::Payment => Self::Payment,
            EntryKind::PaymentCancel => Self::PaymentCancel,
        }
    }
}

impl From<ledger::EntryStatus> for EntryStatus {
    fn from(value: ledger::EntryStatus) -> Self {
        match value {
            ledger::EntryStatus::Active => Self::Active,
            ledger::EntryStatus::Cancelled => Self::Cancelled,
            ledger::EntryStatus::Reversed => Self::Reversed,
        }
    }
}

impl From<EntryStatus> for ledger::EntryStatus {
    fn from(value: EntryStatus) -> Self {
        match value {
            EntryStatus::Active => Self::Active,
            EntryStatus::Cancelled => Self::Cancelled,
            EntryStatus::Reversed => Self::Reversed,
        }
    }
}

impl From<ledger::SettlementKind> for SettlementKind {
    fn from(value: ledger::SettlementKind) -> Self {
        match value {
            ledger::SettlementKind::Refund => Self::Refund,
            ledger::SettlementKind::Offset => Self::Offset,
        }
    }
}

impl From<SettlementKind> for ledger::SettlementKind {
    fn from(value: SettlementKind) -> Self {
        match value {
            SettlementKind::Refund => Self::Refund,
            SettlementKind::Offset => Self::Offset,
        }
    }
}
