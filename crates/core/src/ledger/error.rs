//! Ledger error types for validation and state errors.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use super::types::EntryKind;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Entry amount must be positive.
    #[error("Entry amount must be positive")]
    AmountNotPositive,

    /// No usable amount on the payload.
    #[error("Entry has no amount")]
    MissingAmount,

    /// Sale/purchase entries need at least one line item.
    #[error("Entry of kind {0:?} requires line items")]
    MissingItems(EntryKind),

    /// Sales require a sale_no correlation id.
    #[error("Sale entries require a sale_no")]
    MissingSaleNo,

    /// Only forward kinds can be posted directly.
    #[error("Cannot post entry of kind {0:?} directly")]
    NotPostable(EntryKind),

    /// Paid amount on a sale must be positive and at most the sale amount.
    #[error("Paid amount must be positive and not exceed the sale amount")]
    InvalidPaidAmount,

    /// Date range start is after its end.
    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange {
        /// Range start.
        from: NaiveDate,
        /// Range end.
        to: NaiveDate,
    },

    // ========== Scope Errors ==========
    /// Account not found in any scope.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Account exists but belongs to a different tenant.
    #[error("Account {0} belongs to a different tenant")]
    AccountForbidden(Uuid),

    /// Entry not found in scope.
    #[error("Entry not found: {0}")]
    EntryNotFound(Uuid),

    /// Product not found in scope.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    // ========== Reversal State Errors ==========
    /// Entry kind has no cancel flow.
    #[error("Entries of kind {0:?} cannot be cancelled")]
    NotCancellable(EntryKind),

    /// Entry is already cancelled.
    #[error("Entry {0} is already cancelled")]
    AlreadyCancelled(Uuid),

    /// Revert target is not a cancel entry.
    #[error("Entry {0} is not a cancel entry")]
    NotACancelEntry(Uuid),

    /// Cancel entry has already been reverted.
    #[error("Entry {0} has already been reverted")]
    AlreadyReverted(Uuid),

    /// Return target is not a sale.
    #[error("Entry {0} is not a sale")]
    NotASale(Uuid),

    /// Settle target is not a sale return.
    #[error("Entry {0} is not a sale return")]
    NotAReturn(Uuid),

    /// Return already has an active settlement.
    #[error("Return {0} is already settled")]
    AlreadySettled(Uuid),

    // ========== Infrastructure Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AmountNotPositive => "AMOUNT_NOT_POSITIVE",
            Self::MissingAmount => "MISSING_AMOUNT",
            Self::MissingItems(_) => "MISSING_ITEMS",
            Self::MissingSaleNo => "MISSING_SALE_NO",
            Self::NotPostable(_) => "NOT_POSTABLE",
            Self::InvalidPaidAmount => "INVALID_PAID_AMOUNT",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountForbidden(_) => "ACCOUNT_FORBIDDEN",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            Self::NotCancellable(_) => "NOT_CANCELLABLE",
            Self::AlreadyCancelled(_) => "ALREADY_CANCELLED",
            Self::NotACancelEntry(_) => "NOT_A_CANCEL_ENTRY",
            Self::AlreadyReverted(_) => "ALREADY_REVERTED",
            Self::NotASale(_) => "NOT_A_SALE",
            Self::NotAReturn(_) => "NOT_A_RETURN",
            Self::AlreadySettled(_) => "ALREADY_SETTLED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::AmountNotPositive
            | Self::MissingAmount
            | Self::MissingItems(_)
            | Self::MissingSaleNo
            | Self::NotPostable(_)
            | Self::InvalidPaidAmount
            | Self::InvalidDateRange { .. }
            | Self::NotCancellable(_)
            | Self::NotACancelEntry(_)
            | Self::NotASale(_)
            | Self::NotAReturn(_) => 400,

            // 403 Forbidden - scope owns nothing here
            Self::AccountForbidden(_) => 403,

            // 404 Not Found
            Self::AccountNotFound(_) | Self::EntryNotFound(_) | Self::ProductNotFound(_) => 404,

            // 409 Conflict - reversal attempted on an already-terminal entry
            Self::AlreadyCancelled(_) | Self::AlreadyReverted(_) | Self::AlreadySettled(_) => 409,

            // 500 Internal Server Error
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::AmountNotPositive.error_code(),
            "AMOUNT_NOT_POSITIVE"
        );
        assert_eq!(
            LedgerError::AlreadyCancelled(Uuid::nil()).error_code(),
            "ALREADY_CANCELLED"
        );
        assert_eq!(
            LedgerError::AccountForbidden(Uuid::nil()).error_code(),
            "ACCOUNT_FORBIDDEN"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerError::AmountNotPositive.http_status_code(), 400);
        assert_eq!(
            LedgerError::AccountForbidden(Uuid::nil()).http_status_code(),
            403
        );
        assert_eq!(
            LedgerError::EntryNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(
            LedgerError::AlreadyReverted(Uuid::nil()).http_status_code(),
            409
        );
        assert_eq!(
            LedgerError::Database("test".to_string()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::InvalidDateRange {
            from: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid date range: 2026-02-01 is after 2026-01-01"
        );
    }
}
