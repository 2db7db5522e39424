//! Cari ledger domain logic.
//!
//! This module implements the core journal functionality:
//! - Entry kinds, directions, and lifecycle states
//! - Balance calculation (single signed fold)
//! - Statement (ekstre) projection with per-row running balance
//! - Reversal rules for cancel / revert / return flows
//! - Input validation and legacy field normalization
//! - Error types for ledger operations

pub mod balance;
pub mod error;
pub mod reversal;
pub mod statement;
pub mod types;
pub mod validation;

#[cfg(test)]
mod balance_props;

pub use balance::{BalanceSummary, signed_amount};
pub use error::LedgerError;
pub use reversal::{
    ensure_cancellable, ensure_returnable, ensure_revertible, ensure_settleable,
};
pub use statement::{StatementEntry, StatementRow, aciklama_for, build_rows};
pub use types::{
    Direction, EntryKind, EntryStatus, LineItem, PostEntryInput, SettlementKind,
};
pub use validation::{normalize_amount, validate_date_range, validate_post_input};
