//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations, hiding the
//! `SeaORM` implementation details from the rest of the application. Every
//! operation takes the caller's [`TenantScope`] and translates it into a
//! WHERE condition exactly once; nothing below this layer re-derives scope.

pub mod account;
pub mod journal;
pub mod product;

pub use account::{AccountRepository, CreateAccountInput};
pub use journal::{
    EntryFilter, EntryWithItems, JournalRepository, PostedEntry, ReturnInput, ReturnOutcome,
};
pub use product::{CreateProductInput, ProductRepository};

use defter_core::ledger::LedgerError;
use defter_shared::TenantScope;
use sea_orm::{ColumnTrait, Condition, DbErr};
use uuid::Uuid;

/// Maps a database error into the ledger error taxonomy.
pub(crate) fn db_err(e: DbErr) -> LedgerError {
    LedgerError::Database(e.to_string())
}

/// Builds the WHERE condition selecting rows owned by `scope`.
///
/// Company scope matches on `company_id`; legacy user scope matches rows that
/// predate companies (`company_id IS NULL AND legacy_user_id = ?`).
pub(crate) fn scope_condition<C: ColumnTrait>(
    scope: TenantScope,
    company_col: C,
    legacy_user_col: C,
) -> Condition {
    match scope {
        TenantScope::Company(id) => Condition::all().add(company_col.eq(id)),
        TenantScope::LegacyUser(id) => Condition::all()
            .add(company_col.is_null())
            .add(legacy_user_col.eq(id)),
    }
}

/// Returns the (company_id, legacy_user_id) column values for new rows.
pub(crate) const fn scope_columns(scope: TenantScope) -> (Option<Uuid>, Option<Uuid>) {
    match scope {
        TenantScope::Company(id) => (Some(id), None),
        TenantScope::LegacyUser(id) => (None, Some(id)),
    }
}

/// Checks whether a row's scope columns match the caller's scope.
pub(crate) fn row_in_scope(
    company_id: Option<Uuid>,
    legacy_user_id: Option<Uuid>,
    scope: TenantScope,
) -> bool {
    match scope {
        TenantScope::Company(id) => company_id == Some(id),
        TenantScope::LegacyUser(id) => company_id.is_none() && legacy_user_id == Some(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Rows written with a scope's columns are always visible to that
        /// scope and never to the other variant with the same key.
        #[test]
        fn prop_scope_columns_roundtrip(bytes in any::<[u8; 16]>()) {
            let id = Uuid::from_bytes(bytes);

            for scope in [TenantScope::Company(id), TenantScope::LegacyUser(id)] {
                let (company_id, legacy_user_id) = scope_columns(scope);
                prop_assert!(row_in_scope(company_id, legacy_user_id, scope));
            }

            let (company_id, legacy_user_id) = scope_columns(TenantScope::Company(id));
            prop_assert!(!row_in_scope(company_id, legacy_user_id, TenantScope::LegacyUser(id)));

            let (company_id, legacy_user_id) = scope_columns(TenantScope::LegacyUser(id));
            prop_assert!(!row_in_scope(company_id, legacy_user_id, TenantScope::Company(id)));
        }
    }

    #[test]
    fn test_scope_columns() {
        let id = Uuid::new_v4();
        assert_eq!(scope_columns(TenantScope::Company(id)), (Some(id), None));
        assert_eq!(scope_columns(TenantScope::LegacyUser(id)), (None, Some(id)));
    }

    #[test]
    fn test_row_in_scope_company() {
        let company = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert!(row_in_scope(Some(company), None, TenantScope::Company(company)));
        assert!(!row_in_scope(Some(other), None, TenantScope::Company(company)));
        assert!(!row_in_scope(None, Some(company), TenantScope::Company(company)));
    }

    #[test]
    fn test_row_in_scope_legacy_user() {
        let user = Uuid::new_v4();
        let company = Uuid::new_v4();

        assert!(row_in_scope(None, Some(user), TenantScope::LegacyUser(user)));
        // A row adopted by a company is no longer visible to the legacy scope.
        assert!(!row_in_scope(
            Some(company),
            Some(user),
            TenantScope::LegacyUser(user)
        ));
    }
}
