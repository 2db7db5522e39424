//! Account repository for cari (counterparty) database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use defter_core::ledger::LedgerError;
use defter_shared::TenantScope;

use super::{db_err, row_in_scope, scope_columns, scope_condition};
use crate::entities::{accounts, sea_orm_active_enums::AccountKind};

/// Input for creating a cari account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Display name.
    pub name: String,
    /// Customer or supplier.
    pub kind: AccountKind,
    /// ISO 4217 currency code.
    pub currency: String,
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a cari account under the caller's scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create_account(
        &self,
        scope: TenantScope,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, LedgerError> {
        let now = Utc::now().into();
        let (company_id, legacy_user_id) = scope_columns(scope);

        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(company_id),
            legacy_user_id: Set(legacy_user_id),
            name: Set(input.name),
            kind: Set(input.kind),
            currency: Set(input.currency),
            balance: Set(rust_decimal::Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        };

        account.insert(&self.db).await.map_err(db_err)
    }

    /// Lists accounts in the caller's scope, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(
        &self,
        scope: TenantScope,
    ) -> Result<Vec<accounts::Model>, LedgerError> {
        accounts::Entity::find()
            .filter(scope_condition(
                scope,
                accounts::Column::CompanyId,
                accounts::Column::LegacyUserId,
            ))
            .order_by_desc(accounts::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Gets an account by ID, enforcing scope ownership.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` when no account with this ID exists.
    /// - `AccountForbidden` when it exists under a different tenant.
    pub async fn get_account(
        &self,
        scope: TenantScope,
        account_id: Uuid,
    ) -> Result<accounts::Model, LedgerError> {
        let account = accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::AccountNotFound(account_id))?;

        if !row_in_scope(account.company_id, account.legacy_user_id, scope) {
            return Err(LedgerError::AccountForbidden(account_id));
        }

        Ok(account)
    }
}
