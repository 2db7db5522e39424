//! Product repository for catalog and stock movement queries.
//!
//! Stock mutation itself happens inside journal posting transactions (see
//! `JournalRepository`); this repository only creates and reads.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use defter_core::ledger::LedgerError;
use defter_shared::TenantScope;

use super::{db_err, row_in_scope, scope_columns, scope_condition};
use crate::entities::{products, stock_movements};

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    /// Display name.
    pub name: String,
    /// Optional stock-keeping unit code.
    pub sku: Option<String>,
    /// Unit price in home currency.
    pub unit_price: Decimal,
    /// Opening on-hand quantity.
    pub on_hand: Decimal,
}

/// Product repository for catalog operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a product under the caller's scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create_product(
        &self,
        scope: TenantScope,
        input: CreateProductInput,
    ) -> Result<products::Model, LedgerError> {
        let now = Utc::now().into();
        let (company_id, legacy_user_id) = scope_columns(scope);

        let product = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(company_id),
            legacy_user_id: Set(legacy_user_id),
            name: Set(input.name),
            sku: Set(input.sku),
            unit_price: Set(input.unit_price),
            on_hand: Set(input.on_hand),
            created_at: Set(now),
            updated_at: Set(now),
        };

        product.insert(&self.db).await.map_err(db_err)
    }

    /// Lists products in the caller's scope, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_products(
        &self,
        scope: TenantScope,
    ) -> Result<Vec<products::Model>, LedgerError> {
        products::Entity::find()
            .filter(scope_condition(
                scope,
                products::Column::CompanyId,
                products::Column::LegacyUserId,
            ))
            .order_by_desc(products::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Gets a product by ID, enforcing scope ownership.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` when the product is missing or owned by a
    /// different tenant.
    pub async fn get_product(
        &self,
        scope: TenantScope,
        product_id: Uuid,
    ) -> Result<products::Model, LedgerError> {
        let product = products::Entity::find_by_id(product_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::ProductNotFound(product_id))?;

        if !row_in_scope(product.company_id, product.legacy_user_id, scope) {
            return Err(LedgerError::ProductNotFound(product_id));
        }

        Ok(product)
    }

    /// Lists stock movements for a product, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not in scope or the query fails.
    pub async fn list_movements(
        &self,
        scope: TenantScope,
        product_id: Uuid,
    ) -> Result<Vec<stock_movements::Model>, LedgerError> {
        // Scope check rides on the product lookup; movements carry no scope
        // columns of their own.
        self.get_product(scope, product_id).await?;

        stock_movements::Entity::find()
            .filter(stock_movements::Column::ProductId.eq(product_id))
            .order_by_desc(stock_movements::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)
    }
}
