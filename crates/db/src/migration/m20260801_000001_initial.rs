//! Initial migration: accounts (cari) and products.
//!
//! Every tenant-owned table carries the pair (company_id, legacy_user_id)
//! with a CHECK that exactly one is set.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(INITIAL_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS products CASCADE;
             DROP TABLE IF EXISTS accounts CASCADE;
             DROP TYPE IF EXISTS account_kind;",
        )
        .await?;
        Ok(())
    }
}

const INITIAL_SQL: &str = r"
CREATE TYPE account_kind AS ENUM ('customer', 'supplier');

-- Cari (counterparty) accounts
CREATE TABLE accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID,
    legacy_user_id UUID,
    name VARCHAR(255) NOT NULL,
    kind account_kind NOT NULL,
    currency VARCHAR(3) NOT NULL DEFAULT 'TRY',
    balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_accounts_one_scope CHECK (num_nonnulls(company_id, legacy_user_id) = 1)
);

-- Scope lookups
CREATE INDEX idx_accounts_company ON accounts(company_id) WHERE company_id IS NOT NULL;
CREATE INDEX idx_accounts_legacy_user ON accounts(legacy_user_id) WHERE legacy_user_id IS NOT NULL;

-- Product catalog with on-hand tracking
CREATE TABLE products (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID,
    legacy_user_id UUID,
    name VARCHAR(255) NOT NULL,
    sku VARCHAR(64),
    unit_price NUMERIC(19, 4) NOT NULL DEFAULT 0,
    on_hand NUMERIC(19, 3) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_products_one_scope CHECK (num_nonnulls(company_id, legacy_user_id) = 1)
);

CREATE INDEX idx_products_company ON products(company_id) WHERE company_id IS NOT NULL;
CREATE INDEX idx_products_legacy_user ON products(legacy_user_id) WHERE legacy_user_id IS NOT NULL;
CREATE INDEX idx_products_sku ON products(sku) WHERE sku IS NOT NULL;
";
