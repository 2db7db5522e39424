//! Journal migration: journal_entries, entry_items, stock_movements.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(JOURNAL_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS stock_movements CASCADE;
             DROP TABLE IF EXISTS entry_items CASCADE;
             DROP TABLE IF EXISTS journal_entries CASCADE;
             DROP TYPE IF EXISTS stock_reason;
             DROP TYPE IF EXISTS settlement_kind;
             DROP TYPE IF EXISTS entry_status;
             DROP TYPE IF EXISTS entry_kind;
             DROP TYPE IF EXISTS direction;",
        )
        .await?;
        Ok(())
    }
}

const JOURNAL_SQL: &str = r"
CREATE TYPE direction AS ENUM ('borc', 'alacak');
CREATE TYPE entry_kind AS ENUM (
    'sale', 'sale_return', 'sale_cancel',
    'purchase', 'purchase_cancel',
    'payment', 'payment_cancel'
);
CREATE TYPE entry_status AS ENUM ('active', 'cancelled', 'reversed');
CREATE TYPE settlement_kind AS ENUM ('refund', 'offset');
CREATE TYPE stock_reason AS ENUM (
    'sale', 'sale_return', 'sale_cancel',
    'purchase', 'purchase_cancel',
    'revert', 'adjustment'
);

-- The journal. Rows are soft-flagged, never deleted.
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID,
    legacy_user_id UUID,
    account_id UUID NOT NULL REFERENCES accounts(id),
    kind entry_kind NOT NULL,
    direction direction NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    currency VARCHAR(3) NOT NULL DEFAULT 'TRY',
    fx_rate NUMERIC(19, 6) NOT NULL DEFAULT 1,
    entry_date DATE NOT NULL,
    sale_no VARCHAR(64),
    ref_entry_id UUID REFERENCES journal_entries(id),
    status entry_status NOT NULL DEFAULT 'active',
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    settlement settlement_kind,
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_entries_one_scope CHECK (num_nonnulls(company_id, legacy_user_id) = 1),
    CONSTRAINT chk_entries_amount_positive CHECK (amount > 0)
);

-- Balance/statement scans per account
CREATE INDEX idx_entries_account_date ON journal_entries(account_id, entry_date, created_at);
-- Correlation lookups
CREATE INDEX idx_entries_sale_no ON journal_entries(sale_no) WHERE sale_no IS NOT NULL;
-- Reversal/settlement back-references
CREATE INDEX idx_entries_ref ON journal_entries(ref_entry_id) WHERE ref_entry_id IS NOT NULL;
-- Scope lookups
CREATE INDEX idx_entries_company ON journal_entries(company_id) WHERE company_id IS NOT NULL;
CREATE INDEX idx_entries_legacy_user ON journal_entries(legacy_user_id) WHERE legacy_user_id IS NOT NULL;

-- Structured line items (one row per product on an entry)
CREATE TABLE entry_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id),
    quantity NUMERIC(19, 3) NOT NULL,
    unit_price NUMERIC(19, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_items_quantity_positive CHECK (quantity > 0),
    CONSTRAINT chk_items_price_non_negative CHECK (unit_price >= 0)
);

CREATE INDEX idx_items_entry ON entry_items(entry_id);
CREATE INDEX idx_items_product ON entry_items(product_id);

-- Append-only stock mutation log
CREATE TABLE stock_movements (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    product_id UUID NOT NULL REFERENCES products(id),
    entry_id UUID REFERENCES journal_entries(id),
    delta NUMERIC(19, 3) NOT NULL,
    reason stock_reason NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_movements_product ON stock_movements(product_id, created_at DESC);
CREATE INDEX idx_movements_entry ON stock_movements(entry_id) WHERE entry_id IS NOT NULL;
";
