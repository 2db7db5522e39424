//! `SeaORM` Entity for the journal_entries table.
//!
//! Rows are append-mostly: cancel/revert flows only toggle `status` and
//! `is_deleted`, never delete or rewrite posted amounts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{Direction, EntryKind, EntryStatus, SettlementKind};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Tenant scope for company records; NULL on legacy rows.
    pub company_id: Option<Uuid>,
    /// Tenant scope for legacy single-user records.
    pub legacy_user_id: Option<Uuid>,
    pub account_id: Uuid,
    pub kind: EntryKind,
    pub direction: Direction,
    /// Amount in the tenant's home currency. Balance math uses only this.
    pub amount: Decimal,
    pub currency: String,
    pub fx_rate: Decimal,
    /// Commercial date; may differ from created_at for backdated entries.
    pub entry_date: Date,
    /// Correlation id grouping entries of one commercial transaction.
    pub sale_no: Option<String>,
    /// The entry this one reverses or settles.
    pub ref_entry_id: Option<Uuid>,
    pub status: EntryStatus,
    pub is_deleted: bool,
    /// Set on payment entries that settle a sale return.
    pub settlement: Option<SettlementKind>,
    pub note: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
    #[sea_orm(has_many = "super::entry_items::Entity")]
    EntryItems,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::entry_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EntryItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
