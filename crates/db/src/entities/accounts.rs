//! `SeaORM` Entity for the accounts (cari) table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AccountKind;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Tenant scope for company records; NULL on legacy rows.
    pub company_id: Option<Uuid>,
    /// Tenant scope for legacy single-user records.
    pub legacy_user_id: Option<Uuid>,
    pub name: String,
    pub kind: AccountKind,
    pub currency: String,
    /// Cached balance, rebuilt from the journal inside every posting
    /// transaction. The journal stays authoritative.
    pub balance: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::journal_entries::Entity")]
    JournalEntries,
}

impl Related<super::journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
