//! `SeaORM` Entity for the products table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Tenant scope for company records; NULL on legacy rows.
    pub company_id: Option<Uuid>,
    /// Tenant scope for legacy single-user records.
    pub legacy_user_id: Option<Uuid>,
    pub name: String,
    pub sku: Option<String>,
    pub unit_price: Decimal,
    /// On-hand quantity; mutated only inside journal posting transactions.
    pub on_hand: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::entry_items::Entity")]
    EntryItems,
    #[sea_orm(has_many = "super::stock_movements::Entity")]
    StockMovements,
}

impl Related<super::entry_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EntryItems.def()
    }
}

impl Related<super::stock_movements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockMovements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
