//! `SeaORM` entity definitions.

pub mod accounts;
pub mod entry_items;
pub mod journal_entries;
pub mod products;
pub mod sea_orm_active_enums;
pub mod stock_movements;
