//! Shared domain types.

pub mod id;
pub mod scope;

pub use id::{AccountId, EntryId, ProductId};
pub use scope::TenantScope;
