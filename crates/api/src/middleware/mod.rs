//! Request middleware.

pub mod auth;

pub use auth::{AuthScope, auth_middleware};
