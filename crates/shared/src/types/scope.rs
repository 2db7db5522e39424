//! Tenant scope resolution.
//!
//! Journal rows are owned either by a company or, for records that predate
//! companies, by a single user. The scope is resolved once from token claims
//! at the HTTP boundary and passed as an opaque value through every core
//! operation; business logic never re-derives it from raw claim fields.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Claims;

/// The authorization scope for all journal reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum TenantScope {
    /// Scope keyed by a company ID.
    Company(Uuid),
    /// Scope keyed by a user ID (legacy single-tenant records).
    LegacyUser(Uuid),
}

impl TenantScope {
    /// Resolves the scope from token claims.
    ///
    /// A company ID on the claims wins; otherwise the user ID is the
    /// effective scope key.
    #[must_use]
    pub fn from_claims(claims: &Claims) -> Self {
        match claims.company_id() {
            Some(company_id) => Self::Company(company_id),
            None => Self::LegacyUser(claims.user_id()),
        }
    }

    /// Returns the scope key as a raw UUID.
    #[must_use]
    pub const fn key(&self) -> Uuid {
        match self {
            Self::Company(id) | Self::LegacyUser(id) => *id,
        }
    }

    /// Returns true if this is a company scope.
    #[must_use]
    pub const fn is_company(&self) -> bool {
        matches!(self, Self::Company(_))
    }
}

impl std::fmt::Display for TenantScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Company(id) => write!(f, "company:{id}"),
            Self::LegacyUser(id) => write!(f, "user:{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_company_scope_wins() {
        let user_id = Uuid::new_v4();
        let company_id = Uuid::new_v4();
        let claims = Claims::new(
            user_id,
            Some(company_id),
            "admin",
            Utc::now() + Duration::minutes(15),
        );

        assert_eq!(
            TenantScope::from_claims(&claims),
            TenantScope::Company(company_id)
        );
    }

    #[test]
    fn test_legacy_user_fallback() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, None, "owner", Utc::now() + Duration::minutes(15));

        assert_eq!(
            TenantScope::from_claims(&claims),
            TenantScope::LegacyUser(user_id)
        );
    }

    #[test]
    fn test_scope_display() {
        let id = Uuid::nil();
        assert_eq!(
            TenantScope::Company(id).to_string(),
            format!("company:{id}")
        );
        assert_eq!(
            TenantScope::LegacyUser(id).to_string(),
            format!("user:{id}")
        );
    }
}
