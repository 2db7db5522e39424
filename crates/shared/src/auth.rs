//! Authentication claims carried by bearer tokens.
//!
//! Defter does not issue or refresh tokens itself; it only validates them.
//! The claims carry everything the tenant resolver needs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Company ID, when the user belongs to a company tenant.
    ///
    /// Absent on tokens for legacy single-user records; the user ID is the
    /// effective scope key for those.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmp: Option<Uuid>,
    /// User's role.
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        company_id: Option<Uuid>,
        role: &str,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            cmp: company_id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the company ID from claims, if any.
    #[must_use]
    pub const fn company_id(&self) -> Option<Uuid> {
        self.cmp
    }
}
