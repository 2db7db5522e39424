//! Cari account routes: directory, balance, and statement (ekstre).

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, middleware::AuthScope, routes::ledger_error_response};
use crate::routes::entries::{direction_to_string, kind_to_string as entry_kind_to_string};
use defter_core::ledger::StatementRow;
use defter_db::{
    entities::{accounts, sea_orm_active_enums::AccountKind},
    repositories::{AccountRepository, CreateAccountInput, JournalRepository},
};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(create_account))
        .route("/accounts", get(list_accounts))
        .route("/accounts/{account_id}", get(get_account))
        .route("/accounts/{account_id}/balance", get(get_balance))
        .route("/accounts/{account_id}/statement", get(get_statement))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Display name.
    pub name: String,
    /// Account kind: "customer" or "supplier".
    pub kind: String,
    /// ISO 4217 currency code (default: TRY).
    pub currency: Option<String>,
}

/// Query parameters for balance and statement.
#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    /// Range start (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Range end (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
}

/// Response for an account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Account kind.
    pub kind: String,
    /// Currency code.
    pub currency: String,
    /// Cached balance (journal-derived).
    pub balance: String,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

/// Response row for a statement.
#[derive(Debug, Serialize)]
pub struct StatementRowResponse {
    /// Entry ID.
    pub id: Uuid,
    /// Commercial date.
    pub entry_date: String,
    /// Entry kind.
    pub kind: &'static str,
    /// Posting direction.
    pub direction: &'static str,
    /// Amount.
    pub amount: String,
    /// Running balance after this row.
    pub bakiye: String,
    /// Description.
    pub aciklama: &'static str,
    /// Correlation id.
    pub sale_no: Option<String>,
}

fn account_response(account: accounts::Model) -> AccountResponse {
    AccountResponse {
        id: account.id,
        name: account.name,
        kind: kind_to_string(&account.kind),
        currency: account.currency,
        balance: account.balance.to_string(),
        created_at: account.created_at.to_rfc3339(),
        updated_at: account.updated_at.to_rfc3339(),
    }
}

fn statement_row_response(row: StatementRow) -> StatementRowResponse {
    StatementRowResponse {
        id: row.id.into_inner(),
        entry_date: row.entry_date.to_string(),
        kind: entry_kind_to_string(row.kind),
        direction: direction_to_string(row.direction),
        amount: row.amount.to_string(),
        bakiye: row.bakiye.to_string(),
        aciklama: row.aciklama,
        sale_no: row.sale_no,
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/accounts` - Create a cari account.
async fn create_account(
    State(state): State<AppState>,
    AuthScope(scope): AuthScope,
    Json(payload): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    let Some(kind) = string_to_kind(&payload.kind) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_account_kind",
                "message": "Account kind must be 'customer' or 'supplier'"
            })),
        )
            .into_response();
    };

    if payload.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_name",
                "message": "Account name must not be empty"
            })),
        )
            .into_response();
    }

    let repo = AccountRepository::new((*state.db).clone());
    let input = CreateAccountInput {
        name: payload.name,
        kind,
        currency: payload.currency.unwrap_or_else(|| "TRY".to_string()),
    };

    match repo.create_account(scope, input).await {
        Ok(account) => {
            info!(scope = %scope, account_id = %account.id, "Account created");
            (StatusCode::CREATED, Json(account_response(account))).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/accounts` - List accounts in scope.
async fn list_accounts(
    State(state): State<AppState>,
    AuthScope(scope): AuthScope,
) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());

    match repo.list_accounts(scope).await {
        Ok(accounts) => {
            let items: Vec<AccountResponse> =
                accounts.into_iter().map(account_response).collect();
            (StatusCode::OK, Json(json!({ "accounts": items }))).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/accounts/{account_id}` - Get an account with its cached balance.
async fn get_account(
    State(state): State<AppState>,
    AuthScope(scope): AuthScope,
    Path(account_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());

    match repo.get_account(scope, account_id).await {
        Ok(account) => (StatusCode::OK, Json(account_response(account))).into_response(),
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/accounts/{account_id}/balance` - Compute the journal-derived balance.
async fn get_balance(
    State(state): State<AppState>,
    AuthScope(scope): AuthScope,
    Path(account_id): Path<Uuid>,
    Query(query): Query<DateRangeQuery>,
) -> impl IntoResponse {
    let repo = JournalRepository::new((*state.db).clone());

    match repo
        .compute_balance(scope, account_id, query.from, query.to)
        .await
    {
        Ok(summary) => (
            StatusCode::OK,
            Json(json!({
                "account_id": account_id,
                "borc": summary.borc.to_string(),
                "alacak": summary.alacak.to_string(),
                "bakiye": summary.bakiye.to_string()
            })),
        )
            .into_response(),
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/accounts/{account_id}/statement` - Build the ekstre projection.
async fn get_statement(
    State(state): State<AppState>,
    AuthScope(scope): AuthScope,
    Path(account_id): Path<Uuid>,
    Query(query): Query<DateRangeQuery>,
) -> impl IntoResponse {
    let repo = JournalRepository::new((*state.db).clone());

    match repo.statement(scope, account_id, query.from, query.to).await {
        Ok(rows) => {
            let items: Vec<StatementRowResponse> =
                rows.into_iter().map(statement_row_response).collect();
            (
                StatusCode::OK,
                Json(json!({ "account_id": account_id, "rows": items })),
            )
                .into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn kind_to_string(kind: &AccountKind) -> String {
    match kind {
        AccountKind::Customer => "customer".to_string(),
        AccountKind::Supplier => "supplier".to_string(),
    }
}

fn string_to_kind(s: &str) -> Option<AccountKind> {
    match s.to_lowercase().as_str() {
        "customer" => Some(AccountKind::Customer),
        "supplier" => Some(AccountKind::Supplier),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!(string_to_kind("customer"), Some(AccountKind::Customer));
        assert_eq!(string_to_kind("SUPPLIER"), Some(AccountKind::Supplier));
        assert_eq!(string_to_kind("vendor"), None);
    }

    #[test]
    fn test_kind_roundtrip() {
        for s in ["customer", "supplier"] {
            let kind = string_to_kind(s).unwrap();
            assert_eq!(kind_to_string(&kind), s);
        }
    }
}
