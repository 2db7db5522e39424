//! Journal entry routes: posting and the reversal flows.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, middleware::AuthScope, routes::ledger_error_response};
use defter_core::ledger::{
    Direction, EntryKind, EntryStatus, LineItem, PostEntryInput, SettlementKind, normalize_amount,
};
use defter_db::{
    entities::journal_entries,
    repositories::{EntryFilter, JournalRepository, ReturnInput},
};

/// Creates the journal entry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/entries", post(create_entry))
        .route("/entries", get(list_entries))
        .route("/entries/{entry_id}", get(get_entry))
        .route("/entries/{entry_id}/cancel", post(cancel_entry))
        .route("/entries/{entry_id}/revert", post(revert_entry))
        .route("/entries/{entry_id}/return", post(return_entry))
        .route("/entries/{entry_id}/settle", post(settle_entry))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for a line item.
#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    /// Product ID.
    pub product_id: Uuid,
    /// Quantity (positive).
    pub quantity: String,
    /// Unit price.
    pub unit_price: String,
}

/// Request body for posting a forward entry.
///
/// The amount may arrive under any of the legacy aliases; it is normalized
/// once here and nothing downstream branches on the aliases.
#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    /// Counterparty account ID.
    pub account_id: Uuid,
    /// Entry kind: "sale", "purchase", or "payment".
    pub kind: String,
    /// Amount in home currency.
    pub amount: Option<String>,
    /// Legacy alias for amount.
    pub total: Option<String>,
    /// Legacy alias for amount.
    #[serde(rename = "totalTRY")]
    pub total_try: Option<String>,
    /// Currency code (default: TRY).
    pub currency: Option<String>,
    /// Exchange rate (default: 1).
    pub fx_rate: Option<String>,
    /// Commercial date (YYYY-MM-DD).
    pub entry_date: NaiveDate,
    /// Correlation id; required for sales.
    pub sale_no: Option<String>,
    /// Free-text annotation.
    pub note: Option<String>,
    /// Line items.
    #[serde(default)]
    pub items: Vec<ItemRequest>,
    /// For sales: amount collected immediately.
    pub paid_amount: Option<String>,
}

/// Query parameters for listing entries.
#[derive(Debug, Deserialize)]
pub struct ListEntriesQuery {
    /// Filter by account.
    pub account_id: Option<Uuid>,
    /// Filter by correlation id.
    pub sale_no: Option<String>,
    /// Filter by kind.
    pub kind: Option<String>,
    /// Filter by status.
    pub status: Option<String>,
    /// Filter by date range start (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Filter by date range end (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
}

/// Request body for a sale return.
#[derive(Debug, Deserialize)]
pub struct ReturnRequest {
    /// Returned amount.
    pub amount: String,
    /// Returned line items.
    pub items: Vec<ItemRequest>,
    /// Commercial date; defaults to today.
    pub entry_date: Option<NaiveDate>,
    /// Free-text annotation.
    pub note: Option<String>,
    /// Settle immediately: "refund" or "offset".
    pub settlement: Option<String>,
}

/// Request body for settling a return.
#[derive(Debug, Deserialize)]
pub struct SettleRequest {
    /// Settlement method: "refund" or "offset".
    pub method: String,
}

/// Response for a journal entry.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    /// Entry ID.
    pub id: Uuid,
    /// Counterparty account ID.
    pub account_id: Uuid,
    /// Entry kind.
    pub kind: &'static str,
    /// Posting direction.
    pub direction: &'static str,
    /// Amount.
    pub amount: String,
    /// Currency code.
    pub currency: String,
    /// Exchange rate.
    pub fx_rate: String,
    /// Commercial date.
    pub entry_date: String,
    /// Correlation id.
    pub sale_no: Option<String>,
    /// Back-reference to the reversed/settled entry.
    pub ref_entry_id: Option<Uuid>,
    /// Lifecycle status.
    pub status: &'static str,
    /// Soft-delete flag.
    pub is_deleted: bool,
    /// Settlement method, on settlement payments.
    pub settlement: Option<&'static str>,
    /// Annotation.
    pub note: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
}

/// Response for a line item.
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    /// Item ID.
    pub id: Uuid,
    /// Product ID.
    pub product_id: Uuid,
    /// Quantity.
    pub quantity: String,
    /// Unit price.
    pub unit_price: String,
}

pub(crate) fn entry_response(entry: journal_entries::Model) -> EntryResponse {
    EntryResponse {
        id: entry.id,
        account_id: entry.account_id,
        kind: kind_to_string(entry.kind.into()),
        direction: direction_to_string(entry.direction.into()),
        amount: entry.amount.to_string(),
        currency: entry.currency,
        fx_rate: entry.fx_rate.to_string(),
        entry_date: entry.entry_date.to_string(),
        sale_no: entry.sale_no,
        ref_entry_id: entry.ref_entry_id,
        status: status_to_string(entry.status.into()),
        is_deleted: entry.is_deleted,
        settlement: entry
            .settlement
            .map(|s| settlement_to_string(s.into())),
        note: entry.note,
        created_at: entry.created_at.to_rfc3339(),
    }
}

fn item_response(item: defter_db::entities::entry_items::Model) -> ItemResponse {
    ItemResponse {
        id: item.id,
        product_id: item.product_id,
        quantity: item.quantity.to_string(),
        unit_price: item.unit_price.to_string(),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/entries` - Post a sale, purchase, or payment.
async fn create_entry(
    State(state): State<AppState>,
    AuthScope(scope): AuthScope,
    Json(payload): Json<CreateEntryRequest>,
) -> impl IntoResponse {
    let Some(kind) = string_to_entry_kind(&payload.kind) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_kind",
                "message": "Unknown entry kind"
            })),
        )
            .into_response();
    };

    // Parse the amount aliases, then normalize to the single amount field.
    let amount = match parse_amount_aliases(&payload) {
        Ok(amount) => amount,
        Err(response) => return response,
    };

    let Ok(fx_rate) = payload
        .fx_rate
        .as_deref()
        .map_or(Ok(Decimal::ONE), Decimal::from_str)
    else {
        return invalid_amount_response("Invalid fx_rate format");
    };

    let items = match parse_items(&payload.items) {
        Ok(items) => items,
        Err(response) => return response,
    };

    let paid_amount = match payload.paid_amount.as_deref().map(Decimal::from_str) {
        None => None,
        Some(Ok(paid)) => Some(paid),
        Some(Err(_)) => return invalid_amount_response("Invalid paid_amount format"),
    };

    let input = PostEntryInput {
        account_id: payload.account_id,
        kind,
        amount,
        currency: payload.currency.unwrap_or_else(|| "TRY".to_string()),
        fx_rate,
        entry_date: payload.entry_date,
        sale_no: payload.sale_no,
        note: payload.note,
        items,
        paid_amount,
    };

    let repo = JournalRepository::new((*state.db).clone());

    match repo.post_entry(scope, input).await {
        Ok(posted) => {
            info!(
                scope = %scope,
                entry_id = %posted.entry.id,
                kind = %payload.kind,
                "Entry posted"
            );

            let items: Vec<ItemResponse> = posted.items.into_iter().map(item_response).collect();
            (
                StatusCode::CREATED,
                Json(json!({
                    "entry": entry_response(posted.entry),
                    "items": items,
                    "payment": posted.payment.map(entry_response)
                })),
            )
                .into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/entries` - List entries with filters.
async fn list_entries(
    State(state): State<AppState>,
    AuthScope(scope): AuthScope,
    Query(query): Query<ListEntriesQuery>,
) -> impl IntoResponse {
    let filter = EntryFilter {
        account_id: query.account_id,
        sale_no: query.sale_no,
        kind: query.kind.as_deref().and_then(string_to_entry_kind),
        status: query.status.as_deref().and_then(string_to_status),
        date_from: query.from,
        date_to: query.to,
    };

    let repo = JournalRepository::new((*state.db).clone());

    match repo.list_entries(scope, filter).await {
        Ok(entries) => {
            let items: Vec<EntryResponse> = entries.into_iter().map(entry_response).collect();
            (StatusCode::OK, Json(json!({ "entries": items }))).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/entries/{entry_id}` - Get an entry with its line items.
async fn get_entry(
    State(state): State<AppState>,
    AuthScope(scope): AuthScope,
    Path(entry_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = JournalRepository::new((*state.db).clone());

    match repo.get_entry(scope, entry_id).await {
        Ok(result) => {
            let items: Vec<ItemResponse> = result.items.into_iter().map(item_response).collect();
            (
                StatusCode::OK,
                Json(json!({
                    "entry": entry_response(result.entry),
                    "items": items
                })),
            )
                .into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// POST `/entries/{entry_id}/cancel` - Cancel a forward entry.
async fn cancel_entry(
    State(state): State<AppState>,
    AuthScope(scope): AuthScope,
    Path(entry_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = JournalRepository::new((*state.db).clone());

    match repo.cancel_entry(scope, entry_id).await {
        Ok(reversal) => {
            info!(
                scope = %scope,
                entry_id = %entry_id,
                reversal_id = %reversal.id,
                "Entry cancelled"
            );
            (StatusCode::CREATED, Json(entry_response(reversal))).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// POST `/entries/{entry_id}/revert` - Revert a cancel ("geri al").
async fn revert_entry(
    State(state): State<AppState>,
    AuthScope(scope): AuthScope,
    Path(entry_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = JournalRepository::new((*state.db).clone());

    match repo.revert_cancel(scope, entry_id).await {
        Ok(restored) => {
            info!(
                scope = %scope,
                cancel_entry_id = %entry_id,
                restored_id = %restored.id,
                "Cancel reverted"
            );
            (StatusCode::OK, Json(entry_response(restored))).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// POST `/entries/{entry_id}/return` - Post a sale return.
async fn return_entry(
    State(state): State<AppState>,
    AuthScope(scope): AuthScope,
    Path(entry_id): Path<Uuid>,
    Json(payload): Json<ReturnRequest>,
) -> impl IntoResponse {
    let Ok(amount) = Decimal::from_str(&payload.amount) else {
        return invalid_amount_response("Invalid amount format");
    };

    let items = match parse_items(&payload.items) {
        Ok(items) => items,
        Err(response) => return response,
    };

    let settlement = match payload.settlement.as_deref().map(string_to_settlement) {
        None => None,
        Some(Some(method)) => Some(method),
        Some(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_settlement",
                    "message": "Settlement must be 'refund' or 'offset'"
                })),
            )
                .into_response();
        }
    };

    let input = ReturnInput {
        amount,
        items,
        entry_date: payload.entry_date,
        note: payload.note,
        settlement,
    };

    let repo = JournalRepository::new((*state.db).clone());

    match repo.return_sale(scope, entry_id, input).await {
        Ok(outcome) => {
            info!(
                scope = %scope,
                sale_entry_id = %entry_id,
                return_id = %outcome.entry.id,
                "Sale return posted"
            );

            let items: Vec<ItemResponse> = outcome.items.into_iter().map(item_response).collect();
            (
                StatusCode::CREATED,
                Json(json!({
                    "entry": entry_response(outcome.entry),
                    "items": items,
                    "settlement": outcome.settlement.map(entry_response)
                })),
            )
                .into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// POST `/entries/{entry_id}/settle` - Settle a sale return.
async fn settle_entry(
    State(state): State<AppState>,
    AuthScope(scope): AuthScope,
    Path(entry_id): Path<Uuid>,
    Json(payload): Json<SettleRequest>,
) -> impl IntoResponse {
    let Some(method) = string_to_settlement(&payload.method) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_settlement",
                "message": "Settlement must be 'refund' or 'offset'"
            })),
        )
            .into_response();
    };

    let repo = JournalRepository::new((*state.db).clone());

    match repo.settle_return(scope, entry_id, method).await {
        Ok(settlement) => {
            info!(
                scope = %scope,
                return_entry_id = %entry_id,
                settlement_id = %settlement.id,
                "Return settled"
            );
            (StatusCode::CREATED, Json(entry_response(settlement))).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn invalid_amount_response(message: &str) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "invalid_amount",
            "message": message
        })),
    )
        .into_response()
}

/// Parses the amount aliases off the wire and normalizes to one amount.
fn parse_amount_aliases(
    payload: &CreateEntryRequest,
) -> Result<Decimal, axum::response::Response> {
    let parse = |field: Option<&str>| -> Result<Option<Decimal>, axum::response::Response> {
        match field.map(Decimal::from_str) {
            None => Ok(None),
            Some(Ok(value)) => Ok(Some(value)),
            Some(Err(_)) => Err(invalid_amount_response("Invalid amount format")),
        }
    };

    let amount = parse(payload.amount.as_deref())?;
    let total = parse(payload.total.as_deref())?;
    let total_try = parse(payload.total_try.as_deref())?;

    normalize_amount(amount, total, total_try).map_err(|e| ledger_error_response(&e))
}

fn parse_items(items: &[ItemRequest]) -> Result<Vec<LineItem>, axum::response::Response> {
    let mut result = Vec::with_capacity(items.len());
    for item in items {
        let (Ok(quantity), Ok(unit_price)) = (
            Decimal::from_str(&item.quantity),
            Decimal::from_str(&item.unit_price),
        ) else {
            return Err(invalid_amount_response("Invalid item quantity or price"));
        };
        result.push(LineItem {
            product_id: item.product_id,
            quantity,
            unit_price,
        });
    }
    Ok(result)
}

pub(crate) fn kind_to_string(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Sale => "sale",
        EntryKind::SaleReturn => "sale_return",
        EntryKind::SaleCancel => "sale_cancel",
        EntryKind::Purchase => "purchase",
        EntryKind::PurchaseCancel => "purchase_cancel",
        EntryKind::Payment => "payment",
        EntryKind::PaymentCancel => "payment_cancel",
    }
}

fn string_to_entry_kind(s: &str) -> Option<EntryKind> {
    match s.to_lowercase().as_str() {
        "sale" => Some(EntryKind::Sale),
        "sale_return" => Some(EntryKind::SaleReturn),
        "sale_cancel" => Some(EntryKind::SaleCancel),
        "purchase" => Some(EntryKind::Purchase),
        "purchase_cancel" => Some(EntryKind::PurchaseCancel),
        "payment" => Some(EntryKind::Payment),
        "payment_cancel" => Some(EntryKind::PaymentCancel),
        _ => None,
    }
}

pub(crate) fn direction_to_string(direction: Direction) -> &'static str {
    match direction {
        Direction::Borc => "borc",
        Direction::Alacak => "alacak",
    }
}

fn status_to_string(status: EntryStatus) -> &'static str {
    match status {
        EntryStatus::Active => "active",
        EntryStatus::Cancelled => "cancelled",
        EntryStatus::Reversed => "reversed",
    }
}

fn string_to_status(s: &str) -> Option<EntryStatus> {
    match s.to_lowercase().as_str() {
        "active" => Some(EntryStatus::Active),
        "cancelled" => Some(EntryStatus::Cancelled),
        "reversed" => Some(EntryStatus::Reversed),
        _ => None,
    }
}

fn settlement_to_string(method: SettlementKind) -> &'static str {
    match method {
        SettlementKind::Refund => "refund",
        SettlementKind::Offset => "offset",
    }
}

fn string_to_settlement(s: &str) -> Option<SettlementKind> {
    match s.to_lowercase().as_str() {
        "refund" => Some(SettlementKind::Refund),
        "offset" | "mahsup" => Some(SettlementKind::Offset),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("sale")]
    #[case("sale_return")]
    #[case("sale_cancel")]
    #[case("purchase")]
    #[case("purchase_cancel")]
    #[case("payment")]
    #[case("payment_cancel")]
    fn test_kind_roundtrip(#[case] s: &str) {
        let kind = string_to_entry_kind(s).unwrap();
        assert_eq!(kind_to_string(kind), s);
    }

    #[test]
    fn test_unknown_kind() {
        assert_eq!(string_to_entry_kind("transfer"), None);
    }

    #[test]
    fn test_settlement_accepts_mahsup_alias() {
        assert_eq!(string_to_settlement("mahsup"), Some(SettlementKind::Offset));
        assert_eq!(string_to_settlement("offset"), Some(SettlementKind::Offset));
        assert_eq!(string_to_settlement("refund"), Some(SettlementKind::Refund));
        assert_eq!(string_to_settlement("cash"), None);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(string_to_status("active"), Some(EntryStatus::Active));
        assert_eq!(string_to_status("CANCELLED"), Some(EntryStatus::Cancelled));
        assert_eq!(string_to_status("deleted"), None);
    }
}
