//! Product catalog routes with the stock movement log.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, middleware::AuthScope, routes::ledger_error_response};
use defter_db::{
    entities::{products, sea_orm_active_enums::StockReason, stock_movements},
    repositories::{CreateProductInput, ProductRepository},
};

/// Creates the product routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(create_product))
        .route("/products", get(list_products))
        .route("/products/{product_id}", get(get_product))
        .route("/products/{product_id}/movements", get(list_movements))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a product.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    /// Display name.
    pub name: String,
    /// Optional SKU code.
    pub sku: Option<String>,
    /// Unit price (default: 0).
    pub unit_price: Option<String>,
    /// Opening on-hand quantity (default: 0).
    pub on_hand: Option<String>,
}

/// Response for a product.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    /// Product ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// SKU code.
    pub sku: Option<String>,
    /// Unit price.
    pub unit_price: String,
    /// On-hand quantity.
    pub on_hand: String,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

/// Response for a stock movement.
#[derive(Debug, Serialize)]
pub struct MovementResponse {
    /// Movement ID.
    pub id: Uuid,
    /// Journal entry that caused the movement, if any.
    pub entry_id: Option<Uuid>,
    /// Signed quantity change.
    pub delta: String,
    /// Reason.
    pub reason: String,
    /// Created at timestamp.
    pub created_at: String,
}

fn product_response(product: products::Model) -> ProductResponse {
    ProductResponse {
        id: product.id,
        name: product.name,
        sku: product.sku,
        unit_price: product.unit_price.to_string(),
        on_hand: product.on_hand.to_string(),
        created_at: product.created_at.to_rfc3339(),
        updated_at: product.updated_at.to_rfc3339(),
    }
}

fn movement_response(movement: stock_movements::Model) -> MovementResponse {
    MovementResponse {
        id: movement.id,
        entry_id: movement.entry_id,
        delta: movement.delta.to_string(),
        reason: reason_to_string(&movement.reason).to_string(),
        created_at: movement.created_at.to_rfc3339(),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/products` - Create a product.
async fn create_product(
    State(state): State<AppState>,
    AuthScope(scope): AuthScope,
    Json(payload): Json<CreateProductRequest>,
) -> impl IntoResponse {
    if payload.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_name",
                "message": "Product name must not be empty"
            })),
        )
            .into_response();
    }

    let parse = |field: Option<&str>| -> Result<Decimal, ()> {
        field.map_or(Ok(Decimal::ZERO), |s| Decimal::from_str(s).map_err(|_| ()))
    };

    let (Ok(unit_price), Ok(on_hand)) = (
        parse(payload.unit_price.as_deref()),
        parse(payload.on_hand.as_deref()),
    ) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_amount",
                "message": "Invalid unit_price or on_hand format"
            })),
        )
            .into_response();
    };

    let repo = ProductRepository::new((*state.db).clone());
    let input = CreateProductInput {
        name: payload.name,
        sku: payload.sku,
        unit_price,
        on_hand,
    };

    match repo.create_product(scope, input).await {
        Ok(product) => {
            info!(scope = %scope, product_id = %product.id, "Product created");
            (StatusCode::CREATED, Json(product_response(product))).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/products` - List products in scope.
async fn list_products(
    State(state): State<AppState>,
    AuthScope(scope): AuthScope,
) -> impl IntoResponse {
    let repo = ProductRepository::new((*state.db).clone());

    match repo.list_products(scope).await {
        Ok(items) => {
            let items: Vec<ProductResponse> = items.into_iter().map(product_response).collect();
            (StatusCode::OK, Json(json!({ "products": items }))).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/products/{product_id}` - Get a product.
async fn get_product(
    State(state): State<AppState>,
    AuthScope(scope): AuthScope,
    Path(product_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ProductRepository::new((*state.db).clone());

    match repo.get_product(scope, product_id).await {
        Ok(product) => (StatusCode::OK, Json(product_response(product))).into_response(),
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/products/{product_id}/movements` - Stock movement log.
async fn list_movements(
    State(state): State<AppState>,
    AuthScope(scope): AuthScope,
    Path(product_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ProductRepository::new((*state.db).clone());

    match repo.list_movements(scope, product_id).await {
        Ok(movements) => {
            let items: Vec<MovementResponse> =
                movements.into_iter().map(movement_response).collect();
            (
                StatusCode::OK,
                Json(json!({ "product_id": product_id, "movements": items })),
            )
                .into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

const fn reason_to_string(reason: &StockReason) -> &'static str {
    match reason {
        StockReason::Sale => "sale",
        StockReason::SaleReturn => "sale_return",
        StockReason::SaleCancel => "sale_cancel",
        StockReason::Purchase => "purchase",
        StockReason::PurchaseCancel => "purchase_cancel",
        StockReason::Revert => "revert",
        StockReason::Adjustment => "adjustment",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_strings() {
        assert_eq!(reason_to_string(&StockReason::Sale), "sale");
        assert_eq!(reason_to_string(&StockReason::Revert), "revert");
        assert_eq!(
            reason_to_string(&StockReason::PurchaseCancel),
            "purchase_cancel"
        );
    }
}
