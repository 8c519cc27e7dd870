//! Cart route handlers.
//!
//! The cart lives in the session as (product id, quantity) pairs and is
//! resolved against the catalog on read and at checkout, so prices are
//! snapshotted into the order at the moment it is placed. Checkout
//! clears the cart; an abandoned cart simply expires with its session.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use comanda_core::{LineItem, Order, OrderTotals, ProductId, TableId, compute_totals};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::session_keys;
use crate::services::OrderService;
use crate::state::AppState;

/// One cart entry as stored in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Request body for adding to the cart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Request body for changing a line's quantity.
#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: u32,
}

/// Cart resolved against the current catalog.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<LineItem>,
    pub totals: OrderTotals,
}

/// GET /cart
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireUser(_user): RequireUser,
) -> Result<Json<CartView>> {
    let entries = read_cart(&session).await?;
    let items = resolve_items(&state, &entries).await?;
    let totals = compute_totals(&items);
    Ok(Json(CartView { items, totals }))
}

/// POST /cart/items
pub async fn add_item(
    State(state): State<AppState>,
    session: Session,
    RequireUser(_user): RequireUser,
    Json(body): Json<AddItemRequest>,
) -> Result<Response> {
    if body.quantity == 0 {
        return Err(AppError::BadRequest("quantity must be at least 1".into()));
    }

    // Reject ids that are not on the menu before they reach the cart.
    ProductRepository::new(state.pool())
        .get(body.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", body.product_id)))?;

    let mut entries = read_cart(&session).await?;
    if let Some(entry) = entries
        .iter_mut()
        .find(|entry| entry.product_id == body.product_id)
    {
        entry.quantity = entry.quantity.saturating_add(body.quantity);
    } else {
        entries.push(CartEntry {
            product_id: body.product_id,
            quantity: body.quantity,
        });
    }
    write_cart(&session, &entries).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// PUT /cart/items/{product_id}
///
/// Setting quantity to zero removes the line.
pub async fn set_quantity(
    session: Session,
    RequireUser(_user): RequireUser,
    Path(product_id): Path<ProductId>,
    Json(body): Json<SetQuantityRequest>,
) -> Result<StatusCode> {
    let mut entries = read_cart(&session).await?;
    if body.quantity == 0 {
        entries.retain(|entry| entry.product_id != product_id);
    } else {
        let entry = entries
            .iter_mut()
            .find(|entry| entry.product_id == product_id)
            .ok_or_else(|| AppError::NotFound(format!("cart line {product_id}")))?;
        entry.quantity = body.quantity;
    }
    write_cart(&session, &entries).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /cart/items/{product_id}
pub async fn remove_item(
    session: Session,
    RequireUser(_user): RequireUser,
    Path(product_id): Path<ProductId>,
) -> Result<StatusCode> {
    let mut entries = read_cart(&session).await?;
    entries.retain(|entry| entry.product_id != product_id);
    write_cart(&session, &entries).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /cart
pub async fn clear(session: Session, RequireUser(_user): RequireUser) -> Result<StatusCode> {
    write_cart(&session, &[]).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /cart/checkout
///
/// Places the order from the session cart and the session table, then
/// clears the cart. The response is the placed order at `Pedido`.
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
) -> Result<Response> {
    let entries = read_cart(&session).await?;
    if entries.is_empty() {
        return Err(AppError::BadRequest("cart is empty".into()));
    }

    let items = resolve_items(&state, &entries).await?;
    let table = session
        .get::<TableId>(session_keys::TABLE_ID)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .unwrap_or_else(TableId::unassigned);

    let order: Order = OrderService::new(state.pool(), state.feed())
        .place(user.id, table, items)
        .await?;

    write_cart(&session, &[]).await?;

    Ok((StatusCode::CREATED, Json(order)).into_response())
}

async fn read_cart(session: &Session) -> Result<Vec<CartEntry>> {
    session
        .get::<Vec<CartEntry>>(session_keys::CART)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))
        .map(Option::unwrap_or_default)
}

async fn write_cart(session: &Session, entries: &[CartEntry]) -> Result<()> {
    session
        .insert(session_keys::CART, entries)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Resolve cart entries against the catalog into priced line items.
///
/// A product deleted since it was added to the cart fails the whole
/// resolution; the diner has to remove the stale line.
async fn resolve_items(state: &AppState, entries: &[CartEntry]) -> Result<Vec<LineItem>> {
    let repo = ProductRepository::new(state.pool());
    let catalog: HashMap<ProductId, _> = repo
        .list()
        .await?
        .into_iter()
        .map(|product| (product.id, product))
        .collect();

    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        let product = catalog.get(&entry.product_id).ok_or_else(|| {
            AppError::BadRequest(format!(
                "product {} is no longer on the menu",
                entry.product_id
            ))
        })?;
        let item = LineItem::new(
            product.id,
            product.name.clone(),
            product.price,
            entry.quantity,
            product.image_url.clone(),
        )
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
        items.push(item);
    }
    Ok(items)
}
