//! Kitchen route handlers (chef role).
//!
//! The kitchen board is deliberately a one-shot fetch refreshed by the
//! client, not a stream: the chef pulls the board when they look at it.
//! Status changes made here still fan out to every streaming view.

use std::collections::HashSet;

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use comanda_core::{OrderId, OrderStatus};

use crate::aggregate::{self, OrderView};
use crate::db::{OrderQuery, OrderRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireChef;
use crate::services::OrderService;
use crate::state::AppState;
use crate::sync;

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: OrderStatus,
}

/// GET /kitchen/orders
///
/// Every active order, oldest first, with customer names resolved.
pub async fn index(
    State(state): State<AppState>,
    RequireChef(_chef): RequireChef,
) -> Result<Json<Vec<OrderView>>> {
    let orders = sync::fetch(state.pool(), &OrderQuery::all()).await?;

    let user_ids: Vec<_> = orders
        .iter()
        .map(|order| order.user_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let names = UserRepository::new(state.pool())
        .display_names(&user_ids)
        .await?;

    Ok(Json(aggregate::kitchen_orders(&orders, &names)))
}

/// GET /kitchen/orders/{id}
pub async fn show(
    State(state): State<AppState>,
    RequireChef(_chef): RequireChef,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderView>> {
    let order = OrderRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    let names = UserRepository::new(state.pool())
        .display_names(&[order.user_id])
        .await?;
    let name = names
        .get(&order.user_id)
        .cloned()
        .unwrap_or_else(|| aggregate::UNKNOWN_CUSTOMER.to_string());

    Ok(Json(OrderView::from_order(&order, Some(name))))
}

/// POST /kitchen/orders/{id}/status
///
/// Writes the chosen status. Backward moves are allowed as corrections;
/// re-asserting the current status only refreshes its timestamp.
pub async fn set_status(
    State(state): State<AppState>,
    RequireChef(_chef): RequireChef,
    Path(id): Path<OrderId>,
    Json(body): Json<SetStatusRequest>,
) -> Result<Json<OrderView>> {
    let order = OrderService::new(state.pool(), state.feed())
        .advance(id, body.status)
        .await?;
    Ok(Json(OrderView::from_order(&order, None)))
}
