//! Client order route handlers.
//!
//! A diner sees only their own orders. The live endpoint streams the
//! full result set on every change; the plain listing is the one-shot
//! alternative for clients that cannot hold a stream open.

use std::convert::Infallible;

use axum::response::sse::{Event, KeepAlive};
use axum::{
    Json,
    extract::{Path, State},
    response::Sse,
};
use futures::StreamExt;

use comanda_core::OrderId;

use crate::aggregate::{self, OrderView};
use crate::db::{OrderQuery, OrderRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::state::AppState;
use crate::sync;

/// GET /orders
///
/// One-shot snapshot of the diner's active orders, oldest first.
pub async fn index(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<OrderView>>> {
    let orders = sync::fetch(state.pool(), &OrderQuery::for_user(user.id)).await?;
    Ok(Json(aggregate::client_orders(&orders)))
}

/// GET /orders/live
///
/// SSE stream of the diner's active orders. Each event carries the
/// complete current result set, so every event is a full replacement of
/// the previous one.
pub async fn live(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Sse<impl futures::Stream<Item = std::result::Result<Event, Infallible>>> {
    let stream = state
        .feed()
        .subscribe(state.pool().clone(), OrderQuery::for_user(user.id));

    let sse_stream = stream.map(|orders| {
        let views = aggregate::client_orders(&orders);
        let json = serde_json::to_string(&views)
            .unwrap_or_else(|_| r#"{"error":"failed to serialize snapshot"}"#.to_string());
        Ok(Event::default().data(json))
    });

    Sse::new(sse_stream).keep_alive(KeepAlive::default())
}

/// GET /orders/{id}
///
/// Detail view with the six-step progress strip. Diners can only read
/// their own orders.
pub async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderView>> {
    let order = OrderRepository::new(state.pool())
        .get(id)
        .await?
        .filter(|order| order.user_id == user.id)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    Ok(Json(OrderView::from_order(&order, None)))
}
