//! Cashier route handlers.
//!
//! The register screen streams every active order and lets the cashier
//! filter by status and flip the sort direction. Settling an order
//! records a receipt; archiving moves a paid order into history.

use std::collections::HashSet;
use std::convert::Infallible;
use std::str::FromStr;

use askama::Template;
use axum::response::sse::{Event, KeepAlive};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response, Sse},
};
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use comanda_core::{LineItem, OrderId, OrderStatus, ReceiptId};

use crate::aggregate::{self, OrderView, StatusFilter};
use crate::db::receipts::{Receipt, ReceiptRepository};
use crate::db::{ArchiveOutcome, OrderQuery, OrderRepository, SortDirection, UserRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireCashier;
use crate::services::OrderService;
use crate::state::AppState;

/// Query parameters for the register listing.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterQuery {
    /// Status label to filter on; absent or "all" shows everything.
    pub status: Option<String>,
    /// "asc" (default) or "desc".
    pub sort: Option<String>,
}

impl RegisterQuery {
    fn filter(&self) -> Result<StatusFilter> {
        match self.status.as_deref() {
            None => Ok(StatusFilter::All),
            Some(raw) if raw.eq_ignore_ascii_case("all") => Ok(StatusFilter::All),
            Some(raw) => OrderStatus::from_str(raw)
                .map(StatusFilter::Only)
                .map_err(|e| AppError::BadRequest(e.to_string())),
        }
    }

    fn direction(&self) -> Result<SortDirection> {
        match self.sort.as_deref() {
            None | Some("asc") => Ok(SortDirection::Ascending),
            Some("desc") => Ok(SortDirection::Descending),
            Some(other) => Err(AppError::BadRequest(format!(
                "unknown sort direction: {other}"
            ))),
        }
    }
}

/// Response for a settled order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleResponse {
    pub order: OrderView,
    pub receipt: Receipt,
}

/// Response for an archive request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveResponse {
    pub outcome: &'static str,
}

/// GET /cashier/orders
///
/// One-shot register snapshot with filter and sort applied.
pub async fn index(
    State(state): State<AppState>,
    RequireCashier(_cashier): RequireCashier,
    Query(query): Query<RegisterQuery>,
) -> Result<Json<Vec<OrderView>>> {
    let filter = query.filter()?;
    let direction = query.direction()?;

    let orders = crate::sync::fetch(state.pool(), &OrderQuery::all()).await?;
    let names = resolve_names(&state, &orders).await?;

    Ok(Json(aggregate::cashier_orders(
        &orders, filter, direction, &names,
    )))
}

/// GET /cashier/orders/live
///
/// SSE stream of the register view. Filter and sort are fixed at
/// subscription time; every event replaces the previous snapshot.
pub async fn live(
    State(state): State<AppState>,
    RequireCashier(_cashier): RequireCashier,
    Query(query): Query<RegisterQuery>,
) -> Result<Sse<impl futures::Stream<Item = std::result::Result<Event, Infallible>>>> {
    let filter = query.filter()?;
    let direction = query.direction()?;

    let pool = state.pool().clone();
    let stream = state.feed().subscribe(pool.clone(), OrderQuery::all());

    let sse_stream = stream.then(move |orders| {
        let pool = pool.clone();
        async move {
            let user_ids: Vec<_> = orders
                .iter()
                .map(|order| order.user_id)
                .collect::<HashSet<_>>()
                .into_iter()
                .collect();
            // Name lookup failure degrades to the fallback label rather
            // than dropping the snapshot.
            let names = UserRepository::new(&pool)
                .display_names(&user_ids)
                .await
                .unwrap_or_default();

            let views = aggregate::cashier_orders(&orders, filter, direction, &names);
            let json = serde_json::to_string(&views)
                .unwrap_or_else(|_| r#"{"error":"failed to serialize snapshot"}"#.to_string());
            Ok(Event::default().data(json))
        }
    });

    Ok(Sse::new(sse_stream).keep_alive(KeepAlive::default()))
}

/// POST /cashier/orders/{id}/settle
///
/// Confirms payment for an order at "Listo para pagar": advances it to
/// "Pagado" and records the receipt. The order stays on the register
/// until archived.
pub async fn settle(
    State(state): State<AppState>,
    RequireCashier(_cashier): RequireCashier,
    Path(id): Path<OrderId>,
) -> Result<Json<SettleResponse>> {
    let (order, receipt) = OrderService::new(state.pool(), state.feed())
        .settle(id)
        .await?;

    Ok(Json(SettleResponse {
        order: OrderView::from_order(&order, Some(receipt.customer_name.clone())),
        receipt,
    }))
}

/// POST /cashier/orders/{id}/archive
///
/// Moves a paid order into history. Repeats and races resolve to a
/// no-op, never a duplicate history row.
pub async fn archive(
    State(state): State<AppState>,
    RequireCashier(_cashier): RequireCashier,
    Path(id): Path<OrderId>,
) -> Result<Response> {
    let outcome = OrderService::new(state.pool(), state.feed())
        .archive(id)
        .await?;

    let (status, outcome) = match outcome {
        ArchiveOutcome::Archived => (StatusCode::OK, "archived"),
        ArchiveOutcome::AlreadyArchived => (StatusCode::OK, "alreadyArchived"),
        ArchiveOutcome::NotFound => (StatusCode::NOT_FOUND, "notFound"),
        ArchiveOutcome::NotPaid(_) => (StatusCode::CONFLICT, "notPaid"),
    };

    Ok((status, Json(ArchiveResponse { outcome })).into_response())
}

/// GET /cashier/history
///
/// Archived orders, newest first.
pub async fn history(
    State(state): State<AppState>,
    RequireCashier(_cashier): RequireCashier,
) -> Result<Json<Vec<OrderView>>> {
    let orders = OrderRepository::new(state.pool()).list_archived().await?;
    let names = resolve_names(&state, &orders).await?;
    Ok(Json(aggregate::kitchen_orders(&orders, &names)))
}

/// Printable receipt document.
#[derive(Template)]
#[template(path = "receipt.html")]
struct ReceiptTemplate<'a> {
    receipt_id: String,
    customer_name: &'a str,
    issued_at: String,
    items: &'a [LineItem],
    subtotal: rust_decimal::Decimal,
    tax: rust_decimal::Decimal,
    total: rust_decimal::Decimal,
}

/// GET /cashier/receipts/{id}
///
/// Renders the receipt as a standalone HTML document served as a
/// download, matching the printed slip handed to the customer.
pub async fn receipt(
    State(state): State<AppState>,
    RequireCashier(_cashier): RequireCashier,
    Path(id): Path<ReceiptId>,
) -> Result<Response> {
    let receipt = ReceiptRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("receipt {id}")))?;

    let template = ReceiptTemplate {
        receipt_id: receipt.id.to_string(),
        customer_name: &receipt.customer_name,
        issued_at: receipt.created_at.format("%Y-%m-%d %H:%M").to_string(),
        items: &receipt.items,
        subtotal: receipt.subtotal,
        tax: receipt.tax,
        total: receipt.total,
    };
    let html = template
        .render()
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let disposition = format!("attachment; filename=\"recibo-{}.html\"", receipt.id);
    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        html,
    )
        .into_response())
}

async fn resolve_names(
    state: &AppState,
    orders: &[comanda_core::Order],
) -> Result<std::collections::HashMap<comanda_core::UserId, String>> {
    let user_ids: Vec<_> = orders
        .iter()
        .map(|order| order.user_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    Ok(UserRepository::new(state.pool())
        .display_names(&user_ids)
        .await?)
}
