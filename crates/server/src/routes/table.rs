//! Table selection route handlers.
//!
//! A diner scans a QR code at their table; the decoded table id lands in
//! the session and is stamped onto any order they place. A blank or
//! missing id collapses to the "unassigned" sentinel so takeaway flows
//! keep working.

use axum::{Json, extract::Query, http::StatusCode, response::Redirect};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use comanda_core::TableId;

use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::session_keys;

/// Request body for selecting a table.
#[derive(Debug, Deserialize)]
pub struct SelectTableRequest {
    pub table: String,
}

/// Current table response.
#[derive(Debug, Serialize)]
pub struct TableResponse {
    pub table: TableId,
}

/// Query parameters for the QR landing redirect.
#[derive(Debug, Deserialize)]
pub struct ScanQuery {
    #[serde(default)]
    pub table: String,
}

/// GET /table/scan?table=...
///
/// QR landing endpoint: stores the table and redirects to the menu. No
/// login required; the table survives in the session through login.
pub async fn scan(session: Session, Query(query): Query<ScanQuery>) -> Result<Redirect> {
    store_table(&session, &query.table).await?;
    Ok(Redirect::to("/menu"))
}

/// POST /table
pub async fn select(
    session: Session,
    RequireUser(_user): RequireUser,
    Json(body): Json<SelectTableRequest>,
) -> Result<Json<TableResponse>> {
    let table = store_table(&session, &body.table).await?;
    Ok(Json(TableResponse { table }))
}

/// GET /table
pub async fn current(session: Session, RequireUser(_user): RequireUser) -> Result<Json<TableResponse>> {
    let table = session
        .get::<TableId>(session_keys::TABLE_ID)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .unwrap_or_else(TableId::unassigned);
    Ok(Json(TableResponse { table }))
}

/// DELETE /table
pub async fn clear(session: Session, RequireUser(_user): RequireUser) -> Result<StatusCode> {
    session
        .remove::<TableId>(session_keys::TABLE_ID)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn store_table(session: &Session, raw: &str) -> Result<TableId> {
    let table = TableId::new(raw);
    session
        .insert(session_keys::TABLE_ID, &table)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    tracing::debug!(table = %table, "table stored in session");
    Ok(table)
}
