//! Menu route handlers.
//!
//! The menu is the product catalog filtered client-side style: a search
//! string matches on name, case-insensitively, anywhere in the name.
//! Results are cached per search string with a short TTL; catalog
//! mutations invalidate the whole cache.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use comanda_core::{Product, ProductId};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters for the menu listing.
#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    /// Substring to match against product names.
    pub search: Option<String>,
}

/// GET /menu
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> Result<Json<Vec<Product>>> {
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_lowercase();

    if let Some(hit) = state.menu_cache().get(&needle).await {
        return Ok(Json(hit));
    }

    let mut products = ProductRepository::new(state.pool()).list().await?;
    if !needle.is_empty() {
        products.retain(|p| p.name.to_lowercase().contains(&needle));
    }

    state.menu_cache().insert(needle, products.clone()).await;
    Ok(Json(products))
}

/// GET /menu/{id}
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(Json(product))
}
