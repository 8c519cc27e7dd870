//! Catalog management route handlers (cashier role).
//!
//! Create, update, and delete menu products, and attach images via the
//! blob store. Every mutation invalidates the menu cache so diners see
//! the change on their next fetch.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use comanda_core::{Product, ProductId};

use crate::db::{ProductInput, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireCashier;
use crate::state::AppState;

/// Request body for creating or updating a product.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub image_url: Option<String>,
}

impl From<ProductRequest> for ProductInput {
    fn from(body: ProductRequest) -> Self {
        Self {
            name: body.name,
            description: body.description,
            price: body.price,
            category: body.category,
            image_url: body.image_url,
        }
    }
}

/// POST /cashier/products
pub async fn create(
    State(state): State<AppState>,
    RequireCashier(_cashier): RequireCashier,
    Json(body): Json<ProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = ProductRepository::new(state.pool())
        .create(body.into())
        .await?;

    state.menu_cache().invalidate_all();
    tracing::info!(product_id = %product.id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /cashier/products/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireCashier(_cashier): RequireCashier,
    Path(id): Path<ProductId>,
    Json(body): Json<ProductRequest>,
) -> Result<Json<Product>> {
    let repo = ProductRepository::new(state.pool());
    repo.update(id, body.into()).await?;
    let product = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    state.menu_cache().invalidate_all();
    Ok(Json(product))
}

/// DELETE /cashier/products/{id}
///
/// Removes the catalog row and, best effort, the product's blob image.
/// Line items in existing orders are snapshots and keep rendering.
pub async fn delete(
    State(state): State<AppState>,
    RequireCashier(_cashier): RequireCashier,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    let repo = ProductRepository::new(state.pool());
    let image_url = repo.get(id).await?.and_then(|product| product.image_url);
    repo.delete(id).await?;

    if let Some(path) = image_url.as_deref().and_then(|url| state.storage().object_path(url)) {
        if let Err(e) = state.storage().delete(path).await {
            tracing::warn!(product_id = %id, error = %e, "orphaned product image not deleted");
        }
    }

    state.menu_cache().invalidate_all();
    tracing::info!(product_id = %id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /cashier/products/{id}/image
///
/// Accepts a single multipart part named "image", uploads it to the
/// blob store, and stores the public URL on the product.
pub async fn upload_image(
    State(state): State<AppState>,
    RequireCashier(_cashier): RequireCashier,
    Path(id): Path<ProductId>,
    mut multipart: Multipart,
) -> Result<Json<Product>> {
    let repo = ProductRepository::new(state.pool());
    repo.get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let mut uploaded_url = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let extension = extension_for(&content_type)
            .ok_or_else(|| AppError::BadRequest(format!("unsupported image type {content_type}")))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let path = format!("products/{id}.{extension}");
        uploaded_url = Some(
            state
                .storage()
                .upload(&path, bytes.to_vec(), &content_type)
                .await?,
        );
    }

    let url = uploaded_url.ok_or_else(|| AppError::BadRequest("missing image part".into()))?;
    repo.set_image_url(id, &url).await?;
    let product = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    state.menu_cache().invalidate_all();
    tracing::info!(product_id = %id, url = %url, "product image updated");
    Ok(Json(product))
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}
