//! Product catalog, stock adjustment and stock history endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use inventory::{
    ChangeType, CreateProduct, InventoryError, InventoryQueries, Product, ProductId,
    ProductRepository, StockChange, StockService, UpdateProduct,
};
use inventory_store::InventoryStore;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ApiError;
use crate::routes::metrics::record_adjustment;

/// Shared application state accessible from all handlers.
pub struct AppState<S: InventoryStore> {
    pub products: ProductRepository<S>,
    pub stock: StockService<S>,
    pub queries: InventoryQueries<S>,
}

// -- Request types --

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub stock_quantity: Option<i64>,
    pub low_stock_threshold: Option<i64>,
}

/// Body of `PUT /api/products/{id}`.
///
/// Absent fields are left alone. An explicit `null` clears `description` or
/// `low_stock_threshold`.
#[derive(Deserialize, Default)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub stock_quantity: Option<i64>,
    #[serde(default, deserialize_with = "present")]
    pub low_stock_threshold: Option<Option<i64>>,
}

#[derive(Deserialize)]
pub struct StockAdjustmentRequest {
    pub quantity: Option<i64>,
}

/// Distinguishes a field sent as `null` from a missing one.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// -- Response types --

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub stock_quantity: i64,
    pub low_stock_threshold: Option<i64>,
    pub is_low_stock: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.as_i64(),
            is_low_stock: product.is_low_stock(),
            name: product.name,
            description: product.description,
            stock_quantity: product.stock_quantity,
            low_stock_threshold: product.low_stock_threshold,
            created_at: product.created_at.to_rfc3339(),
            updated_at: product.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct StockChangeResponse {
    pub id: i64,
    pub product_id: i64,
    pub change_type: String,
    pub quantity: i64,
    pub created_at: String,
}

impl From<StockChange> for StockChangeResponse {
    fn from(change: StockChange) -> Self {
        Self {
            id: change.id.as_i64(),
            product_id: change.product_id.as_i64(),
            change_type: change.change_type.to_string(),
            quantity: change.quantity,
            created_at: change.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// -- Handlers --

/// GET /api/products — list every product.
#[tracing::instrument(skip(state))]
pub async fn list<S: InventoryStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.products.list_all().await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

/// GET /api/products/:id — load one product.
#[tracing::instrument(skip(state))]
pub async fn get<S: InventoryStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product_id = parse_product_id(&id)?;
    let product = state
        .products
        .get(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(product.into()))
}

/// POST /api/products — create a product.
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: InventoryStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let Json(req) = payload?;

    let cmd = CreateProduct {
        name: req.name,
        description: req.description,
        stock_quantity: req.stock_quantity,
        low_stock_threshold: req.low_stock_threshold,
    };
    let product = state.products.create(cmd).await?;
    tracing::info!(product_id = %product.id, "product created");

    Ok((StatusCode::CREATED, Json(product.into())))
}

/// PUT /api/products/:id — replace the supplied fields of a product.
#[tracing::instrument(skip(state, payload))]
pub async fn update<S: InventoryStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product_id = parse_product_id(&id)?;
    let Json(req) = payload?;

    let cmd = UpdateProduct {
        name: req.name,
        description: req.description,
        stock_quantity: req.stock_quantity,
        low_stock_threshold: req.low_stock_threshold,
    };
    let product = state.products.update(product_id, cmd).await?;

    Ok(Json(product.into()))
}

/// DELETE /api/products/:id — delete a product.
#[tracing::instrument(skip(state))]
pub async fn delete<S: InventoryStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let product_id = parse_product_id(&id)?;
    state.products.delete(product_id).await?;
    tracing::info!(%product_id, "product deleted");

    Ok(Json(MessageResponse {
        message: "product deleted successfully".to_string(),
    }))
}

/// POST /api/products/:id/increase — add stock.
#[tracing::instrument(skip(state, payload))]
pub async fn increase<S: InventoryStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<StockAdjustmentRequest>, JsonRejection>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product_id = parse_product_id(&id)?;

    let result = match parse_quantity(payload) {
        Ok(quantity) => state.stock.increase(product_id, quantity).await,
        Err(err) => Err(err),
    };
    record_adjustment(ChangeType::Increase, &result);

    Ok(Json(result?.into()))
}

/// POST /api/products/:id/decrease — remove stock.
#[tracing::instrument(skip(state, payload))]
pub async fn decrease<S: InventoryStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<StockAdjustmentRequest>, JsonRejection>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product_id = parse_product_id(&id)?;

    let result = match parse_quantity(payload) {
        Ok(quantity) => state.stock.decrease(product_id, quantity).await,
        Err(err) => Err(err),
    };
    record_adjustment(ChangeType::Decrease, &result);
    if let Err(InventoryError::InsufficientStock {
        requested,
        available,
        ..
    }) = &result
    {
        tracing::warn!(%product_id, requested, available, "decrease rejected");
    }

    Ok(Json(result?.into()))
}

/// GET /api/products/low-stock — products at or below their threshold.
#[tracing::instrument(skip(state))]
pub async fn low_stock<S: InventoryStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.queries.low_stock().await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

/// GET /api/products/:id/history — stock ledger for a product, newest first.
#[tracing::instrument(skip(state))]
pub async fn history<S: InventoryStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<StockChangeResponse>>, ApiError> {
    let product_id = parse_product_id(&id)?;
    let changes = state.queries.history(product_id).await?;
    Ok(Json(
        changes.into_iter().map(StockChangeResponse::from).collect(),
    ))
}

fn parse_product_id(id: &str) -> Result<ProductId, ApiError> {
    id.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))
}

/// A missing body or quantity is reported the same way as a non-positive one.
fn parse_quantity(
    payload: Result<Json<StockAdjustmentRequest>, JsonRejection>,
) -> Result<i64, InventoryError> {
    const MESSAGE: &str = "quantity must be a positive integer";

    match payload {
        Ok(Json(StockAdjustmentRequest {
            quantity: Some(quantity),
        })) => Ok(quantity),
        Ok(_) | Err(JsonRejection::MissingJsonContentType(_)) => {
            Err(InventoryError::InvalidArgument(MESSAGE.to_string()))
        }
        Err(rejection) => Err(InventoryError::InvalidArgument(format!(
            "{MESSAGE}: {}",
            rejection.body_text()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_distinguishes_null_from_absent() {
        let req: UpdateProductRequest =
            serde_json::from_str(r#"{"description": null, "stock_quantity": 4}"#).unwrap();
        assert_eq!(req.description, Some(None));
        assert_eq!(req.low_stock_threshold, None);
        assert_eq!(req.stock_quantity, Some(4));

        let req: UpdateProductRequest =
            serde_json::from_str(r#"{"low_stock_threshold": 3}"#).unwrap();
        assert_eq!(req.low_stock_threshold, Some(Some(3)));
        assert_eq!(req.description, None);
    }

    #[test]
    fn missing_quantity_is_an_invalid_argument() {
        let err = parse_quantity(Ok(Json(StockAdjustmentRequest { quantity: None }))).unwrap_err();
        assert!(matches!(err, InventoryError::InvalidArgument(_)));
        assert!(err.to_string().contains("must be"));

        assert_eq!(
            parse_quantity(Ok(Json(StockAdjustmentRequest { quantity: Some(3) }))).unwrap(),
            3
        );
    }

    #[test]
    fn product_ids_must_be_numeric() {
        assert!(parse_product_id("12").is_ok());
        assert!(matches!(
            parse_product_id("abc"),
            Err(ApiError::BadRequest(_))
        ));
    }
}
