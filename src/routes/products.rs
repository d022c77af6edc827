use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{Product, ProductQuery},
    queries::product_queries,
};

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = product_queries::list_products(&state.db, params).await?;

    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>> {
    let product = product_queries::find_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("Produto não encontrado".to_string()))?;

    Ok(Json(product))
}
