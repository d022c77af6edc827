use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{AddToCartRequest, CartSummary, CartView, UpdateQuantityRequest},
    queries::{cart_queries, product_queries},
    services::cart_service,
    utils::{extractors::extract_user_id, jwt::Claims},
};

pub async fn get_cart(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<CartSummary>> {
    let user_id = extract_user_id(&claims)?;

    let views = cart_queries::find_cart_views(&state.db, user_id).await?;

    Ok(Json(cart_service::summarize(views)))
}

pub async fn add_item(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<AddToCartRequest>,
) -> Result<Json<CartSummary>> {
    let user_id = extract_user_id(&claims)?;
    let quantity = payload.quantity.unwrap_or(1);

    if quantity <= 0 {
        return Err(AppError::BadRequest(
            "A quantidade deve ser positiva".to_string(),
        ));
    }

    let product = product_queries::find_by_id(&state.db, payload.product_id)
        .await?
        .ok_or(AppError::NotFound("Produto não encontrado".to_string()))?;

    let views = cart_queries::find_cart_views(&state.db, user_id).await?;

    let line = cart_queries::upsert_line(&state.db, user_id, payload.product_id, quantity).await?;

    let mut views = cart_service::merge_on_add(
        views,
        CartView {
            id: line.id,
            quantity,
            product,
        },
    );

    // A concurrent add may have landed between the fetch and the upsert; the
    // row the upsert returned wins.
    if let Some(view) = views
        .iter_mut()
        .find(|view| view.product.id == payload.product_id)
    {
        view.id = line.id;
        view.quantity = line.quantity;
    }

    Ok(Json(cart_service::summarize(views)))
}

pub async fn update_item(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(line_id): Path<i32>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> Result<Json<CartSummary>> {
    let user_id = extract_user_id(&claims)?;

    let views = cart_queries::find_cart_views(&state.db, user_id).await?;

    // Setting a non-positive quantity deletes the line instead of persisting
    // an invalid value.
    let views = if payload.quantity <= 0 {
        cart_queries::delete_line(&state.db, user_id, line_id).await?;
        cart_service::remove_line(views, line_id)
    } else {
        let line = cart_queries::set_quantity(&state.db, user_id, line_id, payload.quantity)
            .await?
            .ok_or_else(|| AppError::NotFound("Item do carrinho não encontrado".to_string()))?;

        cart_service::apply_quantity_change(views, line.id, line.quantity)?
    };

    Ok(Json(cart_service::summarize(views)))
}

pub async fn remove_item(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(line_id): Path<i32>,
) -> Result<Json<CartSummary>> {
    let user_id = extract_user_id(&claims)?;

    let views = cart_queries::find_cart_views(&state.db, user_id).await?;

    cart_queries::delete_line(&state.db, user_id, line_id).await?;

    Ok(Json(cart_service::summarize(cart_service::remove_line(
        views, line_id,
    ))))
}
