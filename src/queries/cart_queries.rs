use sqlx::PgPool;

use crate::{
    error::Result,
    models::{CartLine, CartView},
    queries::product_queries,
    services::cart_service,
};

pub async fn find_lines(pool: &PgPool, user_id: i32) -> Result<Vec<CartLine>> {
    let lines = sqlx::query_as::<_, CartLine>(
        "SELECT * FROM cart_items WHERE user_id = $1 ORDER BY created_at ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(lines)
}

/// The user's cart lines joined with their products, in insertion order.
pub async fn find_cart_views(pool: &PgPool, user_id: i32) -> Result<Vec<CartView>> {
    let lines = find_lines(pool, user_id).await?;

    if lines.is_empty() {
        return Ok(Vec::new());
    }

    let product_ids: Vec<i32> = lines.iter().map(|line| line.product_id).collect();
    let products = product_queries::find_by_ids(pool, &product_ids).await?;

    cart_service::build_views(lines, &products)
}

/// Merge-on-add: one line per (user, product). Adding a product that is
/// already in the cart increments that line's quantity on the database side,
/// so concurrent adds cannot lose an increment.
pub async fn upsert_line(
    pool: &PgPool,
    user_id: i32,
    product_id: i32,
    quantity: i32,
) -> Result<CartLine> {
    let line = sqlx::query_as::<_, CartLine>(
        "INSERT INTO cart_items (user_id, product_id, quantity)
         VALUES ($1, $2, $3)
         ON CONFLICT (user_id, product_id)
         DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity, updated_at = NOW()
         RETURNING *",
    )
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .fetch_one(pool)
    .await?;

    Ok(line)
}

pub async fn set_quantity(
    pool: &PgPool,
    user_id: i32,
    line_id: i32,
    quantity: i32,
) -> Result<Option<CartLine>> {
    let line = sqlx::query_as::<_, CartLine>(
        "UPDATE cart_items SET quantity = $1, updated_at = NOW()
         WHERE id = $2 AND user_id = $3 RETURNING *",
    )
    .bind(quantity)
    .bind(line_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(line)
}

pub async fn delete_line(pool: &PgPool, user_id: i32, line_id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
        .bind(line_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn clear_cart(pool: &PgPool, user_id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
