use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::Result,
    models::{Product, ProductQuery},
};

pub async fn list_products(pool: &PgPool, params: ProductQuery) -> Result<Vec<Product>> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM products WHERE 1=1");

    if let Some(ref q) = params.search {
        query.push(" AND name ILIKE ");
        query.push_bind(format!("%{}%", q));
    }

    if let Some(ref category) = params.category {
        query.push(" AND category = ");
        query.push_bind(category);
    }

    query.push(" ORDER BY created_at DESC");

    let products = query.build_query_as::<Product>().fetch_all(pool).await?;

    Ok(products)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

pub async fn find_by_ids(pool: &PgPool, ids: &[i32]) -> Result<HashMap<i32, Product>> {
    let products = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;

    Ok(products.into_iter().map(|p| (p.id, p)).collect())
}
