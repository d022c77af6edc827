use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::{
    error::{AppError, Result},
    models::{CartLine, CartLineResponse, CartSummary, CartView, Product},
};

/// Joins raw cart lines with their products, preserving line order.
///
/// A line referencing a product that is not in the map means the cart and
/// the catalog disagree; that is reported, not skipped.
pub fn build_views(lines: Vec<CartLine>, products: &HashMap<i32, Product>) -> Result<Vec<CartView>> {
    lines
        .into_iter()
        .map(|line| {
            let product = products.get(&line.product_id).cloned().ok_or_else(|| {
                AppError::InternalError(format!(
                    "Cart line {} references missing product {}",
                    line.id, line.product_id
                ))
            })?;

            Ok(CartView {
                id: line.id,
                quantity: line.quantity,
                product,
            })
        })
        .collect()
}

/// Order total over all lines. Exact decimal arithmetic; rounding to two
/// places happens only when the value is formatted for display.
pub fn compute_total(views: &[CartView]) -> Decimal {
    views.iter().map(|view| view.subtotal()).sum()
}

/// Sets a line's quantity, keeping line order. A non-positive quantity is a
/// removal. An unknown line id is an inconsistency between the rendered cart
/// and storage and is reported as not-found.
pub fn apply_quantity_change(
    views: Vec<CartView>,
    line_id: i32,
    new_quantity: i32,
) -> Result<Vec<CartView>> {
    if new_quantity <= 0 {
        return Ok(remove_line(views, line_id));
    }

    let mut views = views;
    let mut found = false;

    for view in views.iter_mut() {
        if view.id == line_id {
            view.quantity = new_quantity;
            found = true;
            break;
        }
    }

    if !found {
        return Err(AppError::NotFound(
            "Item do carrinho não encontrado".to_string(),
        ));
    }

    Ok(views)
}

/// Removes the matching line; no-op when the id is absent.
pub fn remove_line(mut views: Vec<CartView>, line_id: i32) -> Vec<CartView> {
    views.retain(|view| view.id != line_id);
    views
}

/// Client-side mirror of the `cart_items (user_id, product_id)` upsert:
/// adding a product already in the cart increments that line, never
/// duplicates it. Keyed by product id — the line id does not exist before
/// the first insert.
pub fn merge_on_add(mut views: Vec<CartView>, added: CartView) -> Vec<CartView> {
    match views
        .iter_mut()
        .find(|view| view.product.id == added.product.id)
    {
        Some(view) => view.quantity += added.quantity,
        None => views.push(added),
    }

    views
}

pub fn summarize(views: Vec<CartView>) -> CartSummary {
    let total = compute_total(&views);
    let item_count = views.len();

    let items = views
        .into_iter()
        .map(|view| CartLineResponse {
            id: view.id,
            quantity: view.quantity,
            subtotal: view.subtotal(),
            product: view.product,
        })
        .collect();

    CartSummary {
        items,
        total,
        item_count,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::dec;

    use super::*;

    fn product(id: i32, price: Decimal) -> Product {
        Product {
            id,
            name: format!("Produto {}", id),
            description: None,
            price,
            image_url: None,
            category: "geral".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn view(id: i32, product_id: i32, price: Decimal, quantity: i32) -> CartView {
        CartView {
            id,
            quantity,
            product: product(product_id, price),
        }
    }

    fn sample_cart() -> Vec<CartView> {
        vec![
            view(1, 10, dec!(10.00), 2),
            view(2, 20, dec!(5.50), 1),
        ]
    }

    #[test]
    fn compute_total_is_sum_of_quantity_times_price() {
        assert_eq!(compute_total(&sample_cart()), dec!(25.50));
    }

    #[test]
    fn compute_total_of_empty_cart_is_zero() {
        assert_eq!(compute_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn apply_quantity_change_replaces_quantity_and_keeps_order() {
        let views = apply_quantity_change(sample_cart(), 2, 4).unwrap();

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].id, 1);
        assert_eq!(views[1].quantity, 4);
        assert_eq!(compute_total(&views), dec!(42.00));
    }

    #[test]
    fn apply_quantity_change_to_zero_removes_the_line() {
        let views = apply_quantity_change(sample_cart(), 1, 0).unwrap();

        assert_eq!(views.len(), 1);
        assert_eq!(views[0].id, 2);
        assert_eq!(compute_total(&views), dec!(5.50));
    }

    #[test]
    fn apply_quantity_change_below_zero_equals_remove_line() {
        let changed = apply_quantity_change(sample_cart(), 1, -3).unwrap();
        let removed = remove_line(sample_cart(), 1);

        let ids = |views: &[CartView]| views.iter().map(|v| v.id).collect::<Vec<_>>();
        assert_eq!(ids(&changed), ids(&removed));
    }

    #[test]
    fn apply_quantity_change_on_unknown_line_is_an_error() {
        let result = apply_quantity_change(sample_cart(), 99, 3);

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn remove_line_on_absent_id_is_a_noop() {
        let views = remove_line(sample_cart(), 99);

        assert_eq!(views.len(), 2);
    }

    #[test]
    fn merge_on_add_increments_existing_product_line() {
        let views = merge_on_add(sample_cart(), view(0, 10, dec!(10.00), 3));

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].quantity, 5);
    }

    #[test]
    fn merge_on_add_appends_unknown_product() {
        let views = merge_on_add(sample_cart(), view(3, 30, dec!(1.25), 1));

        assert_eq!(views.len(), 3);
        assert_eq!(views[2].product.id, 30);
    }

    #[test]
    fn merge_on_add_twice_yields_a_single_line_with_summed_quantity() {
        let views = merge_on_add(Vec::new(), view(0, 10, dec!(10.00), 1));
        let views = merge_on_add(views, view(0, 10, dec!(10.00), 1));

        assert_eq!(views.len(), 1);
        assert_eq!(views[0].quantity, 2);
    }

    #[test]
    fn build_views_reports_a_line_with_a_missing_product() {
        let line = CartLine {
            id: 1,
            user_id: 1,
            product_id: 42,
            quantity: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let result = build_views(vec![line], &HashMap::new());

        assert!(matches!(result, Err(AppError::InternalError(_))));
    }

    #[test]
    fn summarize_carries_subtotals_total_and_item_count() {
        let summary = summarize(sample_cart());

        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.total, dec!(25.50));
        assert_eq!(summary.items[0].subtotal, dec!(20.00));
        assert_eq!(summary.items[1].subtotal, dec!(5.50));
    }
}
