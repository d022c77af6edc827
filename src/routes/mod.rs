mod cart;
mod checkout;
mod health;
mod login;
mod products;
mod profile;
mod register;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/me", get(profile::me))
        .route("/cart", get(cart::get_cart))
        .route("/cart/items", post(cart::add_item))
        .route(
            "/cart/items/{id}",
            put(cart::update_item).delete(cart::remove_item),
        )
        .route("/checkout", post(checkout::checkout))
        .route_layer(middleware::from_fn(crate::middleware::auth_middleware));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/auth/register", post(register::register_user))
        .route("/auth/login", post(login::login_user))
        .route("/products", get(products::list_products))
        .route("/products/{id}", get(products::get_product))
        .merge(protected)
}
