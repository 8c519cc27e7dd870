//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (pings the database)
//!
//! # Auth
//! POST /auth/register           - Create a client account and log in
//! POST /auth/login              - Log in
//! POST /auth/logout             - Log out
//! GET  /auth/me                 - Current session user
//!
//! # Menu (requires login)
//! GET  /menu                    - Product listing, ?search= filters by name
//! GET  /menu/{id}               - Product detail
//!
//! # Table
//! GET  /table/scan?table=...    - QR landing: store table, redirect to menu
//! GET  /table                   - Current session table
//! POST /table                   - Select a table
//! DELETE /table                 - Clear the table
//!
//! # Cart (requires login)
//! GET    /cart                  - Cart resolved against the catalog
//! POST   /cart/items            - Add a product
//! PUT    /cart/items/{id}       - Set a line's quantity (0 removes)
//! DELETE /cart/items/{id}       - Remove a line
//! DELETE /cart                  - Clear the cart
//! POST   /cart/checkout         - Place the order
//!
//! # Orders (diner's own)
//! GET /orders                   - One-shot snapshot
//! GET /orders/live              - SSE stream of full snapshots
//! GET /orders/{id}              - Detail with progress steps
//!
//! # Kitchen (chef role)
//! GET  /kitchen/orders          - All active orders, oldest first
//! GET  /kitchen/orders/{id}     - Detail
//! POST /kitchen/orders/{id}/status - Write a status
//!
//! # Cashier (cashier role)
//! GET  /cashier/orders          - Register snapshot (?status=, ?sort=)
//! GET  /cashier/orders/live     - SSE register stream
//! POST /cashier/orders/{id}/settle  - Confirm payment, record receipt
//! POST /cashier/orders/{id}/archive - Move a paid order to history
//! GET  /cashier/history         - Archived orders, newest first
//! GET  /cashier/receipts/{id}   - Receipt as downloadable HTML
//! POST /cashier/products        - Create a product
//! PUT  /cashier/products/{id}   - Update a product
//! DELETE /cashier/products/{id} - Delete a product
//! POST /cashier/products/{id}/image - Upload a product image
//! ```

pub mod auth;
pub mod cart;
pub mod cashier;
pub mod kitchen;
pub mod menu;
pub mod orders;
pub mod products;
pub mod table;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the menu routes router.
pub fn menu_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(menu::index))
        .route("/{id}", get(menu::show))
}

/// Create the table routes router.
pub fn table_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(table::current).post(table::select).delete(table::clear))
        .route("/scan", get(table::scan))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add_item))
        .route(
            "/items/{product_id}",
            put(cart::set_quantity).delete(cart::remove_item),
        )
        .route("/checkout", post(cart::checkout))
}

/// Create the diner order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/live", get(orders::live))
        .route("/{id}", get(orders::show))
}

/// Create the kitchen routes router.
pub fn kitchen_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(kitchen::index))
        .route("/orders/{id}", get(kitchen::show))
        .route("/orders/{id}/status", post(kitchen::set_status))
}

/// Create the cashier routes router.
pub fn cashier_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(cashier::index))
        .route("/orders/live", get(cashier::live))
        .route("/orders/{id}/settle", post(cashier::settle))
        .route("/orders/{id}/archive", post(cashier::archive))
        .route("/history", get(cashier::history))
        .route("/receipts/{id}", get(cashier::receipt))
        .route("/products", post(products::create))
        .route(
            "/products/{id}",
            put(products::update).delete(products::delete),
        )
        .route("/products/{id}/image", post(products::upload_image))
}

/// Create the complete application router (without global layers).
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/menu", menu_routes())
        .nest("/table", table_routes())
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
        .nest("/kitchen", kitchen_routes())
        .nest("/cashier", cashier_routes())
}
