//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! POST /api/auth/register          - Register with phone + password
//! POST /api/auth/login             - Login, returns bearer token
//! GET  /api/auth/me                - Current user (auth)
//!
//! # Users (admin unless noted)
//! GET  /api/users                  - List users with order counts
//! POST /api/users                  - Create a user
//! PUT  /api/users/profile          - Update own profile (auth)
//! GET  /api/users/{id}             - Get a user
//! PUT  /api/users/{id}             - Update a user
//! DELETE /api/users/{id}           - Delete a user (not self)
//! PUT  /api/users/{id}/loyalty     - Add loyalty points
//! GET  /api/users/{id}/orders      - A user's orders
//!
//! # Catalog
//! GET  /api/products               - List (filter: categoryId, search)
//! GET  /api/products/{id}          - Get
//! POST /api/products               - Create (admin, multipart)
//! PUT  /api/products/{id}          - Update (admin, multipart)
//! DELETE /api/products/{id}        - Delete (admin)
//! GET  /api/categories             - List with product counts
//! GET  /api/categories/{id}        - Get with products
//! POST/PUT/DELETE /api/categories  - Admin management
//!
//! # Orders
//! GET  /api/orders                 - Own orders; admin sees all (+status)
//! GET  /api/orders/{id}            - Get (owner or admin)
//! POST /api/orders                 - Place an order (auth)
//! PUT  /api/orders/{id}            - Update status/payment (admin) or
//!                                    attach payment proof (owner)
//!
//! # Coupons
//! POST /api/coupons/validate       - Public validation (code + subtotal)
//! GET/POST/PUT/DELETE /api/coupons - Admin management
//!
//! # Procurement (admin)
//! GET  /api/procurement            - List
//! GET  /api/procurement/{id}       - Get
//! POST /api/procurement            - Create (applies stock)
//! PUT  /api/procurement/{id}       - Replace lines (reverses + reapplies)
//! PUT  /api/procurement/{id}/status - Set status
//!
//! # Delivery zones
//! GET  /api/delivery-zones         - Active zones (public)
//! GET  /api/delivery-zones/price   - Price for country/state (public)
//! POST/PUT /api/delivery-zones     - Admin management
//!
//! # Loyalty shop
//! GET  /api/loyalty-shop/settings  - Public settings
//! GET  /api/loyalty-shop/access    - Unlock check (auth)
//! GET  /api/loyalty-shop/products  - Redeemable products (auth)
//! POST /api/loyalty-shop/redeem    - Redeem (auth)
//! GET  /api/loyalty-shop/my-redemptions - Own redemptions (auth)
//! PUT  /api/loyalty-shop/settings  - Update settings (admin)
//! POST/PUT/DELETE /api/loyalty-shop/products... - Admin management
//! GET  /api/loyalty-shop/available-products - Candidates (admin)
//! GET  /api/loyalty-shop/redemptions - All redemptions (admin, +status)
//! PUT  /api/loyalty-shop/redemptions/{id}/status - Update (admin)
//!
//! # Messages (auth)
//! GET  /api/messages               - Inbox, or ?type=sent
//! POST /api/messages               - Send (broadcast: admin only)
//! PUT  /api/messages/{id}/read     - Mark read
//!
//! # Bank accounts, support, settings, reports, recipes
//! GET  /api/bank-accounts          - Active accounts (public)
//! POST/PUT/DELETE /api/bank-accounts - Admin (delete is soft)
//! GET  /api/support                - Public list
//! POST/PUT/DELETE /api/support     - Admin management
//! GET  /api/settings               - Public (creates defaults)
//! PUT  /api/settings               - Admin update
//! POST /api/settings/banner        - Admin banner upload
//! GET  /api/reports/*              - Admin reporting
//! GET  /api/recipes/*              - Public recipe reads
//! POST/PUT/DELETE /api/recipes     - Admin management
//! ```

pub mod auth;
pub mod bank_accounts;
pub mod categories;
pub mod coupons;
pub mod delivery;
pub mod loyalty_shop;
pub mod messages;
pub mod orders;
pub mod procurement;
pub mod products;
pub mod recipes;
pub mod reports;
pub mod settings;
pub mod support;
pub mod users;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the `/api` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .nest("/orders", order_routes())
        .nest("/coupons", coupon_routes())
        .nest("/procurement", procurement_routes())
        .nest("/delivery-zones", delivery_routes())
        .nest("/loyalty-shop", loyalty_shop_routes())
        .nest("/messages", message_routes())
        .nest("/bank-accounts", bank_account_routes())
        .nest("/support", support_routes())
        .nest("/settings", settings_routes())
        .nest("/reports", report_routes())
        .nest("/recipes", recipe_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list).post(users::create))
        .route("/profile", put(users::update_profile))
        .route(
            "/{id}",
            get(users::get).put(users::update).delete(users::remove),
        )
        .route("/{id}/loyalty", put(users::add_loyalty_points))
        .route("/{id}/orders", get(users::orders))
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/{id}",
            get(products::get)
                .put(products::update)
                .delete(products::remove),
        )
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::list).post(categories::create))
        .route(
            "/{id}",
            get(categories::get)
                .put(categories::update)
                .delete(categories::remove),
        )
}

fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list).post(orders::create))
        .route("/{id}", get(orders::get).put(orders::update))
}

fn coupon_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(coupons::list).post(coupons::create))
        .route("/validate", post(coupons::validate))
        .route("/{id}", put(coupons::update).delete(coupons::remove))
}

fn procurement_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(procurement::list).post(procurement::create))
        .route("/{id}", get(procurement::get).put(procurement::update))
        .route("/{id}/status", put(procurement::set_status))
}

fn delivery_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(delivery::list).post(delivery::create))
        .route("/price", get(delivery::price))
        .route("/{id}", put(delivery::update))
}

fn loyalty_shop_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/settings",
            get(loyalty_shop::settings).put(loyalty_shop::update_settings),
        )
        .route("/access", get(loyalty_shop::access))
        .route(
            "/products",
            get(loyalty_shop::products).post(loyalty_shop::add_product),
        )
        .route(
            "/products/{id}",
            put(loyalty_shop::update_product).delete(loyalty_shop::remove_product),
        )
        .route("/available-products", get(loyalty_shop::available_products))
        .route("/redeem", post(loyalty_shop::redeem))
        .route("/my-redemptions", get(loyalty_shop::my_redemptions))
        .route("/redemptions", get(loyalty_shop::redemptions))
        .route(
            "/redemptions/{id}/status",
            put(loyalty_shop::update_redemption_status),
        )
}

fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(messages::list).post(messages::create))
        .route("/{id}/read", put(messages::mark_read))
}

fn bank_account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(bank_accounts::list).post(bank_accounts::create))
        .route(
            "/{id}",
            put(bank_accounts::update).delete(bank_accounts::remove),
        )
}

fn support_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(support::list).post(support::create))
        .route("/{id}", put(support::update).delete(support::remove))
}

fn settings_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(settings::get).put(settings::update))
        .route("/banner", post(settings::upload_banner))
}

fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/monthly", get(reports::monthly))
        .route("/top-products", get(reports::top_products))
        .route("/top-customers", get(reports::top_customers))
        .route("/profit-loss", get(reports::profit_loss))
        .route("/products/{id}", get(reports::product))
}

fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(recipes::list).post(recipes::create))
        .route("/products", get(recipes::products_with_recipes))
        .route("/product/{id}", get(recipes::for_product))
        .route("/product/{id}/exists", get(recipes::has_recipes))
        .route("/{id}", put(recipes::update).delete(recipes::remove))
}
