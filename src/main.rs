//! Headless Storefront Backend
//!
//! A storefront backend whose core is a cart synchronization store: cart
//! state mirrored from the external commerce platform with bounded retry
//! and desync recovery, plus thin glue endpoints (contact form, newsletter,
//! sitemap, GraphQL proxy).

mod api;
mod cart;
mod commerce;
mod config;
mod db;
mod errors;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api::RateLimiter;
use cart::CartStore;
use commerce::CommerceClient;
use config::Config;
use db::CartIdRepository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub cart: Arc<CartStore>,
    pub commerce: Arc<CommerceClient>,
    pub config: Arc<Config>,
    pub http: reqwest::Client,
    pub contact_limiter: Arc<RateLimiter>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Headless Storefront Backend");
    tracing::info!("Commerce endpoint: {}", config.commerce_endpoint);
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if the access token is not configured
    if config.commerce_token.is_none() {
        tracing::warn!(
            "No commerce access token configured (STOREFRONT_COMMERCE_TOKEN). \
             Commerce API calls will fail!"
        );
    }

    // Initialize the persisted-identifier store
    let pool = db::init_database(&config.db_path).await?;
    let ids = CartIdRepository::new(pool);

    // Commerce client and cart store
    let commerce = Arc::new(CommerceClient::new(&config));
    let store = Arc::new(CartStore::new(
        commerce.clone(),
        ids,
        config.allowed_checkout_hosts.clone(),
    ));

    // Rehydrate the cart from the persisted identifier
    store.load_cart().await;
    tracing::info!("Cart loaded with {} item(s)", store.item_count());

    let contact_limiter = Arc::new(RateLimiter::new(
        config.contact_rate_limit,
        Duration::from_secs(config.contact_rate_window_secs),
    ));

    // Create application state
    let state = AppState {
        cart: store,
        commerce,
        config: Arc::new(config.clone()),
        http: reqwest::Client::new(),
        contact_limiter,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Cart
        .route("/cart", get(api::get_cart))
        .route("/cart", delete(api::clear_cart))
        .route("/cart/load", post(api::load_cart))
        .route("/cart/lines", post(api::add_line))
        .route("/cart/lines/{id}", put(api::update_line))
        .route("/cart/lines/{id}", delete(api::remove_line))
        .route("/cart/count", get(api::cart_count))
        .route("/cart/checkout", post(api::checkout))
        // Glue endpoints
        .route("/contact", post(api::submit_contact))
        .route("/newsletter", post(api::subscribe_newsletter))
        .route("/graphql", post(api::proxy_graphql));

    // Public routes outside the /api prefix
    let public_routes = Router::new()
        .route("/sitemap.xml", get(api::sitemap))
        .route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(public_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
