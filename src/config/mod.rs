//! Configuration module for the storefront backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Commerce platform GraphQL endpoint
    pub commerce_endpoint: String,
    /// Static access token for the commerce API (required in production)
    pub commerce_token: Option<String>,
    /// Path to the SQLite file holding the persisted cart identifier
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Public origin used when rendering sitemap URLs
    pub public_base_url: String,
    /// Host patterns the checkout handoff URL may point at (`*.` wildcard allowed)
    pub allowed_checkout_hosts: Vec<String>,
    /// Mailing-list API the newsletter endpoint forwards to
    pub newsletter_api_url: Option<String>,
    /// API key for the mailing-list service
    pub newsletter_api_key: Option<String>,
    /// Contact form submissions allowed per IP per window
    pub contact_rate_limit: u32,
    /// Contact form rate-limit window in seconds
    pub contact_rate_window_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let commerce_endpoint = env::var("STOREFRONT_COMMERCE_ENDPOINT")
            .unwrap_or_else(|_| "http://127.0.0.1:8081/api/graphql".to_string());

        let commerce_token = env::var("STOREFRONT_COMMERCE_TOKEN").ok();

        let db_path = env::var("STOREFRONT_DB_PATH")
            .unwrap_or_else(|_| "./data/cart.sqlite".to_string())
            .into();

        let bind_addr = env::var("STOREFRONT_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid STOREFRONT_BIND_ADDR format");

        let log_level = env::var("STOREFRONT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let public_base_url = env::var("STOREFRONT_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "https://shop.example.com".to_string());

        let allowed_checkout_hosts = env::var("STOREFRONT_ALLOWED_CHECKOUT_HOSTS")
            .unwrap_or_else(|_| "*.myshopify.com".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let newsletter_api_url = env::var("STOREFRONT_NEWSLETTER_API_URL").ok();
        let newsletter_api_key = env::var("STOREFRONT_NEWSLETTER_API_KEY").ok();

        let contact_rate_limit = env::var("STOREFRONT_CONTACT_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let contact_rate_window_secs = env::var("STOREFRONT_CONTACT_RATE_WINDOW_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        Self {
            commerce_endpoint,
            commerce_token,
            db_path,
            bind_addr,
            log_level,
            public_base_url,
            allowed_checkout_hosts,
            newsletter_api_url,
            newsletter_api_key,
            contact_rate_limit,
            contact_rate_window_secs,
        }
    }
}
