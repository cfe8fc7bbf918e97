//! Contact form endpoint.
//!
//! Spam defense is two-layered: a hidden honeypot field (bots fill it,
//! humans never see it) and a per-IP sliding-window rate limiter.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::AppState;

/// In-memory sliding-window rate limiter keyed by client IP.
pub struct RateLimiter {
    max_hits: u32,
    window: Duration,
    hits: Mutex<HashMap<IpAddr, Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new(max_hits: u32, window: Duration) -> Self {
        Self {
            max_hits,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// Record a hit for `ip` and report whether it is within the limit.
    pub fn check(&self, ip: IpAddr) -> bool {
        self.check_at(ip, Instant::now())
    }

    fn check_at(&self, ip: IpAddr, now: Instant) -> bool {
        let mut hits = self.hits.lock().unwrap();
        let entry = hits.entry(ip).or_default();
        entry.retain(|t| now.duration_since(*t) < self.window);

        if entry.len() >= self.max_hits as usize {
            return false;
        }
        entry.push(now);
        true
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
    /// Honeypot. Hidden in the form; any value means a bot filled it.
    #[serde(default)]
    pub website: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactAccepted {
    pub accepted: bool,
}

/// POST /api/contact - Accept a contact form submission.
pub async fn submit_contact(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<ContactRequest>,
) -> ApiResult<ContactAccepted> {
    // Honeypot hits are answered as success so bots learn nothing.
    if request.website.as_deref().is_some_and(|v| !v.is_empty()) {
        tracing::debug!(ip = %addr.ip(), "Contact honeypot triggered, dropping submission");
        return success(ContactAccepted { accepted: true });
    }

    if !state.contact_limiter.check(addr.ip()) {
        tracing::warn!(ip = %addr.ip(), "Contact form rate limit exceeded");
        return Err(AppError::RateLimited(
            "Too many submissions. Please try again later".to_string(),
        ));
    }

    if request.name.trim().is_empty() || request.message.trim().is_empty() {
        return Err(AppError::Validation(
            "Name and message are required".to_string(),
        ));
    }
    if !looks_like_email(&request.email) {
        return Err(AppError::Validation(
            "A valid email address is required".to_string(),
        ));
    }

    tracing::info!(
        ip = %addr.ip(),
        email = %request.email,
        "Contact form submission accepted"
    );

    success(ContactAccepted { accepted: true })
}

pub(crate) fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}
