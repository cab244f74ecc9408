/// Rate Limiting System
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovernorLimiter,
};
use std::{num::NonZeroU32, sync::Arc};

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Requests per second across all callers
    pub requests_per_second: u32,
    /// Burst size
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_second: 50,
            burst_size: 25,
        }
    }
}

impl From<&crate::config::RateLimitSettings> for RateLimitConfig {
    fn from(settings: &crate::config::RateLimitSettings) -> Self {
        Self {
            enabled: settings.enabled,
            requests_per_second: settings.requests_per_second,
            burst_size: settings.burst_size,
        }
    }
}

/// Global request rate limiter.
///
/// The service has no authenticated caller tiers; one shared quota covers
/// everything but the health probes.
#[derive(Clone)]
pub struct RateLimiter {
    enabled: bool,
    limiter: Arc<GovernorLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let quota = Quota::per_second(
            NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::new(50).unwrap()),
        )
        .allow_burst(NonZeroU32::new(config.burst_size).unwrap_or(NonZeroU32::new(25).unwrap()));

        Self {
            enabled: config.enabled,
            limiter: Arc::new(GovernorLimiter::direct(quota)),
        }
    }

    /// Check the global quota; Err when over limit
    pub fn check(&self) -> Result<(), ()> {
        if !self.enabled {
            return Ok(());
        }
        self.limiter.check().map_err(|_| ())
    }
}

/// Rate limiting middleware
pub async fn rate_limit_middleware(
    State(ctx): State<crate::context::AppContext>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // Probes stay exempt so orchestration keeps working under load
    if request.uri().path().starts_with("/health") {
        return Ok(next.run(request).await);
    }

    match ctx.rate_limiter.check() {
        Ok(_) => Ok(next.run(request).await),
        Err(_) => Err(StatusCode::TOO_MANY_REQUESTS),
    }
}
