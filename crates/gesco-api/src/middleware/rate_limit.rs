//! Limitation de débit par IP
//!
//! Quota glissant de `RATE_LIMIT_PER_MINUTE` requêtes par minute et par
//! client, désactivé quand la valeur vaut 0. L'IP vient de
//! `X-Forwarded-For` (première valeur) derrière un proxy, sinon de la
//! socket.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};

use gesco_core::messages;

use crate::error::ApiError;
use crate::state::AppState;

pub type IpRateLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

pub fn build_limiter(requests_per_minute: u32) -> Option<Arc<IpRateLimiter>> {
    let quota = Quota::per_minute(NonZeroU32::new(requests_per_minute)?);
    Some(Arc::new(RateLimiter::keyed(quota)))
}

fn client_ip(request: &Request) -> IpAddr {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            if let Ok(ip) = first.trim().parse::<IpAddr>() {
                return ip;
            }
        }
    }
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

pub async fn rate_limit_layer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(limiter) = &state.rate_limiter {
        let ip = client_ip(&request);
        if limiter.check_key(&ip).is_err() {
            return ApiError::new(
                StatusCode::TOO_MANY_REQUESTS,
                messages::TROP_DE_REQUETES,
                "RATE_LIMIT_EXCEEDED",
            )
            .into_response();
        }
    }
    next.run(request).await
}
