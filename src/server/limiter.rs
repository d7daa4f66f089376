//! Per-client fixed-window rate limiting.
//!
//! Each client IP gets `max_requests` per `window`. The counter resets when
//! the window that started with the client's first request expires. IPv6
//! clients are counted per /64, since a single host usually owns the whole
//! prefix.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::Json;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::consts::{DEFAULT_RATE_LIMIT_MAX, DEFAULT_RATE_LIMIT_WINDOW_SECS, RATE_LIMIT_MESSAGE};
use crate::response::too_many_requests;

/// Expired windows are swept once the table grows past this many clients,
/// at most once per window.
const PRUNE_THRESHOLD: usize = 1024;

/// Hard cap on tracked clients. Unknown clients are rejected while the
/// table is full.
const MAX_TRACKED_CLIENTS: usize = 65_536;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_RATE_LIMIT_MAX,
            window: Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow { remaining: u32 },
    Reject { retry_after: Duration },
}

struct Window {
    started: Instant,
    count: u32,
}

struct Clients {
    windows: HashMap<IpAddr, Window>,
    last_sweep: Instant,
}

impl Clients {
    fn sweep(&mut self, now: Instant, window: Duration) {
        if self.windows.len() <= PRUNE_THRESHOLD
            || now.saturating_duration_since(self.last_sweep) < window
        {
            return;
        }
        self.windows
            .retain(|_, w| now.saturating_duration_since(w.started) < window);
        self.last_sweep = now;
    }
}

pub struct RateLimiter {
    config: RateLimitConfig,
    clients: Mutex<Clients>,
}

/// The key a client is counted under: the address itself for IPv4, the
/// /64 prefix for IPv6.
fn client_key(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V4(_) => ip,
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => IpAddr::V6(Ipv6Addr::from(
                u128::from(v6) & !((1u128 << 64) - 1),
            )),
        },
    }
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            clients: Mutex::new(Clients {
                windows: HashMap::new(),
                last_sweep: Instant::now(),
            }),
        }
    }

    /// Count one request from `client` at `now`.
    pub fn check(&self, client: IpAddr, now: Instant) -> Decision {
        let window = self.config.window;
        let key = client_key(client);
        let mut clients = self.clients.lock().unwrap_or_else(|e| e.into_inner());

        clients.sweep(now, window);

        if clients.windows.len() >= MAX_TRACKED_CLIENTS && !clients.windows.contains_key(&key) {
            warn!(tracked = clients.windows.len(), "rate limiter table full");
            return Decision::Reject {
                retry_after: window
                    .saturating_sub(now.saturating_duration_since(clients.last_sweep)),
            };
        }

        let entry = clients.windows.entry(key).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.saturating_duration_since(entry.started) >= window {
            entry.started = now;
            entry.count = 0;
        }

        if entry.count >= self.config.max_requests {
            return Decision::Reject {
                retry_after: window.saturating_sub(now.saturating_duration_since(entry.started)),
            };
        }

        entry.count += 1;
        Decision::Allow {
            remaining: self.config.max_requests - entry.count,
        }
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.clients.lock().map(|c| c.windows.len()).unwrap_or(0)
    }
}

/// Axum middleware. Rejected requests get 429 with the limiter message.
pub async fn enforce(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    match limiter.check(client, Instant::now()) {
        Decision::Allow { .. } => next.run(request).await,
        Decision::Reject { retry_after } => {
            warn!(%client, path = %request.uri().path(), "rate limit exceeded");
            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(too_many_requests(RATE_LIMIT_MESSAGE)),
            )
                .into_response();
            // Round up so clients never retry a moment too early.
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
            response
        }
    }
}
