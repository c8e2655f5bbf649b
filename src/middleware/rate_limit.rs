use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

const WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct Window {
    opened_at: Instant,
    used: u32,
}

/// Fixed-window limiter shared by one router group. Each group (admin,
/// public) gets its own instance with its own requests-per-second budget.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    budget: u32,
    window: Arc<Mutex<Window>>,
}

impl RateLimiter {
    fn new(budget: u32) -> Self {
        Self {
            budget: budget.max(1),
            window: Arc::new(Mutex::new(Window {
                opened_at: Instant::now(),
                used: 0,
            })),
        }
    }

    fn try_acquire(&self) -> bool {
        let mut window = self.window.lock().expect("rate limiter mutex poisoned");
        let now = Instant::now();
        if now.duration_since(window.opened_at) >= WINDOW {
            window.opened_at = now;
            window.used = 0;
        }
        if window.used < self.budget {
            window.used += 1;
            true
        } else {
            false
        }
    }
}

pub async fn rps_middleware(
    State(limiter): State<RateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !limiter.try_acquire() {
        return (StatusCode::TOO_MANY_REQUESTS, "rate_limit_exceeded").into_response();
    }
    next.run(req).await
}

pub fn new_rps_state(rps: u32) -> RateLimiter {
    RateLimiter::new(rps)
}
