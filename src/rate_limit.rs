// Fixed-window request limiter for the auth and catalog endpoints.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Window {
    hits: u32,
    started: Instant,
}

static RATE_LIMITER: Lazy<Mutex<HashMap<String, Window>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

// true if the request is allowed, false once the window limit is exhausted
pub fn check_rate_limit(key: &str, max_requests: u32, window: Duration) -> bool {
    let mut limiter = RATE_LIMITER.lock().unwrap();
    let now = Instant::now();

    match limiter.get_mut(key) {
        Some(entry) => {
            if now.duration_since(entry.started) > window {
                entry.hits = 1;
                entry.started = now;
                true
            } else if entry.hits < max_requests {
                entry.hits += 1;
                true
            } else {
                false
            }
        }
        None => {
            limiter.insert(
                key.to_string(),
                Window {
                    hits: 1,
                    started: now,
                },
            );
            true
        }
    }
}

// Drop windows that ended long ago (call periodically)
pub fn cleanup_old_entries(max_age: Duration) {
    let mut limiter = RATE_LIMITER.lock().unwrap();
    let now = Instant::now();

    limiter.retain(|_, entry| now.duration_since(entry.started) < max_age);
}
