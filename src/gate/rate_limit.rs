//! Per-client request throttling, held in process memory.
//!
//! State does not survive restarts and is not shared across instances;
//! acceptable for the single-instance deployment this serves.

use std::collections::HashMap;
use std::sync::Mutex;

/// Knobs for the listing rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests allowed per window before the client is blocked.
    pub max_requests: u32,
    /// Counting window in milliseconds.
    pub window_ms: i64,
    /// Cooldown applied once the threshold is exceeded.
    pub block_ms: i64,
}

#[derive(Debug, Clone, Copy)]
struct ClientState {
    window_start_ms: i64,
    count: u32,
    blocked_until_ms: Option<i64>,
}

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Blocked { retry_after_ms: i64 },
}

/// In-memory per-client counter with a cooldown on overflow.
pub struct RateLimiter {
    config: RateLimitConfig,
    clients: Mutex<HashMap<String, ClientState>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        RateLimiter {
            config,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Record a request from `client` at `now_ms` and decide whether
    /// to serve it. Exceeding `max_requests` within the window starts
    /// the cooldown; once the cooldown lapses the counter is reset.
    pub fn check(&self, client: &str, now_ms: i64) -> RateDecision {
        let mut clients = self.clients.lock().unwrap_or_else(|e| e.into_inner());
        let state = clients.entry(client.to_string()).or_insert(ClientState {
            window_start_ms: now_ms,
            count: 0,
            blocked_until_ms: None,
        });

        if let Some(until) = state.blocked_until_ms {
            if now_ms < until {
                return RateDecision::Blocked {
                    retry_after_ms: until - now_ms,
                };
            }
            // cooldown over, start a fresh window
            *state = ClientState {
                window_start_ms: now_ms,
                count: 0,
                blocked_until_ms: None,
            };
        }

        if now_ms - state.window_start_ms >= self.config.window_ms {
            state.window_start_ms = now_ms;
            state.count = 0;
        }

        state.count += 1;
        if state.count > self.config.max_requests {
            state.blocked_until_ms = Some(now_ms + self.config.block_ms);
            return RateDecision::Blocked {
                retry_after_ms: self.config.block_ms,
            };
        }

        RateDecision::Allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: u32, window_ms: i64, block_ms: i64) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            max_requests,
            window_ms,
            block_ms,
        })
    }

    #[test]
    fn test_allows_up_to_threshold() {
        let rl = limiter(3, 1000, 5000);
        for _ in 0..3 {
            assert_eq!(rl.check("1.2.3.4", 0), RateDecision::Allowed);
        }
    }

    #[test]
    fn test_blocks_request_over_threshold() {
        let rl = limiter(3, 1000, 5000);
        for _ in 0..3 {
            rl.check("1.2.3.4", 0);
        }
        assert_eq!(
            rl.check("1.2.3.4", 1),
            RateDecision::Blocked {
                retry_after_ms: 5000
            }
        );
    }

    #[test]
    fn test_blocked_until_cooldown_expires() {
        let rl = limiter(1, 1000, 5000);
        assert_eq!(rl.check("1.2.3.4", 0), RateDecision::Allowed);
        rl.check("1.2.3.4", 10); // trips the block at 10 + 5000
        assert!(matches!(
            rl.check("1.2.3.4", 5000),
            RateDecision::Blocked { .. }
        ));
        // counter starts fresh after the cooldown
        assert_eq!(rl.check("1.2.3.4", 5010), RateDecision::Allowed);
    }

    #[test]
    fn test_window_resets_counter() {
        let rl = limiter(2, 1000, 5000);
        assert_eq!(rl.check("1.2.3.4", 0), RateDecision::Allowed);
        assert_eq!(rl.check("1.2.3.4", 500), RateDecision::Allowed);
        // new window, counter back to zero
        assert_eq!(rl.check("1.2.3.4", 1000), RateDecision::Allowed);
        assert_eq!(rl.check("1.2.3.4", 1100), RateDecision::Allowed);
    }

    #[test]
    fn test_clients_tracked_independently() {
        let rl = limiter(1, 1000, 5000);
        assert_eq!(rl.check("1.2.3.4", 0), RateDecision::Allowed);
        assert!(matches!(
            rl.check("1.2.3.4", 1),
            RateDecision::Blocked { .. }
        ));
        assert_eq!(rl.check("5.6.7.8", 1), RateDecision::Allowed);
    }

    #[test]
    fn test_retry_after_counts_down() {
        let rl = limiter(1, 1000, 5000);
        rl.check("1.2.3.4", 0);
        rl.check("1.2.3.4", 0); // blocked until 5000
        assert_eq!(
            rl.check("1.2.3.4", 2000),
            RateDecision::Blocked {
                retry_after_ms: 3000
            }
        );
    }
}
