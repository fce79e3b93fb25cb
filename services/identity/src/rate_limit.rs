use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use crate::domain::repository::AttemptCounterStore;
use crate::domain::types::Attempts;
use crate::error::IdentityError;
use crate::infra::cache::RedisCounterStore;

/// Fast window: catches bursts.
pub const FAST_WINDOW_SECS: u64 = 60;

/// Slow window: catches sustained abuse.
pub const SLOW_WINDOW_SECS: u64 = 86_400;

/// Operations that sit behind the limiter. Each can be toggled per
/// deployment profile without touching handler code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedEndpoint {
    Login,
    VerificationRequest,
    ResetRequest,
}

impl GuardedEndpoint {
    fn key_part(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::VerificationRequest => "verify",
            Self::ResetRequest => "reset",
        }
    }
}

/// Thresholds and per-endpoint enablement, resolved once at startup.
#[derive(Debug, Clone)]
pub struct RateLimitPolicy {
    pub max_wrong_per_minute: u64,
    pub max_wrong_per_day: u64,
    pub login_enabled: bool,
    pub verification_enabled: bool,
    pub recovery_enabled: bool,
}

impl RateLimitPolicy {
    fn enabled(&self, endpoint: GuardedEndpoint) -> bool {
        match endpoint {
            GuardedEndpoint::Login => self.login_enabled,
            GuardedEndpoint::VerificationRequest => self.verification_enabled,
            GuardedEndpoint::ResetRequest => self.recovery_enabled,
        }
    }
}

/// Dual-window attempt limiter keyed by requester IP.
///
/// Every guarded attempt bumps both windows; crossing either threshold
/// rejects the request with the seconds left in the exceeded window.
/// Counters decay by window expiry alone — there is no unblock call.
#[derive(Clone)]
pub struct RateLimiter {
    store: CounterBackend,
    policy: RateLimitPolicy,
}

impl RateLimiter {
    pub fn new(store: CounterBackend, policy: RateLimitPolicy) -> Self {
        Self { store, policy }
    }

    /// Record an attempt and reject it if the key is over either threshold.
    /// Must be called before any identity-store access.
    pub async fn guard(&self, endpoint: GuardedEndpoint, ip: &str) -> Result<(), IdentityError> {
        if !self.policy.enabled(endpoint) {
            return Ok(());
        }

        let part = endpoint.key_part();
        let slow = self
            .store
            .increment(&format!("rl:slow:{part}:{ip}"), SLOW_WINDOW_SECS)
            .await?;
        let fast = self
            .store
            .increment(&format!("rl:fast:{part}:{ip}"), FAST_WINDOW_SECS)
            .await?;

        let retry_secs = if slow.count > self.policy.max_wrong_per_day {
            slow.retry_secs.max(1)
        } else if fast.count > self.policy.max_wrong_per_minute {
            fast.retry_secs.max(1)
        } else {
            return Ok(());
        };

        tracing::warn!(ip, endpoint = part, retry_secs, "rate limit block");
        Err(IdentityError::RateLimited { retry_secs })
    }
}

/// Counter store selected at startup: Redis in production, process-local
/// memory otherwise.
#[derive(Clone)]
pub enum CounterBackend {
    Redis(RedisCounterStore),
    Memory(InMemoryCounterStore),
}

impl AttemptCounterStore for CounterBackend {
    async fn increment(&self, key: &str, window_secs: u64) -> Result<Attempts, IdentityError> {
        match self {
            Self::Redis(store) => store.increment(key, window_secs).await,
            Self::Memory(store) => store.increment(key, window_secs).await,
        }
    }
}

#[derive(Debug)]
struct CounterWindow {
    started_at: DateTime<Utc>,
    window_secs: u64,
    count: u64,
}

/// Mutex-guarded in-process counters. The lock makes each increment an
/// atomic read-modify-write, matching the Redis backend's guarantee.
#[derive(Clone, Default)]
pub struct InMemoryCounterStore {
    windows: Arc<Mutex<HashMap<String, CounterWindow>>>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AttemptCounterStore for InMemoryCounterStore {
    async fn increment(&self, key: &str, window_secs: u64) -> Result<Attempts, IdentityError> {
        let now = Utc::now();
        let mut windows = self
            .windows
            .lock()
            .map_err(|_| IdentityError::Internal(anyhow::anyhow!("counter lock poisoned")))?;
        let window = windows.entry(key.to_owned()).or_insert(CounterWindow {
            started_at: now,
            window_secs,
            count: 0,
        });

        let ends_at = window.started_at + Duration::seconds(window.window_secs as i64);
        if now >= ends_at {
            window.started_at = now;
            window.count = 0;
        }
        window.count += 1;

        let remaining =
            window.started_at + Duration::seconds(window.window_secs as i64) - now;
        Ok(Attempts {
            count: window.count,
            retry_secs: remaining.num_seconds().max(0) as u64,
        })
    }
}
