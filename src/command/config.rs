//! Client configuration.
//!
//! The deployment scope only selects which remote command set is
//! synchronised; it never changes schema content. Root declarations may
//! override it one by one.

pub use super::domain::DeploymentScope;

use super::domain::GuildId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry policy for individual platform calls made while synchronising.
///
/// The first retry waits `initial_backoff_ms`; each further retry doubles
/// the wait up to `max_backoff_ms`. A rate-limit response's own delay wins
/// when it is longer.
///
/// # Examples
///
/// ```
/// use slashgate::command::config::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.backoff(1), Duration::from_millis(500));
/// assert_eq!(policy.backoff(2), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts per operation, including the first.
    pub max_attempts: u32,
    /// Wait before the first retry, in milliseconds.
    pub initial_backoff_ms: u64,
    /// Upper bound on any single wait, in milliseconds.
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    /// Retries without waiting.
    ///
    /// Useful in tests.
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 0,
            max_backoff_ms: 0,
        }
    }

    /// Never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff_ms: 0,
            max_backoff_ms: 0,
        }
    }

    /// Returns the wait before retry number `retry` (starting at 1).
    #[must_use]
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 1_u64
            .checked_shl(retry.saturating_sub(1))
            .unwrap_or(u64::MAX);
        Duration::from_millis(
            self.initial_backoff_ms
                .saturating_mul(factor)
                .min(self.max_backoff_ms),
        )
    }
}

/// Configuration for a command client.
///
/// Loadable from any serde format; missing fields take their defaults.
///
/// # Examples
///
/// ```
/// use slashgate::command::config::{ClientConfig, DeploymentScope};
/// use slashgate::command::domain::GuildId;
///
/// let config = ClientConfig::for_guild(GuildId::new(42));
/// assert_eq!(config.scope, DeploymentScope::Guild(GuildId::new(42)));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Where commands without a scope of their own are registered.
    pub scope: DeploymentScope,
    /// Retry policy for registration calls.
    pub retry: RetryPolicy,
}

impl ClientConfig {
    /// Registers commands globally.
    #[must_use]
    pub fn global() -> Self {
        Self::default()
    }

    /// Registers commands in one guild.
    #[must_use]
    pub fn for_guild(guild: GuildId) -> Self {
        Self {
            scope: DeploymentScope::Guild(guild),
            ..Self::default()
        }
    }

    /// Replaces the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
