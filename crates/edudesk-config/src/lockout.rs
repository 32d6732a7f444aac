//! Failed-login lockout policy.

use chrono::Duration;

use crate::env::parse_or;

/// How many consecutive failed logins lock an account, and for how long.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LockoutPolicy {
    /// Failed attempts that trigger a lock (the locking attempt included)
    pub max_attempts: u32,
    /// Lock duration in seconds
    pub lock_duration_secs: i64,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            lock_duration_secs: 900, // 15 minutes
        }
    }
}

impl LockoutPolicy {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_attempts: parse_or("LOCKOUT_MAX_ATTEMPTS", defaults.max_attempts).max(1),
            lock_duration_secs: parse_or("LOCKOUT_DURATION_SECS", defaults.lock_duration_secs),
        }
    }

    pub fn lock_duration(&self) -> Duration {
        Duration::seconds(self.lock_duration_secs)
    }

    /// `max_attempts` in the width of the stored failure counter.
    pub fn attempt_limit(&self) -> i32 {
        i32::try_from(self.max_attempts).unwrap_or(i32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_and_duration() {
        let policy = LockoutPolicy {
            max_attempts: 3,
            lock_duration_secs: 60,
        };
        assert_eq!(policy.attempt_limit(), 3);
        assert_eq!(policy.lock_duration(), Duration::minutes(1));

        let unbounded = LockoutPolicy {
            max_attempts: u32::MAX,
            ..policy
        };
        assert_eq!(unbounded.attempt_limit(), i32::MAX);
    }
}
