/// Retry behavior for conflicted batch commits.
///
/// A commit whose revision precondition no longer holds is retried from a
/// fresh read, with doubling backoff capped at `max_backoff_ms`.
#[derive(Debug, Clone)]
pub struct ConflictRetryPolicy {
    /// Maximum number of commit attempts, including the first.
    pub max_attempts: usize,

    /// Base duration in milliseconds for backoff calculation.
    pub base_backoff_ms: u64,

    /// Maximum duration in milliseconds for backoff.
    pub max_backoff_ms: u64,
}

impl ConflictRetryPolicy {
    /// Backoff before the next attempt, given the attempt that just failed
    /// (1-based).
    pub fn backoff_ms(&self, attempt: usize) -> u64 {
        let base = self.base_backoff_ms.max(1);
        let cap = self.max_backoff_ms.max(base);

        let mut backoff = base;
        for _ in 1..attempt {
            backoff = backoff.saturating_mul(2).min(cap);
        }
        backoff
    }
}

impl Default for ConflictRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff_ms: 5,
            max_backoff_ms: 100,
        }
    }
}

/// Pipeline tunables.
///
/// Defaults match the constants the system shipped with: a low-stock floor
/// of 5 units and a 30-day cart retention window.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Stock level at or below which a downward crossing raises an alert.
    pub low_stock_threshold: i64,

    /// Age in days past which temporary carts are swept.
    pub cart_retention_days: i64,

    /// Conflict retry configuration for the stock reconciler.
    pub conflict_retry: ConflictRetryPolicy,
}

impl PipelineConfig {
    /// Create a configuration with the stock defaults.
    pub fn new() -> Self {
        Self {
            low_stock_threshold: 5,
            cart_retention_days: 30,
            conflict_retry: ConflictRetryPolicy::default(),
        }
    }

    /// Set the low-stock threshold.
    pub fn low_stock_threshold(mut self, threshold: i64) -> Self {
        self.low_stock_threshold = threshold;
        self
    }

    /// Set the cart retention window in days.
    pub fn cart_retention_days(mut self, days: i64) -> Self {
        self.cart_retention_days = days;
        self
    }

    /// Set the conflict retry policy.
    pub fn conflict_retry(mut self, policy: ConflictRetryPolicy) -> Self {
        self.conflict_retry = policy;
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.low_stock_threshold < 0 {
            return Err("low_stock_threshold cannot be negative".to_string());
        }

        if self.cart_retention_days <= 0 {
            return Err("cart_retention_days must be > 0".to_string());
        }

        if self.conflict_retry.max_attempts == 0 {
            return Err("conflict_retry.max_attempts must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}
