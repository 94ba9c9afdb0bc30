use std::time::Duration;

use rand::Rng;

/// Bounds for a sampled confirmation delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LatencyWindow {
    pub min: Duration,
    pub max: Duration,
}

impl LatencyWindow {
    pub const fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// A window that always yields the same delay.
    pub const fn fixed(delay: Duration) -> Self {
        Self {
            min: delay,
            max: delay,
        }
    }

    /// Draw a delay uniformly from the window.
    pub fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let min_ms = self.min.as_millis() as u64;
        let max_ms = self.max.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min_ms..=max_ms))
    }
}

/// Configuration for the simulated ledger.
#[derive(Clone, Debug)]
pub struct LedgerConfig {
    /// Confirmation delay for proof registration.
    pub register_latency: LatencyWindow,
    /// Confirmation delay for certificate minting. Longer than registration,
    /// modeling the heavier mint transaction.
    pub mint_latency: LatencyWindow,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            register_latency: LatencyWindow::new(
                Duration::from_millis(1500),
                Duration::from_millis(2500),
            ),
            mint_latency: LatencyWindow::new(
                Duration::from_millis(2000),
                Duration::from_millis(3000),
            ),
        }
    }
}

impl LedgerConfig {
    /// Zero-latency configuration for tests.
    pub fn instant() -> Self {
        Self {
            register_latency: LatencyWindow::fixed(Duration::ZERO),
            mint_latency: LatencyWindow::fixed(Duration::ZERO),
        }
    }
}
