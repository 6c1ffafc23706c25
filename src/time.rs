use std::time::{Duration, Instant};

/// Wall-clock bound layered over the depth-limited search
#[derive(Debug, Clone, Copy)]
pub struct TimeManager {
    pub start_time: Instant,
    pub limit: Option<Duration>,
}

/// For ease of use in tests
impl Default for TimeManager {
    fn default() -> Self {
        Self::new(None)
    }
}

impl TimeManager {
    /// Create a new TimeManager for each search
    pub fn new(limit_ms: Option<u64>) -> Self {
        Self {
            start_time: Instant::now(),
            limit: limit_ms.map(Duration::from_millis),
        }
    }

    /// Time since search began
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Check if we must abort
    pub fn is_limit_reached(&self) -> bool {
        self.limit.is_some_and(|limit| self.elapsed() >= limit)
    }
}
