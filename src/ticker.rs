use std::time::{Duration, Instant};

/// Interval between focus-timer ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Drift-free one-second cadence for the focus loop. Each `wait`
/// sleeps until the next whole-second boundary instead of a full
/// second after the previous wake-up.
pub struct Ticker {
    next: Instant,
}

impl Ticker {
    pub fn new() -> Self {
        Self {
            next: Instant::now() + TICK_INTERVAL,
        }
    }

    /// Sleep until the next tick boundary.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if self.next > now {
            std::thread::sleep(self.next - now);
        }
        self.next += TICK_INTERVAL;
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_interval() {
        assert_eq!(TICK_INTERVAL, Duration::from_secs(1));
    }

    #[test]
    fn test_wait_advances_boundary_even_when_late() {
        let mut ticker = Ticker::new();
        // Simulate a late wake-up: the boundary is already in the past.
        ticker.next = Instant::now() - Duration::from_millis(10);
        let before = ticker.next;
        ticker.wait();
        assert_eq!(ticker.next, before + TICK_INTERVAL);
    }
}
