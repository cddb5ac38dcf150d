/// Time sources for expiry checks.
///
/// The store never reads the system clock directly. It asks its [`Clock`],
/// which lets tests move time forward without sleeping.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::types::now_ms;

/// Supplies "now" in Unix milliseconds.
pub trait Clock: Send {
    fn now(&self) -> u64;
}

impl<F> Clock for F
where
    F: Fn() -> u64 + Send,
{
    fn now(&self) -> u64 {
        self()
    }
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        now_ms()
    }
}

/// Controllable clock for deterministic expiry.
///
/// Starts at a fixed reference date and only moves when told to. Clones
/// share the same offset, so a test can keep one handle and give another
/// to the store.
#[derive(Debug, Clone)]
pub struct TimeTraveler {
    reference_date: u64,
    offset: Arc<AtomicU64>,
}

impl TimeTraveler {
    /// Start at the current system time.
    pub fn new() -> Self {
        Self::starting_at(now_ms())
    }

    /// Start at an explicit reference date (Unix ms).
    pub fn starting_at(reference_date: u64) -> Self {
        Self {
            reference_date,
            offset: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The instant this traveler started at.
    pub fn reference_date(&self) -> u64 {
        self.reference_date
    }

    /// Move time forward by `ms`.
    pub fn travel(&self, ms: u64) {
        self.offset.fetch_add(ms, Ordering::SeqCst);
    }

    /// Current simulated time.
    pub fn generate_date(&self) -> u64 {
        self.reference_date + self.offset.load(Ordering::SeqCst)
    }
}

impl Default for TimeTraveler {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TimeTraveler {
    fn now(&self) -> u64 {
        self.generate_date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_traveler_starts_at_reference() {
        let traveler = TimeTraveler::starting_at(5_000);
        assert_eq!(traveler.now(), 5_000);
        assert_eq!(traveler.reference_date(), 5_000);
    }

    #[test]
    fn travel_is_shared_between_clones() {
        let traveler = TimeTraveler::starting_at(1_000);
        let handle = traveler.clone();
        handle.travel(250);
        handle.travel(250);
        assert_eq!(traveler.now(), 1_500);
        assert_eq!(traveler.reference_date(), 1_000);
    }

    #[test]
    fn closure_is_a_clock() {
        let clock = || 42u64;
        assert_eq!(Clock::now(&clock), 42);
    }

    #[test]
    fn system_clock_is_close_to_now() {
        let before = now_ms();
        let read = SystemClock.now();
        assert!(read >= before);
        assert!(read - before < 60_000);
    }
}
