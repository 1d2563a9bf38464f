use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Abstraction over wall-clock sources.
/// Implementations: SystemTimeProvider (production), MockTimeProvider (testing).
pub trait TimeProvider {
    /// Current time in microseconds from an arbitrary epoch.
    fn now_us(&self) -> i64;
}

impl<T: TimeProvider + ?Sized> TimeProvider for &T {
    fn now_us(&self) -> i64 {
        (**self).now_us()
    }
}

impl<T: TimeProvider + ?Sized> TimeProvider for Rc<T> {
    fn now_us(&self) -> i64 {
        (**self).now_us()
    }
}

/// Monotonic provider backed by [`Instant`].
pub struct SystemTimeProvider {
    start: Instant,
}

impl SystemTimeProvider {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for SystemTimeProvider {
    fn now_us(&self) -> i64 {
        self.start.elapsed().as_micros() as i64
    }
}

/// Manually driven provider for deterministic tests.
/// Share it through `Rc` so the test and the clock see the same time.
#[derive(Debug, Default)]
pub struct MockTimeProvider {
    current_us: Cell<i64>,
}

impl MockTimeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_time(&self, us: i64) {
        self.current_us.set(us);
    }

    pub fn advance(&self, delta_us: i64) {
        self.current_us.set(self.current_us.get() + delta_us);
    }

    pub fn advance_secs(&self, secs: f64) {
        self.advance((secs * 1_000_000.0).round() as i64);
    }
}

impl TimeProvider for MockTimeProvider {
    fn now_us(&self) -> i64 {
        self.current_us.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_advance_and_set() {
        let tp = MockTimeProvider::new();
        assert_eq!(tp.now_us(), 0);
        tp.advance(1_000_000);
        tp.advance_secs(0.5);
        assert_eq!(tp.now_us(), 1_500_000);
        tp.set_time(5_000_000);
        assert_eq!(tp.now_us(), 5_000_000);
    }

    #[test]
    fn shared_mock_through_rc() {
        let tp = Rc::new(MockTimeProvider::new());
        let view: Rc<MockTimeProvider> = Rc::clone(&tp);
        tp.advance(42);
        assert_eq!(view.now_us(), 42);
    }

    #[test]
    fn system_provider_monotonic() {
        let tp = SystemTimeProvider::new();
        let t1 = tp.now_us();
        let t2 = tp.now_us();
        assert!(t2 >= t1);
    }
}
