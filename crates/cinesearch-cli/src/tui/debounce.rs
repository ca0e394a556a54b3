//! Keystroke debouncer for the search box.

use std::time::{Duration, Instant};

/// Debounces a stream of input values.
///
/// Each new input resets the settle deadline; only the latest value
/// survives the delay. Time is injected through `Instant` arguments so
/// the settle logic is testable without timers.
#[derive(Debug)]
pub struct Debouncer {
    /// Interval the input must stay unchanged before it settles.
    interval: Duration,
    /// Latest value waiting to settle, with its deadline.
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    /// Creates a new debouncer with the given settle interval.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
        }
    }

    /// Feeds a new input value, resetting the settle deadline.
    pub fn input(&mut self, value: impl Into<String>, now: Instant) {
        let deadline = now.checked_add(self.interval).unwrap_or(now);
        self.pending = Some((value.into(), deadline));
    }

    /// Returns the settled value once its deadline has passed.
    ///
    /// Yields at most one settle event per input burst: the pending
    /// value is consumed when returned.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    /// Settles the pending value immediately, bypassing the deadline.
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Whether a value is waiting to settle.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::arithmetic_side_effects)]

    use super::*;

    const INTERVAL: Duration = Duration::from_millis(500);

    #[test]
    fn test_no_input_no_settle() {
        // Arrange
        let mut debouncer = Debouncer::new(INTERVAL);

        // Act & Assert
        assert!(debouncer.poll(Instant::now()).is_none());
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_settles_after_interval() {
        // Arrange
        let mut debouncer = Debouncer::new(INTERVAL);
        let t0 = Instant::now();

        // Act
        debouncer.input("batman", t0);

        // Assert: not settled before the deadline
        assert!(debouncer.poll(t0 + Duration::from_millis(499)).is_none());
        assert_eq!(
            debouncer.poll(t0 + Duration::from_millis(500)).unwrap(),
            "batman"
        );
    }

    #[test]
    fn test_rapid_inputs_settle_once_to_last_value() {
        // Arrange
        let mut debouncer = Debouncer::new(INTERVAL);
        let t0 = Instant::now();

        // Act: three keystrokes inside the interval
        debouncer.input("b", t0);
        debouncer.input("ba", t0 + Duration::from_millis(100));
        debouncer.input("bat", t0 + Duration::from_millis(200));

        // Assert: exactly one settle event, equal to the last input
        let settled = debouncer.poll(t0 + Duration::from_millis(700)).unwrap();
        assert_eq!(settled, "bat");
        assert!(debouncer.poll(t0 + Duration::from_millis(1400)).is_none());
    }

    #[test]
    fn test_new_input_resets_deadline() {
        // Arrange
        let mut debouncer = Debouncer::new(INTERVAL);
        let t0 = Instant::now();
        debouncer.input("bat", t0);

        // Act: a keystroke at t0+400 pushes the deadline to t0+900
        debouncer.input("batm", t0 + Duration::from_millis(400));

        // Assert
        assert!(debouncer.poll(t0 + Duration::from_millis(600)).is_none());
        assert_eq!(
            debouncer.poll(t0 + Duration::from_millis(900)).unwrap(),
            "batm"
        );
    }

    #[test]
    fn test_flush_settles_immediately() {
        // Arrange
        let mut debouncer = Debouncer::new(INTERVAL);
        let t0 = Instant::now();
        debouncer.input("batman", t0);

        // Act & Assert
        assert_eq!(debouncer.flush().unwrap(), "batman");
        assert!(!debouncer.is_pending());
        assert!(debouncer.flush().is_none());
    }

    #[test]
    fn test_zero_interval_settles_on_next_poll() {
        // Arrange
        let mut debouncer = Debouncer::new(Duration::from_millis(0));
        let t0 = Instant::now();

        // Act
        debouncer.input("dune", t0);

        // Assert
        assert_eq!(debouncer.poll(t0).unwrap(), "dune");
    }
}
