/// Virtual simulation time in minutes.
///
/// Unrelated to wall-clock time; advanced only by the scheduler.
pub type Minutes = f64;

/// A monotonically nondecreasing virtual clock.
///
/// Only the scheduler mutates the clock, by advancing it to the fire time
/// of the event it is about to dispatch.
///
/// # Examples
///
/// ```
/// use microgrid_sim::sim::clock::Clock;
///
/// let mut clock = Clock::new();
/// assert_eq!(clock.now(), 0.0);
/// clock.advance_to(5.0);
/// assert_eq!(clock.now(), 5.0);
/// ```
#[derive(Debug, Clone)]
pub struct Clock {
    now: Minutes,
}

impl Clock {
    /// Creates a clock at virtual time zero.
    pub fn new() -> Self {
        Self { now: 0.0 }
    }

    /// Current virtual time in minutes.
    pub fn now(&self) -> Minutes {
        self.now
    }

    /// Advances the clock to `time`.
    ///
    /// # Panics
    ///
    /// Panics if `time` is earlier than the current time. A backwards
    /// clock is a kernel logic defect, not a modeled condition.
    pub fn advance_to(&mut self, time: Minutes) {
        assert!(
            time >= self.now,
            "clock cannot go backwards: {} -> {}",
            self.now,
            time
        );
        self.now = time;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
