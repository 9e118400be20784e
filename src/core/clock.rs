// Daily reset detection.
//
// The boundary is always re-derived from the absolute timestamp handed in by
// the host, so replayed or fast-forwarded ticks behave the same as live ones.

use chrono::{DateTime, Utc};

/// Length of one reset period in milliseconds.
pub const ONE_DAY_MILLIS: i64 = 86_400_000;

/// What a single observation of the clock decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResetSignal {
    /// A new reset period started since the last pass.
    pub boundary_crossed: bool,
    /// A login is pending and must be evaluated unconditionally.
    pub forced: bool,
}

impl ResetSignal {
    /// Whether this observation warrants an evaluation pass.
    pub fn should_evaluate(&self) -> bool {
        self.boundary_crossed || self.forced
    }
}

#[derive(Debug, Clone)]
pub struct ResetClock {
    period: i64,
    last_boundary: i64,
    pending_login: bool,
}

impl Default for ResetClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ResetClock {
    pub fn new() -> Self {
        Self::with_period(ONE_DAY_MILLIS)
    }

    /// Clock with a custom period. Non-positive periods are clamped to 1ms.
    pub fn with_period(period_millis: i64) -> Self {
        Self {
            period: period_millis.max(1),
            last_boundary: 0,
            pending_login: true,
        }
    }

    pub fn last_boundary(&self) -> i64 {
        self.last_boundary
    }

    pub fn is_login_pending(&self) -> bool {
        self.pending_login
    }

    /// Observe the current time.
    ///
    /// When a login is pending or the period has elapsed, the boundary is
    /// re-aligned to the period grid and the login flag is consumed. Calls
    /// within the same period otherwise leave the clock untouched.
    pub fn observe(&mut self, now_millis: i64) -> ResetSignal {
        let forced = self.pending_login;
        let boundary_crossed =
            !forced && now_millis.saturating_sub(self.last_boundary) > self.period;

        let signal = ResetSignal {
            boundary_crossed,
            forced,
        };

        if signal.should_evaluate() {
            self.last_boundary = self.align(now_millis);
            self.pending_login = false;

            if boundary_crossed {
                log::info!(
                    "Daily reset detected, boundary now {}",
                    format_millis(self.last_boundary)
                );
            } else {
                log::debug!(
                    "Login check consumed, boundary {}",
                    format_millis(self.last_boundary)
                );
            }
        }

        signal
    }

    /// Request an unconditional evaluation on the next observation (login).
    pub fn force_next_check(&mut self) {
        self.pending_login = true;
    }

    /// Forget the current window (logout / shutdown).
    ///
    /// The clock returns to its start state: the next observation is a
    /// forced login pass, never a reset pass.
    pub fn on_reset(&mut self) {
        self.last_boundary = 0;
        self.pending_login = true;
    }

    fn align(&self, now_millis: i64) -> i64 {
        now_millis
            .div_euclid(self.period)
            .saturating_mul(self.period)
    }
}

/// Render an epoch-millisecond timestamp for logs.
pub fn format_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| format!("{}ms", millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = ONE_DAY_MILLIS;
    const NOON: i64 = 20_000 * DAY + DAY / 2;

    #[test]
    fn test_first_observation_is_forced_login() {
        let mut clock = ResetClock::new();
        let signal = clock.observe(NOON);

        assert!(signal.forced);
        assert!(!signal.boundary_crossed);
        assert_eq!(clock.last_boundary(), 20_000 * DAY);
        assert!(!clock.is_login_pending());
    }

    #[test]
    fn test_observe_idempotent_within_period() {
        let mut clock = ResetClock::new();
        clock.observe(NOON);
        let boundary = clock.last_boundary();

        for offset in [0, 600, 60_000, DAY / 2 - 1] {
            let signal = clock.observe(NOON + offset);
            assert!(!signal.should_evaluate());
            assert_eq!(clock.last_boundary(), boundary);
        }
    }

    #[test]
    fn test_crossing_requires_more_than_one_period() {
        let mut clock = ResetClock::new();
        clock.observe(NOON);
        let boundary = clock.last_boundary();

        // Exactly one period after the aligned boundary is not yet a crossing
        assert!(!clock.observe(boundary + DAY).boundary_crossed);

        let signal = clock.observe(boundary + DAY + 1);
        assert!(signal.boundary_crossed);
        assert!(!signal.forced);
        assert_eq!(clock.last_boundary(), boundary + DAY);
    }

    #[test]
    fn test_crossing_aligns_to_grid_not_previous_boundary() {
        let mut clock = ResetClock::new();
        clock.observe(NOON);

        // Skip three days ahead
        let later = NOON + 3 * DAY + 1234;
        assert!(clock.observe(later).boundary_crossed);
        assert_eq!(clock.last_boundary(), 20_003 * DAY);
    }

    #[test]
    fn test_login_is_not_a_crossing() {
        let mut clock = ResetClock::new();
        clock.observe(NOON);

        clock.force_next_check();
        let signal = clock.observe(NOON + 2 * DAY);
        assert!(signal.forced);
        assert!(!signal.boundary_crossed);
        assert_eq!(clock.last_boundary(), 20_002 * DAY);
    }

    #[test]
    fn test_backwards_clock_never_crosses() {
        let mut clock = ResetClock::new();
        clock.observe(NOON);

        let signal = clock.observe(NOON - 5 * DAY);
        assert!(!signal.should_evaluate());
        assert_eq!(clock.last_boundary(), 20_000 * DAY);

        let signal = clock.observe(i64::MIN);
        assert!(!signal.should_evaluate());
    }

    #[test]
    fn test_extreme_timestamps_on_forced_pass() {
        let mut clock = ResetClock::new();
        let signal = clock.observe(i64::MIN);
        assert!(signal.forced);
        assert!(clock.last_boundary() <= 0);

        clock.on_reset();
        assert!(clock.observe(i64::MAX).forced);
        assert!(clock.last_boundary() > 0);

        clock.on_reset();
        assert!(clock.observe(i64::MIN).forced);
        // Any later real timestamp is then a crossing, never a panic
        assert!(clock.observe(NOON).boundary_crossed);
        assert_eq!(clock.last_boundary(), 20_000 * DAY);
    }

    #[test]
    fn test_on_reset_returns_to_start_state() {
        let mut clock = ResetClock::new();
        clock.observe(NOON);
        clock.on_reset();

        assert_eq!(clock.last_boundary(), 0);
        assert!(clock.is_login_pending());

        let signal = clock.observe(NOON + 10);
        assert!(signal.forced);
        assert!(!signal.boundary_crossed);
    }

    #[test]
    fn test_format_millis() {
        assert_eq!(format_millis(0), "1970-01-01T00:00:00+00:00");
    }
}
