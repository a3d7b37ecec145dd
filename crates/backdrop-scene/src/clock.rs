use std::time::{Duration, Instant};

/// Elapsed/delta pair sampled once per frame.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ClockSample {
    /// Seconds since the clock was (re)started. Never decreases.
    pub elapsed: f32,
    /// Seconds since the previous sample, clamped to `max_dt`.
    pub dt: f32,
}

/// Per-viewport animation clock.
///
/// Reset only by a full remount; samples taken with an earlier `Instant` than
/// the previous one report `dt = 0` instead of going backwards.
#[derive(Debug, Clone)]
pub struct AnimationClock {
    origin: Instant,
    last: Duration,
    max_dt: Duration,
}

impl AnimationClock {
    pub fn new(origin: Instant) -> Self {
        Self {
            origin,
            last: Duration::ZERO,
            // Long stalls (debugger, minimized window) must not jump transitions.
            max_dt: Duration::from_millis(250),
        }
    }

    pub fn reset(&mut self, origin: Instant) {
        self.origin = origin;
        self.last = Duration::ZERO;
    }

    pub fn sample(&mut self, now: Instant) -> ClockSample {
        let since = now.saturating_duration_since(self.origin).max(self.last);
        let dt = (since - self.last).min(self.max_dt);
        self.last = since;

        ClockSample {
            elapsed: since.as_secs_f32(),
            dt: dt.as_secs_f32(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_measures_from_origin() {
        let t0 = Instant::now();
        let mut clock = AnimationClock::new(t0);
        let s = clock.sample(t0 + Duration::from_millis(100));
        assert!((s.elapsed - 0.1).abs() < 1e-6);
        assert!((s.dt - 0.1).abs() < 1e-6);
    }

    #[test]
    fn elapsed_is_monotonic() {
        let t0 = Instant::now();
        let mut clock = AnimationClock::new(t0);
        let a = clock.sample(t0 + Duration::from_millis(500));
        let b = clock.sample(t0 + Duration::from_millis(200));
        assert_eq!(b.elapsed, a.elapsed);
        assert_eq!(b.dt, 0.0);
    }

    #[test]
    fn dt_is_clamped_after_stall() {
        let t0 = Instant::now();
        let mut clock = AnimationClock::new(t0);
        let s = clock.sample(t0 + Duration::from_secs(5));
        assert!((s.dt - 0.25).abs() < 1e-6);
        assert!((s.elapsed - 5.0).abs() < 1e-6);
    }

    #[test]
    fn reset_restarts_elapsed() {
        let t0 = Instant::now();
        let mut clock = AnimationClock::new(t0);
        clock.sample(t0 + Duration::from_secs(3));
        let t1 = t0 + Duration::from_secs(10);
        clock.reset(t1);
        assert_eq!(clock.sample(t1).elapsed, 0.0);
    }
}
