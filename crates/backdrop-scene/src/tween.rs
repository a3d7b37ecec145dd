//! Eased transitions over `Vec3`.
//!
//! A tween is advanced explicitly with a frame delta; it never reads a clock
//! itself, so a viewport that stops calling `advance` simply freezes it.

use glam::Vec3;

/// Easing curve applied to normalized progress `t ∈ [0, 1]`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Ease {
    Linear,
    /// Quadratic in-out.
    Power1InOut,
    /// Cubic in-out.
    Power2InOut,
    /// Cubic out.
    Power2Out,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Ease::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Ease::Power2Out => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// What happens when a tween reaches its end.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Repeat {
    /// Hold the target value.
    Once,
    /// Jump back to `from` and play again.
    Loop,
    /// Play backwards, then forwards again, forever.
    YoYo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    from: Vec3,
    to: Vec3,
    duration: f32,
    elapsed: f32,
    ease: Ease,
    repeat: Repeat,
}

impl Tween {
    pub fn new(from: Vec3, to: Vec3, duration: f32, ease: Ease) -> Self {
        Self {
            from,
            to,
            duration: duration.max(f32::EPSILON),
            elapsed: 0.0,
            ease,
            repeat: Repeat::Once,
        }
    }

    pub fn repeating(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    #[inline]
    pub fn target(&self) -> Vec3 {
        self.to
    }

    /// True once a `Once` tween has reached its target. Repeating tweens never finish.
    pub fn is_finished(&self) -> bool {
        self.repeat == Repeat::Once && self.elapsed >= self.duration
    }

    /// Current interpolated value.
    pub fn value(&self) -> Vec3 {
        let progress = match self.repeat {
            Repeat::Once => self.elapsed / self.duration,
            Repeat::Loop => (self.elapsed % self.duration) / self.duration,
            Repeat::YoYo => {
                let cycle = self.elapsed % (2.0 * self.duration);
                if cycle <= self.duration {
                    cycle / self.duration
                } else {
                    2.0 - cycle / self.duration
                }
            }
        };
        match self.ease.apply(progress) {
            e if e >= 1.0 => self.to,
            e if e <= 0.0 => self.from,
            e => self.from.lerp(self.to, e),
        }
    }

    /// Advances by `dt` seconds and returns the new value.
    pub fn advance(&mut self, dt: f32) -> Vec3 {
        if dt.is_finite() && dt > 0.0 {
            // Repeating tweens keep `elapsed` within one period so small steps
            // never fall below f32 resolution.
            self.elapsed = match self.repeat {
                Repeat::Once => (self.elapsed + dt).min(self.duration),
                Repeat::Loop => (self.elapsed + dt).rem_euclid(self.duration),
                Repeat::YoYo => (self.elapsed + dt).rem_euclid(2.0 * self.duration),
            };
        }
        self.value()
    }

    /// Restarts from the current value toward `to`, keeping duration and ease.
    ///
    /// An in-flight transition is preempted, not queued.
    pub fn retarget(&mut self, to: Vec3) {
        self.from = self.value();
        self.to = to;
        self.elapsed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    // ── Ease ──────────────────────────────────────────────────────────────

    #[test]
    fn eases_hit_endpoints() {
        for ease in [Ease::Linear, Ease::Power1InOut, Ease::Power2InOut, Ease::Power2Out] {
            assert!(close(ease.apply(0.0), 0.0), "{ease:?} at 0");
            assert!(close(ease.apply(1.0), 1.0), "{ease:?} at 1");
        }
    }

    #[test]
    fn in_out_eases_are_symmetric_at_half() {
        assert!(close(Ease::Power1InOut.apply(0.5), 0.5));
        assert!(close(Ease::Power2InOut.apply(0.5), 0.5));
    }

    #[test]
    fn power2_out_front_loads_progress() {
        assert!(Ease::Power2Out.apply(0.25) > 0.25);
    }

    // ── Tween ─────────────────────────────────────────────────────────────

    #[test]
    fn once_clamps_at_target() {
        let mut t = Tween::new(Vec3::ZERO, Vec3::ONE, 1.0, Ease::Linear);
        assert!(close(t.advance(0.5).x, 0.5));
        assert!(!t.is_finished());
        assert_eq!(t.advance(10.0), Vec3::ONE);
        assert!(t.is_finished());
    }

    #[test]
    fn loop_wraps_to_start() {
        let mut t = Tween::new(Vec3::ZERO, Vec3::X, 2.0, Ease::Linear).repeating(Repeat::Loop);
        assert!(close(t.advance(2.5).x, 0.25));
        assert!(!t.is_finished());
    }

    #[test]
    fn yoyo_stays_between_endpoints() {
        let mut t = Tween::new(Vec3::ZERO, Vec3::Y * 0.5, 2.0, Ease::Power1InOut)
            .repeating(Repeat::YoYo);
        assert!(close(t.advance(2.0).y, 0.5));
        assert!(close(t.advance(1.0).y, 0.25));
        assert!(close(t.advance(1.0).y, 0.0));
        for _ in 0..100 {
            let y = t.advance(0.037).y;
            assert!((0.0..=0.5).contains(&y));
        }
    }

    #[test]
    fn loop_keeps_moving_after_days_of_frames() {
        let mut t = Tween::new(Vec3::ZERO, Vec3::X, 20.0, Ease::Linear).repeating(Repeat::Loop);
        let before = t.advance(524_288.0);
        let mut after = before;
        for _ in 0..600 {
            after = t.advance(1.0 / 60.0);
        }
        assert!((after.x - before.x - 0.5).abs() < 1e-3, "{before} -> {after}");
    }

    #[test]
    fn yoyo_keeps_moving_after_days_of_frames() {
        let mut t = Tween::new(Vec3::ZERO, Vec3::Y, 2.0, Ease::Linear).repeating(Repeat::YoYo);
        t.advance(1_048_576.5);
        let before = t.value();
        let after = t.advance(0.5);
        assert!(close(before.y, 0.25));
        assert!(close(after.y, 0.5));
    }

    #[test]
    fn retarget_starts_from_current_value() {
        let mut t = Tween::new(Vec3::ZERO, Vec3::X, 1.0, Ease::Linear);
        t.advance(0.5);
        t.retarget(Vec3::ZERO);
        assert!(close(t.value().x, 0.5));
        assert!(close(t.advance(0.5).x, 0.25));
        assert_eq!(t.target(), Vec3::ZERO);
    }

    #[test]
    fn non_finite_dt_is_ignored() {
        let mut t = Tween::new(Vec3::ZERO, Vec3::X, 1.0, Ease::Linear);
        t.advance(f32::NAN);
        t.advance(-1.0);
        assert_eq!(t.value(), Vec3::ZERO);
    }
}
