//! Per-frame mutation of a primitive set.
//!
//! One `Animator` per viewport. `step` is called exactly once per rendered
//! frame and only ever writes into the set it is given; it never reallocates.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::config::{Variant, VisualMode};
use crate::pointer::PointerState;
use crate::primitive::PrimitiveSet;
use crate::tween::{Ease, Repeat, Tween};

/// Orientation increment per frame (radians, applied to x and y).
pub const POINT_DRIFT: f32 = 0.001;
pub const BACKGROUND_DRIFT: f32 = 0.0005;

/// World units of translation per unit of normalized pointer offset.
pub const POINTER_GAIN: f32 = 0.1;
pub const BACKGROUND_POINTER_GAIN: f32 = 0.3;
pub const POINTER_EASE_SECS: f32 = 0.5;

pub const FLOAT_SPIN_SECS: f32 = 20.0;
pub const FLOAT_BOB_SECS: f32 = 2.0;
pub const FLOAT_BOB_HEIGHT: f32 = 0.5;

/// Height of the wave surface at `(x, y)` and time `t`.
///
/// Bounded in `[-1, 1]` and periodic in `t` with period `2π`.
#[inline]
pub fn wave_height(x: f32, y: f32, t: f32) -> f32 {
    (x + t).sin() * 0.5 + (y + t).cos() * 0.5
}

/// Inputs sampled once per frame by the viewport.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FrameInput {
    pub elapsed: f32,
    pub dt: f32,
    pub pointer: PointerState,
}

/// Eases the set's x/y translation toward a scaled pointer position.
///
/// The transition is re-aimed only when the pointer target moves; a resting
/// pointer lets it run to completion.
#[derive(Debug, Clone)]
pub struct PointerFollow {
    gain: f32,
    tween: Tween,
}

impl PointerFollow {
    pub fn new(gain: f32) -> Self {
        Self {
            gain,
            tween: Tween::new(Vec3::ZERO, Vec3::ZERO, POINTER_EASE_SECS, Ease::Power2Out),
        }
    }

    pub fn step(&mut self, set: &mut PrimitiveSet, pointer: PointerState, dt: f32) {
        let target = pointer.target(self.gain).extend(0.0);
        if target != self.tween.target() {
            self.tween.retarget(target);
        }
        let offset = self.tween.advance(dt);
        set.transform.position.x = offset.x;
        set.transform.position.y = offset.y;
    }
}

#[derive(Debug, Clone)]
pub enum Animator {
    /// Constant orientation drift, optionally following the pointer.
    Drift {
        step: f32,
        follow: Option<PointerFollow>,
    },
    /// Per-vertex z displacement driven by `wave_height`.
    Wave { speed: f32 },
    /// Looping spin plus a yoyo vertical bob.
    Floating { spin: Tween, bob: Tween },
}

impl Animator {
    pub fn for_variant(variant: &Variant) -> Self {
        match variant {
            Variant::Background => Animator::Drift {
                step: BACKGROUND_DRIFT,
                follow: Some(PointerFollow::new(BACKGROUND_POINTER_GAIN)),
            },
            Variant::Scene(cfg) => match cfg.mode {
                VisualMode::Points => Animator::Drift {
                    step: POINT_DRIFT,
                    follow: Some(PointerFollow::new(POINTER_GAIN)),
                },
                VisualMode::Wave => Animator::Wave { speed: cfg.speed },
                VisualMode::Floating => Animator::Floating {
                    spin: Tween::new(Vec3::ZERO, Vec3::new(TAU, TAU, 0.0), FLOAT_SPIN_SECS, Ease::Linear)
                        .repeating(Repeat::Loop),
                    bob: Tween::new(
                        Vec3::ZERO,
                        Vec3::new(0.0, FLOAT_BOB_HEIGHT, 0.0),
                        FLOAT_BOB_SECS,
                        Ease::Power1InOut,
                    )
                    .repeating(Repeat::YoYo),
                },
            },
        }
    }

    pub fn step(&mut self, set: &mut PrimitiveSet, input: &FrameInput) {
        match self {
            Animator::Drift { step, follow } => {
                set.transform.rotation.x += *step;
                set.transform.rotation.y += *step;
                if let Some(follow) = follow {
                    follow.step(set, input.pointer, input.dt);
                }
            }
            Animator::Wave { speed } => {
                let t = input.elapsed * *speed;
                set.displace_z(|x, y| wave_height(x, y, t));
            }
            Animator::Floating { spin, bob } => {
                let r = spin.advance(input.dt);
                set.transform.rotation.x = r.x;
                set.transform.rotation.y = r.y;
                set.transform.position.y = bob.advance(input.dt).y;
            }
        }
    }
}
