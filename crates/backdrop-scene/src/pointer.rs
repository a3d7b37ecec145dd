use glam::Vec2;

/// Last observed pointer position, normalized to `[-1, 1]` on both axes
/// (+x right, +y up, origin at the viewport centre).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
}

impl PointerState {
    pub const CENTER: PointerState = PointerState { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x: x.clamp(-1.0, 1.0), y: y.clamp(-1.0, 1.0) }
    }

    /// Normalizes a logical-pixel position (top-left origin, +y down).
    ///
    /// A degenerate viewport yields the centre rather than NaN.
    pub fn from_logical(px: f32, py: f32, width: f32, height: f32) -> Self {
        if !(width > 0.0 && height > 0.0) || !px.is_finite() || !py.is_finite() {
            return Self::CENTER;
        }
        Self::new(px / width * 2.0 - 1.0, -(py / height * 2.0 - 1.0))
    }

    /// World-space offset the primitive is pulled toward.
    #[inline]
    pub fn target(self, gain: f32) -> Vec2 {
        Vec2::new(self.x, self.y) * gain
    }
}
