/// Decodes one sRGB-encoded channel to linear light.
pub fn srgb_to_linear(c: f32) -> f32 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Linear, premultiplied RGBA, as the surface blends it.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };

    /// From straight-alpha linear components.
    pub fn from_linear(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: r.clamp(0.0, 1.0) * a,
            g: g.clamp(0.0, 1.0) * a,
            b: b.clamp(0.0, 1.0) * a,
            a,
        }
    }

    /// From CSS-style bytes: sRGB color, linear alpha.
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        let ch = |v: u8| srgb_to_linear(f32::from(v) / 255.0);
        Self::from_linear(ch(r), ch(g), ch(b), f32::from(a) / 255.0)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_decode_endpoints_and_midpoint() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-6);
        assert!((srgb_to_linear(0.5) - 0.2140).abs() < 1e-3);
        assert!((srgb_to_linear(0.02) - 0.02 / 12.92).abs() < 1e-7);
    }

    #[test]
    fn bytes_are_decoded_then_premultiplied() {
        let c = Color::from_srgb_u8(255, 0, 0, 51);
        assert!((c.r - 0.2).abs() < 1e-6);
        assert_eq!((c.g, c.b), (0.0, 0.0));
        assert!((c.a - 0.2).abs() < 1e-6);
    }

    #[test]
    fn linear_components_are_clamped() {
        let c = Color::from_linear(2.0, -1.0, 0.5, 3.0);
        assert_eq!(c.to_array(), [1.0, 0.0, 0.5, 1.0]);
    }
}
