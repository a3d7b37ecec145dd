//! Per-instance visualizer configuration.
//!
//! Every field has a default, so `VisualizerConfig::default()` is always a
//! valid configuration. Values coming from user input go through
//! [`VisualizerConfig::parse`], which fails fast instead of rendering nothing.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

// ── Rgb ───────────────────────────────────────────────────────────────────

/// Straight (non-premultiplied) RGB color with components in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    fn to_u8(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for Rgb {
    type Err = ConfigError;

    /// Accepts `#rgb` and `#rrggbb`; the leading `#` is optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidColor(s.to_string());
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);

        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());

        match hex.len() {
            3 => {
                // #abc == #aabbcc
                let mut out = [0u8; 3];
                for (i, slot) in out.iter_mut().enumerate() {
                    let v = channel(&hex[i..i + 1])?;
                    *slot = v * 17;
                }
                Ok(Rgb::from_u8(out[0], out[1], out[2]))
            }
            6 => Ok(Rgb::from_u8(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.to_u8();
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

// ── VisualMode ────────────────────────────────────────────────────────────

/// Which primitive a visualizer draws.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum VisualMode {
    /// Randomly scattered point sprites.
    #[default]
    Points,
    /// Tilted wireframe grid displaced by a travelling wave.
    Wave,
    /// A single wireframe icosphere spinning and bobbing.
    Floating,
}

impl VisualMode {
    pub fn name(self) -> &'static str {
        match self {
            VisualMode::Points => "points",
            VisualMode::Wave => "wave",
            VisualMode::Floating => "floating",
        }
    }
}

impl FromStr for VisualMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "points" | "particles" => Ok(VisualMode::Points),
            "wave" => Ok(VisualMode::Wave),
            "floating" => Ok(VisualMode::Floating),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for VisualMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── VisualizerConfig ──────────────────────────────────────────────────────

/// Upper bound on `count`; keeps the generated vertex buffer well inside the
/// smallest buffer size a backend may report.
pub const MAX_POINT_COUNT: u32 = 1_000_000;

/// Configuration surface of one embedded visualizer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VisualizerConfig {
    pub mode: VisualMode,
    pub color: Rgb,
    /// Number of points (only `Points` mode is count-parameterized).
    pub count: u32,
    /// Time scale for the wave displacement.
    pub speed: f32,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            mode: VisualMode::Points,
            color: Rgb::WHITE,
            count: 50,
            speed: 0.5,
        }
    }
}

impl VisualizerConfig {
    /// Builds and validates a configuration from raw user-facing values.
    pub fn parse(mode: &str, color: &str, count: u32, speed: f32) -> Result<Self, ConfigError> {
        let config = Self {
            mode: mode.parse()?,
            color: color.parse()?,
            count,
            speed,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::ZeroCount);
        }
        if self.count > MAX_POINT_COUNT {
            return Err(ConfigError::CountTooLarge(self.count));
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(ConfigError::InvalidSpeed(self.speed));
        }
        Ok(())
    }
}

// ── Variant ───────────────────────────────────────────────────────────────

/// The two visualizer flavours found on the page.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Variant {
    /// Embedded, section-local visualizer.
    Scene(VisualizerConfig),
    /// Full-page point field that follows the pointer and reorients per section.
    Background,
}

impl Variant {
    #[inline]
    pub fn is_background(&self) -> bool {
        matches!(self, Variant::Background)
    }

    /// Whether the primitive reacts to pointer movement.
    pub fn follows_pointer(&self) -> bool {
        match self {
            Variant::Scene(cfg) => cfg.mode == VisualMode::Points,
            Variant::Background => true,
        }
    }
}

impl Default for Variant {
    fn default() -> Self {
        Variant::Scene(VisualizerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Rgb ───────────────────────────────────────────────────────────────

    #[test]
    fn rgb_parses_long_hex() {
        let c: Rgb = "#ff0000".parse().unwrap();
        assert_eq!(c, Rgb::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn rgb_parses_short_hex_without_hash() {
        let c: Rgb = "0f0".parse().unwrap();
        assert_eq!(c, Rgb::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn rgb_rejects_garbage() {
        assert!(matches!("#xyz".parse::<Rgb>(), Err(ConfigError::InvalidColor(_))));
        assert!(matches!("#ff00".parse::<Rgb>(), Err(ConfigError::InvalidColor(_))));
        assert!(matches!("#ffé000".parse::<Rgb>(), Err(ConfigError::InvalidColor(_))));
        assert!(matches!("#+f+f+f".parse::<Rgb>(), Err(ConfigError::InvalidColor(_))));
        assert!(matches!("+ff".parse::<Rgb>(), Err(ConfigError::InvalidColor(_))));
    }

    #[test]
    fn rgb_display_is_lower_hex() {
        assert_eq!(Rgb::from_u8(0xab, 0x01, 0xff).to_string(), "#ab01ff");
    }

    // ── VisualMode ────────────────────────────────────────────────────────

    #[test]
    fn mode_accepts_particles_alias() {
        assert_eq!("particles".parse::<VisualMode>().unwrap(), VisualMode::Points);
        assert_eq!("Wave".parse::<VisualMode>().unwrap(), VisualMode::Wave);
    }

    #[test]
    fn mode_rejects_unknown() {
        let err = "sparkles".parse::<VisualMode>().unwrap_err();
        assert_eq!(err, ConfigError::InvalidMode("sparkles".into()));
    }

    // ── VisualizerConfig ──────────────────────────────────────────────────

    #[test]
    fn default_config_is_valid() {
        let cfg = VisualizerConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.count, 50);
        assert_eq!(cfg.speed, 0.5);
    }

    #[test]
    fn parse_rejects_zero_count() {
        assert_eq!(
            VisualizerConfig::parse("points", "#fff", 0, 1.0),
            Err(ConfigError::ZeroCount)
        );
    }

    #[test]
    fn parse_caps_point_count() {
        assert_eq!(
            VisualizerConfig::parse("points", "#fff", u32::MAX, 0.5),
            Err(ConfigError::CountTooLarge(u32::MAX))
        );
        assert_eq!(
            VisualizerConfig::parse("points", "#fff", MAX_POINT_COUNT + 1, 0.5),
            Err(ConfigError::CountTooLarge(MAX_POINT_COUNT + 1))
        );
        assert!(VisualizerConfig::parse("points", "#fff", MAX_POINT_COUNT, 0.5).is_ok());
    }

    #[test]
    fn parse_rejects_bad_speed() {
        assert!(matches!(
            VisualizerConfig::parse("wave", "#fff", 10, -1.0),
            Err(ConfigError::InvalidSpeed(_))
        ));
        assert!(matches!(
            VisualizerConfig::parse("wave", "#fff", 10, f32::NAN),
            Err(ConfigError::InvalidSpeed(_))
        ));
    }

    #[test]
    fn only_points_scene_follows_pointer() {
        let wave = VisualizerConfig { mode: VisualMode::Wave, ..Default::default() };
        assert!(!Variant::Scene(wave).follows_pointer());
        assert!(Variant::Scene(VisualizerConfig::default()).follows_pointer());
        assert!(Variant::Background.follows_pointer());
    }
}
