//! Backdrop scene crate.
//!
//! Everything the visualizer does that does not need a GPU: configuration,
//! geometry generation, per-frame animation, pointer and scroll handling, and
//! the viewport lifecycle. Rendering hosts plug in through [`ViewportHost`].

pub mod animator;
pub mod camera;
pub mod clock;
pub mod config;
pub mod error;
pub mod generator;
pub mod pointer;
pub mod primitive;
pub mod section;
pub mod tween;
pub mod viewport;

pub use camera::{Camera, LightSet};
pub use config::{MAX_POINT_COUNT, Rgb, Variant, VisualMode, VisualizerConfig};
pub use error::{ConfigError, ViewportError};
pub use primitive::{Material, PrimitiveSet, Topology, Transform};
pub use section::{Section, SectionLayout};
pub use viewport::{DrawFrame, SurfaceSize, Viewport, ViewportHost};
