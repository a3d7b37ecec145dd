//! Color handling shared by the app layer and renderers.

pub mod color;

pub use color::{srgb_to_linear, Color};
