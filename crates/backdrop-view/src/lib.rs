//! Backdrop view: runs a `backdrop-scene` viewport in a window on top of
//! `backdrop-engine`.
//!
//! ```rust,ignore
//! use backdrop_view::Application;
//!
//! Application::new().background().run()?;
//! ```

pub mod app;
pub mod host;
pub mod page;

pub use app::Application;
pub use backdrop_scene::{VisualMode, VisualizerConfig};
