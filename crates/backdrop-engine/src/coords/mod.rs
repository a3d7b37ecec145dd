//! Surface-space types shared by renderers.
//!
//! Logical pixels, origin top-left, +X right, +Y down.

mod viewport;

pub use viewport::Viewport;
