//! Backdrop engine crate.
//!
//! Window, GPU device and input plumbing plus the point/line field renderer.
//! Knows nothing about visual modes or sections; those live in `backdrop-scene`.

pub mod device;
pub mod window;
pub mod input;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
