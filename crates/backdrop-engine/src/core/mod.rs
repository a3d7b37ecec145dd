//! Core engine-facing contracts.
//!
//! Stable interface between the runtime (platform loop) and the visualizer
//! layer. Runtime internals stay private; apps see a per-frame context.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
