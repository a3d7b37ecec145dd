//! GPU rendering subsystem.
//!
//! Each renderer owns its GPU resources (pipelines, buffers) and creates them
//! lazily on first use against the current surface format.
//!
//! Convention: geometry is in world space; the vertex shader applies
//! `proj · view · model` from a per-draw uniform.

mod ctx;
pub mod field;

pub use ctx::{RenderCtx, RenderTarget};
