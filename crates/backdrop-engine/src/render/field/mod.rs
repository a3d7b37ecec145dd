//! Point-sprite and wireframe renderer for animated 3D fields.
//!
//! Geometry is uploaded once into a slot addressed by [`GeometryId`] and
//! rewritten in place when its vertices animate. Each slot carries its own
//! uniform buffer, so several slots can be drawn in one frame.

mod common;
mod renderer;

pub use common::{FieldUniforms, LineVertex, PointInstance};
pub use renderer::{FieldRenderer, GeometryId};
