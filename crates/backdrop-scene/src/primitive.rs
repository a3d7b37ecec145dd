//! CPU-side geometry drawn by a viewport.
//!
//! A `PrimitiveSet` is created once by the generator and then only mutated in
//! place. Attribute arrays are flat `f32` buffers (`count × components`), the
//! same layout a GPU vertex buffer expects.

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::config::Rgb;

/// How the vertex buffer is interpreted when drawn.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Topology {
    /// One camera-facing sprite per vertex.
    Points,
    /// Indexed line list over `edges`.
    Wireframe,
}

/// Rigid transform applied to the whole set.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// XYZ Euler angles in radians.
    pub rotation: Vec3,
}

impl Transform {
    /// Model matrix `T · Rx · Ry · Rz`.
    pub fn matrix(&self) -> Mat4 {
        let r = self.rotation;
        let rot = Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z);
        Mat4::from_rotation_translation(rot, self.position)
    }
}

/// Appearance of a primitive set.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub color: Rgb,
    pub opacity: f32,
    /// Sprite diameter in world units (ignored for wireframes).
    pub point_size: f32,
    /// Use the per-vertex `colors` / `sizes` attributes instead of `color` / `point_size`.
    pub vertex_colors: bool,
    /// Circular, soft-edged sprites instead of squares.
    pub round_sprites: bool,
    /// Apply the viewport light set.
    pub lit: bool,
    /// Sprite pixels per world unit of size at unit depth. `None` means half
    /// the surface height, which matches a perspective-correct world size.
    pub sprite_scale: Option<f32>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Rgb::WHITE,
            opacity: 0.8,
            point_size: 0.05,
            vertex_colors: false,
            round_sprites: false,
            lit: false,
            sprite_scale: None,
        }
    }
}

/// Points or mesh vertices plus their per-vertex attributes.
///
/// Invariant: `positions.len() == 3 * count`, and every optional attribute has
/// `count × components` entries. Nothing here reallocates after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveSet {
    topology: Topology,
    positions: Vec<f32>,
    colors: Option<Vec<f32>>,
    sizes: Option<Vec<f32>>,
    normals: Option<Vec<f32>>,
    edges: Vec<u32>,
    revision: u64,

    pub transform: Transform,
}

impl PrimitiveSet {
    pub fn points(positions: Vec<f32>) -> Self {
        debug_assert_eq!(positions.len() % 3, 0);
        Self {
            topology: Topology::Points,
            positions,
            colors: None,
            sizes: None,
            normals: None,
            edges: Vec::new(),
            revision: 0,
            transform: Transform::default(),
        }
    }

    pub fn wireframe(positions: Vec<f32>, normals: Vec<f32>, edges: Vec<u32>) -> Self {
        debug_assert_eq!(positions.len() % 3, 0);
        debug_assert_eq!(positions.len(), normals.len());
        debug_assert_eq!(edges.len() % 2, 0);
        Self {
            topology: Topology::Wireframe,
            positions,
            colors: None,
            sizes: None,
            normals: Some(normals),
            edges,
            revision: 0,
            transform: Transform::default(),
        }
    }

    /// Attaches per-point colors (3 floats each).
    pub fn with_colors(mut self, colors: Vec<f32>) -> Self {
        debug_assert_eq!(colors.len(), self.positions.len());
        self.colors = Some(colors);
        self
    }

    /// Attaches per-point sizes (1 float each).
    pub fn with_sizes(mut self, sizes: Vec<f32>) -> Self {
        debug_assert_eq!(sizes.len(), self.count());
        self.sizes = Some(sizes);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    #[inline]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Number of vertices.
    #[inline]
    pub fn count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    #[inline]
    pub fn colors(&self) -> Option<&[f32]> {
        self.colors.as_deref()
    }

    #[inline]
    pub fn sizes(&self) -> Option<&[f32]> {
        self.sizes.as_deref()
    }

    #[inline]
    pub fn normals(&self) -> Option<&[f32]> {
        self.normals.as_deref()
    }

    /// Line-list indices, two per edge. Empty for point sets.
    #[inline]
    pub fn edges(&self) -> &[u32] {
        &self.edges
    }

    /// Bumped whenever vertex data changes (not on transform changes).
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[inline]
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[i * 3..i * 3 + 3])
    }

    /// Rewrites the z component of every vertex from its `(x, y)`.
    pub fn displace_z(&mut self, mut f: impl FnMut(f32, f32) -> f32) {
        for p in self.positions.chunks_exact_mut(3) {
            p[2] = f(p[0], p[1]);
        }
        self.revision = self.revision.wrapping_add(1);
    }

    /// True when no position or transform component is NaN/inf.
    pub fn is_finite(&self) -> bool {
        self.positions.iter().all(|v| v.is_finite())
            && self.transform.position.is_finite()
            && self.transform.rotation.is_finite()
    }
}
