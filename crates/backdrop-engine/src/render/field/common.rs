//! GPU-facing data layouts shared by the point and line pipelines.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::coords::Viewport;

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── uniforms ──────────────────────────────────────────────────────────────

/// Per-draw parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FieldUniforms {
    pub view: Mat4,
    pub projection: Mat4,
    pub model: Mat4,
    /// Straight RGB multiplier and overall opacity.
    pub tint: [f32; 4],
    /// Direction toward the light, world space.
    pub light_dir: Vec3,
    pub ambient: f32,
    pub directional: f32,
    pub lit: bool,
    pub round_sprites: bool,
    /// Sprite pixels per unit of size at unit depth.
    pub sprite_scale: f32,
}

impl Default for FieldUniforms {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            model: Mat4::IDENTITY,
            tint: [1.0; 4],
            light_dir: Vec3::Z,
            ambient: 1.0,
            directional: 0.0,
            lit: false,
            round_sprites: false,
            sprite_scale: 1.0,
        }
    }
}

/// std140 mirror of the WGSL `Field` struct (256 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct FieldUniform {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub tint: [f32; 4],
    pub light: [f32; 4],
    pub params: [f32; 4],
    pub viewport: [f32; 4],
}

impl FieldUniform {
    pub(super) fn pack(u: &FieldUniforms, viewport: Viewport) -> Self {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        let l = u.light_dir.normalize_or_zero();
        Self {
            view: u.view.to_cols_array_2d(),
            proj: u.projection.to_cols_array_2d(),
            model: u.model.to_cols_array_2d(),
            tint: u.tint,
            light: [l.x, l.y, l.z, flag(u.lit)],
            params: [u.ambient, u.directional, flag(u.round_sprites), u.sprite_scale],
            viewport: [viewport.width.max(1.0), viewport.height.max(1.0), 0.0, 0.0],
        }
    }
}

pub(super) fn uniform_min_binding_size() -> Option<std::num::NonZeroU64> {
    std::num::NonZeroU64::new(std::mem::size_of::<FieldUniform>() as u64)
}

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub corner: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { corner: [0.0, 0.0] },
    QuadVertex { corner: [1.0, 0.0] },
    QuadVertex { corner: [1.0, 1.0] },
    QuadVertex { corner: [0.0, 1.0] },
];

pub(super) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

// ── point instance ────────────────────────────────────────────────────────

/// One sprite (32 bytes):
///
///  offset  0  position [f32; 3]  loc 1
///  offset 12  size     f32       loc 2
///  offset 16  color    [f32; 4]  loc 3  (straight rgb, alpha)
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 4],
}

impl PointInstance {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        1 => Float32x3, // position
        2 => Float32,   // size
        3 => Float32x4  // color
    ];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

// ── line vertex ───────────────────────────────────────────────────────────

/// Wireframe vertex (24 bytes): position at loc 0, normal at loc 1.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl LineVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3  // normal
    ];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_match_shader_strides() {
        assert_eq!(std::mem::size_of::<FieldUniform>(), 256);
        assert_eq!(std::mem::size_of::<PointInstance>(), 32);
        assert_eq!(std::mem::size_of::<LineVertex>(), 24);
        assert!(uniform_min_binding_size().is_some());
    }

    #[test]
    fn pack_encodes_flags_and_normalizes_light() {
        let u = FieldUniforms {
            light_dir: Vec3::new(10.0, 10.0, 10.0),
            lit: true,
            round_sprites: true,
            ambient: 0.5,
            directional: 1.0,
            sprite_scale: 300.0,
            ..Default::default()
        };
        let packed = FieldUniform::pack(&u, Viewport::new(800.0, 600.0));
        let inv = 1.0 / 3.0f32.sqrt();
        for c in &packed.light[..3] {
            assert!((c - inv).abs() < 1e-6);
        }
        assert_eq!(packed.light[3], 1.0);
        assert_eq!(packed.params, [0.5, 1.0, 1.0, 300.0]);
        assert_eq!(packed.viewport[..2], [800.0, 600.0]);
    }

    #[test]
    fn degenerate_viewport_is_floored() {
        let packed = FieldUniform::pack(&FieldUniforms::default(), Viewport::new(0.0, 0.0));
        assert_eq!(packed.viewport[..2], [1.0, 1.0]);
        assert_eq!(packed.params[2], 0.0);
    }
}
