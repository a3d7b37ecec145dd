//! GPU side of a viewport: turns primitive sets into renderer slots.

use backdrop_engine::paint::srgb_to_linear;
use backdrop_engine::render::field::{
    FieldRenderer, FieldUniforms, GeometryId, LineVertex, PointInstance,
};
use backdrop_scene::{DrawFrame, Material, PrimitiveSet, SurfaceSize, Topology, ViewportHost};

/// [`ViewportHost`] backed by a [`FieldRenderer`].
///
/// Holds its own device/queue handles so geometry can be released outside a
/// frame callback (e.g. when the window closes).
pub struct GpuHost {
    device: wgpu::Device,
    queue: wgpu::Queue,
    renderer: FieldRenderer,
    /// Revision of the set last written to each slot.
    uploaded: Option<(GeometryId, u64)>,
}

impl GpuHost {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            renderer: FieldRenderer::new(),
            uploaded: None,
        }
    }

    pub fn renderer_mut(&mut self) -> &mut FieldRenderer {
        &mut self.renderer
    }

    pub fn live_geometry(&self) -> usize {
        self.renderer.live_geometry()
    }

    /// Rewrites vertex data if the set changed since the last upload.
    pub fn sync(&mut self, id: GeometryId, set: &PrimitiveSet, material: &Material) {
        if self.uploaded == Some((id, set.revision())) {
            return;
        }
        match set.topology() {
            Topology::Points => {
                self.renderer.write_points(&self.queue, id, &point_instances(set, material));
            }
            Topology::Wireframe => {
                self.renderer.write_line_vertices(&self.queue, id, &line_vertices(set));
            }
        }
        self.uploaded = Some((id, set.revision()));
    }
}

impl ViewportHost for GpuHost {
    type Geometry = GeometryId;

    fn attach_surface(&mut self, size: SurfaceSize) {
        log::debug!("surface attached at {}x{}", size.width, size.height);
    }

    fn resize_surface(&mut self, size: SurfaceSize) {
        log::trace!("surface resized to {}x{}", size.width, size.height);
    }

    fn detach_surface(&mut self) {
        log::debug!("surface detached");
    }

    fn allocate(&mut self, set: &PrimitiveSet, material: &Material) -> GeometryId {
        let id = match set.topology() {
            Topology::Points => self
                .renderer
                .allocate_points(&self.device, &point_instances(set, material)),
            Topology::Wireframe => {
                self.renderer
                    .allocate_lines(&self.device, &line_vertices(set), set.edges())
            }
        };
        self.uploaded = Some((id, set.revision()));
        id
    }

    fn release(&mut self, geometry: GeometryId) {
        self.renderer.release(geometry);
        if self.uploaded.is_some_and(|(id, _)| id == geometry) {
            self.uploaded = None;
        }
    }
}

/// Sprite instances for a point set. Per-vertex colors and sizes win over the
/// material's when the material asks for them and the set carries them.
/// Colors are decoded from sRGB here; the surface re-encodes on write.
pub fn point_instances(set: &PrimitiveSet, material: &Material) -> Vec<PointInstance> {
    let colors = material.vertex_colors.then(|| set.colors()).flatten();
    let sizes = material.vertex_colors.then(|| set.sizes()).flatten();

    (0..set.count())
        .map(|i| {
            let color = match colors {
                Some(c) => [
                    srgb_to_linear(c[i * 3]),
                    srgb_to_linear(c[i * 3 + 1]),
                    srgb_to_linear(c[i * 3 + 2]),
                    1.0,
                ],
                None => [1.0; 4],
            };
            PointInstance {
                position: set.position(i).to_array(),
                size: sizes.map_or(material.point_size, |s| s[i]),
                color,
            }
        })
        .collect()
}

pub fn line_vertices(set: &PrimitiveSet) -> Vec<LineVertex> {
    let normals = set.normals();
    (0..set.count())
        .map(|i| LineVertex {
            position: set.position(i).to_array(),
            normal: normals.map_or([0.0, 0.0, 1.0], |n| [n[i * 3], n[i * 3 + 1], n[i * 3 + 2]]),
        })
        .collect()
}

/// Draw parameters for one frame. `surface_height` is in logical pixels.
pub fn field_uniforms<G>(frame: &DrawFrame<'_, G>, surface_height: f32) -> FieldUniforms {
    let m = frame.material;
    // Per-vertex colors are already in the instances; the tint only carries opacity.
    let rgb = if m.vertex_colors { [1.0; 3] } else { m.color.to_array().map(srgb_to_linear) };

    FieldUniforms {
        view: frame.view,
        projection: frame.projection,
        model: frame.model,
        tint: [rgb[0], rgb[1], rgb[2], m.opacity],
        light_dir: frame.lights.to_light(),
        ambient: frame.lights.ambient,
        directional: frame.lights.directional,
        lit: m.lit,
        round_sprites: m.round_sprites,
        sprite_scale: m.sprite_scale.unwrap_or(surface_height * 0.5),
    }
}
