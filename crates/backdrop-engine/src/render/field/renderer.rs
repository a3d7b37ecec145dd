use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::render::{RenderCtx, RenderTarget};

use super::common::{
    premul_alpha_blend, uniform_min_binding_size, FieldUniform, FieldUniforms, LineVertex,
    PointInstance, QuadVertex, QUAD_INDICES, QUAD_VERTICES,
};

/// Handle to geometry owned by a [`FieldRenderer`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GeometryId(u32);

enum Buffers {
    Points {
        instances: wgpu::Buffer,
        count: u32,
    },
    Lines {
        vertices: wgpu::Buffer,
        vertex_count: u32,
        indices: wgpu::Buffer,
        index_count: u32,
    },
}

struct Slot {
    buffers: Buffers,
    ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Renderer for point-sprite fields and wireframe line lists.
///
/// Pipelines are built lazily for the current surface format; geometry slots
/// live until [`FieldRenderer::release`] is called.
#[derive(Default)]
pub struct FieldRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    points_pipeline: Option<wgpu::RenderPipeline>,
    lines_pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    slots: HashMap<GeometryId, Slot>,
    next_id: u32,
}

impl FieldRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of geometry slots currently allocated.
    pub fn live_geometry(&self) -> usize {
        self.slots.len()
    }

    pub fn allocate_points(
        &mut self,
        device: &wgpu::Device,
        instances: &[PointInstance],
    ) -> GeometryId {
        let buffer = create_vertex_buffer(device, "backdrop point instances", instances);
        let buffers = Buffers::Points {
            instances: buffer,
            count: instances.len() as u32,
        };
        self.insert_slot(device, buffers)
    }

    pub fn allocate_lines(
        &mut self,
        device: &wgpu::Device,
        vertices: &[LineVertex],
        indices: &[u32],
    ) -> GeometryId {
        let vbo = create_vertex_buffer(device, "backdrop line vertices", vertices);
        let index_data: &[u32] = if indices.is_empty() { &[0] } else { indices };
        let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("backdrop line indices"),
            contents: bytemuck::cast_slice(index_data),
            usage: wgpu::BufferUsages::INDEX,
        });
        let buffers = Buffers::Lines {
            vertices: vbo,
            vertex_count: vertices.len() as u32,
            indices: ibo,
            index_count: indices.len() as u32,
        };
        self.insert_slot(device, buffers)
    }

    /// Overwrites a point slot's instances. The count must match the allocation.
    pub fn write_points(&self, queue: &wgpu::Queue, id: GeometryId, instances: &[PointInstance]) {
        match self.slots.get(&id).map(|s| &s.buffers) {
            Some(Buffers::Points { instances: buf, count }) if *count as usize == instances.len() => {
                queue.write_buffer(buf, 0, bytemuck::cast_slice(instances));
            }
            Some(_) => log::warn!("write_points: {id:?} is not a point slot of {} instances", instances.len()),
            None => log::warn!("write_points: unknown {id:?}"),
        }
    }

    /// Overwrites a line slot's vertices. The count must match the allocation.
    pub fn write_line_vertices(&self, queue: &wgpu::Queue, id: GeometryId, vertices: &[LineVertex]) {
        match self.slots.get(&id).map(|s| &s.buffers) {
            Some(Buffers::Lines { vertices: buf, vertex_count, .. })
                if *vertex_count as usize == vertices.len() =>
            {
                queue.write_buffer(buf, 0, bytemuck::cast_slice(vertices));
            }
            Some(_) => log::warn!("write_line_vertices: {id:?} is not a line slot of {} vertices", vertices.len()),
            None => log::warn!("write_line_vertices: unknown {id:?}"),
        }
    }

    /// Frees a slot's GPU buffers. Unknown ids are ignored.
    pub fn release(&mut self, id: GeometryId) {
        if let Some(slot) = self.slots.remove(&id) {
            match slot.buffers {
                Buffers::Points { instances, .. } => instances.destroy(),
                Buffers::Lines { vertices, indices, .. } => {
                    vertices.destroy();
                    indices.destroy();
                }
            }
            slot.ubo.destroy();
        }
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        id: GeometryId,
        uniforms: &FieldUniforms,
    ) {
        self.ensure_pipelines(ctx);
        self.ensure_static_buffers(ctx);

        let Some(slot) = self.slots.get(&id) else {
            log::warn!("render: unknown {id:?}");
            return;
        };

        ctx.queue.write_buffer(
            &slot.ubo,
            0,
            bytemuck::bytes_of(&FieldUniform::pack(uniforms, ctx.viewport)),
        );

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("backdrop field pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        match &slot.buffers {
            Buffers::Points { instances, count } => {
                if *count == 0 {
                    return;
                }
                let Some(pipeline) = self.points_pipeline.as_ref() else { return };
                let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
                let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };

                rpass.set_pipeline(pipeline);
                rpass.set_bind_group(0, &slot.bind_group, &[]);
                rpass.set_vertex_buffer(0, quad_vbo.slice(..));
                rpass.set_vertex_buffer(1, instances.slice(..));
                rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
                rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..*count);
            }
            Buffers::Lines { vertices, indices, index_count, .. } => {
                if *index_count == 0 {
                    return;
                }
                let Some(pipeline) = self.lines_pipeline.as_ref() else { return };

                rpass.set_pipeline(pipeline);
                rpass.set_bind_group(0, &slot.bind_group, &[]);
                rpass.set_vertex_buffer(0, vertices.slice(..));
                rpass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..*index_count, 0, 0..1);
            }
        }
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn insert_slot(&mut self, device: &wgpu::Device, buffers: Buffers) -> GeometryId {
        let bgl = self.ensure_layout(device).clone();

        let ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("backdrop field ubo"),
            size: std::mem::size_of::<FieldUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("backdrop field bind group"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        let id = GeometryId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.slots.insert(id, Slot { buffers, ubo, bind_group });
        log::debug!("field geometry {id:?} allocated ({} live)", self.slots.len());
        id
    }

    fn ensure_layout(&mut self, device: &wgpu::Device) -> &wgpu::BindGroupLayout {
        self.bind_group_layout.get_or_insert_with(|| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("backdrop field bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: uniform_min_binding_size(),
                    },
                    count: None,
                }],
            })
        })
    }

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format)
            && self.points_pipeline.is_some()
            && self.lines_pipeline.is_some()
        {
            return;
        }

        let bgl = self.ensure_layout(ctx.device).clone();
        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("backdrop field pipeline layout"),
                bind_group_layouts: &[&bgl],
                immediate_size: 0,
            });

        let points_shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("backdrop points shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/points.wgsl").into()),
        });
        let lines_shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("backdrop lines shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/lines.wgsl").into()),
        });

        self.points_pipeline = Some(create_pipeline(
            ctx,
            &pipeline_layout,
            &points_shader,
            "backdrop points pipeline",
            &[QuadVertex::layout(), PointInstance::layout()],
            wgpu::PrimitiveTopology::TriangleList,
        ));
        self.lines_pipeline = Some(create_pipeline(
            ctx,
            &pipeline_layout,
            &lines_shader,
            "backdrop lines pipeline",
            &[LineVertex::layout()],
            wgpu::PrimitiveTopology::LineList,
        ));
        self.pipeline_format = Some(ctx.surface_format);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("backdrop quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("backdrop quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }
}

/// Vertex buffer initialized from `data`; empty data still gets one zeroed element.
fn create_vertex_buffer<T: bytemuck::Pod + Default>(
    device: &wgpu::Device,
    label: &str,
    data: &[T],
) -> wgpu::Buffer {
    let placeholder = [T::default()];
    let contents: &[T] = if data.is_empty() { &placeholder } else { data };
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(contents),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    })
}

fn create_pipeline(
    ctx: &RenderCtx<'_>,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    label: &str,
    buffers: &[wgpu::VertexBufferLayout<'_>],
    topology: wgpu::PrimitiveTopology,
) -> wgpu::RenderPipeline {
    ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.surface_format,
                blend: Some(premul_alpha_blend()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}
