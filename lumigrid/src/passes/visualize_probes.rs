use std::f32::consts::{PI, TAU};
use std::mem;
use std::ops::Range;

use glam::{UVec2, Vec3};
use log::debug;
use wgpu::util::DeviceExt;

use crate::{
    gpu, BindGroup, Frame, MappedUniformBuffer, Probes, Shaders, Texture,
};

const SPHERE_SEGMENTS: u32 = 16;
const SPHERE_RINGS: u32 = 8;

/// Draws one sphere per probe, translated by the probe's generated position;
/// purely diagnostic, the lighting result never sees it.
///
/// The sphere radius is baked into the mesh, so a radius change rebuilds the
/// whole pass. Depth comes from the caller when supplied; otherwise the pass
/// keeps a private depth buffer sized to the output and cleared before use.
#[derive(Debug)]
pub struct VisualizeProbesPass {
    bg0: BindGroup,
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
    pipeline: wgpu::RenderPipeline,
    format: wgpu::TextureFormat,
    depth: Option<Texture>,
}

impl VisualizeProbesPass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &Shaders,
        camera: &MappedUniformBuffer<gpu::Camera>,
        probes: &Probes,
        radius: f32,
        format: wgpu::TextureFormat,
    ) -> Self {
        debug!("Initializing pass: visualize_probes; format={format:?}");

        let bg0 = BindGroup::builder("visualize_probes_bg0")
            .add(&camera.bind_readable())
            .add(&probes.buffer().bind_readable())
            .build(device);

        let (vertex_data, index_data) =
            sphere_mesh(radius, SPHERE_SEGMENTS, SPHERE_RINGS);

        let vertices =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("lumigrid_visualize_probes_vertices"),
                contents: bytemuck::cast_slice(&vertex_data),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let indices =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("lumigrid_visualize_probes_indices"),
                contents: bytemuck::cast_slice(&index_data),
                usage: wgpu::BufferUsages::INDEX,
            });

        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("lumigrid_visualize_probes_pipeline_layout"),
                bind_group_layouts: &[bg0.layout()],
                push_constant_ranges: &[wgpu::PushConstantRange {
                    stages: wgpu::ShaderStages::FRAGMENT,
                    range: Range {
                        start: 0,
                        end: mem::size_of::<gpu::VisualizeProbesPassParams>()
                            as u32,
                    },
                }],
            });

        let pipeline =
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("lumigrid_visualize_probes_pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shaders.visualize_probes,
                    entry_point: "vs_main",
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: mem::size_of::<Vec3>() as _,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x3,
                        }],
                    }],
                },
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: wgpu::TextureFormat::Depth32Float,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &shaders.visualize_probes,
                    entry_point: "fs_main",
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                multiview: None,
            });

        Self {
            bg0,
            vertices,
            indices,
            index_count: index_data.len() as u32,
            pipeline,
            format,
            depth: None,
        }
    }

    /// Format the pipeline was compiled against; a frame arriving with a
    /// different output format needs the pass rebuilt.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn run(
        &mut self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        frame: &Frame,
        probe_count: u32,
        color: Vec3,
        alternate: bool,
    ) {
        let depth_attachment = match frame.depth {
            Some(view) => wgpu::RenderPassDepthStencilAttachment {
                view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: true,
                }),
                stencil_ops: None,
            },

            None => {
                let depth = Self::own_depth(
                    &mut self.depth,
                    device,
                    frame.output_size,
                );

                wgpu::RenderPassDepthStencilAttachment {
                    view: depth.view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: true,
                    }),
                    stencil_ops: None,
                }
            }
        };

        let params = gpu::VisualizeProbesPassParams {
            color: color.extend(1.0),
        };

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lumigrid_visualize_probes"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: frame.output,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: true,
                },
            })],
            depth_stencil_attachment: Some(depth_attachment),
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, self.bg0.get(alternate), &[]);
        pass.set_vertex_buffer(0, self.vertices.slice(..));
        pass.set_index_buffer(self.indices.slice(..), wgpu::IndexFormat::Uint32);

        pass.set_push_constants(
            wgpu::ShaderStages::FRAGMENT,
            0,
            bytemuck::bytes_of(&params),
        );

        pass.draw_indexed(0..self.index_count, 0, 0..probe_count);
    }

    fn own_depth<'a>(
        slot: &'a mut Option<Texture>,
        device: &wgpu::Device,
        size: UVec2,
    ) -> &'a Texture {
        if slot.as_ref().map_or(false, |depth| depth.size() == size) {
            return slot.as_ref().unwrap();
        }

        slot.insert(Texture::depth(
            device,
            "lumigrid_visualize_probes_depth",
            size,
        ))
    }
}

/// Builds a latitude-longitude sphere with the radius baked in; counter-
/// clockwise winding seen from outside.
fn sphere_mesh(
    radius: f32,
    segments: u32,
    rings: u32,
) -> (Vec<Vec3>, Vec<u32>) {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for ring in 0..=rings {
        let theta = PI * (ring as f32) / (rings as f32);

        for segment in 0..=segments {
            let phi = TAU * (segment as f32) / (segments as f32);

            vertices.push(
                radius
                    * Vec3::new(
                        theta.sin() * phi.cos(),
                        theta.cos(),
                        theta.sin() * phi.sin(),
                    ),
            );
        }
    }

    for ring in 0..rings {
        for segment in 0..segments {
            let curr = ring * (segments + 1) + segment;
            let next = curr + segments + 1;

            indices.extend_from_slice(&[
                curr,
                curr + 1,
                next,
                next,
                curr + 1,
                next + 1,
            ]);
        }
    }

    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn sphere_vertices_sit_on_the_sphere() {
        let (vertices, indices) = sphere_mesh(0.25, 16, 8);

        assert_eq!((16 + 1) * (8 + 1), vertices.len());
        assert_eq!(16 * 8 * 6, indices.len());

        for vertex in &vertices {
            assert_relative_eq!(0.25, vertex.length(), epsilon = 1.0e-6);
        }

        for index in &indices {
            assert!((*index as usize) < vertices.len());
        }
    }

    #[test]
    fn sphere_triangles_face_outward() {
        let (vertices, indices) = sphere_mesh(1.0, 16, 8);

        for triangle in indices.chunks(3) {
            let v0 = vertices[triangle[0] as usize];
            let v1 = vertices[triangle[1] as usize];
            let v2 = vertices[triangle[2] as usize];

            let normal = (v1 - v0).cross(v2 - v0);

            // Triangles touching a pole are degenerate and carry no
            // orientation
            if normal.length() < 1.0e-6 {
                continue;
            }

            let center = (v0 + v1 + v2) / 3.0;

            assert!(normal.dot(center) > 0.0);
        }
    }
}
