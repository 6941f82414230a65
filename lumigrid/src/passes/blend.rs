use std::mem;
use std::ops::Range;

use log::debug;

use crate::{
    gpu, Atlases, BindGroup, Fallbacks, Frame, MappedUniformBuffer, Shaders,
};

/// Color the output is wiped to whenever compositing cannot run.
pub const NEUTRAL: wgpu::Color = wgpu::Color::BLACK;

/// What the composition step should do this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendAction {
    /// Sample irradiance and add it over the existing output.
    Composite,

    /// Clear the output to [`NEUTRAL`] so downstream consumers never read
    /// stale content.
    Clear,
}

impl BlendAction {
    pub fn select(enabled: bool, has_depth: bool) -> Self {
        if enabled && has_depth {
            Self::Composite
        } else {
            Self::Clear
        }
    }
}

/// Clears the output without touching anything else; the pass is empty, the
/// clear happens on load.
pub fn clear_output(
    encoder: &mut wgpu::CommandEncoder,
    view: &wgpu::TextureView,
) {
    let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("lumigrid_clear_output"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(NEUTRAL),
                store: true,
            },
        })],
        depth_stencil_attachment: None,
    });
}

/// Adds the irradiance field over the externally rendered output.
///
/// Each pixel with valid depth is reconstructed into world space, the eight
/// probes around it are sampled and the interpolated irradiance is blended
/// additively into the color target. The G-buffer views change identity
/// every frame, so they live in their own bind group recreated per call
/// against a fixed layout; absent ones bind a blank stand-in and are masked
/// out through the flag bits.
#[derive(Debug)]
pub struct BlendPass {
    bg0: BindGroup,
    bg1_layout: wgpu::BindGroupLayout,
    pipeline: wgpu::RenderPipeline,
    format: wgpu::TextureFormat,
}

impl BlendPass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &Shaders,
        grid: &MappedUniformBuffer<gpu::ProbeGrid>,
        camera: &MappedUniformBuffer<gpu::Camera>,
        atlases: &Atlases,
        format: wgpu::TextureFormat,
    ) -> Self {
        debug!("Initializing pass: blend; format={format:?}");

        let bg0 = BindGroup::builder("blend_bg0")
            .add(&grid.bind_readable())
            .add(&camera.bind_readable())
            .add(&atlases.irradiance.bind_readable())
            .build(device);

        let float_texture = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float {
                    filterable: false,
                },
            },
            count: None,
        };

        let bg1_layout = device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("lumigrid_blend_bg1_layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Depth,
                        },
                        count: None,
                    },
                    float_texture(1),
                    float_texture(2),
                    float_texture(3),
                ],
            },
        );

        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("lumigrid_blend_pipeline_layout"),
                bind_group_layouts: &[bg0.layout(), &bg1_layout],
                push_constant_ranges: &[wgpu::PushConstantRange {
                    stages: wgpu::ShaderStages::FRAGMENT,
                    range: Range {
                        start: 0,
                        end: mem::size_of::<gpu::BlendPassParams>() as u32,
                    },
                }],
            });

        let additive = wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        };

        let pipeline =
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("lumigrid_blend_pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shaders.blend,
                    entry_point: "vs_main",
                    buffers: &[],
                },
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &shaders.blend,
                    entry_point: "fs_main",
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState {
                            color: additive,
                            alpha: additive,
                        }),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                multiview: None,
            });

        Self {
            bg0,
            bg1_layout,
            pipeline,
            format,
        }
    }

    /// Format the pipeline was compiled against; a frame arriving with a
    /// different output format needs the pass rebuilt.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn run(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        frame: &Frame,
        fallbacks: &Fallbacks,
        alternate: bool,
    ) {
        let Some(depth) = frame.depth else {
            return;
        };

        let blank = fallbacks.blank.view();

        let bg1 = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumigrid_blend_bg1"),
            layout: &self.bg1_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(depth),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(
                        frame.normal.unwrap_or(blank),
                    ),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(
                        frame.albedo.unwrap_or(blank),
                    ),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(
                        frame.emissive.unwrap_or(blank),
                    ),
                },
            ],
        });

        let params = gpu::BlendPassParams::new(
            frame.normal.is_some(),
            frame.albedo.is_some(),
            frame.emissive.is_some(),
        );

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lumigrid_blend"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: frame.output,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: true,
                },
            })],
            depth_stencil_attachment: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, self.bg0.get(alternate), &[]);
        pass.set_bind_group(1, &bg1, &[]);

        pass.set_push_constants(
            wgpu::ShaderStages::FRAGMENT,
            0,
            bytemuck::bytes_of(&params),
        );

        pass.draw(0..3, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_depth_forces_a_clear() {
        assert_eq!(BlendAction::Composite, BlendAction::select(true, true));
        assert_eq!(BlendAction::Clear, BlendAction::select(true, false));
        assert_eq!(BlendAction::Clear, BlendAction::select(false, true));
        assert_eq!(BlendAction::Clear, BlendAction::select(false, false));
    }
}
