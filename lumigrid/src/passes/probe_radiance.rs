use glam::UVec2;

use crate::{
    gpu, Atlases, ComputePass, MappedStorageBuffer, MappedUniformBuffer,
    Shaders,
};

/// How much of the previous frame's radiance survives into the current one;
/// zero whenever the history buffer holds garbage.
const HYSTERESIS: f32 = 0.95;

/// Shades the traced hits into the radiance atlas.
///
/// Reads the previous frame's radiance and writes the current one, folding
/// the fresh lighting in through an exponential moving average; downstream
/// stages only ever observe the current side.
#[derive(Debug)]
pub struct ProbeRadiancePass {
    pass: ComputePass<gpu::ProbeRadiancePassParams>,
}

impl ProbeRadiancePass {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        device: &wgpu::Device,
        shaders: &Shaders,
        grid: &MappedUniformBuffer<gpu::ProbeGrid>,
        scene_info: &MappedUniformBuffer<gpu::SceneInfo>,
        triangles: &MappedStorageBuffer<gpu::Triangle>,
        lights: &MappedStorageBuffer<gpu::Light>,
        atlases: &Atlases,
    ) -> Self {
        let pass = ComputePass::builder("probe_radiance")
            .bind([
                &grid.bind_readable(),
                &scene_info.bind_readable(),
                &triangles.bind_readable(),
                &lights.bind_readable(),
            ])
            .bind([
                &atlases.trace_hits.bind_readable(),
                &atlases.trace_normals.bind_readable(),
                &atlases.trace_albedo.bind_readable(),
                &atlases.radiance.past().bind_readable(),
                &atlases.radiance.curr().bind_writable(),
            ])
            .build(device, &shaders.probe_radiance);

        Self { pass }
    }

    pub fn run(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        alternate: bool,
        size: UVec2,
        frame: u32,
        history_valid: bool,
    ) {
        let params = gpu::ProbeRadiancePassParams {
            seed: rand::random(),
            frame,
            hysteresis: if history_valid { HYSTERESIS } else { 0.0 },
        };

        let size = (size + UVec2::splat(7)) / 8;

        self.pass.run(encoder, alternate, size.extend(1), params);
    }
}
