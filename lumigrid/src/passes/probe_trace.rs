use glam::UVec2;

use crate::{
    gpu, Atlases, ComputePass, MappedStorageBuffer, MappedUniformBuffer,
    Probes, Shaders,
};

/// Shoots one ray per trace-atlas texel and records the hit surface.
///
/// Each texel's direction follows from its position inside the probe's tile,
/// so the kernel needs no per-frame parameters; identical scenes produce
/// identical atlases. Texels whose ray leaves the scene carry
/// [`gpu::MISS_ID`] in the hit atlas's w lane.
#[derive(Debug)]
pub struct ProbeTracePass {
    pass: ComputePass,
}

impl ProbeTracePass {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        device: &wgpu::Device,
        shaders: &Shaders,
        grid: &MappedUniformBuffer<gpu::ProbeGrid>,
        scene_info: &MappedUniformBuffer<gpu::SceneInfo>,
        triangles: &MappedStorageBuffer<gpu::Triangle>,
        probes: &Probes,
        atlases: &Atlases,
    ) -> Self {
        let pass = ComputePass::builder("probe_trace")
            .bind([
                &grid.bind_readable(),
                &scene_info.bind_readable(),
                &triangles.bind_readable(),
                &probes.buffer().bind_readable(),
            ])
            .bind([
                &atlases.trace_hits.bind_writable(),
                &atlases.trace_normals.bind_writable(),
                &atlases.trace_albedo.bind_writable(),
            ])
            .build(device, &shaders.probe_trace);

        Self { pass }
    }

    pub fn run(&self, encoder: &mut wgpu::CommandEncoder, size: UVec2) {
        let size = (size + UVec2::splat(7)) / 8;

        self.pass.run(encoder, false, size.extend(1), ());
    }
}
