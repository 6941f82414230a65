use glam::uvec3;

use crate::{gpu, ComputePass, MappedUniformBuffer, Probes, Shaders};

/// Fills the probe-positions buffer from the grid parameters.
///
/// Positions only depend on origin, spacing and counts, so this runs when
/// one of those changed and stays idle otherwise.
#[derive(Debug)]
pub struct GenerateProbesPass {
    pass: ComputePass,
}

impl GenerateProbesPass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &Shaders,
        grid: &MappedUniformBuffer<gpu::ProbeGrid>,
        probes: &Probes,
    ) -> Self {
        let pass = ComputePass::builder("generate_probes")
            .bind([
                &grid.bind_readable(),
                &probes.buffer().bind_writable(),
            ])
            .build(device, &shaders.generate_probes);

        Self { pass }
    }

    pub fn run(&self, encoder: &mut wgpu::CommandEncoder, probe_count: u32) {
        let size = uvec3((probe_count + 63) / 64, 1, 1);

        self.pass.run(encoder, false, size, ());
    }
}
