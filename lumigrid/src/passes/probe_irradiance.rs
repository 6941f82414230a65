use glam::UVec2;

use crate::{gpu, Atlases, ComputePass, MappedUniformBuffer, Shaders};

/// Integrates each probe's radiance tile into a cosine-filtered irradiance
/// tile; a straight function of the current radiance atlas, with no state of
/// its own.
#[derive(Debug)]
pub struct ProbeIrradiancePass {
    pass: ComputePass,
}

impl ProbeIrradiancePass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &Shaders,
        grid: &MappedUniformBuffer<gpu::ProbeGrid>,
        atlases: &Atlases,
    ) -> Self {
        let pass = ComputePass::builder("probe_irradiance")
            .bind([
                &grid.bind_readable(),
                &atlases.radiance.curr().bind_readable(),
                &atlases.irradiance.bind_writable(),
            ])
            .build(device, &shaders.probe_irradiance);

        Self { pass }
    }

    pub fn run(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        alternate: bool,
        size: UVec2,
    ) {
        let size = (size + UVec2::splat(7)) / 8;

        self.pass.run(encoder, alternate, size.extend(1), ());
    }
}
