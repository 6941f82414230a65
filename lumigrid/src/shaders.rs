/// Kernels, compiled from the WGSL sources embedded at build time.
#[derive(Debug)]
pub struct Shaders {
    pub generate_probes: wgpu::ShaderModule,
    pub probe_trace: wgpu::ShaderModule,
    pub probe_radiance: wgpu::ShaderModule,
    pub probe_irradiance: wgpu::ShaderModule,
    pub blend: wgpu::ShaderModule,
    pub visualize_probes: wgpu::ShaderModule,
}

impl Shaders {
    pub fn new(device: &wgpu::Device) -> Self {
        let generate_probes = device.create_shader_module(wgpu::include_wgsl!(
            "../shaders/generate_probes.wgsl"
        ));

        let probe_trace = device.create_shader_module(wgpu::include_wgsl!(
            "../shaders/probe_trace.wgsl"
        ));

        let probe_radiance = device.create_shader_module(wgpu::include_wgsl!(
            "../shaders/probe_radiance.wgsl"
        ));

        let probe_irradiance = device.create_shader_module(wgpu::include_wgsl!(
            "../shaders/probe_irradiance.wgsl"
        ));

        let blend = device
            .create_shader_module(wgpu::include_wgsl!("../shaders/blend.wgsl"));

        let visualize_probes = device.create_shader_module(wgpu::include_wgsl!(
            "../shaders/visualize_probes.wgsl"
        ));

        Self {
            generate_probes,
            probe_trace,
            probe_radiance,
            probe_irradiance,
            blend,
            visualize_probes,
        }
    }
}
