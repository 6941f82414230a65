use glam::UVec2;

use crate::gpu;

/// Externally owned targets and G-buffers for one [`Engine::execute()`]
/// call.
///
/// All views are borrowed for the duration of that call only and never
/// retained; the depth view, when given, must be a `Depth32Float` texture
/// usable both as a binding (the blend kernel samples it) and as a render
/// attachment (the visualization draws against it).
///
/// [`Engine::execute()`]: crate::Engine::execute
pub struct Frame<'a> {
    pub(crate) output: &'a wgpu::TextureView,
    pub(crate) output_format: wgpu::TextureFormat,
    pub(crate) output_size: UVec2,
    pub(crate) camera: gpu::Camera,
    pub(crate) depth: Option<&'a wgpu::TextureView>,
    pub(crate) normal: Option<&'a wgpu::TextureView>,
    pub(crate) albedo: Option<&'a wgpu::TextureView>,
    pub(crate) emissive: Option<&'a wgpu::TextureView>,
}

impl<'a> Frame<'a> {
    pub fn new(
        output: &'a wgpu::TextureView,
        output_format: wgpu::TextureFormat,
        output_size: UVec2,
        camera: gpu::Camera,
    ) -> Self {
        Self {
            output,
            output_format,
            output_size,
            camera,
            depth: None,
            normal: None,
            albedo: None,
            emissive: None,
        }
    }

    pub fn with_depth(mut self, view: &'a wgpu::TextureView) -> Self {
        self.depth = Some(view);
        self
    }

    pub fn with_normal(mut self, view: &'a wgpu::TextureView) -> Self {
        self.normal = Some(view);
        self
    }

    pub fn with_albedo(mut self, view: &'a wgpu::TextureView) -> Self {
        self.albedo = Some(view);
        self
    }

    pub fn with_emissive(mut self, view: &'a wgpu::TextureView) -> Self {
        self.emissive = Some(view);
        self
    }
}
