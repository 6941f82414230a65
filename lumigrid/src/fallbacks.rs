use glam::uvec2;

use crate::buffers::Texture;

/// Stand-ins bound in place of G-buffer inputs the caller did not supply.
///
/// The blend kernel never reads a slot whose flag says the input is absent,
/// so a single 1x1 texture can back all of them; it exists only because a
/// bind group must bind something.
#[derive(Debug)]
pub struct Fallbacks {
    pub blank: Texture,
}

impl Fallbacks {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            blank: Texture::new(
                device,
                "lumigrid_fallback_blank",
                uvec2(1, 1),
                wgpu::TextureFormat::Rgba16Float,
            ),
        }
    }
}
