use glam::UVec2;
use log::debug;

use crate::{DoubleBuffered, Options, Texture};

/// The per-probe atlas textures shared by the compute stages.
///
/// Tracing writes three atlases (hit position, hit normal, hit albedo) at
/// the trace tile resolution; shading writes radiance at its own resolution,
/// double-buffered so the current frame can be filtered against the previous
/// one; irradiance is single-buffered and read by composition.
#[derive(Debug)]
pub struct Atlases {
    pub trace_hits: Texture,
    pub trace_normals: Texture,
    pub trace_albedo: Texture,
    pub radiance: DoubleBuffered<Texture>,
    pub irradiance: Texture,
    sizes: AtlasSizes,
}

impl Atlases {
    pub fn new(device: &wgpu::Device, options: &Options) -> Self {
        let sizes = AtlasSizes::of(options);

        Self {
            trace_hits: Texture::new(
                device,
                "lumigrid_trace_hits",
                sizes.trace,
                wgpu::TextureFormat::Rgba32Float,
            ),
            trace_normals: Texture::new(
                device,
                "lumigrid_trace_normals",
                sizes.trace,
                wgpu::TextureFormat::Rgba16Float,
            ),
            trace_albedo: Texture::new(
                device,
                "lumigrid_trace_albedo",
                sizes.trace,
                wgpu::TextureFormat::Rgba16Float,
            ),
            radiance: DoubleBuffered::<Texture>::new(
                device,
                "lumigrid_radiance",
                sizes.radiance,
                wgpu::TextureFormat::Rgba16Float,
            ),
            irradiance: Texture::new(
                device,
                "lumigrid_irradiance",
                sizes.irradiance,
                wgpu::TextureFormat::Rgba16Float,
            ),
            sizes,
        }
    }

    /// Reallocates every atlas when the grid or tile configuration changed
    /// the computed dimensions; an unchanged configuration is a no-op.
    /// Returns whether the textures were replaced, in which case bind groups
    /// referencing them are stale and the radiance history is gone.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        options: &Options,
    ) -> bool {
        let sizes = AtlasSizes::of(options);

        if sizes == self.sizes {
            return false;
        }

        debug!("Reallocating atlases; {:?} -> {sizes:?}", self.sizes);

        *self = Self::new(device, options);

        true
    }
}

/// Dimensions the current configuration calls for; when they match the live
/// ones, the textures can be kept as they are.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct AtlasSizes {
    trace: UVec2,
    radiance: UVec2,
    irradiance: UVec2,
}

impl AtlasSizes {
    fn of(options: &Options) -> Self {
        let grid = options.grid();

        Self {
            trace: grid.trace_layout().size(),
            radiance: grid.radiance_layout().size(),
            irradiance: grid.irradiance_layout().size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{uvec2, uvec3};

    use super::*;

    #[test]
    fn sizes_follow_the_tile_layouts() {
        let options = Options {
            probe_counts: uvec3(4, 4, 4),
            tile_res_trace: 16,
            tile_res_radiance: 16,
            tile_res_irradiance: 8,
            ..Default::default()
        };

        let sizes = AtlasSizes::of(&options);

        assert_eq!(uvec2(64, 256), sizes.trace);
        assert_eq!(uvec2(64, 256), sizes.radiance);
        assert_eq!(uvec2(32, 128), sizes.irradiance);
    }

    #[test]
    fn sizes_track_resolution_changes_only() {
        let base = Options::default();

        // Same configuration, same sizes; preparing twice must not thrash
        assert_eq!(AtlasSizes::of(&base), AtlasSizes::of(&base.clone()));

        let mut changed = base.clone();
        changed.tile_res_irradiance = 4;
        assert_ne!(AtlasSizes::of(&base), AtlasSizes::of(&changed));

        let mut changed = base.clone();
        changed.probe_counts = uvec3(2, 2, 2);
        assert_ne!(AtlasSizes::of(&base), AtlasSizes::of(&changed));

        // Uniform-only fields leave the sizes alone
        let mut changed = base.clone();
        changed.gi_intensity = 3.0;
        changed.max_ray_distance = 10.0;
        assert_eq!(AtlasSizes::of(&base), AtlasSizes::of(&changed));
    }
}
