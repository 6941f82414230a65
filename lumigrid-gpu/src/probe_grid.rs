use bytemuck::{Pod, Zeroable};
use glam::{UVec3, UVec4, Vec3, Vec4, Vec4Swizzles};

use crate::AtlasLayout;

/// Probe-volume constants, shared with every kernel.
///
/// The grid is a regular lattice: probe `(x, y, z)` sits at
/// `origin + (x, y, z) * spacing`, and its flat index is
/// `x + y * counts.x + z * counts.x * counts.y`. All of the addressing
/// below derives from those two formulas; the kernels re-implement them in
/// WGSL, so any change here must be mirrored there.
#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable, Debug, PartialEq)]
pub struct ProbeGrid {
    /// x/y/z - world-space origin; w - max ray distance
    pub d0: Vec4,

    /// x/y/z - spacing between probes; w - gi intensity
    pub d1: Vec4,

    /// x/y/z - probe counts; w - flattened probe count
    pub counts: UVec4,

    /// x - trace tile resolution; y - radiance tile resolution;
    /// z - irradiance tile resolution; w - rays per probe
    pub tiles: UVec4,
}

impl ProbeGrid {
    pub fn new(
        origin: Vec3,
        spacing: Vec3,
        counts: UVec3,
        tiles: UVec3,
        rays_per_probe: u32,
        max_ray_distance: f32,
        gi_intensity: f32,
    ) -> Self {
        Self {
            d0: origin.extend(max_ray_distance),
            d1: spacing.extend(gi_intensity),
            counts: counts.extend(counts.x * counts.y * counts.z),
            tiles: tiles.extend(rays_per_probe),
        }
    }

    pub fn origin(&self) -> Vec3 {
        self.d0.xyz()
    }

    pub fn spacing(&self) -> Vec3 {
        self.d1.xyz()
    }

    pub fn max_ray_distance(&self) -> f32 {
        self.d0.w
    }

    pub fn gi_intensity(&self) -> f32 {
        self.d1.w
    }

    pub fn counts(&self) -> UVec3 {
        self.counts.truncate()
    }

    pub fn probe_count(&self) -> u32 {
        self.counts.w
    }

    pub fn rays_per_probe(&self) -> u32 {
        self.tiles.w
    }

    /// Flattens a 3D probe coordinate into its buffer index.
    pub fn probe_index(&self, probe: UVec3) -> u32 {
        probe.x + probe.y * self.counts.x + probe.z * self.counts.x * self.counts.y
    }

    /// Inverse of [`Self::probe_index()`].
    pub fn probe_coords(&self, index: u32) -> UVec3 {
        UVec3 {
            x: index % self.counts.x,
            y: (index / self.counts.x) % self.counts.y,
            z: index / (self.counts.x * self.counts.y),
        }
    }

    pub fn probe_position(&self, probe: UVec3) -> Vec3 {
        self.origin() + probe.as_vec3() * self.spacing()
    }

    /// Maps a world-space point into continuous grid coordinates, i.e. the
    /// space in which probe `(x, y, z)` sits at `(x, y, z)`; used by the
    /// blend kernel to locate the eight enclosing probes.
    pub fn world_to_grid(&self, pos: Vec3) -> Vec3 {
        (pos - self.origin()) / self.spacing()
    }

    pub fn trace_layout(&self) -> AtlasLayout {
        AtlasLayout::new(self.counts(), self.tiles.x)
    }

    pub fn radiance_layout(&self) -> AtlasLayout {
        AtlasLayout::new(self.counts(), self.tiles.y)
    }

    pub fn irradiance_layout(&self) -> AtlasLayout {
        AtlasLayout::new(self.counts(), self.tiles.z)
    }
}

#[cfg(test)]
mod tests {
    use glam::{uvec3, vec3};

    use super::*;

    fn grid(counts: UVec3) -> ProbeGrid {
        ProbeGrid::new(
            vec3(0.0, 0.0, 0.0),
            vec3(1.0, 1.0, 1.0),
            counts,
            uvec3(16, 16, 8),
            288,
            100.0,
            1.0,
        )
    }

    #[test]
    fn indexing_is_a_bijection() {
        let target = grid(uvec3(3, 4, 5));

        assert_eq!(60, target.probe_count());

        for index in 0..target.probe_count() {
            let coords = target.probe_coords(index);

            assert!(coords.x < 3);
            assert!(coords.y < 4);
            assert!(coords.z < 5);
            assert_eq!(index, target.probe_index(coords));
        }
    }

    #[test]
    fn positions_of_a_unit_cube() {
        let target = grid(uvec3(2, 2, 2));

        let expected = [
            vec3(0.0, 0.0, 0.0),
            vec3(1.0, 0.0, 0.0),
            vec3(0.0, 1.0, 0.0),
            vec3(1.0, 1.0, 0.0),
            vec3(0.0, 0.0, 1.0),
            vec3(1.0, 0.0, 1.0),
            vec3(0.0, 1.0, 1.0),
            vec3(1.0, 1.0, 1.0),
        ];

        let actual: Vec<_> = (0..target.probe_count())
            .map(|index| target.probe_position(target.probe_coords(index)))
            .collect();

        assert_eq!(expected.as_slice(), actual.as_slice());
    }

    #[test]
    fn world_to_grid_centers_on_probes() {
        let target = ProbeGrid::new(
            vec3(-4.0, 0.0, 2.0),
            vec3(2.0, 1.0, 0.5),
            uvec3(8, 8, 8),
            uvec3(16, 16, 8),
            288,
            100.0,
            1.0,
        );

        let probe = uvec3(3, 5, 7);
        let pos = target.probe_position(probe);

        assert_eq!(probe.as_vec3(), target.world_to_grid(pos));
    }
}
