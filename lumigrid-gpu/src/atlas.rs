use glam::{uvec2, UVec2, UVec3};

/// Addressing scheme of a probe atlas.
///
/// Each probe owns one `tile x tile` texel block inside a single 2D texture;
/// the x slices of the grid run left to right, the y slices top to bottom,
/// and the z slices are stacked below one another. The atlas is therefore
/// `counts.x * tile` wide and `counts.y * counts.z * tile` tall.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtlasLayout {
    counts: UVec3,
    tile: u32,
}

impl AtlasLayout {
    pub fn new(counts: UVec3, tile: u32) -> Self {
        Self { counts, tile }
    }

    pub fn tile(&self) -> u32 {
        self.tile
    }

    pub fn size(&self) -> UVec2 {
        uvec2(
            self.counts.x * self.tile,
            self.counts.y * self.counts.z * self.tile,
        )
    }

    /// Top-left texel of the given probe's tile.
    pub fn tile_origin(&self, probe: UVec3) -> UVec2 {
        uvec2(
            probe.x * self.tile,
            (probe.y + probe.z * self.counts.y) * self.tile,
        )
    }

    /// Texel holding the given probe's `local` sample.
    pub fn texel(&self, probe: UVec3, local: UVec2) -> UVec2 {
        self.tile_origin(probe) + local
    }

    /// Inverse of [`Self::texel()`]; maps an atlas texel back to its probe
    /// and its position within that probe's tile.
    pub fn probe_at(&self, texel: UVec2) -> (UVec3, UVec2) {
        let tile = texel / self.tile;
        let row = tile.y;

        let probe = UVec3 {
            x: tile.x,
            y: row % self.counts.y,
            z: row / self.counts.y,
        };

        (probe, texel % self.tile)
    }
}

#[cfg(test)]
mod tests {
    use glam::uvec3;

    use super::*;

    #[test]
    fn size() {
        assert_eq!(
            uvec2(64, 256),
            AtlasLayout::new(uvec3(4, 4, 4), 16).size(),
        );

        assert_eq!(
            uvec2(128, 512),
            AtlasLayout::new(uvec3(8, 8, 8), 16).size(),
        );

        assert_eq!(
            uvec2(64, 512),
            AtlasLayout::new(uvec3(8, 8, 8), 8).size(),
        );
    }

    #[test]
    fn tiles_cover_the_atlas_exactly_once() {
        let target = AtlasLayout::new(uvec3(3, 4, 5), 4);
        let size = target.size();

        let mut owners = vec![None; (size.x * size.y) as usize];

        for z in 0..5 {
            for y in 0..4 {
                for x in 0..3 {
                    let probe = uvec3(x, y, z);
                    let origin = target.tile_origin(probe);

                    assert!(origin.x + target.tile() <= size.x);
                    assert!(origin.y + target.tile() <= size.y);

                    for ly in 0..target.tile() {
                        for lx in 0..target.tile() {
                            let texel = target.texel(probe, uvec2(lx, ly));
                            let owner = &mut owners[(texel.y * size.x + texel.x) as usize];

                            assert_eq!(None, *owner, "texel {texel} claimed twice");

                            *owner = Some(probe);
                        }
                    }
                }
            }
        }

        assert!(owners.iter().all(Option::is_some));
    }

    #[test]
    fn probe_at_inverts_texel() {
        let target = AtlasLayout::new(uvec3(3, 4, 5), 4);

        for z in 0..5 {
            for y in 0..4 {
                for x in 0..3 {
                    let probe = uvec3(x, y, z);
                    let local = uvec2(x % 4, (y + z) % 4);

                    assert_eq!(
                        (probe, local),
                        target.probe_at(target.texel(probe, local)),
                    );
                }
            }
        }
    }
}
