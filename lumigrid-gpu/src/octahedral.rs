//! Octahedral mapping between unit directions and square tiles.
//!
//! Probe tiles store directional data; a direction is folded onto the unit
//! octahedron and unwrapped into `[0, 1]^2`, so that every texel of a tile
//! corresponds to a cone of directions and the whole sphere is covered with
//! no seams inside the tile.

use glam::{vec2, vec3, UVec2, Vec2, Vec3};

/// Maps a unit direction to octahedral uv in `[0, 1]^2`.
pub fn encode(dir: Vec3) -> Vec2 {
    let p = dir.truncate() / (dir.x.abs() + dir.y.abs() + dir.z.abs());

    let p = if dir.z < 0.0 {
        vec2(
            (1.0 - p.y.abs()) * sign(p.x),
            (1.0 - p.x.abs()) * sign(p.y),
        )
    } else {
        p
    };

    p * 0.5 + 0.5
}

/// Inverse of [`encode()`].
pub fn decode(uv: Vec2) -> Vec3 {
    let f = uv * 2.0 - 1.0;
    let z = 1.0 - f.x.abs() - f.y.abs();
    let t = (-z).max(0.0);

    vec3(f.x - sign(f.x) * t, f.y - sign(f.y) * t, z).normalize()
}

/// Direction covered by the center of the `local` texel of a `tile x tile`
/// probe tile.
pub fn texel_direction(local: UVec2, tile: u32) -> Vec3 {
    decode((local.as_vec2() + 0.5) / (tile as f32))
}

fn sign(x: f32) -> f32 {
    if x >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::uvec2;

    use super::*;

    #[test]
    fn encode_decode() {
        let dirs = [
            vec3(1.0, 0.0, 0.0),
            vec3(-1.0, 0.0, 0.0),
            vec3(0.0, 1.0, 0.0),
            vec3(0.0, -1.0, 0.0),
            vec3(0.0, 0.0, 1.0),
            vec3(0.0, 0.0, -1.0),
            vec3(1.0, 2.0, 3.0).normalize(),
            vec3(-3.0, 1.0, -2.0).normalize(),
            vec3(0.5, -0.5, 0.7).normalize(),
        ];

        for dir in dirs {
            assert_relative_eq!(dir, decode(encode(dir)), epsilon = 1e-6);
        }
    }

    #[test]
    fn decode_yields_unit_vectors() {
        for y in 0..16 {
            for x in 0..16 {
                let dir = texel_direction(uvec2(x, y), 16);

                assert_relative_eq!(1.0, dir.length(), epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn texels_spread_over_both_hemispheres() {
        let mut up = 0;
        let mut down = 0;

        for y in 0..8 {
            for x in 0..8 {
                if texel_direction(uvec2(x, y), 8).z >= 0.0 {
                    up += 1;
                } else {
                    down += 1;
                }
            }
        }

        assert_eq!(up, down);
    }
}
