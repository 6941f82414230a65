use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4, Vec4Swizzles};

/// A point light, as the radiance kernel sees it.
#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable, Debug, PartialEq)]
pub struct Light {
    /// x/y/z - position; w - range
    pub d0: Vec4,

    /// x/y/z - color, premultiplied by intensity; w - unused
    pub d1: Vec4,
}

impl Light {
    pub fn new(position: Vec3, color: Vec3, range: f32) -> Self {
        Self {
            d0: position.extend(range),
            d1: color.extend(0.0),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.d0.xyz()
    }

    pub fn range(&self) -> f32 {
        self.d0.w
    }

    pub fn color(&self) -> Vec3 {
        self.d1.xyz()
    }

    /// Diffuse contribution of this light on a surface; the WGSL radiance
    /// kernel evaluates the same formula, texel by texel.
    ///
    /// Follows the usual smoothly-windowed inverse-square falloff, so that
    /// the light's influence reaches exactly zero at `range` instead of
    /// getting clipped mid-gradient.
    pub fn contribution(&self, point: Vec3, normal: Vec3) -> Vec3 {
        let to_light = self.position() - point;
        let distance_squared = to_light.length_squared();

        let factor = distance_squared / (self.range() * self.range());
        let smooth_factor = (1.0 - factor * factor).clamp(0.0, 1.0);
        let attenuation =
            smooth_factor * smooth_factor / distance_squared.max(0.0001);

        let cosine = normal.dot(to_light / distance_squared.sqrt()).max(0.0);

        self.color() * attenuation * cosine
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;

    #[test]
    fn contribution_falls_off_with_squared_distance() {
        let target = Light::new(vec3(0.0, 10.0, 0.0), Vec3::ONE, 1000.0);
        let normal = vec3(0.0, 1.0, 0.0);

        let near = target.contribution(vec3(0.0, 9.0, 0.0), normal);
        let far = target.contribution(vec3(0.0, 8.0, 0.0), normal);

        assert_relative_eq!(near, far * 4.0, epsilon = 1e-3);
    }

    #[test]
    fn contribution_ignores_back_faces() {
        let target = Light::new(vec3(0.0, 10.0, 0.0), Vec3::ONE, 1000.0);

        assert_eq!(
            Vec3::ZERO,
            target.contribution(Vec3::ZERO, vec3(0.0, -1.0, 0.0)),
        );
    }

    #[test]
    fn contribution_vanishes_at_range() {
        let target = Light::new(Vec3::ZERO, Vec3::ONE, 5.0);
        let normal = vec3(-1.0, 0.0, 0.0);

        let inside = target.contribution(vec3(4.0, 0.0, 0.0), normal);
        let outside = target.contribution(vec3(6.0, 0.0, 0.0), normal);

        assert!(inside.x > 0.0);
        assert_eq!(Vec3::ZERO, outside);
    }
}
