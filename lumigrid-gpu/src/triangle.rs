use bytemuck::{Pod, Zeroable};
use glam::{vec3, Vec3, Vec4, Vec4Swizzles};

/// A single emissive-capable triangle, as the trace and radiance kernels see
/// it.
///
/// Shading needs only the flat normal and a constant albedo / emission per
/// triangle, so the vertex attributes are folded into the spare `w` lanes
/// instead of occupying vectors of their own.
#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable, Debug, PartialEq)]
pub struct Triangle {
    pub d0: Vec4,
    pub d1: Vec4,
    pub d2: Vec4,
    pub d3: Vec4,
    pub d4: Vec4,
}

impl Triangle {
    pub fn new(positions: [Vec3; 3], albedo: Vec3, emissive: Vec3) -> Self {
        let normal = (positions[1] - positions[0])
            .cross(positions[2] - positions[0])
            .normalize_or_zero();

        Self {
            d0: positions[0].extend(normal.x),
            d1: positions[1].extend(normal.y),
            d2: positions[2].extend(normal.z),
            d3: albedo.extend(0.0),
            d4: emissive.extend(0.0),
        }
    }

    pub fn position0(&self) -> Vec3 {
        self.d0.xyz()
    }

    pub fn position1(&self) -> Vec3 {
        self.d1.xyz()
    }

    pub fn position2(&self) -> Vec3 {
        self.d2.xyz()
    }

    pub fn positions(&self) -> [Vec3; 3] {
        [self.position0(), self.position1(), self.position2()]
    }

    pub fn normal(&self) -> Vec3 {
        vec3(self.d0.w, self.d1.w, self.d2.w)
    }

    pub fn albedo(&self) -> Vec3 {
        self.d3.xyz()
    }

    pub fn emissive(&self) -> Vec3 {
        self.d4.xyz()
    }

    pub fn center(&self) -> Vec3 {
        self.positions().into_iter().sum::<Vec3>() / 3.0
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn normal_follows_winding() {
        let target = Triangle::new(
            [
                vec3(0.0, 0.0, 0.0),
                vec3(1.0, 0.0, 0.0),
                vec3(0.0, 1.0, 0.0),
            ],
            Vec3::splat(0.8),
            Vec3::ZERO,
        );

        assert_relative_eq!(vec3(0.0, 0.0, 1.0), target.normal());

        let flipped = Triangle::new(
            [
                vec3(0.0, 0.0, 0.0),
                vec3(0.0, 1.0, 0.0),
                vec3(1.0, 0.0, 0.0),
            ],
            Vec3::splat(0.8),
            Vec3::ZERO,
        );

        assert_relative_eq!(vec3(0.0, 0.0, -1.0), flipped.normal());
    }

    #[test]
    fn attributes_survive_packing() {
        let target = Triangle::new(
            [
                vec3(1.0, 2.0, 3.0),
                vec3(4.0, 5.0, 6.0),
                vec3(7.0, 8.0, 10.0),
            ],
            vec3(0.1, 0.2, 0.3),
            vec3(4.0, 5.0, 6.0),
        );

        assert_eq!(vec3(0.1, 0.2, 0.3), target.albedo());
        assert_eq!(vec3(4.0, 5.0, 6.0), target.emissive());
        assert_eq!(vec3(4.0, 5.0, 19.0 / 3.0), target.center());
        assert_relative_eq!(1.0, target.normal().length(), epsilon = 1e-6);
    }
}
