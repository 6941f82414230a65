use glam::Vec3;

use crate::gpu;
use crate::utils::BoundingBox;
use crate::MappedStorageBuffer;

/// Geometry and lights traced by the probe kernels.
///
/// The engine borrows nothing from here at runtime; binding a scene uploads
/// flat copies of these vectors into GPU buffers and computing anything else
/// (bounds, counts) happens up front, so the caller keeps full ownership of
/// whatever richer representation this was built from.
#[derive(Debug, Default)]
pub struct Scene {
    triangles: Vec<gpu::Triangle>,
    lights: Vec<gpu::Light>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_triangle(
        &mut self,
        positions: [Vec3; 3],
        albedo: Vec3,
        emissive: Vec3,
    ) {
        self.triangles
            .push(gpu::Triangle::new(positions, albedo, emissive));
    }

    pub fn push_light(&mut self, position: Vec3, color: Vec3, range: f32) {
        self.lights.push(gpu::Light::new(position, color, range));
    }

    pub fn triangles(&self) -> &[gpu::Triangle] {
        &self.triangles
    }

    pub fn lights(&self) -> &[gpu::Light] {
        &self.lights
    }

    pub fn info(&self) -> gpu::SceneInfo {
        gpu::SceneInfo {
            triangle_count: self.triangles.len() as u32,
            light_count: self.lights.len() as u32,
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        self.triangles
            .iter()
            .flat_map(|triangle| triangle.positions())
            .collect()
    }
}

/// GPU mirror of a bound [`Scene`]; lives for as long as the scene stays
/// bound and keeps the original around so unbinding can hand it back.
#[derive(Debug)]
pub(crate) struct SceneBuffers {
    pub triangles: MappedStorageBuffer<gpu::Triangle>,
    pub lights: MappedStorageBuffer<gpu::Light>,
    pub scene: Scene,
}

impl SceneBuffers {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: Scene,
    ) -> Self {
        let mut triangles = MappedStorageBuffer::new(
            device,
            "lumigrid_triangles",
            scene.triangles().to_vec(),
        );

        let mut lights = MappedStorageBuffer::new(
            device,
            "lumigrid_lights",
            scene.lights().to_vec(),
        );

        triangles.flush(queue);
        lights.flush(queue);

        Self {
            triangles,
            lights,
            scene,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    #[test]
    fn bounds_cover_all_vertices() {
        let mut target = Scene::new();

        target.push_triangle(
            [
                vec3(0.0, 0.0, 0.0),
                vec3(1.0, 0.0, 0.0),
                vec3(0.0, 1.0, 0.0),
            ],
            Vec3::splat(0.5),
            Vec3::ZERO,
        );

        target.push_triangle(
            [
                vec3(-2.0, 0.0, 3.0),
                vec3(0.0, 4.0, 0.0),
                vec3(0.0, 0.0, -1.0),
            ],
            Vec3::splat(0.5),
            Vec3::ZERO,
        );

        let bounds = target.bounds();

        assert_eq!(vec3(-2.0, 0.0, -1.0), bounds.min());
        assert_eq!(vec3(1.0, 4.0, 3.0), bounds.max());
    }

    #[test]
    fn info_counts() {
        let mut target = Scene::new();

        target.push_triangle(
            [Vec3::ZERO, Vec3::X, Vec3::Y],
            Vec3::ONE,
            Vec3::ZERO,
        );

        target.push_light(vec3(0.0, 5.0, 0.0), Vec3::ONE, 100.0);
        target.push_light(vec3(3.0, 5.0, 0.0), Vec3::ONE, 100.0);

        let info = target.info();

        assert_eq!(1, info.triangle_count);
        assert_eq!(2, info.light_count);
    }
}
