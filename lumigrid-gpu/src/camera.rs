use bytemuck::{Pod, Zeroable};
use glam::{vec2, Mat4, UVec2, Vec2, Vec3, Vec4, Vec4Swizzles};

#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable, Debug)]
pub struct Camera {
    pub projection_view: Mat4,
    pub ndc_to_world: Mat4,
    pub origin: Vec4,
    pub screen: Vec4,
}

impl Camera {
    pub fn new(projection_view: Mat4, origin: Vec3, viewport_size: UVec2) -> Self {
        Self {
            projection_view,
            ndc_to_world: projection_view.inverse(),
            origin: origin.extend(0.0),
            screen: viewport_size.as_vec2().extend(0.0).extend(0.0),
        }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin.xyz()
    }

    pub fn screen_size(&self) -> UVec2 {
        self.screen.xy().as_uvec2()
    }

    /// Given a point in world-coordinates, returns it in clip-coordinates.
    pub fn world_to_clip(&self, pos: Vec3) -> Vec4 {
        self.projection_view * pos.extend(1.0)
    }

    /// Given a point in clip-coordinates, returns it in screen-coordinates.
    pub fn clip_to_screen(&self, pos: Vec4) -> Vec2 {
        let ndc = pos.xy() / pos.w;
        let ndc = vec2(ndc.x, -ndc.y);

        (0.5 * ndc + 0.5) * self.screen.xy()
    }

    /// Given screen-coordinates and the depth sampled there, recovers the
    /// world-space point; this is how the blend kernel finds the surface it
    /// is lighting.
    pub fn screen_to_world(&self, pos: Vec2, depth: f32) -> Vec3 {
        let ndc = pos * 2.0 / self.screen.xy() - Vec2::ONE;
        let ndc = vec2(ndc.x, -ndc.y);

        self.ndc_to_world.project_point3(ndc.extend(depth))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{uvec2, vec3};

    use super::*;

    fn target() -> Camera {
        let projection =
            Mat4::perspective_rh(1.0, 800.0 / 600.0, 0.1, 1000.0);

        let view = Mat4::look_at_rh(
            vec3(1.0, 2.0, 10.0),
            vec3(0.0, 0.0, 0.0),
            vec3(0.0, 1.0, 0.0),
        );

        Camera::new(projection * view, vec3(1.0, 2.0, 10.0), uvec2(800, 600))
    }

    #[test]
    fn screen_to_world_inverts_projection() {
        let target = target();

        for pos in [
            vec3(0.0, 0.0, 0.0),
            vec3(1.5, -0.5, 2.0),
            vec3(-3.0, 1.0, -4.0),
        ] {
            let clip = target.world_to_clip(pos);
            let screen = target.clip_to_screen(clip);
            let depth = clip.z / clip.w;

            assert_relative_eq!(
                pos,
                target.screen_to_world(screen, depth),
                epsilon = 1e-3,
            );
        }
    }

    #[test]
    fn screen_center_looks_at_origin() {
        let target = target();
        let screen = target.world_to_clip(vec3(0.0, 0.0, 0.0));

        assert_relative_eq!(
            vec2(400.0, 300.0),
            target.clip_to_screen(screen),
            epsilon = 1e-3,
        );
    }
}
