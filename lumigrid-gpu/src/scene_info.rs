use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable, Debug)]
pub struct SceneInfo {
    pub triangle_count: u32,
    pub light_count: u32,
}
