use bytemuck::{Pod, Zeroable};
use glam::Vec4;

/// Push constants of the radiance kernel.
///
/// `hysteresis` weighs the previous frame's radiance texel against the
/// freshly shaded one; the engine drops it to zero for one frame whenever
/// the history buffer has just been (re)created and would otherwise pull
/// the estimate towards black.
#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable, Debug)]
pub struct ProbeRadiancePassParams {
    pub seed: u32,
    pub frame: u32,
    pub hysteresis: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable, Debug)]
pub struct BlendPassParams {
    pub flags: u32,
}

impl BlendPassParams {
    pub const HAS_NORMAL: u32 = 1 << 0;
    pub const HAS_ALBEDO: u32 = 1 << 1;
    pub const HAS_EMISSIVE: u32 = 1 << 2;

    pub fn new(has_normal: bool, has_albedo: bool, has_emissive: bool) -> Self {
        let mut flags = 0;

        if has_normal {
            flags |= Self::HAS_NORMAL;
        }

        if has_albedo {
            flags |= Self::HAS_ALBEDO;
        }

        if has_emissive {
            flags |= Self::HAS_EMISSIVE;
        }

        Self { flags }
    }

    pub fn has_normal(&self) -> bool {
        self.flags & Self::HAS_NORMAL != 0
    }

    pub fn has_albedo(&self) -> bool {
        self.flags & Self::HAS_ALBEDO != 0
    }

    pub fn has_emissive(&self) -> bool {
        self.flags & Self::HAS_EMISSIVE != 0
    }
}

#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable, Debug)]
pub struct VisualizeProbesPassParams {
    pub color: Vec4,
}
