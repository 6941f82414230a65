bitflags::bitflags! {
    /// Resource groups whose current GPU state no longer matches the
    /// configuration.
    ///
    /// Flags accumulate with `|=` between frames and are cleared one group
    /// at a time, each right after that group has been rebuilt; a rebuild
    /// that cannot run yet (e.g. no scene bound) leaves its flag set so it
    /// is retried next frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DirtyFlags: u32 {
        /// Probe-positions buffer and the grid uniform.
        const PROBES = 1 << 0;
        /// Trace, radiance and irradiance atlas textures.
        const ATLASES = 1 << 1;
        /// Compute passes of the trace/radiance/irradiance chain, including
        /// grid generation.
        const RT_PROGRAMS = 1 << 2;
        /// Probe-visualization mesh, bind groups and pipeline.
        const VIZ_RESOURCES = 1 << 3;
        /// Blend render pipeline and its stable bind group.
        const BLEND_PROGRAM = 1 << 4;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coalescing() {
        let mut target = DirtyFlags::empty();

        target |= DirtyFlags::PROBES;
        target |= DirtyFlags::PROBES | DirtyFlags::ATLASES;

        assert_eq!(DirtyFlags::PROBES | DirtyFlags::ATLASES, target);

        target.remove(DirtyFlags::PROBES);

        assert_eq!(DirtyFlags::ATLASES, target);
    }
}
