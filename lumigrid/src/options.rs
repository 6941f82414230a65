use glam::{UVec3, Vec3};
use log::warn;

use crate::utils::BoundingBox;
use crate::{gpu, DirtyFlags};

/// Runtime configuration of the whole pipeline.
///
/// Every field can be changed between frames; [`Self::changes()`] tells the
/// engine which resource groups a change invalidates. Fields absent from
/// that mapping only feed uniforms or per-frame toggles and never force a
/// rebuild.
///
/// Probe counts and tile resolutions must stay positive; a zero would
/// collapse the grid addressing and the atlas dimensions derived from it.
#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    pub origin: Vec3,
    pub spacing: Vec3,
    pub probe_counts: UVec3,

    pub tile_res_trace: u32,
    pub tile_res_radiance: u32,
    pub tile_res_irradiance: u32,
    pub rays_per_probe: u32,
    pub max_ray_distance: f32,

    pub gi_intensity: f32,

    pub visualize_probes: bool,
    pub probe_viz_radius: f32,
    pub probe_viz_color: Vec3,

    pub enable_trace: bool,
    pub enable_radiance: bool,
    pub enable_irradiance: bool,
    pub enable_blend: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            spacing: Vec3::ONE,
            probe_counts: UVec3::splat(8),
            tile_res_trace: 16,
            tile_res_radiance: 16,
            tile_res_irradiance: 8,
            rays_per_probe: 288,
            max_ray_distance: 100000.0,
            gi_intensity: 1.0,
            visualize_probes: true,
            probe_viz_radius: 0.25,
            probe_viz_color: Vec3::ONE,
            enable_trace: true,
            enable_radiance: true,
            enable_irradiance: true,
            enable_blend: true,
        }
    }
}

impl Options {
    /// Resource groups invalidated by going from `self` to `new`.
    pub fn changes(&self, new: &Self) -> DirtyFlags {
        let mut dirty = DirtyFlags::empty();

        if self.origin != new.origin || self.spacing != new.spacing {
            dirty |= DirtyFlags::PROBES;
        }

        if self.probe_counts != new.probe_counts {
            dirty |= DirtyFlags::PROBES | DirtyFlags::ATLASES;
        }

        if self.tile_res_trace != new.tile_res_trace
            || self.tile_res_radiance != new.tile_res_radiance
            || self.tile_res_irradiance != new.tile_res_irradiance
        {
            dirty |= DirtyFlags::ATLASES;
        }

        if self.probe_viz_radius != new.probe_viz_radius {
            dirty |= DirtyFlags::VIZ_RESOURCES;
        }

        dirty
    }

    /// Re-centers the grid on a scene: probes start at the lower corner of
    /// the bounds and their cells tile the extent.
    pub fn fit_to(&mut self, bounds: BoundingBox) {
        self.origin = bounds.min();

        // A flat scene has zero extent along some axis, which would produce
        // zero spacing and break grid addressing
        self.spacing = (bounds.extent() / self.probe_counts.as_vec3())
            .max(Vec3::splat(0.001));
    }

    pub fn probe_count(&self) -> u32 {
        self.probe_counts.x * self.probe_counts.y * self.probe_counts.z
    }

    pub fn grid(&self) -> gpu::ProbeGrid {
        gpu::ProbeGrid::new(
            self.origin,
            self.spacing,
            self.probe_counts,
            UVec3::new(
                self.tile_res_trace,
                self.tile_res_radiance,
                self.tile_res_irradiance,
            ),
            self.rays_per_probe,
            self.max_ray_distance,
            self.gi_intensity,
        )
    }

    /// Applies a single named property; unknown keys and mistyped values
    /// are reported and skipped, never fatal.
    pub fn set(&mut self, key: &str, value: PropValue) {
        use PropValue::*;

        match (key, value) {
            ("origin", Vec3(val)) => self.origin = val,
            ("spacing", Vec3(val)) => self.spacing = val,
            ("probeCounts", UVec3(val)) => self.probe_counts = val,
            ("tileResTrace", Uint(val)) => self.tile_res_trace = val,
            ("tileResRadiance", Uint(val)) => self.tile_res_radiance = val,
            ("tileResIrradiance", Uint(val)) => self.tile_res_irradiance = val,
            ("raysPerProbe", Uint(val)) => self.rays_per_probe = val,
            ("maxRayDistance", Float(val)) => self.max_ray_distance = val,
            ("giIntensity", Float(val)) => self.gi_intensity = val,
            ("visualizeProbes", Bool(val)) => self.visualize_probes = val,
            ("probeVizRadius", Float(val)) => self.probe_viz_radius = val,
            ("probeVizColor", Vec3(val)) => self.probe_viz_color = val,
            ("enableTrace", Bool(val)) => self.enable_trace = val,
            ("enableRadiance", Bool(val)) => self.enable_radiance = val,
            ("enableIrradiance", Bool(val)) => self.enable_irradiance = val,
            ("enableBlend", Bool(val)) => self.enable_blend = val,

            (key, value) if Self::is_known_key(key) => {
                warn!("Property `{key}` got mistyped value {value:?}; ignoring");
            }

            (key, _) => {
                warn!("Unknown property `{key}`; ignoring");
            }
        }
    }

    /// Inverse of [`Self::set()`]; feeding the returned pairs back into
    /// `set()` reproduces `self` exactly.
    pub fn properties(&self) -> Vec<(&'static str, PropValue)> {
        use PropValue::*;

        vec![
            ("origin", Vec3(self.origin)),
            ("spacing", Vec3(self.spacing)),
            ("probeCounts", UVec3(self.probe_counts)),
            ("tileResTrace", Uint(self.tile_res_trace)),
            ("tileResRadiance", Uint(self.tile_res_radiance)),
            ("tileResIrradiance", Uint(self.tile_res_irradiance)),
            ("raysPerProbe", Uint(self.rays_per_probe)),
            ("maxRayDistance", Float(self.max_ray_distance)),
            ("giIntensity", Float(self.gi_intensity)),
            ("visualizeProbes", Bool(self.visualize_probes)),
            ("probeVizRadius", Float(self.probe_viz_radius)),
            ("probeVizColor", Vec3(self.probe_viz_color)),
            ("enableTrace", Bool(self.enable_trace)),
            ("enableRadiance", Bool(self.enable_radiance)),
            ("enableIrradiance", Bool(self.enable_irradiance)),
            ("enableBlend", Bool(self.enable_blend)),
        ]
    }

    fn is_known_key(key: &str) -> bool {
        Self::default()
            .properties()
            .iter()
            .any(|(known, _)| *known == key)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PropValue {
    Bool(bool),
    Uint(u32),
    Float(f32),
    Vec3(Vec3),
    UVec3(UVec3),
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u32> for PropValue {
    fn from(value: u32) -> Self {
        Self::Uint(value)
    }
}

impl From<f32> for PropValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<Vec3> for PropValue {
    fn from(value: Vec3) -> Self {
        Self::Vec3(value)
    }
}

impl From<UVec3> for PropValue {
    fn from(value: UVec3) -> Self {
        Self::UVec3(value)
    }
}

#[cfg(test)]
mod tests {
    use glam::{uvec3, vec3};

    use super::*;

    #[test]
    fn changes_follow_the_trigger_table() {
        let base = Options::default();

        assert_eq!(DirtyFlags::empty(), base.changes(&base.clone()));

        let mut new = base.clone();
        new.origin = vec3(1.0, 0.0, 0.0);
        assert_eq!(DirtyFlags::PROBES, base.changes(&new));

        let mut new = base.clone();
        new.spacing = vec3(2.0, 2.0, 2.0);
        assert_eq!(DirtyFlags::PROBES, base.changes(&new));

        let mut new = base.clone();
        new.probe_counts = uvec3(4, 4, 4);
        assert_eq!(
            DirtyFlags::PROBES | DirtyFlags::ATLASES,
            base.changes(&new),
        );

        let mut new = base.clone();
        new.tile_res_irradiance = 4;
        assert_eq!(DirtyFlags::ATLASES, base.changes(&new));

        let mut new = base.clone();
        new.probe_viz_radius = 0.5;
        assert_eq!(DirtyFlags::VIZ_RESOURCES, base.changes(&new));
    }

    #[test]
    fn changes_ignore_uniform_only_fields() {
        let base = Options::default();

        let mut new = base.clone();
        new.gi_intensity = 2.0;
        new.max_ray_distance = 50.0;
        new.rays_per_probe = 64;
        new.probe_viz_color = vec3(1.0, 0.0, 0.0);
        new.visualize_probes = false;
        new.enable_blend = false;

        assert_eq!(DirtyFlags::empty(), base.changes(&new));
    }

    #[test]
    fn changes_coalesce() {
        let base = Options::default();

        // Two edits mapping to the same flag produce that flag once
        let mut new = base.clone();
        new.origin = vec3(5.0, 0.0, 0.0);
        new.spacing = vec3(0.5, 0.5, 0.5);

        assert_eq!(DirtyFlags::PROBES, base.changes(&new));
    }

    #[test]
    fn properties_round_trip() {
        let mut source = Options::default();
        source.origin = vec3(-3.0, 1.0, 2.0);
        source.probe_counts = uvec3(2, 3, 4);
        source.tile_res_irradiance = 4;
        source.gi_intensity = 0.5;
        source.visualize_probes = false;
        source.enable_irradiance = false;

        let mut target = Options::default();

        for (key, value) in source.properties() {
            target.set(key, value);
        }

        assert_eq!(source, target);
    }

    #[test]
    fn set_ignores_unknown_and_mistyped() {
        let mut target = Options::default();

        target.set("bogusKey", PropValue::Uint(123));
        target.set("giIntensity", PropValue::Bool(true));

        assert_eq!(Options::default(), target);
    }

    #[test]
    fn fit_to_spans_the_bounds() {
        let mut target = Options {
            probe_counts: uvec3(8, 4, 2),
            ..Default::default()
        };

        let bounds: BoundingBox =
            [vec3(-4.0, 0.0, 0.0), vec3(4.0, 8.0, 4.0)].into_iter().collect();

        target.fit_to(bounds);

        assert_eq!(vec3(-4.0, 0.0, 0.0), target.origin);
        assert_eq!(vec3(1.0, 2.0, 2.0), target.spacing);
    }

    #[test]
    fn fit_to_survives_flat_bounds() {
        let mut target = Options::default();

        let bounds: BoundingBox =
            [vec3(0.0, 1.0, 0.0), vec3(8.0, 1.0, 8.0)].into_iter().collect();

        target.fit_to(bounds);

        assert!(target.spacing.y > 0.0);
    }
}
