//! Probe-grid global illumination on wgpu.
//!
//! A lattice of light probes covers the scene; every frame each probe traces
//! rays into the geometry, shades the hits and folds the result into an
//! irradiance atlas, which can then be composited over an externally
//! rendered image. Probe data lives in 2D atlases, one tile per probe, so
//! ordinary textures carry the whole 3D grid.
//!
//! Everything is driven through [`Engine`]: bind a [`Scene`], describe the
//! render target with a [`Frame`] and call [`Engine::execute()`] once per
//! frame.

mod atlases;
mod buffers;
mod dirty;
mod fallbacks;
mod frame;
mod options;
mod passes;
mod probes;
mod scene;
mod shaders;
pub mod utils;

use log::{debug, info};

pub use lumigrid_gpu as gpu;

pub use self::atlases::*;
pub use self::buffers::*;
pub use self::dirty::*;
pub use self::fallbacks::*;
pub use self::frame::*;
pub use self::options::*;
pub use self::passes::*;
pub use self::probes::*;
pub use self::scene::*;
pub use self::shaders::*;

pub struct Engine {
    shaders: Shaders,
    fallbacks: Fallbacks,
    grid: MappedUniformBuffer<gpu::ProbeGrid>,
    camera: MappedUniformBuffer<gpu::Camera>,
    scene_info: MappedUniformBuffer<gpu::SceneInfo>,
    probes: Probes,
    atlases: Atlases,
    scene: Option<SceneBuffers>,
    rt_passes: Option<RtPasses>,
    blend: Option<BlendPass>,
    visualize: Option<VisualizeProbesPass>,
    options: Options,
    dirty: DirtyFlags,
    frame: u32,
    history_valid: bool,
    #[cfg(feature = "metrics")]
    profiler: utils::FrameProfiler,
}

impl Engine {
    pub fn new(device: &wgpu::Device) -> Self {
        info!("Initializing");

        let options = Options::default();
        let shaders = Shaders::new(device);
        let fallbacks = Fallbacks::new(device);

        let grid =
            MappedUniformBuffer::new(device, "lumigrid_grid", options.grid());

        let camera = MappedUniformBuffer::new_default(device, "lumigrid_camera");

        let scene_info =
            MappedUniformBuffer::new_default(device, "lumigrid_scene_info");

        let probes = Probes::new(device, options.probe_count());
        let atlases = Atlases::new(device, &options);

        Self {
            shaders,
            fallbacks,
            grid,
            camera,
            scene_info,
            probes,
            atlases,
            scene: None,
            rt_passes: None,
            blend: None,
            visualize: None,
            options,
            dirty: DirtyFlags::all(),
            frame: 0,
            history_valid: false,
            #[cfg(feature = "metrics")]
            profiler: Default::default(),
        }
    }

    /// Device features the engine's pipelines rely on; pass these when
    /// requesting the device.
    pub fn required_features() -> wgpu::Features {
        wgpu::Features::PUSH_CONSTANTS
    }

    /// See: [`Self::required_features()`].
    pub fn required_limits() -> wgpu::Limits {
        wgpu::Limits {
            max_push_constant_size: 128,
            ..Default::default()
        }
    }

    /// Installs `scene` as the geometry and lights traced by the probes,
    /// dropping the previous one.
    ///
    /// The grid is re-fitted to the scene's bounds, every resource group is
    /// marked for rebuild and the frame counter together with the radiance
    /// history starts over.
    pub fn bind_scene(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: Scene,
    ) {
        info!(
            "Binding scene; triangles={}, lights={}",
            scene.triangles().len(),
            scene.lights().len(),
        );

        let bounds = scene.bounds();

        if bounds.is_set() {
            self.options.fit_to(bounds);
        }

        *self.scene_info = scene.info();
        self.scene_info.flush(queue);

        *self.grid = self.options.grid();
        self.grid.flush(queue);

        self.scene = Some(SceneBuffers::new(device, queue, scene));
        self.rt_passes = None;
        self.dirty = DirtyFlags::all();
        self.frame = 0;
        self.history_valid = false;
    }

    /// Takes the bound scene back out; until another one is bound,
    /// [`Self::execute()`] does nothing.
    pub fn unbind_scene(&mut self) -> Option<Scene> {
        let scene = self.scene.take()?;

        // The trace passes hold bind groups over the dropped buffers
        self.rt_passes = None;
        self.dirty = DirtyFlags::all();

        Some(scene.scene)
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Swaps the configuration, marking for rebuild exactly the resource
    /// groups the change invalidates.
    pub fn set_options(&mut self, new: Options) {
        self.dirty |= self.options.changes(&new);
        self.options = new;

        *self.grid = self.options.grid();
    }

    /// Applies a single named property; see [`Options::set()`].
    pub fn set_property(&mut self, key: &str, value: impl Into<PropValue>) {
        let mut new = self.options.clone();

        new.set(key, value.into());
        self.set_options(new);
    }

    /// See: [`Options::properties()`].
    pub fn properties(&self) -> Vec<(&'static str, PropValue)> {
        self.options.properties()
    }

    /// Frames completed since the last scene bind.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Runs one frame of the pipeline into `encoder`.
    ///
    /// Stages run in a fixed order: grid generation when the grid changed,
    /// then trace, radiance and irradiance as far as they are enabled, then
    /// composition onto the frame's output (or a clear to neutral when
    /// composition cannot run) and finally the probe visualization. Without
    /// a scene bound the call is a no-op and every pending rebuild stays
    /// pending.
    pub fn execute(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        frame: Frame,
    ) {
        if self.scene.is_none() {
            debug!("No scene bound; skipping frame");
            return;
        }

        #[cfg(feature = "metrics")]
        let started = std::time::Instant::now();

        *self.camera = frame.camera;

        let generate = self.rebuild(device);

        self.grid.flush(queue);
        self.camera.flush(queue);
        self.scene_info.flush(queue);

        if let Some(scene) = &mut self.scene {
            scene.triangles.flush(queue);
            scene.lights.flush(queue);
        }

        self.record(device, encoder, &frame, generate);

        self.frame += 1;

        #[cfg(feature = "metrics")]
        self.profiler.record(started.elapsed());
    }

    /// Rebuilds the scene-independent resource groups in dependency order;
    /// replacing a resource re-marks the groups whose bind groups captured
    /// the old one. Returns whether the probe positions need regenerating.
    fn rebuild(&mut self, device: &wgpu::Device) -> bool {
        let generate = self.dirty.contains(DirtyFlags::PROBES);

        if generate {
            if self.probes.prepare(device, self.options.probe_count()) {
                self.dirty |=
                    DirtyFlags::RT_PROGRAMS | DirtyFlags::VIZ_RESOURCES;
            }

            *self.grid = self.options.grid();
            self.dirty.remove(DirtyFlags::PROBES);
        }

        if self.dirty.contains(DirtyFlags::ATLASES) {
            if self.atlases.prepare(device, &self.options) {
                self.dirty |=
                    DirtyFlags::RT_PROGRAMS | DirtyFlags::BLEND_PROGRAM;

                // Freshly allocated radiance textures hold garbage, not
                // history
                self.history_valid = false;
            }

            self.dirty.remove(DirtyFlags::ATLASES);
        }

        if self.dirty.contains(DirtyFlags::RT_PROGRAMS) {
            if let Some(scene) = &self.scene {
                self.rt_passes = Some(RtPasses::new(
                    device,
                    &self.shaders,
                    &self.grid,
                    &self.scene_info,
                    scene,
                    &self.probes,
                    &self.atlases,
                ));

                self.dirty.remove(DirtyFlags::RT_PROGRAMS);
            }
        }

        generate
    }

    fn record(
        &mut self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        frame: &Frame,
        generate: bool,
    ) {
        let Some(rt_passes) = &self.rt_passes else {
            return;
        };

        let alternate = self.frame % 2 == 1;
        let grid = self.options.grid();

        if generate {
            rt_passes
                .generate_probes
                .run(encoder, self.options.probe_count());
        }

        if self.options.enable_trace {
            rt_passes
                .probe_trace
                .run(encoder, grid.trace_layout().size());
        }

        if self.options.enable_radiance {
            rt_passes.probe_radiance.run(
                encoder,
                alternate,
                grid.radiance_layout().size(),
                self.frame,
                self.history_valid,
            );

            self.history_valid = true;
        }

        if self.options.enable_irradiance {
            rt_passes.probe_irradiance.run(
                encoder,
                alternate,
                grid.irradiance_layout().size(),
            );
        }

        match BlendAction::select(
            self.options.enable_blend,
            frame.depth.is_some(),
        ) {
            BlendAction::Composite => {
                let stale = self
                    .blend
                    .as_ref()
                    .map_or(true, |pass| pass.format() != frame.output_format);

                if stale || self.dirty.contains(DirtyFlags::BLEND_PROGRAM) {
                    self.blend = Some(BlendPass::new(
                        device,
                        &self.shaders,
                        &self.grid,
                        &self.camera,
                        &self.atlases,
                        frame.output_format,
                    ));

                    self.dirty.remove(DirtyFlags::BLEND_PROGRAM);
                }

                if let Some(blend) = &self.blend {
                    blend.run(
                        device,
                        encoder,
                        frame,
                        &self.fallbacks,
                        alternate,
                    );
                }
            }

            BlendAction::Clear => {
                clear_output(encoder, frame.output);
            }
        }

        if self.options.visualize_probes {
            let stale = self
                .visualize
                .as_ref()
                .map_or(true, |pass| pass.format() != frame.output_format);

            if stale || self.dirty.contains(DirtyFlags::VIZ_RESOURCES) {
                self.visualize = Some(VisualizeProbesPass::new(
                    device,
                    &self.shaders,
                    &self.camera,
                    &self.probes,
                    self.options.probe_viz_radius,
                    frame.output_format,
                ));

                self.dirty.remove(DirtyFlags::VIZ_RESOURCES);
            }

            if let Some(visualize) = &mut self.visualize {
                visualize.run(
                    device,
                    encoder,
                    frame,
                    self.options.probe_count(),
                    self.options.probe_viz_color,
                    alternate,
                );
            }
        }
    }
}

#[derive(Debug)]
struct RtPasses {
    generate_probes: GenerateProbesPass,
    probe_trace: ProbeTracePass,
    probe_radiance: ProbeRadiancePass,
    probe_irradiance: ProbeIrradiancePass,
}

impl RtPasses {
    fn new(
        device: &wgpu::Device,
        shaders: &Shaders,
        grid: &MappedUniformBuffer<gpu::ProbeGrid>,
        scene_info: &MappedUniformBuffer<gpu::SceneInfo>,
        scene: &SceneBuffers,
        probes: &Probes,
        atlases: &Atlases,
    ) -> Self {
        Self {
            generate_probes: GenerateProbesPass::new(
                device, shaders, grid, probes,
            ),
            probe_trace: ProbeTracePass::new(
                device,
                shaders,
                grid,
                scene_info,
                &scene.triangles,
                probes,
                atlases,
            ),
            probe_radiance: ProbeRadiancePass::new(
                device,
                shaders,
                grid,
                scene_info,
                &scene.triangles,
                &scene.lights,
                atlases,
            ),
            probe_irradiance: ProbeIrradiancePass::new(
                device, shaders, grid, atlases,
            ),
        }
    }
}
