use crate::clock::{Clock, SystemClock};
use crate::config::SceneConfig;
use crate::driver::FrameDriver;
use crate::error::RunnerError;
use cubestage_common::{ObjectId, SurfaceSize};
use cubestage_render::{Container, RenderSurface, SurfaceSettings};
use cubestage_scene::{
    AmbientLight, DirectionalLight, Geometry, LambertMaterial, Mesh, PerspectiveCamera, Scene,
    SceneObject,
};
use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerPhase {
    Uninitialized,
    Active,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunnerState {
    /// Seconds accumulated over every active tick.
    pub age: f64,
    pub phase: RunnerPhase,
    /// Frames rendered so far.
    pub frames: u64,
}

impl RunnerState {
    pub fn is_active(&self) -> bool {
        self.phase == RunnerPhase::Active
    }
}

impl Default for RunnerState {
    fn default() -> Self {
        Self {
            age: 0.0,
            phase: RunnerPhase::Uninitialized,
            frames: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// The runner was not active; nothing happened.
    Skipped,
    Rendered { delta: f32, age: f64 },
}

/// Horizontal camera offset after `age` seconds: a sine with the given
/// peak and period.
pub fn camera_sway(age: f64, amplitude: f32, period: f32) -> f32 {
    ((age * TAU / f64::from(period)).sin() * f64::from(amplitude)) as f32
}

/// Drives the per-frame update/render cycle for one scene.
pub struct SceneRunner<S: RenderSurface, C: Clock = SystemClock> {
    surface: S,
    clock: C,
    driver: Box<dyn FrameDriver>,
    config: SceneConfig,
    scene: Scene,
    camera: PerspectiveCamera,
    state: RunnerState,
}

impl<S: RenderSurface, C: Clock> SceneRunner<S, C> {
    pub fn new(surface: S, clock: C, driver: Box<dyn FrameDriver>, config: SceneConfig) -> Self {
        Self {
            surface,
            clock,
            driver,
            config,
            scene: Scene::new(),
            camera: PerspectiveCamera::default(),
            state: RunnerState::default(),
        }
    }

    /// Set up camera, lights and surface against `container`, attach the
    /// surface and start the frame driver.
    pub fn initialize(&mut self, container: &dyn Container) -> Result<(), RunnerError> {
        if self.state.phase != RunnerPhase::Uninitialized {
            return Err(RunnerError::InvalidPhase {
                operation: "initialize",
                phase: self.state.phase,
            });
        }

        let size = container.bounding_size();
        let pixel_ratio = container.pixel_ratio();
        let cam = &self.config.camera;
        self.camera = PerspectiveCamera::new(
            cam.fov_degrees,
            size.aspect().unwrap_or(1.0),
            cam.near,
            cam.far,
        );
        self.camera.position = cam.position;
        self.camera.look_at(cam.look_at);

        let lights = &self.config.lights;
        self.scene.ambient = AmbientLight {
            color: lights.ambient_color,
            intensity: lights.ambient_intensity,
        };
        self.scene.directional = DirectionalLight {
            color: lights.directional_color,
            intensity: lights.directional_intensity,
            position: lights.directional_position,
            target: lights.directional_target,
            cast_shadow: lights.cast_shadow,
        };

        self.surface.configure(&SurfaceSettings {
            clear_color: self.config.surface.clear_color,
            pixel_ratio,
            shadows: self.config.surface.shadows,
        });
        self.surface.set_size(size);
        self.surface.attach()?;

        self.state.phase = RunnerPhase::Active;
        self.driver.start();
        tracing::info!(%size, pixel_ratio, "scene runner initialized");
        Ok(())
    }

    /// Add the placeholder content: a unit cube at the origin.
    pub fn populate_initial_content(&mut self) {
        self.scene.add_mesh(Mesh::new(
            Geometry::unit_box(),
            LambertMaterial {
                color: self.config.cube_color,
            },
        ));
    }

    /// One update-then-render step. A no-op unless the runner is active.
    pub fn tick(&mut self) -> Result<TickOutcome, RunnerError> {
        if !self.state.is_active() {
            tracing::trace!(phase = ?self.state.phase, "tick ignored");
            return Ok(TickOutcome::Skipped);
        }
        let _span = tracing::trace_span!("tick", frame = self.state.frames).entered();

        self.driver.request_frame();

        let delta = self.clock.delta();
        self.state.age += f64::from(delta);

        let cam = &self.config.camera;
        self.camera.position.x = camera_sway(self.state.age, cam.sway_amplitude, cam.sway_period);
        self.camera.look_at(cam.look_at);

        let objects = self.scene.objects_mut();
        objects.update_all(delta);
        objects.retain_active();

        self.surface.render(&self.scene, &self.camera)?;
        self.state.frames += 1;

        Ok(TickOutcome::Rendered {
            delta,
            age: self.state.age,
        })
    }

    /// Set the surface's output size. Takes effect on the next render.
    pub fn resize(&mut self, width: u32, height: u32) {
        let size = SurfaceSize::new(width, height);
        self.surface.set_size(size);
        if let Some(aspect) = size.aspect() {
            self.camera.aspect = aspect;
        }
        tracing::debug!(%size, "render surface resized");
    }

    /// Detach the surface and go inactive for good. Later calls do nothing.
    pub fn teardown(&mut self) {
        if self.state.phase != RunnerPhase::Active {
            tracing::debug!(phase = ?self.state.phase, "teardown ignored");
            return;
        }
        self.surface.detach();
        self.state.phase = RunnerPhase::Inactive;
        self.driver.stop();
        tracing::info!(
            age = self.state.age,
            frames = self.state.frames,
            "scene runner torn down"
        );
    }

    pub fn add_scene_object(&mut self, object: Box<dyn SceneObject>) -> ObjectId {
        self.scene.add_object(object)
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn age(&self) -> f64 {
        self.state.age
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn object_count(&self) -> usize {
        self.scene.objects().len()
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{FixedStepClock, ManualClock};
    use crate::driver::{FrameSignal, HeadlessDriver, run_frames};
    use cubestage_common::Rgba;
    use cubestage_render::{FixedContainer, RenderError, TextSurface};
    use glam::Vec3;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Surface that only counts what it is asked to do.
    #[derive(Default)]
    struct SpySurface {
        settings: Option<SurfaceSettings>,
        size: SurfaceSize,
        attached: bool,
        renders: u32,
        detaches: u32,
        fail_attach: bool,
    }

    impl RenderSurface for SpySurface {
        fn configure(&mut self, settings: &SurfaceSettings) {
            self.settings = Some(*settings);
        }

        fn set_size(&mut self, size: SurfaceSize) {
            self.size = size;
        }

        fn size(&self) -> SurfaceSize {
            self.size
        }

        fn attach(&mut self) -> Result<(), RenderError> {
            if self.fail_attach {
                return Err(RenderError::NoAdapter);
            }
            self.attached = true;
            Ok(())
        }

        fn is_attached(&self) -> bool {
            self.attached
        }

        fn render(&mut self, _: &Scene, _: &PerspectiveCamera) -> Result<(), RenderError> {
            self.renders += 1;
            Ok(())
        }

        fn detach(&mut self) {
            self.attached = false;
            self.detaches += 1;
        }
    }

    /// Counts updates; can be switched inactive from outside.
    struct Counter {
        updates: Rc<Cell<u32>>,
        active: Rc<Cell<bool>>,
    }

    impl Counter {
        fn new() -> (Self, Rc<Cell<u32>>, Rc<Cell<bool>>) {
            let updates = Rc::new(Cell::new(0));
            let active = Rc::new(Cell::new(true));
            (
                Self {
                    updates: Rc::clone(&updates),
                    active: Rc::clone(&active),
                },
                updates,
                active,
            )
        }
    }

    impl SceneObject for Counter {
        fn update(&mut self, _delta: f32) {
            self.updates.set(self.updates.get() + 1);
        }

        fn is_active(&self) -> bool {
            self.active.get()
        }
    }

    fn spy_runner() -> (SceneRunner<SpySurface, ManualClock>, FrameSignal) {
        let (driver, signal) = HeadlessDriver::new();
        let runner = SceneRunner::new(
            SpySurface::default(),
            ManualClock::new(),
            Box::new(driver),
            SceneConfig::default(),
        );
        (runner, signal)
    }

    fn active_runner() -> (SceneRunner<SpySurface, ManualClock>, FrameSignal) {
        let (mut runner, signal) = spy_runner();
        runner.initialize(&FixedContainer::new(640, 480)).unwrap();
        (runner, signal)
    }

    #[test]
    fn initialize_sizes_surface_to_container() {
        let (mut runner, signal) = spy_runner();
        let container = FixedContainer::new(1024, 512).with_pixel_ratio(2.0);
        runner.initialize(&container).unwrap();

        let surface = runner.surface();
        assert_eq!(surface.size(), SurfaceSize::new(1024, 512));
        assert!(surface.is_attached());
        let settings = surface.settings.unwrap();
        assert_eq!(settings.clear_color, Rgba::TRANSPARENT);
        assert_eq!(settings.pixel_ratio, 2.0);
        assert!(settings.shadows);
        assert!(runner.is_active());
        assert!(signal.is_pending());
    }

    #[test]
    fn initialize_places_camera_and_lights() {
        let (runner, _signal) = active_runner();
        let cam = runner.camera();
        assert_eq!(cam.position, Vec3::new(0.0, 2.0, 5.0));
        assert_eq!(cam.target, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(cam.fov_degrees, 75.0);
        assert!((cam.aspect - 4.0 / 3.0).abs() < 1e-6);

        let scene = runner.scene();
        assert_eq!(scene.ambient.intensity, 0.75);
        assert_eq!(scene.directional.intensity, 0.4);
        assert_eq!(scene.directional.position, Vec3::new(0.0, 10.0, 10.0));
        assert!(scene.directional.cast_shadow);
    }

    #[test]
    fn initialize_twice_is_rejected() {
        let (mut runner, _signal) = active_runner();
        let err = runner
            .initialize(&FixedContainer::new(10, 10))
            .unwrap_err();
        assert!(matches!(
            err,
            RunnerError::InvalidPhase {
                phase: RunnerPhase::Active,
                ..
            }
        ));
    }

    #[test]
    fn failed_attach_leaves_runner_uninitialized() {
        let (driver, signal) = HeadlessDriver::new();
        let surface = SpySurface {
            fail_attach: true,
            ..SpySurface::default()
        };
        let mut runner = SceneRunner::new(
            surface,
            ManualClock::new(),
            Box::new(driver),
            SceneConfig::default(),
        );
        let err = runner.initialize(&FixedContainer::new(10, 10)).unwrap_err();
        assert!(matches!(err, RunnerError::Render(RenderError::NoAdapter)));
        assert_eq!(runner.state().phase, RunnerPhase::Uninitialized);
        assert!(!signal.is_pending());
    }

    #[test]
    fn tick_before_initialize_does_nothing() {
        let (mut runner, _signal) = spy_runner();
        assert_eq!(runner.tick().unwrap(), TickOutcome::Skipped);
        assert_eq!(runner.surface().renders, 0);
    }

    #[test]
    fn populate_adds_green_unit_cube() {
        let (mut runner, _signal) = active_runner();
        runner.populate_initial_content();
        let meshes = runner.scene().static_meshes();
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].geometry, Geometry::unit_box());
        assert_eq!(meshes[0].material.color, Rgba::from_hex(0x00ff00));
    }

    #[test]
    fn first_tick_has_zero_delta() {
        let (mut runner, _signal) = active_runner();
        let outcome = runner.tick().unwrap();
        assert_eq!(outcome, TickOutcome::Rendered { delta: 0.0, age: 0.0 });
        assert_eq!(runner.camera().position.x, 0.0);
    }

    #[test]
    fn age_is_sum_of_deltas_and_camera_follows_sway() {
        let (mut runner, _signal) = active_runner();
        runner.tick().unwrap();

        let deltas = [0.016_f32, 0.5, 1.25, 0.033, 2.0, 0.0, 3.7, 0.001];
        let mut expected_age = 0.0_f64;
        for delta in deltas {
            runner.clock_mut().advance(delta);
            let outcome = runner.tick().unwrap();
            expected_age += f64::from(delta);

            assert_eq!(outcome, TickOutcome::Rendered { delta, age: expected_age });
            assert_eq!(runner.age(), expected_age);

            let x = runner.camera().position.x;
            let expected_x = ((expected_age * TAU / 6.0).sin() * 0.7) as f32;
            assert!((x - expected_x).abs() < 1e-6);
            assert!((-0.7..=0.7).contains(&x));
            assert_eq!(runner.camera().target, Vec3::new(0.0, 2.0, 0.0));
        }
    }

    #[test]
    fn quarter_period_puts_camera_at_peak() {
        let (mut runner, _signal) = active_runner();
        runner.tick().unwrap();
        runner.clock_mut().advance(1.5);
        runner.tick().unwrap();
        assert!((runner.camera().position.x - 0.7).abs() < 1e-6);
        assert_eq!(runner.camera().position.y, 2.0);
        assert_eq!(runner.camera().position.z, 5.0);
    }

    #[test]
    fn no_render_after_teardown_even_with_pending_frame() {
        let (mut runner, signal) = active_runner();
        let (counter, updates, _) = Counter::new();
        runner.add_scene_object(Box::new(counter));

        runner.tick().unwrap();
        assert!(signal.is_pending());
        assert_eq!(runner.surface().renders, 1);

        runner.teardown();
        assert!(signal.is_pending());
        assert!(signal.is_stopped());

        let requests = signal.requests();
        assert!(signal.take());
        runner.clock_mut().advance(1.0);
        assert_eq!(runner.tick().unwrap(), TickOutcome::Skipped);

        assert_eq!(runner.surface().renders, 1);
        assert_eq!(updates.get(), 1);
        assert_eq!(signal.requests(), requests);
        assert!(!signal.is_pending());
        assert_eq!(runner.age(), 0.0);
    }

    #[test]
    fn teardown_detaches_once() {
        let (mut runner, _signal) = active_runner();
        runner.teardown();
        runner.teardown();
        assert_eq!(runner.surface().detaches, 1);
        assert!(!runner.surface().is_attached());
        assert_eq!(runner.state().phase, RunnerPhase::Inactive);
    }

    #[test]
    fn age_frozen_after_teardown() {
        let (mut runner, _signal) = active_runner();
        runner.tick().unwrap();
        runner.clock_mut().advance(0.75);
        runner.tick().unwrap();
        runner.teardown();

        for _ in 0..3 {
            runner.clock_mut().advance(1.0);
            runner.tick().unwrap();
        }
        assert_eq!(runner.age(), 0.75);
    }

    #[test]
    fn inactive_objects_are_purged_in_order() {
        let (mut runner, _signal) = active_runner();
        let (a, _, _) = Counter::new();
        let (b, b_updates, b_active) = Counter::new();
        let (c, _, _) = Counter::new();
        let id_a = runner.add_scene_object(Box::new(a));
        runner.add_scene_object(Box::new(b));
        let id_c = runner.add_scene_object(Box::new(c));
        b_active.set(false);

        runner.tick().unwrap();

        let ids: Vec<_> = runner.scene().objects().ids().collect();
        assert_eq!(ids, vec![id_a, id_c]);
        // Update-then-filter: B still saw this tick.
        assert_eq!(b_updates.get(), 1);
    }

    #[test]
    fn every_object_updated_once_on_first_tick() {
        let (mut runner, _signal) = active_runner();
        let counters: Vec<_> = (0..5)
            .map(|_| {
                let (counter, updates, _) = Counter::new();
                runner.add_scene_object(Box::new(counter));
                updates
            })
            .collect();

        runner.tick().unwrap();
        assert!(counters.iter().all(|u| u.get() == 1));
        assert_eq!(runner.object_count(), 5);
    }

    #[test]
    fn objects_see_tick_delta() {
        struct DeltaLog(Rc<RefCell<Vec<f32>>>);
        impl SceneObject for DeltaLog {
            fn update(&mut self, delta: f32) {
                self.0.borrow_mut().push(delta);
            }
            fn is_active(&self) -> bool {
                true
            }
        }

        let (mut runner, _signal) = active_runner();
        let log = Rc::new(RefCell::new(Vec::new()));
        runner.add_scene_object(Box::new(DeltaLog(Rc::clone(&log))));
        runner.tick().unwrap();
        runner.clock_mut().advance(0.25);
        runner.tick().unwrap();
        assert_eq!(*log.borrow(), [0.0, 0.25]);
    }

    #[test]
    fn resize_sets_exact_size() {
        let (mut runner, _signal) = active_runner();
        runner.tick().unwrap();
        runner.resize(800, 600);
        runner.tick().unwrap();
        assert_eq!(runner.surface().size(), SurfaceSize::new(800, 600));
        assert!((runner.camera().aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn zero_height_resize_keeps_aspect() {
        let (mut runner, _signal) = active_runner();
        let aspect = runner.camera().aspect;
        runner.resize(300, 0);
        assert_eq!(runner.surface().size(), SurfaceSize::new(300, 0));
        assert_eq!(runner.camera().aspect, aspect);
    }

    #[test]
    fn headless_loop_with_text_surface() {
        let (driver, signal) = HeadlessDriver::new();
        let mut runner = SceneRunner::new(
            TextSurface::new(),
            FixedStepClock::new(0.5),
            Box::new(driver),
            SceneConfig::default(),
        );
        runner.initialize(&FixedContainer::new(320, 240)).unwrap();
        runner.populate_initial_content();

        let rendered = run_frames(&mut runner, &signal, 4).unwrap();
        assert_eq!(rendered, 4);
        assert_eq!(runner.surface().frames_rendered(), 4);
        assert_eq!(runner.age(), 1.5);
        assert!(runner.surface().last_frame().contains("Frame 4"));
        assert!(runner.surface().last_frame().contains("Meshes: 1 static"));

        runner.teardown();
        assert_eq!(run_frames(&mut runner, &signal, 4).unwrap(), 0);
        assert_eq!(runner.surface().frames_rendered(), 4);
    }

    #[test]
    fn camera_sway_is_bounded() {
        for i in 0..600 {
            let x = camera_sway(f64::from(i) * 0.01, 0.7, 6.0);
            assert!((-0.7..=0.7).contains(&x));
        }
        assert!((camera_sway(4.5, 0.7, 6.0) + 0.7).abs() < 1e-6);
    }
}
