//! Viewport lifecycle: mount, resize, per-frame animation, unmount.
//!
//! The viewport owns everything CPU-side (primitive set, animator, clock,
//! pointer, section state). GPU-side resources live behind a
//! [`ViewportHost`]; every resource the viewport asks the host for in
//! [`Viewport::start`] is handed back exactly once in [`Viewport::stop`].

use std::time::Instant;

use glam::Mat4;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::animator::{Animator, FrameInput};
use crate::camera::{Camera, LightSet};
use crate::clock::AnimationClock;
use crate::config::Variant;
use crate::error::ViewportError;
use crate::generator;
use crate::pointer::PointerState;
use crate::primitive::{Material, PrimitiveSet};
use crate::section::{Section, SectionLayout, SectionOrchestrator};

/// Container size in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

/// Drawing-surface and geometry-buffer provider.
///
/// Implemented by the GPU layer; tests use a counting fake.
pub trait ViewportHost {
    /// Handle to host-owned geometry buffers.
    type Geometry;

    fn attach_surface(&mut self, size: SurfaceSize);
    fn resize_surface(&mut self, size: SurfaceSize);
    fn detach_surface(&mut self);

    fn allocate(&mut self, set: &PrimitiveSet, material: &Material) -> Self::Geometry;
    fn release(&mut self, geometry: Self::Geometry);
}

/// Event sources a running viewport listens to.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Listeners {
    pub resize: bool,
    pub pointer: bool,
    pub scroll: bool,
}

impl Listeners {
    pub fn count(&self) -> usize {
        [self.resize, self.pointer, self.scroll].into_iter().filter(|l| *l).count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// Everything a host needs to issue one draw call.
pub struct DrawFrame<'a, G> {
    pub geometry: &'a G,
    pub set: &'a PrimitiveSet,
    pub material: &'a Material,
    pub view: Mat4,
    pub projection: Mat4,
    pub model: Mat4,
    pub lights: LightSet,
}

struct Mounted<G> {
    geometry: G,
    set: PrimitiveSet,
    material: Material,
    animator: Animator,
    orchestrator: Option<SectionOrchestrator>,
    clock: AnimationClock,
    size: SurfaceSize,
    pointer: PointerState,
    listeners: Listeners,
    frame_requested: bool,
}

pub struct Viewport<G> {
    variant: Variant,
    seed: Option<u64>,
    camera: Camera,
    lights: LightSet,
    mounted: Option<Mounted<G>>,
}

impl<G> Viewport<G> {
    pub fn new(variant: Variant) -> Self {
        let distance = if variant.is_background() { 15.0 } else { 5.0 };
        Self {
            variant,
            seed: None,
            camera: Camera::at_distance(distance),
            lights: LightSet::default(),
            mounted: None,
        }
    }

    /// Fixes the RNG seed so the generated layout is reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[inline]
    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.mounted.is_some()
    }

    pub fn listeners(&self) -> Listeners {
        self.mounted.as_ref().map(|m| m.listeners).unwrap_or_default()
    }

    pub fn frame_requested(&self) -> bool {
        self.mounted.as_ref().is_some_and(|m| m.frame_requested)
    }

    pub fn primitive(&self) -> Option<&PrimitiveSet> {
        self.mounted.as_ref().map(|m| &m.set)
    }

    pub fn material(&self) -> Option<&Material> {
        self.mounted.as_ref().map(|m| &m.material)
    }

    /// Active section of the background variant.
    pub fn section(&self) -> Option<Section> {
        self.mounted.as_ref()?.orchestrator.as_ref().map(SectionOrchestrator::current)
    }

    /// Mounts the viewport into `container`.
    ///
    /// A second call while running is a no-op, so nothing is acquired twice.
    pub fn start<H>(
        &mut self,
        host: &mut H,
        container: Option<SurfaceSize>,
        now: Instant,
    ) -> Result<(), ViewportError>
    where
        H: ViewportHost<Geometry = G>,
    {
        if self.mounted.is_some() {
            log::debug!("viewport already running; start ignored");
            return Ok(());
        }

        let size = container
            .filter(|s| s.is_valid())
            .ok_or(ViewportError::MissingContainer)?;

        if let Variant::Scene(cfg) = &self.variant {
            cfg.validate()?;
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let (set, material) = generator::generate(&self.variant, &mut rng);

        self.camera.set_viewport(size.width, size.height);
        host.attach_surface(size);
        let geometry = host.allocate(&set, &material);

        let listeners = Listeners {
            resize: true,
            pointer: self.variant.follows_pointer(),
            scroll: self.variant.is_background(),
        };

        log::debug!(
            "viewport start: {} vertices, {}x{}, listeners {:?}",
            set.count(),
            size.width,
            size.height,
            listeners
        );

        self.mounted = Some(Mounted {
            geometry,
            set,
            material,
            animator: Animator::for_variant(&self.variant),
            orchestrator: self.variant.is_background().then(SectionOrchestrator::new),
            clock: AnimationClock::new(now),
            size,
            pointer: PointerState::CENTER,
            listeners,
            frame_requested: true,
        });
        Ok(())
    }

    /// Unmounts: cancels the frame request, drops listeners, releases the
    /// geometry and detaches the surface. Safe to call repeatedly.
    pub fn stop<H>(&mut self, host: &mut H)
    where
        H: ViewportHost<Geometry = G>,
    {
        let Some(mut mounted) = self.mounted.take() else { return };
        mounted.frame_requested = false;
        mounted.listeners = Listeners::default();
        host.release(mounted.geometry);
        host.detach_surface();
        log::debug!("viewport stopped");
    }

    /// Applies a container resize. Returns `false` when nothing changed.
    ///
    /// The primitive set and clock are untouched.
    pub fn resize<H>(&mut self, host: &mut H, size: SurfaceSize) -> bool
    where
        H: ViewportHost<Geometry = G>,
    {
        let Some(mounted) = self.mounted.as_mut() else { return false };
        if !mounted.listeners.resize || !size.is_valid() || mounted.size == size {
            return false;
        }
        mounted.size = size;
        self.camera.set_viewport(size.width, size.height);
        host.resize_surface(size);
        true
    }

    /// Records a pointer position in logical pixels relative to the container.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        let Some(mounted) = self.mounted.as_mut() else { return };
        if !mounted.listeners.pointer {
            return;
        }
        mounted.pointer = PointerState::from_logical(x, y, mounted.size.width, mounted.size.height);
    }

    /// Feeds a page scroll offset to the section orchestrator.
    pub fn scrolled(&mut self, layout: &SectionLayout, scroll_y: f32) -> Vec<Section> {
        let Some(mounted) = self.mounted.as_mut() else { return Vec::new() };
        if !mounted.listeners.scroll {
            return Vec::new();
        }
        let Some(orch) = mounted.orchestrator.as_mut() else { return Vec::new() };
        orch.on_scroll(layout, scroll_y, mounted.size.height, mounted.set.transform.rotation)
    }

    /// Runs one frame of animation and returns what to draw.
    ///
    /// Returns `None` when the viewport is not running.
    pub fn frame(&mut self, now: Instant) -> Option<DrawFrame<'_, G>> {
        let mounted = self.mounted.as_mut()?;
        if !mounted.frame_requested {
            return None;
        }

        let sample = mounted.clock.sample(now);
        let input = FrameInput {
            elapsed: sample.elapsed,
            dt: sample.dt,
            pointer: mounted.pointer,
        };

        mounted.animator.step(&mut mounted.set, &input);
        if let Some(orch) = mounted.orchestrator.as_mut() {
            orch.apply(&mut mounted.set, sample.dt);
        }

        Some(DrawFrame {
            geometry: &mounted.geometry,
            set: &mounted.set,
            material: &mounted.material,
            view: self.camera.view(),
            projection: self.camera.projection(),
            model: mounted.set.transform.matrix(),
            lights: self.lights,
        })
    }
}

impl<G> Drop for Viewport<G> {
    fn drop(&mut self) {
        if self.mounted.is_some() {
            log::warn!("viewport dropped while running; host resources were not released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::POINT_DRIFT;
    use crate::config::{Rgb, VisualMode, VisualizerConfig};
    use crate::error::ConfigError;
    use crate::primitive::Topology;
    use std::time::Duration;

    /// Counts live host resources.
    #[derive(Default)]
    struct CountingHost {
        surfaces: usize,
        surface_size: Option<SurfaceSize>,
        resizes: usize,
        live: usize,
        allocations: usize,
        next: u32,
    }

    impl ViewportHost for CountingHost {
        type Geometry = u32;

        fn attach_surface(&mut self, size: SurfaceSize) {
            self.surfaces += 1;
            self.surface_size = Some(size);
        }

        fn resize_surface(&mut self, size: SurfaceSize) {
            self.resizes += 1;
            self.surface_size = Some(size);
        }

        fn detach_surface(&mut self) {
            self.surfaces -= 1;
            self.surface_size = None;
        }

        fn allocate(&mut self, _set: &PrimitiveSet, _material: &Material) -> u32 {
            self.live += 1;
            self.allocations += 1;
            self.next += 1;
            self.next
        }

        fn release(&mut self, _geometry: u32) {
            self.live -= 1;
        }
    }

    const SIZE: SurfaceSize = SurfaceSize::new(800.0, 600.0);

    fn points(count: u32, color: &str, speed: f32) -> Viewport<u32> {
        let cfg = VisualizerConfig::parse("points", color, count, speed).unwrap();
        Viewport::new(Variant::Scene(cfg)).with_seed(42)
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn start_without_container_fails() {
        let mut host = CountingHost::default();
        let mut vp = points(10, "#fff", 1.0);
        let t0 = Instant::now();
        assert_eq!(vp.start(&mut host, None, t0), Err(ViewportError::MissingContainer));
        assert_eq!(
            vp.start(&mut host, Some(SurfaceSize::new(0.0, 600.0)), t0),
            Err(ViewportError::MissingContainer)
        );
        assert!(!vp.is_running());
        assert_eq!(host.surfaces, 0);
        assert_eq!(host.live, 0);
    }

    #[test]
    fn invalid_config_fails_before_allocating() {
        let mut host = CountingHost::default();
        let cfg = VisualizerConfig { count: 0, ..Default::default() };
        let mut vp: Viewport<u32> = Viewport::new(Variant::Scene(cfg));
        let err = vp.start(&mut host, Some(SIZE), Instant::now()).unwrap_err();
        assert_eq!(err, ViewportError::Config(ConfigError::ZeroCount));
        assert_eq!(host.allocations, 0);
    }

    #[test]
    fn immediate_unmount_leaves_nothing_behind() {
        let mut host = CountingHost::default();
        let mut vp: Viewport<u32> = Viewport::new(Variant::Background).with_seed(1);
        vp.start(&mut host, Some(SIZE), Instant::now()).unwrap();
        assert_eq!(vp.listeners().count(), 3);
        assert_eq!(host.live, 1);

        vp.stop(&mut host);
        assert!(vp.listeners().is_empty());
        assert!(!vp.frame_requested());
        assert_eq!(host.live, 0);
        assert_eq!(host.surfaces, 0);
    }

    #[test]
    fn start_and_stop_are_reentrant() {
        let mut host = CountingHost::default();
        let mut vp = points(10, "#fff", 1.0);
        let t0 = Instant::now();
        vp.start(&mut host, Some(SIZE), t0).unwrap();
        vp.start(&mut host, Some(SIZE), t0).unwrap();
        assert_eq!(host.allocations, 1);
        assert_eq!(host.surfaces, 1);

        vp.stop(&mut host);
        vp.stop(&mut host);
        assert_eq!(host.live, 0);
        assert_eq!(host.surfaces, 0);
    }

    #[test]
    fn remount_rebuilds_from_scratch() {
        let mut host = CountingHost::default();
        let mut vp = points(10, "#fff", 1.0);
        let t0 = Instant::now();
        vp.start(&mut host, Some(SIZE), t0).unwrap();
        vp.frame(t0 + Duration::from_millis(16));
        vp.stop(&mut host);

        vp.start(&mut host, Some(SIZE), t0 + Duration::from_secs(1)).unwrap();
        assert_eq!(vp.primitive().unwrap().transform.rotation.x, 0.0);
        assert_eq!(host.allocations, 2);
        assert_eq!(host.live, 1);
        vp.stop(&mut host);
    }

    #[test]
    fn stopped_viewport_draws_nothing() {
        let mut host = CountingHost::default();
        let mut vp = points(10, "#fff", 1.0);
        assert!(vp.frame(Instant::now()).is_none());
        vp.start(&mut host, Some(SIZE), Instant::now()).unwrap();
        vp.stop(&mut host);
        assert!(vp.frame(Instant::now()).is_none());
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_with_same_size_is_idempotent() {
        let mut host = CountingHost::default();
        let mut vp = points(10, "#fff", 1.0);
        vp.start(&mut host, Some(SIZE), Instant::now()).unwrap();

        let bigger = SurfaceSize::new(1600.0, 900.0);
        assert!(vp.resize(&mut host, bigger));
        assert!(!vp.resize(&mut host, bigger));
        assert_eq!(host.resizes, 1);
        assert_eq!(host.surface_size, Some(bigger));
        assert_eq!(host.allocations, 1);
        assert!((vp.camera().aspect - 16.0 / 9.0).abs() < 1e-6);
        vp.stop(&mut host);
    }

    #[test]
    fn resize_keeps_primitive_and_clock() {
        let mut host = CountingHost::default();
        let cfg = VisualizerConfig { mode: VisualMode::Wave, ..Default::default() };
        let mut vp: Viewport<u32> = Viewport::new(Variant::Scene(cfg)).with_seed(3);
        let t0 = Instant::now();
        vp.start(&mut host, Some(SIZE), t0).unwrap();
        vp.frame(t0 + Duration::from_millis(100));
        let before = vp.primitive().unwrap().clone();

        vp.resize(&mut host, SurfaceSize::new(400.0, 400.0));
        assert_eq!(vp.primitive().unwrap(), &before);
        vp.stop(&mut host);
    }

    // ── events ────────────────────────────────────────────────────────────

    #[test]
    fn wave_scene_ignores_pointer_and_scroll() {
        let mut host = CountingHost::default();
        let cfg = VisualizerConfig { mode: VisualMode::Wave, ..Default::default() };
        let mut vp: Viewport<u32> = Viewport::new(Variant::Scene(cfg));
        vp.start(&mut host, Some(SIZE), Instant::now()).unwrap();
        let l = vp.listeners();
        assert!(l.resize && !l.pointer && !l.scroll);

        let layout = SectionLayout::for_viewport(SIZE.height);
        assert!(vp.scrolled(&layout, 5000.0).is_empty());
        assert_eq!(vp.section(), None);
        vp.stop(&mut host);
    }

    #[test]
    fn background_tracks_sections() {
        let mut host = CountingHost::default();
        let mut vp: Viewport<u32> = Viewport::new(Variant::Background).with_seed(9);
        let t0 = Instant::now();
        vp.start(&mut host, Some(SIZE), t0).unwrap();
        assert_eq!(vp.section(), Some(Section::Hero));

        let layout = SectionLayout::for_viewport(SIZE.height);
        let projects = layout.band(Section::Projects).unwrap().top;
        let entered = vp.scrolled(&layout, projects);
        assert_eq!(entered, vec![Section::About, Section::Projects]);

        let mut t = t0;
        for _ in 0..120 {
            t += Duration::from_millis(16);
            vp.frame(t);
        }
        let rot = vp.primitive().unwrap().transform.rotation;
        assert!((rot - Section::Projects.orientation()).length() < 0.05);
        vp.stop(&mut host);
    }

    // ── scenario ──────────────────────────────────────────────────────────

    #[test]
    fn red_points_single_frame() {
        let mut host = CountingHost::default();
        let mut vp = points(50, "#ff0000", 0.5);
        let t0 = Instant::now();
        vp.start(&mut host, Some(SIZE), t0).unwrap();

        let set = vp.primitive().unwrap();
        assert_eq!(set.topology(), Topology::Points);
        assert_eq!(set.positions().len(), 150);
        assert_eq!(vp.material().unwrap().color, Rgb::new(1.0, 0.0, 0.0));

        vp.pointer_moved(SIZE.width / 2.0, SIZE.height / 2.0);
        let frame = vp.frame(t0 + Duration::from_millis(16)).unwrap();
        assert_eq!(*frame.geometry, 1);
        assert_eq!(frame.set.transform.rotation.x, POINT_DRIFT);
        assert_eq!(frame.set.transform.rotation.y, POINT_DRIFT);
        assert!(frame.set.positions().iter().all(|v| !v.is_nan()));
        assert!(frame.model.is_finite());

        vp.stop(&mut host);
        assert_eq!(host.live, 0);
    }
}
