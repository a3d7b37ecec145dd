use winit::dpi::LogicalSize;

use backdrop_engine::core::{App as EngineApp, AppControl, FrameCtx};
use backdrop_engine::device::GpuInit;
use backdrop_engine::input::Key;
use backdrop_engine::paint::Color;
use backdrop_engine::window::{Runtime, RuntimeConfig};
use backdrop_scene::{
    Section, SurfaceSize, Variant, Viewport, ViewportError, ViewportHost, VisualizerConfig,
};

use crate::host::{field_uniforms, GpuHost};
use crate::page::{PageCommand, PageScroll};

// ── Application ───────────────────────────────────────────────────────────

/// Top-level visualizer builder.
///
/// ```rust,ignore
/// Application::new()
///     .title("backdrop")
///     .scene(VisualizerConfig::parse("wave", "#4f46e5", 50, 0.5)?)
///     .run()?;
/// ```
pub struct Application {
    title:   String,
    width:   f64,
    height:  f64,
    variant: Variant,
    seed:    Option<u64>,
    clear:   Color,
}

impl Application {
    pub fn new() -> Self {
        Self {
            title:   "backdrop".to_string(),
            width:   1280.0,
            height:  720.0,
            variant: Variant::default(),
            seed:    None,
            clear:   Color::from_srgb_u8(10, 10, 15, 255),
        }
    }

    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    /// Set the initial window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width  = width;
        self.height = height;
        self
    }

    /// Embedded visualizer with the given configuration.
    pub fn scene(mut self, config: VisualizerConfig) -> Self {
        self.variant = Variant::Scene(config);
        self
    }

    /// Full-window background that follows page sections.
    pub fn background(mut self) -> Self {
        self.variant = Variant::Background;
        self
    }

    /// Fixes the RNG seed for a reproducible layout.
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear = color;
        self
    }

    /// Opens the window and runs until it is closed or Escape is pressed.
    pub fn run(self) -> anyhow::Result<()> {
        if let Variant::Scene(cfg) = &self.variant {
            cfg.validate()?;
            log::info!(
                "scene: mode={} color={} count={} speed={}",
                cfg.mode, cfg.color, cfg.count, cfg.speed
            );
        } else {
            log::info!("background field; scroll with wheel, arrows, PageUp/PageDown or 1-5");
        }

        let config = RuntimeConfig {
            title:        self.title.clone(),
            initial_size: LogicalSize::new(self.width, self.height),
        };
        Runtime::run(config, GpuInit::default(), ViewerState::new(self))
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

// ── ViewerState ───────────────────────────────────────────────────────────

/// Implements `backdrop_engine::core::App`. User code never sees this type.
struct ViewerState {
    viewport: Viewport<backdrop_engine::render::field::GeometryId>,
    /// Created on the first frame, once a device exists.
    host:     Option<GpuHost>,
    page:     Option<PageScroll>,
    clear:    Color,
}

impl ViewerState {
    fn new(app: Application) -> Self {
        let mut viewport = Viewport::new(app.variant);
        if let Some(seed) = app.seed {
            viewport = viewport.with_seed(seed);
        }
        Self {
            viewport,
            host:  None,
            page:  None,
            clear: app.clear,
        }
    }

    /// Mounts on the first frame with a usable size and tracks resizes after.
    /// `Ok(false)` means this frame cannot draw yet.
    fn ensure_mounted(
        &mut self,
        host: &mut GpuHost,
        size: SurfaceSize,
        now: std::time::Instant,
    ) -> Result<bool, ViewportError> {
        if self.viewport.is_running() {
            resize_mounted(&mut self.viewport, self.page.as_mut(), host, size);
            return Ok(true);
        }

        match self.viewport.start(host, Some(size), now) {
            Ok(()) => {
                if self.viewport.variant().is_background() {
                    self.page = Some(PageScroll::new(size.height));
                }
                Ok(true)
            }
            // Minimized window: try again next frame.
            Err(ViewportError::MissingContainer) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn shutdown(&mut self) {
        if let Some(host) = self.host.as_mut() {
            self.viewport.stop(host);
            log::debug!("released; {} geometry slots live", host.live_geometry());
        }
    }
}

/// Re-evaluates the active section against the page's current offset.
fn sync_section<G>(viewport: &mut Viewport<G>, page: &PageScroll) -> Option<Section> {
    let entered = viewport.scrolled(page.layout(), page.scroll_y()).last().copied();
    if let Some(section) = entered {
        log::info!("section: {section}");
    }
    entered
}

/// Propagates a window resize to the viewport and, for the background, to the
/// page layout. The midpoint moves with the height, so the section is re-read.
fn resize_mounted<G, H>(
    viewport: &mut Viewport<G>,
    page: Option<&mut PageScroll>,
    host: &mut H,
    size: SurfaceSize,
) where
    H: ViewportHost<Geometry = G>,
{
    if !viewport.resize(host, size) {
        return;
    }
    if let Some(page) = page {
        page.resize(size.height);
        sync_section(viewport, page);
    }
}

impl EngineApp for ViewerState {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.keys_pressed.contains(&Key::Escape) {
            self.shutdown();
            return AppControl::Exit;
        }

        let (w, h) = ctx.window.logical_size();
        let size = SurfaceSize::new(w, h);
        let now = ctx.now;

        let mut host = match self.host.take() {
            Some(host) => host,
            None => GpuHost::new(ctx.gpu.device().clone(), ctx.gpu.queue().clone()),
        };

        match self.ensure_mounted(&mut host, size, now) {
            Ok(true) => {}
            Ok(false) => {
                self.host = Some(host);
                return AppControl::Continue;
            }
            Err(e) => {
                log::error!("viewport failed to start: {e}");
                self.host = Some(host);
                return AppControl::Exit;
            }
        }

        // ── Events ────────────────────────────────────────────────────────
        if ctx.input_frame.pointer_moved {
            if let Some((x, y)) = ctx.input.pointer_pos {
                self.viewport.pointer_moved(x, y);
            }
        }

        if let Some(page) = self.page.as_mut() {
            let mut moved = false;
            for cmd in PageCommand::from_input(ctx.input_frame) {
                moved |= page.apply(cmd);
            }
            if moved {
                sync_section(&mut self.viewport, page);
            }
        }

        // ── Animate + upload ──────────────────────────────────────────────
        let draw = self.viewport.frame(now).map(|frame| {
            host.sync(*frame.geometry, frame.set, frame.material);
            (*frame.geometry, field_uniforms(&frame, size.height))
        });

        // ── Render ────────────────────────────────────────────────────────
        let control = ctx.render(self.clear, |rctx, target| {
            if let Some((id, uniforms)) = draw.as_ref() {
                host.renderer_mut().render(rctx, target, *id, uniforms);
            }
        });

        self.host = Some(host);
        control
    }

    fn on_close(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use backdrop_scene::{Material, PrimitiveSet};

    #[derive(Default)]
    struct NullHost {
        next: u32,
    }

    impl ViewportHost for NullHost {
        type Geometry = u32;

        fn attach_surface(&mut self, _size: SurfaceSize) {}
        fn resize_surface(&mut self, _size: SurfaceSize) {}
        fn detach_surface(&mut self) {}

        fn allocate(&mut self, _set: &PrimitiveSet, _material: &Material) -> u32 {
            self.next += 1;
            self.next
        }

        fn release(&mut self, _geometry: u32) {}
    }

    fn background(host: &mut NullHost, size: SurfaceSize) -> (Viewport<u32>, PageScroll) {
        let mut viewport = Viewport::new(Variant::Background).with_seed(3);
        viewport.start(host, Some(size), Instant::now()).unwrap();
        (viewport, PageScroll::new(size.height))
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_rereads_section_from_page() {
        let mut host = NullHost::default();
        let (mut viewport, mut page) = background(&mut host, SurfaceSize::new(800.0, 600.0));
        assert_eq!(viewport.section(), Some(Section::Hero));

        // Offset moved without the viewport hearing about it.
        assert!(page.apply(PageCommand::JumpTo(Section::Skills)));
        assert_eq!(viewport.section(), Some(Section::Hero));

        resize_mounted(&mut viewport, Some(&mut page), &mut host, SurfaceSize::new(800.0, 700.0));
        assert_eq!(viewport.section(), Some(Section::Skills));
    }

    #[test]
    fn unchanged_size_leaves_section_alone() {
        let mut host = NullHost::default();
        let size = SurfaceSize::new(800.0, 600.0);
        let (mut viewport, mut page) = background(&mut host, size);
        assert!(page.apply(PageCommand::Bottom));

        resize_mounted(&mut viewport, Some(&mut page), &mut host, size);
        assert_eq!(viewport.section(), Some(Section::Hero));
    }

    #[test]
    fn page_moves_report_the_last_entered_section() {
        let mut host = NullHost::default();
        let (mut viewport, mut page) = background(&mut host, SurfaceSize::new(800.0, 600.0));
        assert!(page.apply(PageCommand::Bottom));
        assert_eq!(sync_section(&mut viewport, &page), Some(Section::Contact));
        assert_eq!(sync_section(&mut viewport, &page), None);
    }
}
