use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::translate_window_event;
use crate::input::{InputFrame, InputState};

/// Window settings.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "backdrop".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Drives one window's event loop.
pub struct Runtime;

impl Runtime {
    /// Opens the window and animates continuously until the app exits or the
    /// window is closed. Errors that stopped the loop early are returned.
    pub fn run<A: App + 'static>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let mut driver = Driver {
            config,
            gpu_init,
            app,
            window: None,
            occluded: false,
            exiting: false,
            error: None,
        };

        event_loop
            .run_app(&mut driver)
            .context("event loop terminated with error")?;

        driver.error.map_or(Ok(()), Err)
    }
}

/// Window plus everything that borrows it or lives exactly as long.
#[self_referencing]
struct WindowEntry {
    input: InputState,
    input_frame: InputFrame,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct Driver<A: App> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    /// Fully hidden windows get no frames, so the animation pauses.
    occluded: bool,
    exiting: bool,
    error: Option<anyhow::Error>,
}

impl<A: App> Driver<A> {
    fn open(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);
        let window = event_loop.create_window(attrs).context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            input: InputState::default(),
            input_frame: InputFrame::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        entry.with_window(|w| w.request_redraw());
        self.window = Some(entry);
        Ok(())
    }

    /// Gives the app its teardown callback while the device still exists, then
    /// drops the window and leaves the loop.
    fn close(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            self.app.on_close();
            self.window = None;
        }
        self.exiting = true;
        event_loop.exit();
    }

    fn redraw(&mut self, window_id: WindowId) -> bool {
        let Some(entry) = self.window.as_mut() else { return false };
        let app = &mut self.app;

        let control = entry.with_mut(|f| {
            let mut ctx = FrameCtx {
                window: WindowCtx { id: window_id, window: f.window },
                gpu: f.gpu,
                input: f.input,
                input_frame: f.input_frame,
                now: Instant::now(),
            };
            let control = app.on_frame(&mut ctx);
            f.input_frame.clear();
            control
        });

        control == AppControl::Exit
    }
}

impl<A: App> ApplicationHandler for Driver<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.exiting {
            return;
        }
        if let Err(e) = self.open(event_loop) {
            log::error!("{e:#}");
            self.error = Some(e);
            self.close(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exiting {
            event_loop.exit();
            return;
        }
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(entry) = self.window.as_ref().filter(|_| !self.occluded) {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if self.exiting {
            return;
        }
        let Some(entry) = self.window.as_mut() else { return };

        entry.with_mut(|f| {
            if let Some(ev) = translate_window_event(f.window, &event) {
                f.input.apply_event(f.input_frame, ev);
            }
        });

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window closed");
                self.close(event_loop);
            }
            WindowEvent::Resized(size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(size));
                entry.with_window(|w| w.request_redraw());
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                let size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(size));
            }
            WindowEvent::Occluded(occluded) => {
                log::debug!("occluded: {occluded}");
                self.occluded = occluded;
                if !occluded {
                    entry.with_window(|w| w.request_redraw());
                }
            }
            WindowEvent::RedrawRequested => {
                if self.redraw(window_id) {
                    self.close(event_loop);
                }
            }
            _ => {}
        }
    }
}
