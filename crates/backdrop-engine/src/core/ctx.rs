use std::time::Instant;

use winit::window::{Window, WindowId};

use crate::coords::Viewport;
use crate::device::{Acquired, Gpu};
use crate::input::{InputFrame, InputState};
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};

use super::app::AppControl;

/// The window a frame is being drawn for.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl WindowCtx<'_> {
    /// Inner size in logical pixels, `(width, height)`.
    pub fn logical_size(&self) -> (f32, f32) {
        let size = self.window.inner_size().to_logical::<f64>(self.window.scale_factor());
        (size.width as f32, size.height as f32)
    }
}

/// Everything an [`App`](super::App) sees during one frame.
///
/// `'a` is the callback; `'w` is the window borrow held by [`Gpu`].
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    /// Taken once when the frame begins.
    pub now: Instant,
}

impl FrameCtx<'_, '_> {
    /// Clears to `clear`, lets `draw` record into the frame, then presents.
    ///
    /// A skipped acquisition draws nothing and keeps running; an unrecoverable
    /// surface returns `Exit`.
    pub fn render<F>(&mut self, clear: Color, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let mut frame = match self.gpu.acquire() {
            Acquired::Frame(frame) => frame,
            Acquired::Skipped => return AppControl::Continue,
            Acquired::Fatal => return AppControl::Exit,
        };

        let (w, h) = self.window.logical_size();
        let rctx = RenderCtx {
            device: self.gpu.device(),
            queue: self.gpu.queue(),
            surface_format: self.gpu.surface_format(),
            viewport: Viewport::new(w, h),
        };

        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            target.clear(clear);
            draw(&rctx, &mut target);
        }

        self.window.window.pre_present_notify();
        self.gpu.present(frame);
        AppControl::Continue
    }
}
