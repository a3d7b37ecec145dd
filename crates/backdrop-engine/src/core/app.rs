use super::ctx::FrameCtx;

/// Returned from app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// What the runtime drives: one callback per frame and one at teardown.
pub trait App {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Runs once before the window is destroyed, while the device is still
    /// alive. GPU resources must be released here.
    fn on_close(&mut self) {}
}
