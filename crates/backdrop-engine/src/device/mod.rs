//! GPU device and window surface.
//!
//! One [`Gpu`] per window: adapter, device, queue and the configured surface,
//! plus per-frame acquisition with surface-error recovery.

mod context;
mod init;
mod surface;

pub use context::{Acquired, Gpu, GpuFrame};
pub use init::GpuInit;
