use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::GpuInit;
use super::surface::{self, Recovery};

/// One acquired swapchain image with an encoder ready to record into it.
///
/// Hand it back to [`Gpu::present`] promptly; holding it stalls acquisition.
pub struct GpuFrame {
    pub texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// Outcome of [`Gpu::acquire`].
pub enum Acquired {
    Frame(GpuFrame),
    /// Nothing to draw into this time; try again next frame.
    Skipped,
    /// The surface cannot recover.
    Fatal,
}

/// Adapter, device, queue and the surface bound to one window.
pub struct Gpu<'w> {
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
}

impl<'w> Gpu<'w> {
    /// Opens a device that can present to `window`.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter can present to this window")?;
        let info = adapter.get_info();
        log::info!("adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("backdrop device"),
                required_features: wgpu::Features::empty(),
                required_limits: init.limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to open wgpu device")?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::pick_format(&caps).context("surface reports no formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: surface::pick_present_mode(&caps, init.present_mode()),
            alpha_mode: surface::pick_alpha_mode(&caps, init.alpha_preference()),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::debug!(
            "surface {:?} {:?} {:?}",
            config.format,
            config.present_mode,
            config.alpha_mode
        );

        Ok(Self { surface, device, queue, config })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Configured drawable size in physical pixels.
    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Reconfigures for a new drawable size. A minimized window (zero area)
    /// keeps the old configuration until it comes back.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 || size == self.size() {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Acquires the next swapchain image, recovering from a lost or outdated surface.
    pub fn acquire(&mut self) -> Acquired {
        let texture = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(err) => {
                return match surface::recovery(&err) {
                    Recovery::Reconfigure => {
                        log::debug!("surface {err:?}; reconfiguring");
                        self.surface.configure(&self.device, &self.config);
                        Acquired::Skipped
                    }
                    Recovery::Skip => {
                        log::warn!("surface {err:?}; skipping frame");
                        Acquired::Skipped
                    }
                    Recovery::Fatal => {
                        log::error!("surface {err:?}");
                        Acquired::Fatal
                    }
                };
            }
        };

        let view = texture.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("backdrop frame"),
        });
        Acquired::Frame(GpuFrame { texture, view, encoder })
    }

    /// Submits the recorded commands and presents.
    pub fn present(&self, frame: GpuFrame) {
        let GpuFrame { texture, view, encoder } = frame;
        self.queue.submit([encoder.finish()]);
        drop(view);
        texture.present();
    }
}
