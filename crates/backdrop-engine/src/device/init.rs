/// How to open the GPU for a window.
#[derive(Debug, Clone)]
pub struct GpuInit {
    pub power: wgpu::PowerPreference,
    /// Present with vsync (`Fifo`); otherwise `AutoNoVsync`.
    pub vsync: bool,
    /// Request a premultiplied-alpha surface so cleared areas let the desktop through.
    pub transparent: bool,
    pub limits: wgpu::Limits,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power: wgpu::PowerPreference::LowPower,
            vsync: true,
            transparent: false,
            limits: wgpu::Limits::downlevel_webgl2_defaults(),
        }
    }
}

impl GpuInit {
    pub(crate) fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }

    /// Alpha modes to try, best first.
    pub(crate) fn alpha_preference(&self) -> &'static [wgpu::CompositeAlphaMode] {
        if self.transparent {
            &[wgpu::CompositeAlphaMode::PreMultiplied, wgpu::CompositeAlphaMode::PostMultiplied]
        } else {
            &[wgpu::CompositeAlphaMode::Opaque]
        }
    }
}
