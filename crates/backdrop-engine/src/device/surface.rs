//! Surface capability selection and error recovery. Pure functions over wgpu
//! descriptors so they can be tested without an adapter.

/// sRGB when offered; the field shaders output linear color.
pub(crate) fn pick_format(caps: &wgpu::SurfaceCapabilities) -> Option<wgpu::TextureFormat> {
    caps.formats
        .iter()
        .copied()
        .find(wgpu::TextureFormat::is_srgb)
        .or_else(|| caps.formats.first().copied())
}

pub(crate) fn pick_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    preference: &[wgpu::CompositeAlphaMode],
) -> wgpu::CompositeAlphaMode {
    preference
        .iter()
        .copied()
        .find(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// `Fifo` is the only mode every surface supports.
pub(crate) fn pick_present_mode(
    caps: &wgpu::SurfaceCapabilities,
    wanted: wgpu::PresentMode,
) -> wgpu::PresentMode {
    let auto = matches!(wanted, wgpu::PresentMode::AutoVsync | wgpu::PresentMode::AutoNoVsync);
    if auto || caps.present_modes.contains(&wanted) {
        wanted
    } else {
        wgpu::PresentMode::Fifo
    }
}

/// What to do after `get_current_texture` fails.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Recovery {
    /// Reconfigure, then draw again next frame.
    Reconfigure,
    Skip,
    Fatal,
}

pub(crate) fn recovery(err: &wgpu::SurfaceError) -> Recovery {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Recovery::Reconfigure,
        wgpu::SurfaceError::OutOfMemory => Recovery::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => Recovery::Skip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::{CompositeAlphaMode as Alpha, PresentMode, TextureFormat};

    fn caps(formats: Vec<TextureFormat>, alpha_modes: Vec<Alpha>) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats,
            alpha_modes,
            present_modes: vec![PresentMode::Fifo],
            ..Default::default()
        }
    }

    #[test]
    fn srgb_format_wins_over_order() {
        let c = caps(vec![TextureFormat::Bgra8Unorm, TextureFormat::Rgba8UnormSrgb], vec![]);
        assert_eq!(pick_format(&c), Some(TextureFormat::Rgba8UnormSrgb));
    }

    #[test]
    fn linear_only_surface_still_gets_a_format() {
        let c = caps(vec![TextureFormat::Rgba16Float], vec![]);
        assert_eq!(pick_format(&c), Some(TextureFormat::Rgba16Float));
        assert_eq!(pick_format(&caps(vec![], vec![])), None);
    }

    #[test]
    fn alpha_mode_walks_preference_then_falls_back() {
        let c = caps(vec![], vec![Alpha::Opaque, Alpha::PostMultiplied]);
        assert_eq!(
            pick_alpha_mode(&c, &[Alpha::PreMultiplied, Alpha::PostMultiplied]),
            Alpha::PostMultiplied
        );
        assert_eq!(pick_alpha_mode(&c, &[Alpha::Inherit]), Alpha::Opaque);
        assert_eq!(pick_alpha_mode(&caps(vec![], vec![]), &[]), Alpha::Auto);
    }

    #[test]
    fn unsupported_present_mode_becomes_fifo() {
        let c = caps(vec![], vec![]);
        assert_eq!(pick_present_mode(&c, PresentMode::Mailbox), PresentMode::Fifo);
        assert_eq!(pick_present_mode(&c, PresentMode::AutoNoVsync), PresentMode::AutoNoVsync);
    }

    #[test]
    fn lost_surface_is_recoverable_oom_is_not() {
        assert_eq!(recovery(&wgpu::SurfaceError::Lost), Recovery::Reconfigure);
        assert_eq!(recovery(&wgpu::SurfaceError::Outdated), Recovery::Reconfigure);
        assert_eq!(recovery(&wgpu::SurfaceError::Timeout), Recovery::Skip);
        assert_eq!(recovery(&wgpu::SurfaceError::OutOfMemory), Recovery::Fatal);
    }
}
