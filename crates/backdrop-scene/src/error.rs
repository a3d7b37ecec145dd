use thiserror::Error;

/// Rejected visualizer configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown visual mode '{0}' (expected points, wave or floating)")]
    InvalidMode(String),

    #[error("invalid color '{0}' (expected #rgb or #rrggbb)")]
    InvalidColor(String),

    #[error("point count must be positive")]
    ZeroCount,

    #[error("point count {0} exceeds the maximum of {}", crate::config::MAX_POINT_COUNT)]
    CountTooLarge(u32),

    #[error("speed must be a positive finite number, got {0}")]
    InvalidSpeed(f32),
}

/// Viewport lifecycle precondition failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewportError {
    /// `start` was called without a container to size the surface against.
    #[error("viewport has no sizing container (missing or zero-area)")]
    MissingContainer,

    #[error(transparent)]
    Config(#[from] ConfigError),
}
