use anyhow::Context;
use clap::Parser;

use backdrop_engine::logging::{init_logging, LoggingConfig};
use backdrop_view::{Application, VisualizerConfig};

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Animated 3D point and mesh backdrop")]
struct Args {
    /// Visual mode: points, wave or floating
    #[arg(long, default_value = "points")]
    mode: String,

    /// Primitive color as #rgb or #rrggbb
    #[arg(long, default_value = "#ffffff")]
    color: String,

    /// Number of points (points mode)
    #[arg(long, default_value_t = 50)]
    count: u32,

    /// Wave animation speed multiplier
    #[arg(long, default_value_t = 0.5)]
    speed: f32,

    /// Full-window section-tracking background instead of an embedded scene
    #[arg(long, conflicts_with_all = ["mode", "color", "count", "speed"])]
    background: bool,

    /// RNG seed for a reproducible layout
    #[arg(long)]
    seed: Option<u64>,

    /// Window width in logical pixels
    #[arg(long, short = 'W', default_value_t = 960.0)]
    width: f64,

    /// Window height in logical pixels
    #[arg(long, short = 'H', default_value_t = 600.0)]
    height: f64,

    /// Log filter in env_logger syntax (overrides BACKDROP_LOG)
    #[arg(long)]
    log: Option<String>,

    /// Prefix log lines with timestamps
    #[arg(long)]
    timestamps: bool,
}

impl Args {
    fn application(&self) -> anyhow::Result<Application> {
        let app = Application::new()
            .size(self.width, self.height)
            .seed(self.seed);

        if self.background {
            return Ok(app.title("backdrop: background").background());
        }

        let config = VisualizerConfig::parse(&self.mode, &self.color, self.count, self.speed)
            .context("invalid visualizer options")?;
        Ok(app.title(format!("backdrop: {}", config.mode)).scene(config))
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(LoggingConfig {
        filter: args.log.clone(),
        timestamps: args.timestamps,
    });

    args.application()?.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("backdrop").chain(argv.iter().copied()))
    }

    #[test]
    fn defaults_build_a_points_scene() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.mode, "points");
        assert_eq!(args.count, 50);
        assert!(args.application().is_ok());
    }

    #[test]
    fn bad_mode_is_rejected_before_launch() {
        let args = parse(&["--mode", "spiral"]).unwrap();
        let err = args.application().err().unwrap();
        assert!(format!("{err:#}").contains("spiral"));
    }

    #[test]
    fn oversized_count_is_rejected_before_launch() {
        let args = parse(&["--count", "4294967295"]).unwrap();
        let err = args.application().err().unwrap();
        assert!(format!("{err:#}").contains("exceeds the maximum"));
    }

    #[test]
    fn background_conflicts_with_scene_options() {
        assert!(parse(&["--background"]).is_ok());
        assert!(parse(&["--background", "--mode", "wave"]).is_err());
    }
}
