//! Command-line arguments and app configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use draw_client::{DEFAULT_API_URL, DEFAULT_TIMEOUT};

/// Largest viewport width, in CSS pixels, treated as a phone.
pub const NARROW_VIEWPORT_MAX: u32 = 768;

/// Command-line arguments for kids-draw.
#[derive(Debug, Clone, Parser)]
#[command(name = "kids-draw")]
#[command(about = "Draw a picture and turn it into a 3D model")]
#[command(version)]
pub struct CliArgs {
    /// Settings shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Options accepted before any subcommand.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Generation backend URL (e.g., <http://localhost:8000>)
    #[arg(long, env = "KIDS_DRAW_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Directory downloaded models are saved into
    #[arg(long, env = "KIDS_DRAW_DOWNLOAD_DIR", default_value = ".", global = true)]
    pub download_dir: PathBuf,

    /// Request timeout in seconds
    #[arg(long, env = "KIDS_DRAW_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs(), global = true)]
    pub timeout_secs: u64,

    /// Canvas width in pixels
    #[arg(long, env = "KIDS_DRAW_CANVAS_WIDTH", default_value = "800", global = true)]
    pub width: u32,

    /// Canvas height in pixels
    #[arg(long, env = "KIDS_DRAW_CANVAS_HEIGHT", default_value = "600", global = true)]
    pub height: u32,

    /// Canvas engine to start with
    #[arg(long, env = "KIDS_DRAW_ENGINE", default_value = "vector", global = true)]
    pub engine: String,

    /// Viewport width used to decide whether the preview opens as a modal
    #[arg(long, env = "KIDS_DRAW_VIEWPORT_WIDTH", default_value = "1280", global = true)]
    pub viewport_width: u32,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the canvas engines and what they can do
    Engines,

    /// Replay a drawing script and save the picture as PNG
    Render {
        /// Drawing script (JSON)
        #[arg(long)]
        script: PathBuf,
        /// Output PNG path
        #[arg(long)]
        out: PathBuf,
    },

    /// Turn a drawing into a 3D model and download it
    Generate {
        /// Drawing script (JSON) to replay
        #[arg(long, conflicts_with = "image", required_unless_present = "image")]
        script: Option<PathBuf>,
        /// Picture to import onto a blank canvas
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Ask the backend how a task is doing
    Status {
        /// Task id returned by generate
        task_id: String,
    },

    /// Check the backend is up
    Health,
}

/// App configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Backend base URL.
    pub api_url: String,
    /// Where GLB/STL downloads are written.
    pub download_dir: PathBuf,
    /// Backend request timeout.
    pub timeout: Duration,
    /// Canvas width in pixels.
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
    /// Engine created at startup.
    pub engine: String,
    /// Viewport width in CSS pixels.
    pub viewport_width: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            download_dir: PathBuf::from("."),
            timeout: DEFAULT_TIMEOUT,
            canvas_width: 800,
            canvas_height: 600,
            engine: "vector".to_string(),
            viewport_width: 1280,
        }
    }
}

impl From<GlobalArgs> for AppConfig {
    fn from(args: GlobalArgs) -> Self {
        Self {
            api_url: args.api_url,
            download_dir: args.download_dir,
            timeout: Duration::from_secs(args.timeout_secs),
            canvas_width: args.width,
            canvas_height: args.height,
            engine: args.engine,
            viewport_width: args.viewport_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_config_default() {
        let args = CliArgs::try_parse_from(["kids-draw", "engines"]).expect("args");
        assert!(matches!(args.command, Command::Engines));
        let config = AppConfig::from(args.global);
        assert_eq!(config.canvas_width, AppConfig::default().canvas_width);
        assert_eq!(config.engine, "vector");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_generate_requires_one_source() {
        assert!(CliArgs::try_parse_from(["kids-draw", "generate"]).is_err());
        assert!(CliArgs::try_parse_from([
            "kids-draw",
            "generate",
            "--script",
            "a.json",
            "--image",
            "b.png"
        ])
        .is_err());
        let args = CliArgs::try_parse_from(["kids-draw", "generate", "--image", "b.png"])
            .expect("args");
        assert!(matches!(
            args.command,
            Command::Generate { image: Some(_), script: None }
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = CliArgs::try_parse_from([
            "kids-draw",
            "status",
            "ab12",
            "--api-url",
            "http://backend:9000",
            "--viewport-width",
            "400",
        ])
        .expect("args");
        let config = AppConfig::from(args.global);
        assert_eq!(config.api_url, "http://backend:9000");
        assert_eq!(config.viewport_width, 400);
    }
}
