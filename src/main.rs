// SPDX-License-Identifier: GPL-3.0-only

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Mutex;
use stillcam::backends::camera::FacingMode;
use stillcam::backends::camera::native::NativeMediaProvider;
use stillcam::backends::camera::test_pattern::TestPatternProvider;
use stillcam::config::{AcquireTrigger, Config};
use stillcam::constants::app_info;
use stillcam::errors::ConfigError;
use stillcam::i18n;
use tracing_subscriber::EnvFilter;

mod cli;

/// Size of the synthetic test-pattern stream
const TEST_PATTERN_SIZE: (u32, u32) = (640, 480);

#[derive(Parser)]
#[command(name = "stillcam")]
#[command(about = "Camera capture with still review and submission")]
#[command(version = app_info::version())]
#[command(subcommand_required = false)]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Flags that take precedence over the config file
#[derive(Args)]
struct Overrides {
    /// Endpoint receiving submitted stills
    #[arg(long, global = true)]
    upload_url: Option<String>,

    /// Preferred camera facing
    #[arg(long, global = true, value_parser = parse_facing)]
    facing: Option<FacingMode>,

    /// Use this camera (index from 'stillcam list') instead of matching the facing
    #[arg(long, global = true)]
    camera: Option<usize>,

    /// Wait for "Open Camera" instead of requesting access on start
    #[arg(long, global = true)]
    on_demand: bool,

    /// Keep the preview inline once access is granted
    #[arg(long, global = true)]
    inline: bool,

    /// Directory for saved stills
    #[arg(long, global = true)]
    photo_dir: Option<PathBuf>,
}

impl Overrides {
    fn apply(&self, config: &mut Config) -> Result<(), ConfigError> {
        config.override_upload_url(self.upload_url.clone());
        if let Some(facing) = self.facing {
            config.facing_mode = facing;
        }
        if self.on_demand {
            config.acquire = AcquireTrigger::OnDemand;
        }
        if self.inline {
            config.auto_full_screen = false;
        }
        if let Some(dir) = &self.photo_dir {
            config.photo_dir = Some(dir.clone());
        }
        config.validate()
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run in terminal mode (default)
    Terminal {
        /// Use a synthetic test pattern instead of a camera
        #[arg(long)]
        test_pattern: bool,
    },

    /// List available cameras
    List,

    /// Take one still
    Snap {
        /// Output file path (default: photo directory, IMG_TIMESTAMP.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also submit the still to the upload endpoint
        #[arg(long)]
        submit: bool,

        /// Use a synthetic test pattern instead of a camera
        #[arg(long)]
        test_pattern: bool,
    },
}

fn parse_facing(value: &str) -> Result<FacingMode, String> {
    match value.to_ascii_lowercase().as_str() {
        "environment" | "back" => Ok(FacingMode::Environment),
        "user" | "front" => Ok(FacingMode::User),
        other => Err(format!("unknown facing mode '{}'", other)),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Terminal {
        test_pattern: false,
    });

    // The terminal UI owns the screen, so its logs go to a file
    let log_file = match command {
        Commands::Terminal { .. } => log_path(),
        _ => None,
    };
    init_logging(log_file);

    i18n::init(&i18n_embed::DesktopLanguageRequester::requested_languages());

    let mut config = Config::load()?;
    cli.overrides.apply(&mut config)?;

    let native = || match cli.overrides.camera {
        Some(index) => NativeMediaProvider::with_device_index(index),
        None => NativeMediaProvider::new(),
    };
    let test_pattern = || TestPatternProvider::new(TEST_PATTERN_SIZE.0, TEST_PATTERN_SIZE.1);

    match command {
        Commands::Terminal { test_pattern: true } => stillcam::terminal::run(test_pattern(), &config)?,
        Commands::Terminal { test_pattern: false } => stillcam::terminal::run(native(), &config)?,
        Commands::List => cli::list_cameras()?,
        Commands::Snap {
            output,
            submit,
            test_pattern: true,
        } => cli::snap(test_pattern(), &config, output, submit)?,
        Commands::Snap {
            output,
            submit,
            test_pattern: false,
        } => cli::snap(native(), &config, output, submit)?,
    }

    Ok(())
}

fn log_path() -> Option<PathBuf> {
    let dir = dirs::state_dir()
        .or_else(dirs::cache_dir)?
        .join(env!("CARGO_PKG_NAME"));
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join("stillcam.log"))
}

/// Set RUST_LOG to control the level, e.g. RUST_LOG=stillcam=debug
fn init_logging(log_file: Option<PathBuf>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true);

    let file = log_file.and_then(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });

    match file {
        Some(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).init(),
        None => builder.init(),
    }
}
