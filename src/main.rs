use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use grid_snake::game::{GameConfig, OutOfBoundsPolicy, ThemeVariables};
use grid_snake::modes::{HeadlessMode, PlayMode};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Time-driven grid snake simulation")]
struct Cli {
    /// Run in the terminal or headless
    #[arg(long, default_value = "play")]
    mode: Mode,

    /// JSON config file, applied after the theme
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stylesheet with --map-width, --tile-size, colour variables etc.
    #[arg(long)]
    theme: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<usize>,

    /// Tile size in pixels
    #[arg(long)]
    tile_size: Option<u32>,

    /// Milliseconds between simulation steps
    #[arg(long)]
    step_ms: Option<u64>,

    /// Due steps to swallow before snakes start moving
    #[arg(long)]
    warm_up: Option<u32>,

    /// What a snake does at the edge of the grid
    #[arg(long)]
    policy: Option<Policy>,

    /// Number of ticks to run in headless mode
    #[arg(long, default_value = "100")]
    ticks: u64,

    /// Log file for play mode (the terminal is taken by the board)
    #[arg(long, default_value = "grid_snake.log")]
    log_file: PathBuf,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Watch the simulation in the terminal
    Play,
    /// Run without a terminal and print the final state as JSON
    Headless,
}

#[derive(Clone, Copy, ValueEnum)]
enum Policy {
    Freeze,
    Wrap,
    Terminate,
}

impl From<Policy> for OutOfBoundsPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Freeze => OutOfBoundsPolicy::Freeze,
            Policy::Wrap => OutOfBoundsPolicy::Wrap,
            Policy::Terminate => OutOfBoundsPolicy::Terminate,
        }
    }
}

/// Defaults, then theme, then JSON file, then flags
fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = GameConfig::default();

    if let Some(path) = &cli.theme {
        let theme = ThemeVariables::from_file(path).context("Failed to read theme")?;
        config = theme.apply(config).context("Invalid theme")?;
    }

    if let Some(path) = &cli.config {
        let file_config = GameConfig::from_json_file(path).context("Invalid config file")?;
        if cli.theme.is_some() {
            tracing::warn!("--config replaces every value the theme set");
        }
        config = file_config;
    }

    if let Some(width) = cli.width {
        config.grid_width = width;
    }
    if let Some(height) = cli.height {
        config.grid_height = height;
    }
    if let Some(tile_size) = cli.tile_size {
        config.tile_size = tile_size;
    }
    if let Some(step_ms) = cli.step_ms {
        config.step_interval_ms = step_ms;
    }
    if let Some(warm_up) = cli.warm_up {
        config.warm_up_ticks = warm_up;
    }
    if let Some(policy) = cli.policy {
        config.out_of_bounds = policy.into();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn init_logging(mode: &Mode, log_file: &Path) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match mode {
        Mode::Play => {
            let file = File::create(log_file)
                .with_context(|| format!("Failed to create log file {}", log_file.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        Mode::Headless => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.mode, &cli.log_file)?;

    let config = build_config(&cli)?;

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Play => {
            let mut play_mode = PlayMode::new(config)?;
            play_mode.run().await?;
        }
        Mode::Headless => {
            let mut headless_mode = HeadlessMode::new(config)?;
            let snapshot = headless_mode.run(cli.ticks)?;
            let json = serde_json::to_string_pretty(&snapshot).context("Failed to encode snapshot")?;
            println!("{json}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("grid_snake").chain(args.iter().copied()))
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = build_config(&cli(&["--width", "12", "--policy", "wrap", "--warm-up", "3"])).unwrap();
        assert_eq!(config.grid_width, 12);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.out_of_bounds, OutOfBoundsPolicy::Wrap);
        assert_eq!(config.warm_up_ticks, 3);
    }

    #[test]
    fn test_theme_then_flags() {
        let mut theme = tempfile::NamedTempFile::new().unwrap();
        write!(
            theme,
            ":root {{ --map-width: 8; --map-height: 6; --tile-size: 10px; \
             --background-color-light: #ffffff; --background-color-dark: #eeeeee; \
             --fruit-color: #ff0000; --snake-color: #00ff00; }}"
        )
        .unwrap();
        let path = theme.path().to_str().unwrap().to_string();

        let config = build_config(&cli(&["--theme", &path, "--height", "9"])).unwrap();
        assert_eq!(config.grid_width, 8);
        assert_eq!(config.grid_height, 9);
        assert_eq!(config.tile_size, 10);
        assert_eq!(config.colors.snake, 0x00FF00);
    }

    #[test]
    fn test_invalid_flag_values_rejected() {
        assert!(build_config(&cli(&["--width", "0"])).is_err());
        assert!(build_config(&cli(&["--step-ms", "0"])).is_err());
    }
}
