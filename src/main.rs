// src/main.rs
mod app;
mod config;
mod drivers;
mod recorder;
mod types;
mod visualizer;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use config::{
    CaptureConfig, PlotConfig, PlotSelection, DEFAULT_BAUD_RATE, DEFAULT_DATA_FILE, DEFAULT_PORT,
    DEFAULT_WARMUP_SECS,
};
#[derive(Parser, Debug)]
#[command(name = "voltscope", version, about = "Capture voltage bursts from a serial device and plot them")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}
#[derive(Subcommand, Debug)]
enum Command {
    /// Read the serial port until Ctrl+C, save the measurements as JSON and plot them.
    Capture(CaptureArgs),
    /// Plot all measurements of a JSON file, or a single one.
    Plot(PlotArgs),
}
#[derive(Args, Debug)]
struct CaptureArgs {
    /// Where the output file is saved.
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_DATA_FILE)]
    output: PathBuf,
    /// Serial port (e.g. WIN: "COM3", Linux: "/dev/ttyACM0", macOS: "/dev/cu.usbmodem14101").
    #[arg(short, long, value_name = "PORT", default_value = DEFAULT_PORT)]
    port: String,
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    baud_rate: u32,
    /// Seconds to wait after opening the port before reading.
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_WARMUP_SECS)]
    warmup_secs: f64,
    /// Number of leading lines to drop (bad data right after the board resets).
    #[arg(long, value_name = "N", default_value_t = 0)]
    discard_lines: usize,
    /// Also append every raw line to this file as it arrives.
    #[arg(long, value_name = "PATH")]
    raw_log: Option<PathBuf>,
    /// Read the lines of an earlier raw log instead of the serial port.
    #[arg(long, value_name = "PATH", conflicts_with = "raw_log")]
    replay: Option<PathBuf>,
    /// Only save; do not plot afterwards.
    #[arg(long)]
    no_plot: bool,
    /// Write the plot to a PNG file instead of opening a window.
    #[arg(long, value_name = "PATH", conflicts_with = "no_plot")]
    png: Option<PathBuf>,
}
#[derive(Args, Debug)]
struct PlotArgs {
    /// Path to the input file.
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_DATA_FILE)]
    input: PathBuf,
    /// Offset subtracted from every voltage.
    #[arg(short, long, value_name = "VOLTS", default_value_t = 0.0, allow_negative_numbers = true)]
    offset: f64,
    /// Measurement to plot; values below 1 plot all of them.
    #[arg(short, long, value_name = "N", default_value_t = 0, allow_negative_numbers = true)]
    measurement: i64,
    /// Write the plot to a PNG file instead of opening a window.
    #[arg(long, value_name = "PATH")]
    png: Option<PathBuf>,
}
fn capture(args: CaptureArgs) -> Result<()> {
    let warmup = Duration::try_from_secs_f64(args.warmup_secs)
        .with_context(|| format!("invalid warm-up of {} seconds", args.warmup_secs))?;
    let config = CaptureConfig {
        port: args.port,
        baud_rate: args.baud_rate,
        warmup,
        discard_leading_lines: args.discard_lines,
        raw_log: args.raw_log,
        ..CaptureConfig::default()
    };
    let stop = Arc::new(AtomicBool::new(false));
    let handle = Arc::clone(&stop);
    ctrlc::set_handler(move || handle.store(true, Ordering::SeqCst))
        .context("failed to install Ctrl+C handler")?;
    let plot_config = PlotConfig {
        png: args.png,
        ..PlotConfig::default()
    };
    let show = (!args.no_plot).then_some(&plot_config);
    match args.replay {
        Some(raw) => app::run_replay(&raw, config, stop, &args.output, show),
        None => app::run_capture(config, stop, &args.output, show),
    }
}
fn plot(args: PlotArgs) -> Result<()> {
    let config = PlotConfig {
        voltage_offset: args.offset,
        selection: PlotSelection::from_number(args.measurement),
        png: args.png,
    };
    app::run_playback(&args.input, &config)
}
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.command {
        Command::Capture(args) => capture(args),
        Command::Plot(args) => plot(args),
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }
    #[test]
    fn plot_defaults_select_everything() {
        let cli = Cli::try_parse_from(["voltscope", "plot"]).unwrap();
        let Command::Plot(args) = cli.command else {
            panic!("expected plot subcommand");
        };
        assert_eq!(args.input, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(args.offset, 0.0);
        assert_eq!(PlotSelection::from_number(args.measurement), PlotSelection::All);
    }
    #[test]
    fn plot_accepts_negative_offset() {
        let cli = Cli::try_parse_from(["voltscope", "plot", "-o", "-0.5", "-m", "3"]).unwrap();
        let Command::Plot(args) = cli.command else {
            panic!("expected plot subcommand");
        };
        assert_eq!(args.offset, -0.5);
        assert_eq!(args.measurement, 3);
    }
    #[test]
    fn capture_defaults_follow_config() {
        let cli = Cli::try_parse_from(["voltscope", "capture", "--discard-lines", "2"]).unwrap();
        let Command::Capture(args) = cli.command else {
            panic!("expected capture subcommand");
        };
        assert_eq!(args.port, DEFAULT_PORT);
        assert_eq!(args.output, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(args.discard_lines, 2);
        assert_eq!(args.baud_rate, CaptureConfig::default().baud_rate);
        assert!(!args.no_plot);
        assert!(args.replay.is_none());
    }
    #[test]
    fn png_needs_plotting_enabled() {
        let result =
            Cli::try_parse_from(["voltscope", "capture", "--no-plot", "--png", "x.png"]);
        assert!(result.is_err());
        let cli = Cli::try_parse_from(["voltscope", "capture", "--png", "x.png"]).unwrap();
        let Command::Capture(args) = cli.command else {
            panic!("expected capture subcommand");
        };
        assert_eq!(args.png, Some(PathBuf::from("x.png")));
    }
    #[test]
    fn replay_and_raw_log_conflict() {
        let result = Cli::try_parse_from([
            "voltscope", "capture", "--replay", "a.txt", "--raw-log", "b.txt",
        ]);
        assert!(result.is_err());
    }
}
