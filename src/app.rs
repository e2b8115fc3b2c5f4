// src/app.rs
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use anyhow::{Context, Result};
use log::{info, warn};
use crate::config::{CaptureConfig, PlotConfig, PlotSelection};
use crate::drivers::{
    store, LineSource, ManualSource, MeasureError, PlotRenderer, PlotSink, PlotStyle, PngSink,
    SerialCapture,
};
use crate::types::MeasurementSet;
use crate::visualizer::WindowSink;

/// Reads the device until `stop` is raised, saves the result to `output`
/// and, when `plot` is given, shows every measurement.
pub fn run_capture(
    config: CaptureConfig,
    stop: Arc<AtomicBool>,
    output: &Path,
    plot: Option<&PlotConfig>,
) -> Result<()> {
    let port = config.port.clone();
    let capture = SerialCapture::open(config, stop)
        .with_context(|| format!("cannot start capture on {port}"))?;
    finish_capture(capture, output, plot)
}

/// Same as [`run_capture`] but reads the lines of a raw journal written by an
/// earlier session instead of the serial port.
pub fn run_replay(
    raw_log: &Path,
    config: CaptureConfig,
    stop: Arc<AtomicBool>,
    output: &Path,
    plot: Option<&PlotConfig>,
) -> Result<()> {
    let text = fs::read_to_string(raw_log)
        .with_context(|| format!("cannot read raw journal {}", raw_log.display()))?;
    info!("replaying {}", raw_log.display());
    let source = ManualSource::new(text.split_inclusive('\n'));
    let config = CaptureConfig {
        warmup: Duration::ZERO,
        raw_log: None,
        ..config
    };
    let capture = SerialCapture::new(source, config, stop)?;
    finish_capture(capture, output, plot)
}

fn finish_capture<S: LineSource>(
    mut capture: SerialCapture<S>,
    output: &Path,
    plot: Option<&PlotConfig>,
) -> Result<()> {
    let set = match capture.run() {
        Ok(set) => set,
        Err(MeasureError::Interrupted) => {
            warn!(
                "interrupted before any data was read; {} left untouched",
                output.display()
            );
            return Ok(());
        }
        Err(err) => return Err(err).context("capture aborted"),
    };
    store::save(&set, output)
        .with_context(|| format!("failed to save measurements to {}", output.display()))?;
    let Some(plot) = plot else {
        return Ok(());
    };
    if set.is_empty() {
        warn!("no measurements captured; nothing to plot");
        return Ok(());
    }
    let all = PlotConfig {
        selection: PlotSelection::All,
        ..plot.clone()
    };
    show(&set, &all).context("failed to plot measurements")
}

/// Loads `input` and plots it. Selecting a measurement that does not exist
/// is a user mistake: the message is printed and nothing is drawn.
pub fn run_playback(input: &Path, plot: &PlotConfig) -> Result<()> {
    let set = store::load(input)?;
    match show(&set, plot) {
        Ok(()) => Ok(()),
        Err(err) => match selection_message(&err, input) {
            Some(message) => {
                println!("{message}");
                Ok(())
            }
            None => Err(err).context("failed to plot measurements"),
        },
    }
}

fn show(set: &MeasurementSet, plot: &PlotConfig) -> Result<(), MeasureError> {
    match &plot.png {
        Some(path) => render_with(PngSink::new(path.clone(), PlotStyle::default()), set, plot),
        None => render_with(WindowSink, set, plot),
    }
}

fn render_with<K: PlotSink>(
    sink: K,
    set: &MeasurementSet,
    plot: &PlotConfig,
) -> Result<(), MeasureError> {
    PlotRenderer::new(sink).render(set, plot.selection, plot.voltage_offset)
}

/// Text shown instead of a plot when the selection cannot be satisfied.
pub fn selection_message(err: &MeasureError, input: &Path) -> Option<String> {
    match err {
        MeasureError::IndexOutOfRange {
            requested,
            available,
        } => Some(format!(
            "Measurement {requested} not found: measurement {available} is the last entry in {}",
            input.display()
        )),
        MeasureError::EmptySet => Some(format!("No measurements found in {}", input.display())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Measurement;
    use std::path::PathBuf;

    #[test]
    fn out_of_range_message_names_index_count_and_file() {
        let err = MeasureError::IndexOutOfRange {
            requested: 5,
            available: 2,
        };
        let message = selection_message(&err, Path::new("output-files/output.json")).unwrap();
        assert_eq!(
            message,
            "Measurement 5 not found: measurement 2 is the last entry in output-files/output.json"
        );
        assert!(selection_message(&MeasureError::Plot("x".into()), Path::new("a")).is_none());
    }

    #[test]
    fn playback_out_of_range_prints_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("output.json");
        let set: MeasurementSet = [
            Measurement::new(0, 10, vec![1.0, 2.0]),
            Measurement::new(10, 20, vec![3.0, 4.0]),
        ]
        .into_iter()
        .collect();
        store::save(&set, &input).unwrap();
        let png: PathBuf = dir.path().join("plot.png");
        let plot = PlotConfig {
            voltage_offset: 0.0,
            selection: PlotSelection::One(5),
            png: Some(png.clone()),
        };
        run_playback(&input, &plot).unwrap();
        assert!(!png.exists());
    }

    #[test]
    fn replay_turns_journal_into_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw.txt");
        fs::write(&raw, "noise\r\n1000,2000,1.0,2.0\r\n3000,3100,4.5\r\n").unwrap();
        let output = dir.path().join("out").join("output.json");
        let config = CaptureConfig {
            discard_leading_lines: 1,
            ..CaptureConfig::default()
        };
        run_replay(&raw, config, Arc::new(AtomicBool::new(false)), &output, None).unwrap();
        let set = store::load(&output).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(1).unwrap(), &Measurement::new(1000, 2000, vec![1.0, 2.0]));
        assert_eq!(set.get(2).unwrap().voltages, vec![4.5]);
    }

    #[test]
    fn interrupted_capture_keeps_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw.txt");
        fs::write(&raw, "0,10,1.0\r\n").unwrap();
        let output = dir.path().join("output.json");
        fs::write(&output, "previous").unwrap();
        run_replay(
            &raw,
            CaptureConfig::default(),
            Arc::new(AtomicBool::new(true)),
            &output,
            None,
        )
        .unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
    }

    #[test]
    fn playback_of_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_playback(&dir.path().join("absent.json"), &PlotConfig::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MeasureError>(),
            Some(MeasureError::FileFormat { .. })
        ));
    }
}
