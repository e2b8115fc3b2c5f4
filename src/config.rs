use std::path::PathBuf;
use std::time::Duration;

/// Serial device most boards enumerate as on this platform.
#[cfg(target_os = "windows")]
pub const DEFAULT_PORT: &str = "COM3";
#[cfg(target_os = "macos")]
pub const DEFAULT_PORT: &str = "/dev/cu.usbmodem14101";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const DEFAULT_PORT: &str = "/dev/ttyACM0";

pub const DEFAULT_DATA_FILE: &str = "output-files/output.json";
/// Matches `Serial.begin(9600)` in the board firmware.
pub const DEFAULT_BAUD_RATE: u32 = 9600;
pub const DEFAULT_WARMUP_SECS: f64 = 4.0;

/// Settings handed to the capture loop when it is built.
#[derive(Clone, Debug)]
pub struct CaptureConfig {
    pub port: String,
    pub baud_rate: u32,
    /// Pause after opening the port; opening resets the board and the first
    /// output is noise.
    pub warmup: Duration,
    /// Lines dropped from the front of the capture.
    pub discard_leading_lines: usize,
    /// Upper bound on how long a read blocks before the stop flag is checked.
    pub read_timeout: Duration,
    /// Optional journal that receives every raw line as soon as it is read.
    pub raw_log: Option<PathBuf>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_owned(),
            baud_rate: DEFAULT_BAUD_RATE,
            warmup: Duration::from_secs_f64(DEFAULT_WARMUP_SECS),
            discard_leading_lines: 0,
            read_timeout: Duration::from_millis(100),
            raw_log: None,
        }
    }
}

/// Which measurements a plot shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlotSelection {
    #[default]
    All,
    /// 1-based position in the set.
    One(usize),
}

impl PlotSelection {
    /// Numbers below 1 select every measurement.
    pub fn from_number(number: i64) -> Self {
        if number < 1 {
            PlotSelection::All
        } else {
            PlotSelection::One(number as usize)
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PlotConfig {
    /// Subtracted from every sample before drawing.
    pub voltage_offset: f64,
    pub selection: PlotSelection,
    /// Render to this PNG file instead of opening a window.
    pub png: Option<PathBuf>,
}
