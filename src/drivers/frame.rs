//! Turns measurements into drawable traces on a seconds axis.
use crate::drivers::MeasureError;
use crate::types::{measurement_label, Measurement, MeasurementSet};
pub const WINDOW_TITLE: &str = "Voltage-Time Curve";
pub const X_LABEL: &str = "Time in s";
pub const Y_LABEL: &str = "Voltage in V";
/// Light grey used for grid lines in every sink.
pub const GRID_RGB: [u8; 3] = [0xBB, 0xBB, 0xBB];
/// One line of the figure, points are `[seconds, volts]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Trace {
    pub label: String,
    pub points: Vec<[f64; 2]>,
}
/// Everything a sink needs to draw one figure.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotFrame {
    pub title: String,
    pub traces: Vec<Trace>,
}
impl PlotFrame {
    /// `(min, max)` over every point, `None` when there are no points.
    pub fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        let mut points = self.traces.iter().flat_map(|t| t.points.iter());
        let first = *points.next()?;
        let init = ([first[0], first[0]], [first[1], first[1]]);
        Some(points.fold(init, |(x, y), p| {
            ([x[0].min(p[0]), x[1].max(p[0])], [y[0].min(p[1]), y[1].max(p[1])])
        }))
    }
}
/// `count` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            let mut values: Vec<f64> = (0..count).map(|i| start + i as f64 * step).collect();
            values[count - 1] = end;
            values
        }
    }
}
/// Round grid positions covering `[min, max]`, roughly `target` intervals
/// apart. Steps are 1, 2 or 5 times a power of ten.
pub fn grid_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    let span = max - min;
    if !span.is_finite() || span <= 0.0 || target == 0 {
        return vec![min];
    }
    let raw = span / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = match raw / magnitude {
        n if n <= 1.0 => 1.0,
        n if n <= 2.0 => 2.0,
        n if n <= 5.0 => 5.0,
        _ => 10.0,
    } * magnitude;
    let first = (min / step - 1e-9).ceil() as i64;
    let last = (max / step + 1e-9).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}
/// Seconds axis for a measurement, shifted so that `origin_ms` maps to zero.
pub fn time_axis(measurement: &Measurement, origin_ms: i64) -> Vec<f64> {
    let start = (measurement.start_time - origin_ms) as f64 / 1000.0;
    let end = (measurement.end_time - origin_ms) as f64 / 1000.0;
    linspace(start, end, measurement.voltages.len())
}
fn trace(label: String, measurement: &Measurement, origin_ms: i64, voltage_offset: f64) -> Trace {
    let points = time_axis(measurement, origin_ms)
        .into_iter()
        .zip(&measurement.voltages)
        .map(|(t, v)| [t, v - voltage_offset])
        .collect();
    Trace { label, points }
}
/// All measurements on one axis whose zero is the first measurement's start.
pub fn frame_all(set: &MeasurementSet, voltage_offset: f64) -> Result<PlotFrame, MeasureError> {
    let origin = set.first().ok_or(MeasureError::EmptySet)?.start_time;
    let traces = set
        .iter()
        .map(|(label, m)| trace(label, m, origin, voltage_offset))
        .collect();
    Ok(PlotFrame {
        title: WINDOW_TITLE.to_owned(),
        traces,
    })
}
/// The `number`th (1-based) measurement on its own axis, starting at zero.
pub fn frame_one(
    set: &MeasurementSet,
    number: usize,
    voltage_offset: f64,
) -> Result<PlotFrame, MeasureError> {
    let measurement = set.get(number).ok_or(MeasureError::IndexOutOfRange {
        requested: number,
        available: set.len(),
    })?;
    Ok(PlotFrame {
        title: WINDOW_TITLE.to_owned(),
        traces: vec![trace(
            measurement_label(number),
            measurement,
            measurement.start_time,
            voltage_offset,
        )],
    })
}
