// src/types.rs

/// Key prefix used for every entry of a [`MeasurementSet`].
pub const LABEL_PREFIX: &str = "measurement";

/// Sequential label for the 1-based position `number`.
pub fn measurement_label(number: usize) -> String {
    format!("{LABEL_PREFIX} {number}")
}

/// One captured voltage burst.
#[derive(Clone, Debug, PartialEq)]
pub struct Measurement {
    /// Milliseconds since device boot or session start.
    pub start_time: i64,
    pub end_time: i64,
    /// Samples evenly spaced across `[start_time, end_time]`.
    pub voltages: Vec<f64>,
}

impl Measurement {
    pub fn new(start_time: i64, end_time: i64, voltages: Vec<f64>) -> Self {
        Self {
            start_time,
            end_time,
            voltages,
        }
    }

    pub fn duration_ms(&self) -> i64 {
        self.end_time - self.start_time
    }

    /// Spacing between two samples in milliseconds, `None` for a single sample.
    pub fn sample_interval_ms(&self) -> Option<f64> {
        if self.voltages.len() > 1 {
            Some(self.duration_ms() as f64 / (self.voltages.len() - 1) as f64)
        } else {
            None
        }
    }
}

/// Measurements in capture order. Labels are derived from the position, so
/// the set never holds gaps or duplicates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeasurementSet {
    entries: Vec<Measurement>,
}

impl MeasurementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends and returns the label the measurement was stored under.
    pub fn push(&mut self, measurement: Measurement) -> String {
        self.entries.push(measurement);
        measurement_label(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a measurement by its 1-based position.
    pub fn get(&self, number: usize) -> Option<&Measurement> {
        number.checked_sub(1).and_then(|idx| self.entries.get(idx))
    }

    pub fn first(&self) -> Option<&Measurement> {
        self.entries.first()
    }

    /// Iterates `(label, measurement)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (String, &Measurement)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, m)| (measurement_label(idx + 1), m))
    }
}

impl FromIterator<Measurement> for MeasurementSet {
    fn from_iter<I: IntoIterator<Item = Measurement>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
