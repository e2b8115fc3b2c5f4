use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum MeasureError {
    #[error("line {line_number}: invalid {field} ({reason}) in {line:?}")]
    Parse {
        line_number: usize,
        line: String,
        field: String,
        reason: String,
    },
    #[error("line {line_number}: insufficient data, expected at least 3 fields but found {found} in {line:?}")]
    InsufficientFields {
        line_number: usize,
        line: String,
        found: usize,
    },
    #[error("cannot read measurements from {path}: {reason}")]
    FileFormat { path: PathBuf, reason: String },
    #[error("{path}: {label} has an invalid `{field}` field: {reason}")]
    Schema {
        path: PathBuf,
        label: String,
        field: String,
        reason: String,
    },
    #[error("measurement {requested} requested but only {available} available")]
    IndexOutOfRange { requested: usize, available: usize },
    #[error("capture interrupted before the first read")]
    Interrupted,
    #[error("measurement set is empty; nothing to plot")]
    EmptySet,
    #[error("serial transport failed: {0}")]
    Transport(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for MeasureError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        MeasureError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for MeasureError {
    fn from(value: image::ImageError) -> Self {
        MeasureError::Plot(value.to_string())
    }
}
impl From<serialport::Error> for MeasureError {
    fn from(value: serialport::Error) -> Self {
        MeasureError::Transport(value.to_string())
    }
}
