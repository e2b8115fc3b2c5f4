// src/drivers/mod.rs
pub mod error;
pub mod frame;
pub mod parser;
pub mod pipeline;
pub mod plot;
pub mod render;
pub mod source;
pub mod store;
pub use error::MeasureError;
pub use pipeline::SerialCapture;
pub use plot::{PlotStyle, PngSink};
pub use render::{PlotRenderer, PlotSink};
pub use source::{LineSource, ManualSource};
