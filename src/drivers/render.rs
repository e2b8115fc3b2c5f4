use log::info;
use crate::config::PlotSelection;
use crate::drivers::frame::{self, PlotFrame};
use crate::drivers::MeasureError;
use crate::types::MeasurementSet;
/// Something that can put a finished figure in front of the user.
pub trait PlotSink {
    /// May block until the user dismisses the figure.
    fn show(&mut self, frame: &PlotFrame) -> Result<(), MeasureError>;
}
/// Builds figures from a measurement set and hands them to a sink.
pub struct PlotRenderer<K: PlotSink> {
    sink: K,
}
impl<K: PlotSink> PlotRenderer<K> {
    pub fn new(sink: K) -> Self {
        Self { sink }
    }
    pub fn render_all(
        &mut self,
        set: &MeasurementSet,
        voltage_offset: f64,
    ) -> Result<(), MeasureError> {
        let frame = frame::frame_all(set, voltage_offset)?;
        info!("plotting {} measurement(s)", frame.traces.len());
        self.sink.show(&frame)
    }
    /// Nothing reaches the sink when `number` is outside the set.
    pub fn render_one(
        &mut self,
        set: &MeasurementSet,
        number: usize,
        voltage_offset: f64,
    ) -> Result<(), MeasureError> {
        let frame = frame::frame_one(set, number, voltage_offset)?;
        info!("plotting measurement {number}");
        self.sink.show(&frame)
    }
    pub fn render(
        &mut self,
        set: &MeasurementSet,
        selection: PlotSelection,
        voltage_offset: f64,
    ) -> Result<(), MeasureError> {
        match selection {
            PlotSelection::All => self.render_all(set, voltage_offset),
            PlotSelection::One(number) => self.render_one(set, number, voltage_offset),
        }
    }
}
impl<K: PlotSink + ?Sized> PlotSink for &mut K {
    fn show(&mut self, frame: &PlotFrame) -> Result<(), MeasureError> {
        (**self).show(frame)
    }
}
