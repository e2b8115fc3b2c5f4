use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use log::info;
use plotters::prelude::LineSeries;
use plotters::prelude::*;
use crate::drivers::error::MeasureError;
use crate::drivers::frame::{PlotFrame, GRID_RGB, X_LABEL, Y_LABEL};
use crate::drivers::render::PlotSink;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub foreground: RGBColor,
    pub grid: RGBColor,
    pub palette: Vec<RGBColor>,
    /// Caption, axis labels and legend. Needs a system font.
    pub annotate: bool,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
            background: WHITE,
            foreground: BLACK,
            grid: RGBColor(GRID_RGB[0], GRID_RGB[1], GRID_RGB[2]),
            palette: vec![BLUE, RED, GREEN, CYAN, MAGENTA, RGBColor(255, 140, 0), BLACK],
            annotate: true,
        }
    }
}
pub fn render_frame_png(frame: &PlotFrame, style: &PlotStyle) -> Result<Vec<u8>, MeasureError> {
    let (x_bounds, y_bounds) = frame
        .bounds()
        .ok_or_else(|| MeasureError::Plot("plot frame has no samples".into()))?;
    let x_bounds = padded(x_bounds, 0.5);
    let y_bounds = padded(y_bounds, 0.5);
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let mut builder = ChartBuilder::on(&root);
        builder.margin(10);
        if style.annotate {
            builder
                .caption(
                    &frame.title,
                    ("sans-serif", 20).into_font().color(&style.foreground),
                )
                .set_label_area_size(LabelAreaPosition::Left, 55)
                .set_label_area_size(LabelAreaPosition::Bottom, 45);
        }
        let mut chart =
            builder.build_cartesian_2d(x_bounds[0]..x_bounds[1], y_bounds[0]..y_bounds[1])?;
        if style.annotate {
            chart
                .configure_mesh()
                .x_desc(X_LABEL)
                .y_desc(Y_LABEL)
                .light_line_style(&style.grid.mix(0.3))
                .bold_line_style(&style.grid.mix(0.8))
                .draw()?;
        }
        for (idx, trace) in frame.traces.iter().enumerate() {
            let color = style.palette[idx % style.palette.len()];
            let series = trace.points.iter().map(|p| (p[0], p[1]));
            let anno = chart.draw_series(LineSeries::new(series, &color))?;
            if style.annotate {
                anno.label(trace.label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
            }
        }
        if style.annotate {
            chart
                .configure_series_labels()
                .border_style(&style.grid)
                .background_style(&style.background)
                .label_font(("sans-serif", 14).into_font().color(&style.foreground))
                .draw()?;
        }
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
// Widens a zero-length range so the chart has something to span.
fn padded(range: [f64; 2], pad: f64) -> [f64; 2] {
    if (range[1] - range[0]).abs() < f64::EPSILON {
        [range[0] - pad, range[1] + pad]
    } else {
        range
    }
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, MeasureError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| MeasureError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
/// Writes each figure to a PNG file instead of opening a window.
pub struct PngSink {
    path: PathBuf,
    style: PlotStyle,
}
impl PngSink {
    pub fn new(path: PathBuf, style: PlotStyle) -> Self {
        Self { path, style }
    }
}
impl PlotSink for PngSink {
    fn show(&mut self, frame: &PlotFrame) -> Result<(), MeasureError> {
        let png = render_frame_png(frame, &self.style)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, png)?;
        info!("plot written to {}", self.path.display());
        Ok(())
    }
}
