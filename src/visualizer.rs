// src/visualizer.rs
use eframe::egui;
use egui::Color32;
use egui_plot::{HLine, Legend, Line, LineStyle, Plot, PlotPoints, VLine};
use crate::drivers::frame::{grid_ticks, PlotFrame, GRID_RGB, X_LABEL, Y_LABEL};
use crate::drivers::{MeasureError, PlotSink};

const TRACE_COLORS: [Color32; 6] = [
    Color32::from_rgb(31, 119, 180),
    Color32::from_rgb(255, 127, 14),
    Color32::from_rgb(44, 160, 44),
    Color32::from_rgb(214, 39, 40),
    Color32::from_rgb(148, 103, 189),
    Color32::from_rgb(140, 86, 75),
];
const GRID_COLOR: Color32 = Color32::from_rgb(GRID_RGB[0], GRID_RGB[1], GRID_RGB[2]);
// Roughly how many grid intervals span each axis.
const GRID_DIVISIONS: usize = 10;

/// Native window with one zoomable voltage-vs-time figure.
struct VoltageViewer {
    frame: PlotFrame,
    x_grid: Vec<f64>,
    y_grid: Vec<f64>,
}

impl VoltageViewer {
    fn new(frame: PlotFrame) -> Self {
        let (x_grid, y_grid) = match frame.bounds() {
            Some((x, y)) => (
                grid_ticks(x[0], x[1], GRID_DIVISIONS),
                grid_ticks(y[0], y[1], GRID_DIVISIONS),
            ),
            None => (Vec::new(), Vec::new()),
        };
        Self {
            frame,
            x_grid,
            y_grid,
        }
    }
}

impl eframe::App for VoltageViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            Plot::new("voltage_plot")
                .x_axis_label(X_LABEL)
                .y_axis_label(Y_LABEL)
                .legend(Legend::default())
                // Drawn below in the fixed grid colour instead.
                .show_grid(false)
                .show(ui, |plot_ui| {
                    for &x in &self.x_grid {
                        plot_ui.vline(VLine::new(x).color(GRID_COLOR).style(LineStyle::dotted_dense()));
                    }
                    for &y in &self.y_grid {
                        plot_ui.hline(HLine::new(y).color(GRID_COLOR).style(LineStyle::dotted_dense()));
                    }
                    for (i, trace) in self.frame.traces.iter().enumerate() {
                        let col = TRACE_COLORS[i % TRACE_COLORS.len()];
                        plot_ui.line(
                            Line::new(PlotPoints::new(trace.points.clone()))
                                .name(&trace.label)
                                .color(col),
                        );
                    }
                });
        });
    }
}

/// Opens a window per figure and blocks until it is closed.
#[derive(Default)]
pub struct WindowSink;

impl PlotSink for WindowSink {
    fn show(&mut self, frame: &PlotFrame) -> Result<(), MeasureError> {
        let viewport = egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 600.0])
            .with_title(frame.title.as_str());
        let options = eframe::NativeOptions {
            viewport,
            ..Default::default()
        };
        let viewer = VoltageViewer::new(frame.clone());
        eframe::run_native(
            &frame.title,
            options,
            Box::new(move |cc| {
                // White background like a printed figure, so the grey grid reads.
                cc.egui_ctx.set_visuals(egui::Visuals::light());
                Box::new(viewer)
            }),
        )
        .map_err(|err| MeasureError::Plot(err.to_string()))
    }
}
