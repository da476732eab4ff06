use eframe::egui::{self, Color32, Sense, Stroke, StrokeKind};
use trace_oxide::constants::layout::CURSOR_STROKE;

use crate::app::DriverDisplay;

const BACKGROUND: Color32 = Color32::from_rgb(20, 20, 20);
const BORDER: Color32 = Color32::from_rgb(80, 80, 80);
const CURSOR_COLOR: Color32 = Color32::from_rgb(230, 230, 230);

/// Reserved below the trace for the status bar
const STATUS_BAR_HEIGHT: f32 = 24.0;

/// Render the compacted trace and the cursor line
pub fn render_trace_view(app: &mut DriverDisplay, ui: &mut egui::Ui) {
    profiling::scope!("render_trace_view");

    let size = egui::vec2(
        ui.available_width(),
        (ui.available_height() - STATUS_BAR_HEIGHT).max(100.0),
    );
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let rect = response.rect;
    let extents = rect.size();
    let origin = rect.min.to_vec2();

    painter.rect_filled(rect, 0.0, BACKGROUND);

    match &app.trace {
        Some(trace) => {
            let stroke = Stroke::new(trace.line_width(extents), trace.trace_color());
            for (start, end) in trace.get_lines(extents) {
                painter.line_segment([start + origin, end + origin], stroke);
            }

            if let Some(hover) = response.hover_pos() {
                let (index, value) = trace.window_to_sample(hover - origin, extents);
                response.on_hover_text_at_pointer(format!(
                    "{} #{:.0}: {:.2}",
                    app.parameter.name(),
                    index.floor(),
                    value
                ));
            }
        }
        None => {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Waiting for data…",
                egui::FontId::proportional(14.0),
                Color32::GRAY,
            );
        }
    }

    if let Some((top, bottom)) = app.cursor.as_ref().and_then(|c| c.cursor_line(extents)) {
        painter.line_segment([top + origin, bottom + origin], Stroke::new(CURSOR_STROKE, CURSOR_COLOR));
    }

    painter.rect_stroke(rect, 0.0, Stroke::new(1.0, BORDER), StrokeKind::Inside);
}
