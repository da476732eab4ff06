use eframe::egui::{ComboBox, DragValue, Slider};
use trace_oxide::constants::request::{MAX_SAMPLE_COUNT, MIN_SAMPLE_COUNT};

use crate::app::DriverDisplay;
use crate::session::{LAP_NANOS, ParameterId};

const LAP_SECONDS: f64 = LAP_NANOS as f64 / 1e9;

/// Shortest window the timeline can be zoomed to, in seconds
const MIN_WINDOW_S: f64 = 0.05;

/// Render the parameter picker and the timeline controls
pub fn render_controls(app: &mut DriverDisplay, ui: &mut eframe::egui::Ui) {
    let mut timeline_changed = false;
    let mut cursor_changed = false;

    ui.horizontal(|ui| {
        let mut selected = app.parameter;
        ComboBox::from_label("Parameter")
            .selected_text(selected.name())
            .show_ui(ui, |ui| {
                for parameter in ParameterId::TRACEABLE {
                    ui.selectable_value(&mut selected, parameter, parameter.name());
                }
            });
        app.select_parameter(selected);

        ui.separator();

        ui.label("Samples:");
        timeline_changed |= ui
            .add(
                DragValue::new(&mut app.sample_count)
                    .range(MIN_SAMPLE_COUNT..=MAX_SAMPLE_COUNT)
                    .speed(10.0),
            )
            .on_hover_text("Min/max buckets requested per trace")
            .changed();

        if ui.button("💾 Save settings").clicked() {
            app.save_config();
        }
    });

    ui.horizontal(|ui| {
        ui.label("Window start (s):");
        timeline_changed |= ui
            .add(Slider::new(&mut app.window_start_s, -5.0..=LAP_SECONDS))
            .changed();

        ui.label("Length (s):");
        timeline_changed |= ui
            .add(Slider::new(&mut app.window_length_s, MIN_WINDOW_S..=LAP_SECONDS + 10.0).logarithmic(true))
            .changed();
    });

    ui.horizontal(|ui| {
        ui.label("Cursor (s):");
        cursor_changed |= ui
            .add(Slider::new(&mut app.cursor_s, 0.0..=LAP_SECONDS))
            .changed();
    });

    if timeline_changed {
        app.make_timeline_request();
        // The cursor line is positioned against the timebase
        cursor_changed = true;
    }
    if cursor_changed {
        app.make_cursor_request();
    }
}
