use eframe::egui;

use crate::app::DriverDisplay;

/// Render tracker counters and the last status message
pub fn render_status_bar(app: &DriverDisplay, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        let data = app.data_requests.stats();
        let redraw = app.redraw_trace.stats();
        ui.label(format!(
            "Data: {} sent / {} coalesced",
            data.dispatched, data.coalesced
        ))
        .on_hover_text(format!(
            "Throttled every {} ms; {} aborted",
            app.data_requests.interval().as_millis(),
            data.aborted
        ));

        ui.separator();
        ui.label(format!("Redraws: {} / {} skipped", redraw.dispatched, redraw.coalesced));

        ui.separator();
        ui.label(format!(
            "Samples: {}",
            app.sample_requests.stats().dispatched
        ));

        if let Some(trace) = &app.trace {
            ui.separator();
            ui.label(format!(
                "{} points → {} segments",
                trace.point_count(),
                trace.segments().len()
            ));
        }

        if let Some(cursor) = &app.cursor {
            ui.separator();
            ui.label(format!("Cursor {:.3} s", cursor.position() as f64 / 1e9));
        }

        if let Some(status) = &app.status {
            ui.separator();
            ui.label(status);
        }
    });
}
