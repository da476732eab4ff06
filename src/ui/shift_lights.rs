use eframe::egui::{self, Sense, pos2, vec2};
use trace_oxide::Led;
use trace_oxide::constants::layout::{LED_RADIUS, LED_SPACING, SHIFT_LIGHT_HEIGHT};

use crate::app::DriverDisplay;

/// Render the LED banks: side banks stacked, top row bent into an arc
pub fn render_shift_lights(app: &DriverDisplay, ui: &mut egui::Ui) {
    profiling::scope!("render_shift_lights");

    let panel = &app.shift_lights;
    let (rect, _response) = ui.allocate_exact_size(
        vec2(ui.available_width(), SHIFT_LIGHT_HEIGHT),
        Sense::hover(),
    );
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 4.0, egui::Color32::from_rgb(10, 10, 10));

    let centre_y = rect.center().y;
    let top_width = panel.top.len() as f32 * LED_SPACING;
    let top_left = rect.center().x - top_width / 2.0 + LED_SPACING / 2.0;

    let draw = |led: &Led, x: f32, y: f32| {
        painter.circle_filled(pos2(x, y), LED_RADIUS, led.color());
    };

    for (i, led) in panel.top.iter().enumerate() {
        draw(led, top_left + i as f32 * LED_SPACING, centre_y + led.shift_y());
    }

    let bank_top = centre_y - LED_SPACING;
    let left_x = top_left - 2.0 * LED_SPACING;
    let right_x = top_left + top_width + LED_SPACING;
    for (i, led) in panel.left.iter().enumerate() {
        draw(led, left_x, bank_top + i as f32 * LED_SPACING);
    }
    for (i, led) in panel.right.iter().enumerate() {
        draw(led, right_x, bank_top + i as f32 * LED_SPACING);
    }

    if app.shift_value.is_none() {
        painter.text(
            rect.right_top() + vec2(-6.0, 6.0),
            egui::Align2::RIGHT_TOP,
            "no data",
            egui::FontId::proportional(11.0),
            egui::Color32::GRAY,
        );
    }
}
