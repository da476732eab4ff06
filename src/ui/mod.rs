mod controls;
mod shift_lights;
mod status_bar;
mod trace_view;

pub use controls::render_controls;
pub use shift_lights::render_shift_lights;
pub use status_bar::render_status_bar;
pub use trace_view::render_trace_view;
