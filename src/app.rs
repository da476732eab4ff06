//! Driver display: throttled requests in, trace/cursor/shift lights out

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use eframe::App;
use eframe::egui::{self, CentralPanel};
use trace_oxide::{Cursor, DisplayConfig, OperationTracker, ShiftLightPanel, TimeRange, Trace};

use crate::session::{
    DataRequest, LAP_NANOS, ParameterId, SampleRequest, SessionRequest, SessionResult, SessionWorker,
};
use crate::ui::{render_controls, render_shift_lights, render_status_bar, render_trace_view};

/// Value handed over by a redraw tracker, waiting for the next frame
type RedrawSlot<T> = Arc<Mutex<Option<T>>>;

const NANOS_PER_SECOND: f64 = 1e9;

/// How often the UI polls the session for results while idle
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct DriverDisplay {
    pub(crate) config: DisplayConfig,
    session: SessionWorker,

    // Timeline state, in seconds into the lap
    pub(crate) parameter: ParameterId,
    pub(crate) window_start_s: f64,
    pub(crate) window_length_s: f64,
    pub(crate) cursor_s: f64,
    pub(crate) sample_count: usize,

    pub(crate) data_requests: OperationTracker<DataRequest>,
    pub(crate) sample_requests: OperationTracker<SampleRequest>,
    pub(crate) redraw_trace: OperationTracker<Arc<Trace>>,
    pub(crate) redraw_cursor: OperationTracker<Cursor>,
    trace_slot: RedrawSlot<Arc<Trace>>,
    cursor_slot: RedrawSlot<Cursor>,
    trace_redraw_pending: bool,
    cursor_redraw_pending: bool,

    pub(crate) trace: Option<Arc<Trace>>,
    pub(crate) cursor: Option<Cursor>,
    pub(crate) shift_lights: ShiftLightPanel,
    pub(crate) shift_value: Option<f64>,
    pub(crate) status: Option<String>,
}

fn send_or_log(tx: &Sender<SessionRequest>, request: SessionRequest) {
    if tx.send(request).is_err() {
        log::warn!("Session worker is gone; request dropped");
    }
}

fn redraw_tracker<T: Clone + Send + 'static>(
    interval: Duration,
    slot: &RedrawSlot<T>,
    ctx: &egui::Context,
) -> OperationTracker<T> {
    let slot = Arc::clone(slot);
    let ctx = ctx.clone();
    OperationTracker::new(interval, move |value: T| {
        *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(value);
        ctx.request_repaint();
    })
}

fn take_slot<T>(slot: &RedrawSlot<T>) -> Option<T> {
    slot.lock().unwrap_or_else(PoisonError::into_inner).take()
}

impl DriverDisplay {
    pub fn new(cc: &eframe::CreationContext<'_>, config: DisplayConfig) -> Self {
        let session = SessionWorker::spawn();
        let interval = config.throttle_interval();

        let data_requests = {
            let tx = session.sender();
            OperationTracker::new(interval, move |request: DataRequest| {
                send_or_log(&tx, SessionRequest::Data(request));
            })
        };
        let sample_requests = {
            let tx = session.sender();
            OperationTracker::new(interval, move |request: SampleRequest| {
                send_or_log(&tx, SessionRequest::Sample(request));
            })
        };

        let trace_slot: RedrawSlot<Arc<Trace>> = Arc::default();
        let cursor_slot: RedrawSlot<Cursor> = Arc::default();
        let redraw_trace = redraw_tracker(interval, &trace_slot, &cc.egui_ctx);
        let redraw_cursor = redraw_tracker(interval, &cursor_slot, &cc.egui_ctx);

        let mut display = Self {
            sample_count: config.data_request_sample_count,
            config,
            session,
            parameter: ParameterId::Speed,
            window_start_s: 0.0,
            window_length_s: LAP_NANOS as f64 / NANOS_PER_SECOND,
            cursor_s: 10.0,
            data_requests,
            sample_requests,
            redraw_trace,
            redraw_cursor,
            trace_slot,
            cursor_slot,
            trace_redraw_pending: false,
            cursor_redraw_pending: false,
            trace: None,
            cursor: None,
            shift_lights: ShiftLightPanel::default(),
            shift_value: None,
            status: None,
        };

        display.make_timeline_request();
        display.make_cursor_request();
        display
    }

    pub(crate) fn timebase(&self) -> TimeRange {
        let start = (self.window_start_s * NANOS_PER_SECOND) as i64;
        let end = ((self.window_start_s + self.window_length_s) * NANOS_PER_SECOND) as i64;
        TimeRange::new(start, end)
    }

    fn cursor_position(&self) -> i64 {
        (self.cursor_s * NANOS_PER_SECOND) as i64
    }

    /// Ask for the traced parameter over the visible timebase
    pub(crate) fn make_timeline_request(&mut self) {
        self.data_requests.add(DataRequest {
            parameter: self.parameter,
            timebase: self.timebase(),
            sample_count: self.sample_count,
        });
    }

    /// Ask for the shift light word under the cursor and move the cursor line
    pub(crate) fn make_cursor_request(&mut self) {
        let position = self.cursor_position();
        self.sample_requests.add(SampleRequest {
            parameter: ParameterId::ShiftLights,
            timestamp: position,
        });
        self.redraw_cursor.add(Cursor::new(self.timebase(), position));
    }

    /// Switch the traced parameter; requests for the old one are dropped
    pub(crate) fn select_parameter(&mut self, parameter: ParameterId) {
        if parameter == self.parameter {
            return;
        }
        log::info!("Tracing {}", parameter.name());
        self.parameter = parameter;
        self.data_requests.abort();
        self.trace = None;
        self.make_timeline_request();
    }

    pub(crate) fn save_config(&mut self) {
        let path = std::path::Path::new(trace_oxide::constants::config::CONFIG_FILE);
        self.config.data_request_sample_count = self.sample_count;
        self.status = Some(match self.config.save(path) {
            Ok(()) => format!("Saved settings to {}", path.display()),
            Err(e) => format!("{}: {}", e.title(), e.user_message()),
        });
    }

    fn process_results(&mut self) {
        while let Some(result) = self.session.poll() {
            match result {
                SessionResult::Data { request, values } => {
                    // Results for aborted requests must not release the new one
                    if self.data_requests.current().as_ref() != Some(&request) {
                        log::debug!("Dropping stale data result for {}", request.parameter.name());
                        continue;
                    }
                    let _done = self.data_requests.completion();
                    if values.is_empty() {
                        continue;
                    }

                    let (display_min, display_max) = request.parameter.display_range();
                    let trace = Trace::with_tolerance(
                        values.samples(),
                        display_min,
                        display_max,
                        request.parameter.color(),
                        self.config.point_tolerance,
                    );
                    log::debug!(
                        "{} samples of {} compacted to {} segments",
                        trace.point_count(),
                        request.parameter.name(),
                        trace.segments().len()
                    );
                    self.redraw_trace.add(Arc::new(trace));
                }
                SessionResult::Sample { request, value } => {
                    if self.sample_requests.current() != Some(request) {
                        continue;
                    }
                    let _done = self.sample_requests.completion();
                    self.shift_value = value;
                    if let Some(value) = value {
                        self.shift_lights.update(value);
                    }
                }
            }
        }
    }

    fn take_redraws(&mut self) {
        if let Some(trace) = take_slot(&self.trace_slot) {
            self.trace = Some(trace);
            self.trace_redraw_pending = true;
        }
        if let Some(cursor) = take_slot(&self.cursor_slot) {
            self.cursor = Some(cursor);
            self.cursor_redraw_pending = true;
        }
    }

    /// Release the redraw trackers once the frame has been painted
    fn finish_redraws(&mut self) {
        if std::mem::take(&mut self.trace_redraw_pending) {
            self.redraw_trace.complete();
        }
        if std::mem::take(&mut self.cursor_redraw_pending) {
            self.redraw_cursor.complete();
        }
    }
}

impl App for DriverDisplay {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        profiling::finish_frame!();

        self.process_results();
        self.take_redraws();

        ctx.set_visuals(egui::Visuals::dark());

        CentralPanel::default().show(ctx, |ui| {
            render_controls(self, ui);
            ui.separator();
            render_shift_lights(self, ui);
            ui.separator();
            render_trace_view(self, ui);
            ui.separator();
            render_status_bar(self, ui);
        });

        self.finish_redraws();
        ctx.request_repaint_after(POLL_INTERVAL);
    }
}
