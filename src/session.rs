//! Simulated session for the viewer
//!
//! Plays the host's role: answers data and sample requests from a worker
//! thread with synthetic lap telemetry, so the throttled request pipeline
//! sees realistic latency.

use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use egui::Color32;
use trace_oxide::{ParameterValues, Sample, SampleStatus, TimeRange};

/// Length of the simulated lap
pub const LAP_NANOS: i64 = 90_000_000_000;

/// Logging period of the simulated data
const SAMPLE_PERIOD_NANOS: i64 = 10_000_000;

/// Stretch of the lap where the logger dropped out
const GAP: (i64, i64) = (40_000_000_000, 43_000_000_000);

/// Simulated host response time
const LATENCY: Duration = Duration::from_millis(15);

/// Sub-samples taken per bucket when computing min/max
const SUBSAMPLES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterId {
    Speed,
    EngineSpeed,
    Gear,
    Throttle,
    ShiftLights,
}

impl ParameterId {
    /// Parameters that can be drawn as a trace
    pub const TRACEABLE: [ParameterId; 4] = [
        ParameterId::Speed,
        ParameterId::EngineSpeed,
        ParameterId::Gear,
        ParameterId::Throttle,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ParameterId::Speed => "vCar",
            ParameterId::EngineSpeed => "nEngine",
            ParameterId::Gear => "NGear",
            ParameterId::Throttle => "rThrottle",
            ParameterId::ShiftLights => "ShiftLights",
        }
    }

    /// Display minimum and maximum
    pub fn display_range(&self) -> (f64, f64) {
        match self {
            ParameterId::Speed => (0.0, 350.0),
            ParameterId::EngineSpeed => (0.0, 13_000.0),
            ParameterId::Gear => (0.0, 8.0),
            ParameterId::Throttle => (0.0, 100.0),
            ParameterId::ShiftLights => (0.0, u32::MAX as f64),
        }
    }

    pub fn color(&self) -> Color32 {
        match self {
            ParameterId::Speed => Color32::from_rgb(31, 119, 180),
            ParameterId::EngineSpeed => Color32::from_rgb(255, 127, 14),
            ParameterId::Gear => Color32::from_rgb(44, 160, 44),
            ParameterId::Throttle => Color32::from_rgb(214, 39, 40),
            ParameterId::ShiftLights => Color32::WHITE,
        }
    }

    /// Synthetic value at `t` nanoseconds into the lap
    fn value_at(&self, t: i64) -> f64 {
        let s = t as f64 / 1e9;
        match self {
            ParameterId::Speed => 180.0 + 120.0 * (s / 7.0).sin() + 20.0 * (s * 1.3).sin(),
            ParameterId::EngineSpeed => 9_000.0 + 3_500.0 * (s * 0.9).sin(),
            ParameterId::Gear => ((s * 0.35).sin() * 3.5 + 4.5).round().clamp(1.0, 8.0),
            ParameterId::Throttle => {
                // Mostly flat out or lifted, with short transitions
                let phase = (s * 0.5).sin();
                if phase > 0.3 {
                    100.0
                } else if phase < -0.3 {
                    0.0
                } else {
                    (phase + 0.3) / 0.6 * 100.0
                }
            }
            ParameterId::ShiftLights => shift_light_word(ParameterId::EngineSpeed.value_at(t)) as f64,
        }
    }
}

/// Light the top row from the left as engine speed climbs; the side banks
/// flash blue at the limiter
fn shift_light_word(engine_speed: f64) -> u32 {
    let lit = (((engine_speed - 9_000.0) / 3_000.0) * 15.0).clamp(0.0, 15.0) as u32;
    let mut word = 0u32;
    for i in 0..lit {
        word |= 1 << (14 - i);
    }
    if lit == 15 {
        word |= 1 << 15 | 1 << 16;
    }
    word
}

fn in_gap(t: i64) -> bool {
    (GAP.0..GAP.1).contains(&t)
}

/// Data request for one parameter over one timebase
#[derive(Debug, Clone, PartialEq)]
pub struct DataRequest {
    pub parameter: ParameterId,
    pub timebase: TimeRange,
    pub sample_count: usize,
}

/// Sample request: the last value at or before a timestamp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRequest {
    pub parameter: ParameterId,
    pub timestamp: i64,
}

pub enum SessionRequest {
    Data(DataRequest),
    Sample(SampleRequest),
    Shutdown,
}

pub enum SessionResult {
    Data {
        request: DataRequest,
        values: ParameterValues,
    },
    Sample {
        request: SampleRequest,
        value: Option<f64>,
    },
}

/// Background thread answering requests against the simulated lap
pub struct SessionWorker {
    tx: Sender<SessionRequest>,
    rx: Receiver<SessionResult>,
    handle: Option<JoinHandle<()>>,
}

impl SessionWorker {
    pub fn spawn() -> Self {
        let (req_tx, req_rx) = channel::<SessionRequest>();
        let (res_tx, res_rx) = channel::<SessionResult>();

        let handle = thread::spawn(move || {
            Self::worker_loop(req_rx, res_tx);
        });

        Self {
            tx: req_tx,
            rx: res_rx,
            handle: Some(handle),
        }
    }

    fn worker_loop(rx: Receiver<SessionRequest>, tx: Sender<SessionResult>) {
        while let Ok(request) = rx.recv() {
            thread::sleep(LATENCY);
            let result = match request {
                SessionRequest::Data(request) => {
                    let values = Self::sample_range(&request);
                    SessionResult::Data { request, values }
                }
                SessionRequest::Sample(request) => SessionResult::Sample {
                    value: Self::sample_at(&request),
                    request,
                },
                SessionRequest::Shutdown => break,
            };

            if tx.send(result).is_err() {
                break;
            }
        }
        log::debug!("Session worker stopped");
    }

    /// Min/max over `sample_count` equal buckets of the timebase
    fn sample_range(request: &DataRequest) -> ParameterValues {
        profiling::scope!("session_sample_range");

        let TimeRange { start, end } = request.timebase;
        let count = request.sample_count.max(1);
        let bucket = (end - start) as f64 / count as f64;

        (0..count)
            .map(|i| {
                let from = start + (i as f64 * bucket) as i64;
                let to = start + ((i + 1) as f64 * bucket) as i64;
                Self::bucket(request.parameter, from, to)
            })
            .collect()
    }

    fn bucket(parameter: ParameterId, from: i64, to: i64) -> Sample {
        if from < 0 || from >= LAP_NANOS || in_gap(from) {
            return Sample::hole();
        }

        // Narrower than the logging period: nothing recorded here
        if to - from < SAMPLE_PERIOD_NANOS {
            let logged = from - from.rem_euclid(SAMPLE_PERIOD_NANOS);
            let value = parameter.value_at(logged);
            let status = if logged == from {
                SampleStatus::Sample
            } else {
                SampleStatus::Interpolated
            };
            return Sample::new(status, value, value);
        }

        let step = (to - from) / SUBSAMPLES as i64;
        let (min, max) = (0..SUBSAMPLES as i64)
            .map(|k| from + k * step)
            .filter(|t| !in_gap(*t) && *t < LAP_NANOS)
            .map(|t| parameter.value_at(t))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

        // Infinite bounds (nothing sampled) are classified as a hole
        Sample::range(min, max)
    }

    fn sample_at(request: &SampleRequest) -> Option<f64> {
        let t = request.timestamp;
        if !(0..LAP_NANOS).contains(&t) || in_gap(t) {
            return None;
        }
        let logged = t - t.rem_euclid(SAMPLE_PERIOD_NANOS);
        Some(request.parameter.value_at(logged))
    }

    /// Handle that request consumers can move into tracker callbacks
    pub fn sender(&self) -> Sender<SessionRequest> {
        self.tx.clone()
    }

    /// Poll for a completed request (non-blocking)
    pub fn poll(&self) -> Option<SessionResult> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }
}

impl Drop for SessionWorker {
    fn drop(&mut self) {
        let _ = self.tx.send(SessionRequest::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
