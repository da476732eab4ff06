//! Trace geometry for min/max sampled parameters
//!
//! A [`Trace`] is built once from a sampled series and then projected into
//! window coordinates for any target size. Plateaus become single
//! horizontal lines, ranges become vertical spans, holes stay empty.

mod compactor;
mod sample;
mod segment;

pub use compactor::{almost_equal, compact};
pub use sample::{ParameterValues, Sample, SampleStatus};
pub use segment::{Segment, TracePoint};

use crate::constants::numeric::POINT_TOLERANCE;
use egui::{Color32, Pos2, Vec2, pos2};

/// Compacted, immutable trace of one parameter over one timebase
#[derive(Debug, Clone)]
pub struct Trace {
    segments: Vec<Segment>,
    point_count: usize,
    display_min: f64,
    display_range: f64,
    color: Color32,
}

impl Trace {
    /// Build a trace; `display_min`/`display_max` may be given in either order
    pub fn new<I>(samples: I, display_min: f64, display_max: f64, color: Color32) -> Self
    where
        I: IntoIterator<Item = Sample>,
    {
        Self::with_tolerance(samples, display_min, display_max, color, POINT_TOLERANCE)
    }

    pub fn from_values(
        values: &ParameterValues,
        display_min: f64,
        display_max: f64,
        color: Color32,
    ) -> Self {
        Self::new(values.samples(), display_min, display_max, color)
    }

    /// Build a trace with a custom point-detection tolerance
    pub fn with_tolerance<I>(
        samples: I,
        display_min: f64,
        display_max: f64,
        color: Color32,
        tolerance: f64,
    ) -> Self
    where
        I: IntoIterator<Item = Sample>,
    {
        profiling::scope!("trace_compact");

        let (segments, point_count) = compact(samples, tolerance);
        let (display_min, display_range) = if display_min.is_finite() && display_max.is_finite() {
            let low = display_min.min(display_max);
            (low, display_min.max(display_max) - low)
        } else {
            log::warn!(
                "Non-finite display range [{}, {}]; trace will be drawn flat",
                display_min,
                display_max
            );
            (0.0, 0.0)
        };

        Self {
            segments,
            point_count,
            display_min,
            display_range,
            color,
        }
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    pub fn trace_color(&self) -> Color32 {
        self.color
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn display_min(&self) -> f64 {
        self.display_min
    }

    pub fn display_range(&self) -> f64 {
        self.display_range
    }

    /// Project every segment into a window of size `extents`.
    ///
    /// Y is inverted: larger values are drawn nearer the top.
    pub fn get_lines(&self, extents: Vec2) -> Vec<(Pos2, Pos2)> {
        profiling::scope!("trace_get_lines");

        let width = finite_or_zero(extents.x as f64);
        let height = finite_or_zero(extents.y as f64);

        self.segments
            .iter()
            .map(|segment| {
                let (start, end) = (segment.start(), segment.end());
                (self.to_window(start, width, height), self.to_window(end, width, height))
            })
            .collect()
    }

    /// Line width that gives each sample slot one column of the window
    pub fn line_width(&self, extents: Vec2) -> f32 {
        if self.point_count == 0 || !extents.x.is_finite() {
            return 1.0;
        }
        (extents.x / self.point_count as f32).max(1.0)
    }

    /// Inverse of [`get_lines`](Self::get_lines): window position back to
    /// (fractional sample index, value)
    pub fn window_to_sample(&self, position: Pos2, extents: Vec2) -> (f64, f64) {
        let width = finite_or_zero(extents.x as f64);
        let height = finite_or_zero(extents.y as f64);

        let index = if width > 0.0 {
            position.x as f64 / width * self.point_count as f64
        } else {
            0.0
        };
        let value = if height > 0.0 {
            self.display_min + (height - position.y as f64) / height * self.display_range
        } else {
            self.display_min
        };
        (finite_or_zero(index), finite_or_zero(value))
    }

    fn to_window(&self, point: TracePoint, width: f64, height: f64) -> Pos2 {
        pos2(
            to_coordinate(self.window_x(point.x, width)),
            to_coordinate(self.window_y(point.y, height)),
        )
    }

    fn window_x(&self, x: usize, width: f64) -> f64 {
        if self.point_count == 0 {
            return 0.0;
        }
        x as f64 / self.point_count as f64 * width
    }

    fn window_y(&self, y: f64, height: f64) -> f64 {
        let ratio = if self.display_range > 0.0 {
            finite_or_zero((y - self.display_min) / self.display_range)
        } else {
            0.0
        };
        height - ratio * height
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn to_coordinate(value: f64) -> f32 {
    finite_or_zero(value).clamp(f32::MIN as f64, f32::MAX as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;

    fn assert_finite(lines: &[(Pos2, Pos2)]) {
        for (a, b) in lines {
            assert!(a.x.is_finite() && a.y.is_finite(), "{:?}", a);
            assert!(b.x.is_finite() && b.y.is_finite(), "{:?}", b);
        }
    }

    #[test]
    fn test_accessors() {
        let trace = Trace::new(vec![Sample::point(1.0); 8], 10.0, 0.0, Color32::RED);
        assert_eq!(trace.point_count(), 8);
        assert_eq!(trace.trace_color(), Color32::RED);
        assert_eq!(trace.display_min(), 0.0);
        assert_eq!(trace.display_range(), 10.0);
        assert_eq!(trace.segments().len(), 1);
    }

    #[test]
    fn test_projection() {
        let samples = vec![Sample::point(0.0), Sample::point(0.0), Sample::range(0.0, 10.0)];
        let trace = Trace::new(samples, 0.0, 10.0, Color32::WHITE);
        let lines = trace.get_lines(vec2(300.0, 100.0));

        assert_eq!(
            lines,
            vec![
                (pos2(0.0, 100.0), pos2(200.0, 100.0)),
                (pos2(200.0, 100.0), pos2(200.0, 0.0)),
            ]
        );
    }

    #[test]
    fn test_zero_display_range_stays_finite() {
        let samples = vec![Sample::range(-5.0, 5.0), Sample::point(3.0), Sample::point(3.0)];
        let trace = Trace::new(samples, 0.0, 0.0, Color32::GREEN);
        let lines = trace.get_lines(vec2(100.0, 50.0));

        assert!(!lines.is_empty());
        assert_finite(&lines);
        assert!(lines.iter().all(|(a, b)| a.y == 50.0 && b.y == 50.0));
    }

    #[test]
    fn test_non_finite_display_bounds_stay_finite() {
        let samples = vec![Sample::range(1.0, 2.0), Sample::point(7.0)];
        let trace = Trace::new(samples, f64::NAN, f64::INFINITY, Color32::BLUE);
        assert_finite(&trace.get_lines(vec2(10.0, 10.0)));
    }

    #[test]
    fn test_all_holes_produce_nothing() {
        let trace = Trace::new(vec![Sample::hole(); 16], 0.0, 1.0, Color32::WHITE);
        assert_eq!(trace.point_count(), 16);
        assert!(trace.get_lines(vec2(100.0, 100.0)).is_empty());
    }

    #[test]
    fn test_identity_scale_round_trip() {
        let values: ParameterValues = [1.0, 1.0, 4.0, 4.0, 2.5, 2.5, 2.5]
            .iter()
            .map(|&v| Sample::point(v))
            .chain([Sample::range(0.5, 6.0), Sample::point(3.0), Sample::point(3.0)])
            .collect();
        let trace = Trace::from_values(&values, 0.0, 8.0, Color32::WHITE);
        let extents = vec2(trace.point_count() as f32, trace.display_range() as f32);

        for (segment, (start, end)) in trace.segments().iter().zip(trace.get_lines(extents)) {
            for (expected, actual) in [(segment.start(), start), (segment.end(), end)] {
                let (index, value) = trace.window_to_sample(actual, extents);
                assert!((index - expected.x as f64).abs() < 1e-4);
                assert!((value - expected.y).abs() < 1e-4);
                assert!((actual.x as f64 - expected.x as f64).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_line_width() {
        let trace = Trace::new(vec![Sample::point(1.0); 100], 0.0, 1.0, Color32::WHITE);
        assert_eq!(trace.line_width(vec2(400.0, 10.0)), 4.0);
        assert_eq!(trace.line_width(vec2(50.0, 10.0)), 1.0);
    }
}
