//! Single-pass reduction of min/max samples into trace segments

use super::sample::Sample;
use super::segment::{Segment, TracePoint};
use crate::constants::numeric::POINT_ABSOLUTE_FLOOR;

/// What the scan has open at the current index
#[derive(Debug, Clone, Copy, PartialEq)]
enum Run {
    /// Nothing open: start of data or just after a hole
    None,
    /// A horizontal line starting here, not yet emitted
    Horizontal(TracePoint),
    /// The last emitted segment is a vertical span
    VerticalOnly,
}

/// Whether two values are equal within a relative tolerance
pub fn almost_equal(a: f64, b: f64, tolerance: f64) -> bool {
    let diff = (a - b).abs();
    diff <= POINT_ABSOLUTE_FLOOR || diff <= tolerance * a.abs().max(b.abs())
}

/// Reduce `samples` to the segments needed to draw them.
///
/// Returns the segments and the number of samples scanned.
pub fn compact<I>(samples: I, tolerance: f64) -> (Vec<Segment>, usize)
where
    I: IntoIterator<Item = Sample>,
{
    let mut compactor = Compactor::new(tolerance);
    let mut count = 0;
    for (x, sample) in samples.into_iter().enumerate() {
        compactor.push(x, sample);
        count = x + 1;
    }
    (compactor.finish(count), count)
}

struct Compactor {
    tolerance: f64,
    segments: Vec<Segment>,
    run: Run,
}

impl Compactor {
    fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            segments: Vec::new(),
            run: Run::None,
        }
    }

    fn push(&mut self, x: usize, sample: Sample) {
        if sample.is_hole() {
            if let Run::Horizontal(start) = self.run {
                // start.x < x, so x >= 1 here
                self.close_horizontal(start, x - 1);
            }
            self.run = Run::None;
            return;
        }

        if almost_equal(sample.min, sample.max, self.tolerance) {
            self.push_point(x, sample.min);
        } else {
            self.push_interval(x, sample.min, sample.max);
        }
    }

    fn push_point(&mut self, x: usize, y: f64) {
        match self.run {
            Run::None => {}
            Run::Horizontal(start) if almost_equal(start.y, y, self.tolerance) => return,
            Run::Horizontal(start) => {
                // Step: hold the old value up to x, then jump
                self.close_horizontal(start, x);
                self.segments.push(Segment::vertical(x, start.y, y));
            }
            Run::VerticalOnly => self.widen_last_vertical(y),
        }
        self.run = Run::Horizontal(TracePoint::new(x, y));
    }

    fn push_interval(&mut self, x: usize, a: f64, b: f64) {
        let (mut min, mut max) = if a <= b { (a, b) } else { (b, a) };

        if self.run != Run::None {
            if let Run::Horizontal(start) = self.run {
                self.close_horizontal(start, x);
            }

            // Stretch to meet the previous segment so no gap shows
            if let Some(last) = self.segments.last() {
                let (start, end) = (last.start(), last.end());
                if end.y < min {
                    min = end.y;
                }
                if start.y > max {
                    max = start.y;
                }
            }
        }

        self.segments.push(Segment::vertical(x, min, max));
        self.run = Run::VerticalOnly;
    }

    fn widen_last_vertical(&mut self, y: f64) {
        if let Some(Segment::Vertical { min, max, .. }) = self.segments.last_mut() {
            *min = min.min(y);
            *max = max.max(y);
        }
    }

    fn close_horizontal(&mut self, start: TracePoint, end_x: usize) {
        if end_x > start.x {
            self.segments.push(Segment::horizontal(start.y, start.x, end_x));
        }
    }

    fn finish(mut self, point_count: usize) -> Vec<Segment> {
        if let Run::Horizontal(start) = self.run {
            if point_count > 0 {
                self.close_horizontal(start, point_count - 1);
            }
        }
        self.segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::numeric::POINT_TOLERANCE;

    fn run(samples: &[Sample]) -> Vec<Segment> {
        compact(samples.iter().copied(), POINT_TOLERANCE).0
    }

    #[test]
    fn test_flat_points_make_one_horizontal() {
        let samples = vec![Sample::point(10.0); 5];
        assert_eq!(run(&samples), vec![Segment::horizontal(10.0, 0, 4)]);
    }

    #[test]
    fn test_hole_is_not_bridged() {
        let samples = [Sample::point(5.0), Sample::hole(), Sample::point(5.0)];
        let segments = run(&samples);

        // Each side is a single index wide, so nothing is drawn and nothing spans the gap
        assert!(segments.iter().all(|s| !(s.start().x < 1 && s.end().x > 1)));
        assert!(segments.is_empty());
    }

    #[test]
    fn test_hole_closes_run_before_gap() {
        let samples = [
            Sample::point(5.0),
            Sample::point(5.0),
            Sample::point(5.0),
            Sample::hole(),
            Sample::point(5.0),
            Sample::point(5.0),
        ];
        assert_eq!(
            run(&samples),
            vec![Segment::horizontal(5.0, 0, 2), Segment::horizontal(5.0, 4, 5)]
        );
    }

    #[test]
    fn test_interval_then_point_is_absorbed() {
        let samples = [Sample::range(2.0, 8.0), Sample::point(5.0)];
        assert_eq!(run(&samples), vec![Segment::vertical(0, 2.0, 8.0)]);
    }

    #[test]
    fn test_point_outside_vertical_widens_it() {
        let samples = [Sample::range(2.0, 8.0), Sample::point(10.0), Sample::point(10.0)];
        assert_eq!(
            run(&samples),
            vec![Segment::vertical(0, 2.0, 10.0), Segment::horizontal(10.0, 1, 2)]
        );

        let samples = [Sample::range(2.0, 8.0), Sample::point(-1.0)];
        assert_eq!(run(&samples), vec![Segment::vertical(0, -1.0, 8.0)]);
    }

    #[test]
    fn test_step_between_plateaus() {
        let samples = [
            Sample::point(1.0),
            Sample::point(1.0),
            Sample::point(3.0),
            Sample::point(3.0),
        ];
        assert_eq!(
            run(&samples),
            vec![
                Segment::horizontal(1.0, 0, 2),
                Segment::vertical(2, 1.0, 3.0),
                Segment::horizontal(3.0, 2, 3),
            ]
        );
    }

    #[test]
    fn test_interval_stretches_to_previous_vertical() {
        let samples = [Sample::range(0.0, 1.0), Sample::range(4.0, 5.0), Sample::range(-3.0, -2.0)];
        assert_eq!(
            run(&samples),
            vec![
                Segment::vertical(0, 0.0, 1.0),
                Segment::vertical(1, 1.0, 5.0),
                Segment::vertical(2, -3.0, 1.0),
            ]
        );
    }

    #[test]
    fn test_interval_closes_horizontal_and_meets_it() {
        let samples = [Sample::point(2.0), Sample::point(2.0), Sample::range(5.0, 6.0)];
        assert_eq!(
            run(&samples),
            vec![Segment::horizontal(2.0, 0, 2), Segment::vertical(2, 2.0, 6.0)]
        );
    }

    #[test]
    fn test_interval_after_hole_is_not_stretched() {
        let samples = [Sample::range(0.0, 1.0), Sample::hole(), Sample::range(4.0, 5.0)];
        assert_eq!(
            run(&samples),
            vec![Segment::vertical(0, 0.0, 1.0), Segment::vertical(2, 4.0, 5.0)]
        );
    }

    #[test]
    fn test_reversed_bounds_are_normalized() {
        let samples = [Sample::range(8.0, 2.0)];
        assert_eq!(run(&samples), vec![Segment::vertical(0, 2.0, 8.0)]);
    }

    #[test]
    fn test_interpolated_counts_as_data() {
        let samples = [
            Sample::new(crate::trace::SampleStatus::Interpolated, 4.0, 4.0),
            Sample::point(4.0),
        ];
        assert_eq!(run(&samples), vec![Segment::horizontal(4.0, 0, 1)]);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(run(&[]).is_empty());
        assert!(run(&[Sample::point(1.0)]).is_empty());
        assert!(run(&[Sample::hole(); 4]).is_empty());
        assert_eq!(run(&[Sample::range(1.0, 2.0)]), vec![Segment::vertical(0, 1.0, 2.0)]);
    }

    #[test]
    fn test_almost_equal_tolerance() {
        assert!(almost_equal(1.0, 1.0 + 1e-12, POINT_TOLERANCE));
        assert!(almost_equal(0.0, 1e-13, POINT_TOLERANCE));
        assert!(!almost_equal(1.0, 1.001, POINT_TOLERANCE));
        assert!(almost_equal(1e6, 1e6 + 1e-4, POINT_TOLERANCE));
    }
}
