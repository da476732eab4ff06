/// A point in sample space: sample index and raw value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracePoint {
    pub x: usize,
    pub y: f64,
}

impl TracePoint {
    pub fn new(x: usize, y: f64) -> Self {
        Self { x, y }
    }
}

/// One straight piece of a compacted trace
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// Spans `min..=max` at sample index `x`; always `min <= max`
    Vertical { x: usize, min: f64, max: f64 },
    /// Holds value `y` from `start_x` to `end_x`
    Horizontal { y: f64, start_x: usize, end_x: usize },
}

impl Segment {
    /// Vertical segment with its bounds put in order
    pub fn vertical(x: usize, a: f64, b: f64) -> Self {
        if a > b {
            Segment::Vertical { x, min: b, max: a }
        } else {
            Segment::Vertical { x, min: a, max: b }
        }
    }

    pub fn horizontal(y: f64, start_x: usize, end_x: usize) -> Self {
        Segment::Horizontal { y, start_x, end_x }
    }

    /// Lower (vertical) or left (horizontal) endpoint
    pub fn start(&self) -> TracePoint {
        match *self {
            Segment::Vertical { x, min, .. } => TracePoint::new(x, min),
            Segment::Horizontal { y, start_x, .. } => TracePoint::new(start_x, y),
        }
    }

    /// Upper (vertical) or right (horizontal) endpoint
    pub fn end(&self) -> TracePoint {
        match *self {
            Segment::Vertical { x, max, .. } => TracePoint::new(x, max),
            Segment::Horizontal { y, end_x, .. } => TracePoint::new(end_x, y),
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Segment::Horizontal { .. })
    }
}
