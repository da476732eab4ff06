//! Cursor timestamp to window line projection

use egui::{Pos2, Vec2, pos2};

/// Inclusive time range in nanoseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

impl TimeRange {
    /// Bounds may be given in either order
    pub fn new(a: i64, b: i64) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn length(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        (self.start..=self.end).contains(&timestamp)
    }

    /// Clamp a timestamp into the range
    pub fn clamp(&self, timestamp: i64) -> i64 {
        timestamp.clamp(self.start, self.end)
    }
}

/// Cursor position within a timebase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    timebase: TimeRange,
    position: i64,
}

impl Cursor {
    pub fn new(timebase: TimeRange, position: i64) -> Self {
        Self { timebase, position }
    }

    pub fn timebase(&self) -> TimeRange {
        self.timebase
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    /// Vertical line through the cursor, or `None` if it lies outside the
    /// timebase
    pub fn cursor_line(&self, extents: Vec2) -> Option<(Pos2, Pos2)> {
        if !self.timebase.contains(self.position) {
            return None;
        }

        let extent = self.timebase.length();
        let ratio = if extent > 0 {
            self.position.saturating_sub(self.timebase.start) as f64 / extent as f64
        } else {
            0.0
        };
        let x = (ratio * extents.x as f64) as f32;
        Some((pos2(x, 0.0), pos2(x, extents.y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;

    #[test]
    fn test_cursor_line_inside_range() {
        let cursor = Cursor::new(TimeRange::new(1_000, 2_000), 1_250);
        let line = cursor.cursor_line(vec2(400.0, 80.0));
        assert_eq!(line, Some((pos2(100.0, 0.0), pos2(100.0, 80.0))));
    }

    #[test]
    fn test_cursor_outside_range() {
        let timebase = TimeRange::new(0, 100);
        assert_eq!(Cursor::new(timebase, 101).cursor_line(vec2(10.0, 10.0)), None);
        assert_eq!(Cursor::new(timebase, -1).cursor_line(vec2(10.0, 10.0)), None);
    }

    #[test]
    fn test_range_edges_are_inclusive() {
        let cursor = Cursor::new(TimeRange::new(0, 100), 100);
        let (top, _) = cursor.cursor_line(vec2(50.0, 10.0)).unwrap();
        assert_eq!(top.x, 50.0);
    }

    #[test]
    fn test_zero_length_timebase() {
        let cursor = Cursor::new(TimeRange::new(5, 5), 5);
        assert_eq!(
            cursor.cursor_line(vec2(50.0, 10.0)),
            Some((pos2(0.0, 0.0), pos2(0.0, 10.0)))
        );
    }

    #[test]
    fn test_time_range_normalizes() {
        let range = TimeRange::new(9, 3);
        assert_eq!(range.start, 3);
        assert_eq!(range.length(), 6);
        assert_eq!(range.clamp(20), 9);
    }
}
