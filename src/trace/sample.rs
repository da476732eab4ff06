//! Sampled min/max parameter values as delivered by a data request

use crate::error::{DisplayError, Result};

/// Data status of one sample slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleStatus {
    /// A recorded sample falls inside this slot
    Sample,
    /// No recorded sample, but a value was interpolated
    Interpolated,
    /// Neither: a hole in the data
    Missing,
}

impl SampleStatus {
    /// Build from the host's sample/interpolated flags. A slot flagged as
    /// both counts as a sample.
    pub fn from_flags(is_sample: bool, is_interpolated: bool) -> Self {
        match (is_sample, is_interpolated) {
            (true, _) => SampleStatus::Sample,
            (false, true) => SampleStatus::Interpolated,
            (false, false) => SampleStatus::Missing,
        }
    }
}

/// One slot of a min/max sampled series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub status: SampleStatus,
    pub min: f64,
    pub max: f64,
}

impl Sample {
    pub fn new(status: SampleStatus, min: f64, max: f64) -> Self {
        Self { status, min, max }
    }

    /// A recorded single value
    pub fn point(value: f64) -> Self {
        Self::new(SampleStatus::Sample, value, value)
    }

    /// A recorded range of values
    pub fn range(min: f64, max: f64) -> Self {
        Self::new(SampleStatus::Sample, min, max)
    }

    /// A slot with no data
    pub fn hole() -> Self {
        Self::new(SampleStatus::Missing, f64::NAN, f64::NAN)
    }

    /// Holes have no usable value: missing status or a non-finite bound
    pub fn is_hole(&self) -> bool {
        self.status == SampleStatus::Missing || !self.min.is_finite() || !self.max.is_finite()
    }
}

/// Column-oriented parameter values: one status, min and max per slot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterValues {
    status: Vec<SampleStatus>,
    min: Vec<f64>,
    max: Vec<f64>,
}

impl ParameterValues {
    pub fn new(status: Vec<SampleStatus>, min: Vec<f64>, max: Vec<f64>) -> Result<Self> {
        if status.len() != min.len() || status.len() != max.len() {
            return Err(DisplayError::SampleLengthMismatch {
                status: status.len(),
                min: min.len(),
                max: max.len(),
            });
        }
        Ok(Self { status, min, max })
    }

    pub fn sample_count(&self) -> usize {
        self.status.len()
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Sample> {
        Some(Sample::new(
            *self.status.get(index)?,
            *self.min.get(index)?,
            *self.max.get(index)?,
        ))
    }

    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.status
            .iter()
            .zip(&self.min)
            .zip(&self.max)
            .map(|((&status, &min), &max)| Sample::new(status, min, max))
    }
}

impl FromIterator<Sample> for ParameterValues {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        let mut values = ParameterValues::default();
        for sample in iter {
            values.status.push(sample.status);
            values.min.push(sample.min);
            values.max.push(sample.max);
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_flags() {
        assert_eq!(SampleStatus::from_flags(true, true), SampleStatus::Sample);
        assert_eq!(SampleStatus::from_flags(false, true), SampleStatus::Interpolated);
        assert_eq!(SampleStatus::from_flags(false, false), SampleStatus::Missing);
    }

    #[test]
    fn test_hole_detection() {
        assert!(Sample::hole().is_hole());
        assert!(Sample::new(SampleStatus::Sample, f64::NAN, 1.0).is_hole());
        assert!(Sample::new(SampleStatus::Interpolated, 0.0, f64::INFINITY).is_hole());
        assert!(!Sample::new(SampleStatus::Interpolated, 0.0, 1.0).is_hole());
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let result = ParameterValues::new(
            vec![SampleStatus::Sample; 3],
            vec![0.0; 3],
            vec![0.0; 2],
        );
        assert!(matches!(
            result,
            Err(DisplayError::SampleLengthMismatch { status: 3, min: 3, max: 2 })
        ));
    }

    #[test]
    fn test_collect_and_iterate() {
        let values: ParameterValues = vec![Sample::point(1.0), Sample::hole(), Sample::range(2.0, 3.0)]
            .into_iter()
            .collect();

        assert_eq!(values.sample_count(), 3);
        assert_eq!(values.get(2), Some(Sample::range(2.0, 3.0)));
        assert_eq!(values.get(3), None);
        assert_eq!(values.samples().filter(Sample::is_hole).count(), 1);
    }
}
