//! Print jobs
//!
//! A job is the ordered stack of layer images for one object, as sliced.
//! It is immutable once loaded and read-only for the duration of a run.

use alloc::vec::Vec;

/// One cross-section of the object
#[derive(Debug, Clone, PartialEq)]
pub struct Layer<I> {
    /// Opaque handle understood by the projector
    pub image: I,
    /// Position of the layer in the slicer's output
    pub sequence_index: u32,
    /// Height of the layer as recorded by the slicer (mm)
    pub z_mm: f64,
}

/// Reasons a job cannot be produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JobError {
    /// No media present, or nothing on it to import
    NoMedia,
    /// The staged job file is missing
    NotFound,
    /// The job file could not be understood
    ParseFailure,
}

impl core::fmt::Display for JobError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            JobError::NoMedia => f.write_str("no media"),
            JobError::NotFound => f.write_str("job not found"),
            JobError::ParseFailure => f.write_str("job could not be parsed"),
        }
    }
}

/// An ordered stack of layers
#[derive(Debug, Clone, PartialEq)]
pub struct Job<I> {
    layers: Vec<Layer<I>>,
    layer_thickness_mm: f64,
}

impl<I> Job<I> {
    /// Build a job; thickness is derived from the layers' own spacing
    ///
    /// `fallback_thickness_mm` is used only when the layers do not
    /// determine a positive thickness.
    pub fn new(layers: Vec<Layer<I>>, fallback_thickness_mm: f64) -> Self {
        let layer_thickness_mm =
            derive_thickness(&layers).unwrap_or(fallback_thickness_mm);
        Self {
            layers,
            layer_thickness_mm,
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layer_thickness_mm(&self) -> f64 {
        self.layer_thickness_mm
    }

    pub fn layer(&self, index: usize) -> Option<&Layer<I>> {
        self.layers.get(index)
    }

    pub fn layers(&self) -> &[Layer<I>] {
        &self.layers
    }
}

/// Layer pitch from the slicer heights
///
/// The delta between the last two layers; a lone layer's own height.
fn derive_thickness<I>(layers: &[Layer<I>]) -> Option<f64> {
    let thickness = match layers {
        [] => return None,
        [only] => only.z_mm,
        [.., prev, last] => last.z_mm - prev.z_mm,
    };
    (thickness.is_finite() && thickness > 0.0).then_some(thickness)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn layer(index: u32, z_mm: f64) -> Layer<u32> {
        Layer {
            image: index,
            sequence_index: index,
            z_mm,
        }
    }

    #[test]
    fn test_thickness_from_spacing() {
        let job = Job::new(vec![layer(0, 0.05), layer(1, 0.1), layer(2, 0.15)], 0.3);
        assert!((job.layer_thickness_mm() - 0.05).abs() < 1e-9);
        assert_eq!(job.layer_count(), 3);
    }

    #[test]
    fn test_single_layer_uses_its_height() {
        let job = Job::new(vec![layer(0, 0.2)], 0.1);
        assert!((job.layer_thickness_mm() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_empty_job_uses_fallback() {
        let job: Job<u32> = Job::new(vec![], 0.1);
        assert!(job.is_empty());
        assert_eq!(job.layer_thickness_mm(), 0.1);
    }

    #[test]
    fn test_non_increasing_heights_use_fallback() {
        let job = Job::new(vec![layer(0, 0.2), layer(1, 0.2)], 0.1);
        assert_eq!(job.layer_thickness_mm(), 0.1);
    }

    #[test]
    fn test_layer_lookup() {
        let job = Job::new(vec![layer(0, 0.1), layer(1, 0.2)], 0.1);
        assert_eq!(job.layer(1).map(|l| l.sequence_index), Some(1));
        assert!(job.layer(2).is_none());
    }
}
