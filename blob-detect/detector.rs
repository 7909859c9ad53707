use crate::error::{BlobError, BlobResult};
use crate::merge::BlobRanking;
use crate::response::log_response;
use crate::scales::scale_schedule;
use crate::scan::scan_extrema;
use crate::window::ScaleWindow;
use blob_core::{Blob, BlobConfig, ScalarImage};

/// Minimum extent along every axis; anything smaller cannot hold a full
/// 3^D neighborhood around an interior pixel.
const MIN_EXTENT: usize = 3;

/// Multi-scale Laplacian-of-Gaussian blob detector.
///
/// Sweeps a geometric scale schedule, keeping a three-scale response window
/// alive at a time, and ranks strict scale-space maxima into a bounded
/// top-K list. Returns the survivors strongest first.
pub struct BlobDetector {
    cfg: BlobConfig,
}

impl BlobDetector {
    /// Creates a detector, validating the configuration up front.
    pub fn new(cfg: BlobConfig) -> BlobResult<Self> {
        if cfg.number_of_blobs == 0 {
            return Err(BlobError::InvalidBlobCount(cfg.number_of_blobs));
        }
        if cfg.steps_per_octave < 1 {
            return Err(BlobError::InvalidStepsPerOctave(cfg.steps_per_octave));
        }
        if cfg.start_t <= 0.0 || cfg.end_t <= cfg.start_t {
            return Err(BlobError::InvalidScaleRange {
                start_t: cfg.start_t,
                end_t: cfg.end_t,
            });
        }
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &BlobConfig {
        &self.cfg
    }

    fn validate_image(&self, image: &ScalarImage) -> BlobResult<()> {
        for (axis, &extent) in image.dims().iter().enumerate() {
            if extent < MIN_EXTENT {
                return Err(BlobError::ImageTooSmall {
                    axis,
                    extent,
                    min_extent: MIN_EXTENT,
                });
            }
        }
        let expected_len = image.num_pixels();
        if image.data().len() != expected_len {
            return Err(BlobError::InvalidImageData {
                expected_len,
                actual_len: image.data().len(),
            });
        }
        Ok(())
    }

    /// Runs the full scale sweep and returns at most `number_of_blobs`
    /// records, strongest first. Either the whole sweep completes or the
    /// first error aborts the run with no partial output.
    pub fn detect(&self, image: &ScalarImage) -> BlobResult<Vec<Blob>> {
        self.validate_image(image)?;

        let schedule = scale_schedule(self.cfg.start_t, self.cfg.end_t, self.cfg.steps_per_octave)?;
        let regions = self.cfg.n_threads.max(1);

        let mut window = ScaleWindow::new();
        let mut ranking = BlobRanking::new(self.cfg.number_of_blobs);

        for sample in &schedule {
            let response = log_response(image, sample.sigma)?;
            window.push(response);

            // The first and last scheduled scales only ever serve as
            // neighbor evidence; candidates come from the center slot.
            if let Some(triple) = window.triple() {
                let worker_lists = scan_extrema(
                    image.dims(),
                    image.strides(),
                    triple,
                    ranking.min_accepted(),
                    self.cfg.number_of_blobs,
                    regions,
                );
                ranking.merge_step(worker_lists);
            }
        }

        Ok(materialize(image, ranking))
    }
}

/// Converts surviving candidates into output records, preserving rank order.
///
/// The object radius under the diffusion-time blob model is
/// `sqrt(D/2) * sigma`, mapped to physical units with the mean axis spacing;
/// the center index goes through the image's coordinate transform.
fn materialize(image: &ScalarImage, ranking: BlobRanking) -> Vec<Blob> {
    let d = image.ndim() as f64;
    let mean_spacing = image.spacing().iter().sum::<f64>() / d;
    let radius_factor = (d / 2.0).sqrt() * mean_spacing;

    ranking
        .into_candidates()
        .into_iter()
        .map(|c| {
            let coords = image.flat_to_coords(c.index);
            Blob {
                position: image.index_to_physical(&coords),
                radius: radius_factor * c.sigma,
                value: c.value,
            }
        })
        .collect()
}

/// Convenience entry point: validate, sweep and rank in one call.
pub fn detect_blobs(image: &ScalarImage, cfg: &BlobConfig) -> BlobResult<Vec<Blob>> {
    BlobDetector::new(cfg.clone())?.detect(image)
}
