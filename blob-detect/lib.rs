//! Multi-scale Laplacian-of-Gaussian blob detection.
//!
//! The detector sweeps a geometric scale schedule, keeping only the three
//! most recent scale-normalized LoG responses alive, scans the interior of
//! the image in parallel for strict scale-space maxima, and maintains a
//! bounded global ranking whose weakest value prunes later scan steps.

pub mod detector;
pub mod error;
pub mod merge;
pub mod response;
pub mod scales;
pub mod scan;
pub mod topk;
pub mod window;

pub use detector::{detect_blobs, BlobDetector};
pub use error::{BlobError, BlobResult};
pub use merge::BlobRanking;
pub use response::{log_response, ResponseBuffer};
pub use scales::{scale_schedule, ScaleSample};
pub use topk::{BlobCandidate, BoundedTopK};
pub use window::ScaleWindow;

pub use blob_core::{init_thread_pool, Blob, BlobConfig, ScalarImage};

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::BlobConfig;

    #[test]
    fn config_round_trips_through_json() {
        let cfg = BlobConfig {
            number_of_blobs: 50,
            steps_per_octave: 8,
            start_t: 2.0,
            end_t: 32.0,
            n_threads: 4,
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: BlobConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.number_of_blobs, cfg.number_of_blobs);
        assert_eq!(back.steps_per_octave, cfg.steps_per_octave);
        assert_eq!(back.start_t, cfg.start_t);
        assert_eq!(back.end_t, cfg.end_t);
        assert_eq!(back.n_threads, cfg.n_threads);
    }
}
