#[derive(Debug, Clone)]
pub enum BlobError {
    InvalidScaleRange { start_t: f64, end_t: f64 },
    InvalidStepsPerOctave(u32),
    InvalidBlobCount(usize),
    InvalidSigma(f64),
    ImageTooSmall { axis: usize, extent: usize, min_extent: usize },
    InvalidImageData { expected_len: usize, actual_len: usize },
    NonFiniteResponse { sigma: f64 },
}

impl std::fmt::Display for BlobError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlobError::InvalidScaleRange { start_t, end_t } => {
                write!(f, "Invalid scale range: startT={} endT={} (need 0 < startT < endT)", start_t, end_t)
            }
            BlobError::InvalidStepsPerOctave(s) => {
                write!(f, "Invalid steps per octave: {} (must be >= 1)", s)
            }
            BlobError::InvalidBlobCount(n) => {
                write!(f, "Invalid blob count: {} (must be >= 1)", n)
            }
            BlobError::InvalidSigma(sigma) => {
                write!(f, "Invalid sigma: {} (must be > 0)", sigma)
            }
            BlobError::ImageTooSmall { axis, extent, min_extent } => {
                write!(f, "Image extent {} along axis {} too small (minimum {})", extent, axis, min_extent)
            }
            BlobError::InvalidImageData { expected_len, actual_len } => {
                write!(f, "Image data length mismatch: expected {}, got {}", expected_len, actual_len)
            }
            BlobError::NonFiniteResponse { sigma } => {
                write!(f, "Non-finite value in response buffer at sigma {}", sigma)
            }
        }
    }
}

impl std::error::Error for BlobError {}

pub type BlobResult<T> = Result<T, BlobError>;
