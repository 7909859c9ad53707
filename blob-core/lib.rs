/// N-dimensional scalar image, row-major (last axis contiguous).
///
/// `spacing` and `origin` define the index-to-physical transform:
/// `physical[a] = origin[a] + index[a] * spacing[a]`.
#[derive(Debug, Clone)]
pub struct ScalarImage {
    dims: Vec<usize>,
    strides: Vec<usize>,
    spacing: Vec<f64>,
    origin: Vec<f64>,
    data: Vec<f32>,
}

impl ScalarImage {
    /// Creates an image with unit spacing and zero origin.
    pub fn new(dims: &[usize], data: Vec<f32>) -> Self {
        Self::with_geometry(dims, &vec![1.0; dims.len()], &vec![0.0; dims.len()], data)
    }

    /// Creates an image with explicit per-axis spacing and origin.
    pub fn with_geometry(dims: &[usize], spacing: &[f64], origin: &[f64], data: Vec<f32>) -> Self {
        Self {
            dims: dims.to_vec(),
            strides: row_major_strides(dims),
            spacing: spacing.to_vec(),
            origin: origin.to_vec(),
            data,
        }
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn spacing(&self) -> &[f64] {
        &self.spacing
    }

    pub fn origin(&self) -> &[f64] {
        &self.origin
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Number of pixels the dimensions describe.
    pub fn num_pixels(&self) -> usize {
        self.dims.iter().product()
    }

    /// Decomposes a flat row-major index into per-axis coordinates.
    pub fn flat_to_coords(&self, index: usize) -> Vec<usize> {
        self.dims
            .iter()
            .zip(self.strides.iter())
            .map(|(&dim, &stride)| (index / stride) % dim)
            .collect()
    }

    /// Maps a pixel coordinate into physical space.
    pub fn index_to_physical(&self, coords: &[usize]) -> Vec<f64> {
        coords
            .iter()
            .zip(self.spacing.iter().zip(self.origin.iter()))
            .map(|(&c, (&sp, &or))| or + c as f64 * sp)
            .collect()
    }
}

fn row_major_strides(dims: &[usize]) -> Vec<usize> {
    let mut strides = vec![1usize; dims.len()];
    for axis in (0..dims.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * dims[axis + 1];
    }
    strides
}

/// Detected blob: physical center, equivalent object radius and response
/// strength. Returned strongest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    pub position: Vec<f64>,
    pub radius: f64,
    pub value: f32,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlobConfig {
    /// Target number of blobs to keep (K).
    pub number_of_blobs: usize,
    /// Scale sampling resolution within one octave.
    pub steps_per_octave: u32,
    /// Lower bound of the diffusion-time search range (t = sigma^2).
    pub start_t: f64,
    /// Upper bound of the diffusion-time search range.
    pub end_t: f64,
    /// Worker count for the per-scale extrema scan.
    #[cfg_attr(feature = "serde", serde(default = "default_n_threads"))]
    pub n_threads: usize,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            number_of_blobs: 1000,
            steps_per_octave: 15,
            start_t: 8.0,
            end_t: 128.0,
            n_threads: default_n_threads(),
        }
    }
}

fn default_n_threads() -> usize {
    num_cpus::get().max(1)
}

/// Initialize the global Rayon thread pool with the specified number of
/// threads. Fails if the pool has already been built.
pub fn init_thread_pool(n_threads: usize) -> Result<(), rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build_global()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_are_row_major() {
        let img = ScalarImage::new(&[4, 5, 6], vec![0.0; 120]);
        assert_eq!(img.strides(), &[30, 6, 1]);
        assert_eq!(img.num_pixels(), 120);
    }

    #[test]
    fn flat_to_coords_round_trips() {
        let img = ScalarImage::new(&[3, 4], vec![0.0; 12]);
        for y in 0..3 {
            for x in 0..4 {
                let flat = y * 4 + x;
                assert_eq!(img.flat_to_coords(flat), vec![y, x]);
            }
        }
    }

    #[test]
    fn physical_transform_applies_spacing_and_origin() {
        let img = ScalarImage::with_geometry(&[4, 4], &[0.5, 2.0], &[10.0, -1.0], vec![0.0; 16]);
        assert_eq!(img.index_to_physical(&[2, 3]), vec![11.0, 5.0]);
    }

    #[test]
    fn thread_pool_builds_once_then_errors() {
        // No other test in this binary touches the global pool, so the
        // first build succeeds and the second reports the conflict.
        assert!(init_thread_pool(2).is_ok());
        assert!(init_thread_pool(4).is_err());
    }

    #[test]
    fn default_config_matches_documented_values() {
        let cfg = BlobConfig::default();
        assert_eq!(cfg.number_of_blobs, 1000);
        assert_eq!(cfg.steps_per_octave, 15);
        assert_eq!(cfg.start_t, 8.0);
        assert_eq!(cfg.end_t, 128.0);
        assert!(cfg.n_threads >= 1);
    }
}
