use crate::error::{BlobError, BlobResult};
use blob_core::ScalarImage;
use rayon::prelude::*;

/// Scale-normalized Laplacian-of-Gaussian response for one sigma.
///
/// The sign convention is `-sigma^2 * laplacian(gaussian(image))`, so a
/// bright blob produces a positive maximum at its center. The buffer is
/// produced once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct ResponseBuffer {
    sigma: f64,
    data: Vec<f32>,
}

impl ResponseBuffer {
    pub(crate) fn new(sigma: f64, data: Vec<f32>) -> Self {
        Self { sigma, data }
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

/// Computes the scale-normalized LoG response of `image` at `sigma`.
///
/// Separable implementation: for each axis the image is convolved with the
/// sampled second-derivative-of-Gaussian kernel along that axis and the
/// plain Gaussian along every other axis; the per-axis results are summed
/// and multiplied by `-sigma^2`. Borders replicate the edge pixel.
pub fn log_response(image: &ScalarImage, sigma: f64) -> BlobResult<ResponseBuffer> {
    if sigma <= 0.0 {
        return Err(BlobError::InvalidSigma(sigma));
    }

    let dims = image.dims();
    let gaussian = gaussian_kernel(sigma);
    let second_derivative = second_derivative_kernel(sigma);

    let mut accumulated = vec![0f32; image.num_pixels()];
    for derivative_axis in 0..dims.len() {
        let mut pass = image.data().to_vec();
        for axis in 0..dims.len() {
            let kernel = if axis == derivative_axis {
                &second_derivative
            } else {
                &gaussian
            };
            pass = convolve_axis(&pass, dims, image.strides(), axis, kernel);
        }
        for (acc, v) in accumulated.iter_mut().zip(pass.iter()) {
            *acc += v;
        }
    }

    let norm = -(sigma * sigma) as f32;
    for v in accumulated.iter_mut() {
        *v *= norm;
    }

    if !accumulated.iter().all(|v| v.is_finite()) {
        return Err(BlobError::NonFiniteResponse { sigma });
    }

    Ok(ResponseBuffer::new(sigma, accumulated))
}

/// Sampled Gaussian, normalized to unit sum. Kernel radius is `ceil(4 sigma)`.
fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (4.0 * sigma).ceil() as i64;
    let mut kernel: Vec<f64> = (-radius..=radius)
        .map(|x| (-0.5 * (x as f64 / sigma).powi(2)).exp())
        .collect();
    let sum: f64 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }
    kernel
}

/// Sampled second derivative of the unit-sum Gaussian, corrected to zero sum
/// so a constant image yields an exactly constant (zero) response.
fn second_derivative_kernel(sigma: f64) -> Vec<f64> {
    let radius = (4.0 * sigma).ceil() as i64;
    let gaussian = gaussian_kernel(sigma);
    let inv_s2 = 1.0 / (sigma * sigma);
    let mut kernel: Vec<f64> = gaussian
        .iter()
        .zip(-radius..=radius)
        .map(|(&g, x)| g * ((x as f64 * x as f64) * inv_s2 - 1.0) * inv_s2)
        .collect();
    let mean: f64 = kernel.iter().sum::<f64>() / kernel.len() as f64;
    for v in kernel.iter_mut() {
        *v -= mean;
    }
    kernel
}

/// 1-D convolution along `axis` with replicated borders, parallelized over
/// slabs of the outermost axis. Accumulation is f64 in a fixed tap order, so
/// the result is bit-identical between runs.
fn convolve_axis(
    data: &[f32],
    dims: &[usize],
    strides: &[usize],
    axis: usize,
    kernel: &[f64],
) -> Vec<f32> {
    let radius = (kernel.len() / 2) as i64;
    let dim = dims[axis] as i64;
    let stride = strides[axis] as i64;
    let slab = strides[0].max(1);

    let mut out = vec![0f32; data.len()];
    out.par_chunks_mut(slab)
        .enumerate()
        .for_each(|(slab_idx, chunk)| {
            let base = slab_idx * slab;
            for (offset, o) in chunk.iter_mut().enumerate() {
                let idx = base + offset;
                let coord = (idx as i64 / stride) % dim;
                let mut sum = 0f64;
                for (tap, &w) in kernel.iter().enumerate() {
                    let c = (coord + tap as i64 - radius).clamp(0, dim - 1);
                    let src = (idx as i64 + (c - coord) * stride) as usize;
                    sum += w * data[src] as f64;
                }
                *o = sum as f32;
            }
        });
    out
}
