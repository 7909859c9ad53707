use crate::error::{BlobError, BlobResult};

/// One scheduled scale. Index 0 carries the largest sigma; the sweep walks
/// the sequence toward `sqrt(start_t)/k`, so the three-scale window slides
/// down in scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleSample {
    pub sigma: f64,
    pub index: usize,
}

/// Geometric scale schedule over the diffusion-time range `[start_t, end_t]`
/// with `steps_per_octave` samples per doubling of t.
///
/// One extra sample is placed on each side of the user range so that every
/// requested scale can sit in the center slot of the window; the schedule
/// therefore always has at least 3 entries for any valid range.
pub fn scale_schedule(start_t: f64, end_t: f64, steps_per_octave: u32) -> BlobResult<Vec<ScaleSample>> {
    if steps_per_octave < 1 {
        return Err(BlobError::InvalidStepsPerOctave(steps_per_octave));
    }
    if start_t <= 0.0 || end_t <= start_t {
        return Err(BlobError::InvalidScaleRange { start_t, end_t });
    }

    let k = 2f64.powf(1.0 / steps_per_octave as f64);
    let initial_sigma = start_t.sqrt() / k;
    let number_of_scales = ((end_t.sqrt() / initial_sigma).ln() / k.ln()).ceil() as usize + 1;

    let samples = (0..number_of_scales)
        .map(|i| ScaleSample {
            sigma: initial_sigma * k.powi((number_of_scales - i - 1) as i32),
            index: i,
        })
        .collect();
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_bad_ranges() {
        assert!(matches!(
            scale_schedule(0.0, 128.0, 15),
            Err(BlobError::InvalidScaleRange { .. })
        ));
        assert!(matches!(
            scale_schedule(8.0, 8.0, 15),
            Err(BlobError::InvalidScaleRange { .. })
        ));
        assert!(matches!(
            scale_schedule(8.0, 4.0, 15),
            Err(BlobError::InvalidScaleRange { .. })
        ));
        assert!(matches!(
            scale_schedule(8.0, 128.0, 0),
            Err(BlobError::InvalidStepsPerOctave(0))
        ));
    }

    #[test]
    fn default_range_matches_formula() {
        let samples = scale_schedule(8.0, 128.0, 15).unwrap();
        let k = 2f64.powf(1.0 / 15.0);
        let initial_sigma = 8f64.sqrt() / k;
        let n = ((128f64.sqrt() / initial_sigma).ln() / k.ln()).ceil() as usize + 1;
        assert_eq!(samples.len(), n);
        // Last sample converges to initial_sigma, first reaches sqrt(end_t)
        // up to rounding in the log-ratio count (the default range lands
        // exactly on a schedule point, one ulp either side of the bound).
        assert!((samples[n - 1].sigma - initial_sigma).abs() < 1e-12);
        assert!((samples[0].sigma - initial_sigma * k.powi(n as i32 - 1)).abs() < 1e-12);
        assert!(samples[0].sigma >= 128f64.sqrt() * (1.0 - 1e-12));
    }

    #[test]
    fn sigma_is_strictly_decreasing_with_ratio_k() {
        let samples = scale_schedule(8.0, 128.0, 15).unwrap();
        let k = 2f64.powf(1.0 / 15.0);
        for pair in samples.windows(2) {
            assert!(pair[1].sigma < pair[0].sigma);
            assert!((pair[0].sigma / pair[1].sigma - k).abs() < 1e-12);
        }
    }

    #[test]
    fn narrow_range_still_yields_three_scales() {
        // The tightest legal range still pads one scale on each side, so the
        // window can become ready at least once.
        let samples = scale_schedule(8.0, 8.0 + 1e-9, 1).unwrap();
        assert!(samples.len() >= 3);
    }

    proptest! {
        #[test]
        fn schedule_is_monotone_and_indexed(
            start_t in 0.1f64..64.0,
            span in 0.5f64..64.0,
            steps in 1u32..20,
        ) {
            let samples = scale_schedule(start_t, start_t + span, steps).unwrap();
            prop_assert!(samples.len() >= 3);
            for (i, s) in samples.iter().enumerate() {
                prop_assert_eq!(s.index, i);
                prop_assert!(s.sigma > 0.0);
            }
            for pair in samples.windows(2) {
                prop_assert!(pair[1].sigma < pair[0].sigma);
            }
        }
    }
}
