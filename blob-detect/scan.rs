use crate::topk::{BlobCandidate, BoundedTopK};
use crate::window::ReadyWindow;
use rayon::prelude::*;

/// Scans the ready scale window for strict local maxima and returns one
/// descending-sorted candidate list per region, in region order.
///
/// The interior of the outermost axis is split into `regions` disjoint
/// contiguous slabs, each scanned by one worker. Pixels within one voxel of
/// any image border are skipped so the full 3^D neighborhood always exists.
/// A pixel is accepted iff its center-scale value is strictly greater than
/// every value in the 3^D neighborhoods of the previous and next scales and
/// every spatial neighbor at its own scale; any tie disqualifies it.
///
/// `min_accepted` is a per-step snapshot of the global threshold. Each
/// worker additionally tightens its own copy from its heap minimum once the
/// heap is full; the shared value itself is never written here.
pub fn scan_extrema(
    dims: &[usize],
    strides: &[usize],
    window: ReadyWindow<'_>,
    min_accepted: f32,
    capacity: usize,
    regions: usize,
) -> Vec<Vec<BlobCandidate>> {
    let (full_offsets, spatial_offsets) = neighborhood_offsets(dims, strides);
    let interior = dims[0] - 2;
    let regions = regions.max(1);
    let chunk = interior.div_ceil(regions);

    (0..regions)
        .into_par_iter()
        .map(|region| {
            let begin = 1 + region * chunk;
            let end = (begin + chunk).min(1 + interior);
            if begin >= end {
                return Vec::new();
            }
            scan_region(
                dims,
                strides,
                window,
                &full_offsets,
                &spatial_offsets,
                min_accepted,
                capacity,
                begin..end,
            )
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn scan_region(
    dims: &[usize],
    strides: &[usize],
    window: ReadyWindow<'_>,
    full_offsets: &[isize],
    spatial_offsets: &[isize],
    min_accepted: f32,
    capacity: usize,
    axis0_range: std::ops::Range<usize>,
) -> Vec<BlobCandidate> {
    let previous = window.previous.data();
    let center_scale = window.center.data();
    let next = window.next.data();
    let sigma = window.center.sigma();

    let mut heap = BoundedTopK::new(capacity);
    let mut local_min = min_accepted;

    for_each_interior(dims, strides, axis0_range, |idx| {
        let center = center_scale[idx];
        if center < local_min {
            return;
        }
        for &off in full_offsets {
            let n = (idx as isize + off) as usize;
            if center <= previous[n] || center <= next[n] {
                return;
            }
        }
        for &off in spatial_offsets {
            if center <= center_scale[(idx as isize + off) as usize] {
                return;
            }
        }

        heap.insert(BlobCandidate {
            index: idx,
            sigma,
            value: center,
        });
        if heap.is_full() {
            if let Some(min) = heap.min() {
                local_min = local_min.max(min.value);
            }
        }
    });

    heap.into_sorted_desc()
}

/// All 3^D flat offsets of the unit neighborhood, plus the same set without
/// the zero offset for the center-scale comparison.
fn neighborhood_offsets(dims: &[usize], strides: &[usize]) -> (Vec<isize>, Vec<isize>) {
    let mut full = vec![0isize];
    for axis in 0..dims.len() {
        let stride = strides[axis] as isize;
        full = full
            .iter()
            .flat_map(|&base| [base - stride, base, base + stride])
            .collect();
    }
    let spatial = full.iter().copied().filter(|&o| o != 0).collect();
    (full, spatial)
}

/// Visits every interior pixel whose outermost-axis coordinate lies in
/// `axis0_range` (the range is already clipped to the interior).
fn for_each_interior(
    dims: &[usize],
    strides: &[usize],
    axis0_range: std::ops::Range<usize>,
    mut visit: impl FnMut(usize),
) {
    let d = dims.len();
    if d == 1 {
        for x in axis0_range {
            visit(x);
        }
        return;
    }

    let last = d - 1;
    let mut coords = vec![1usize; d];
    for c0 in axis0_range {
        coords[0] = c0;
        for c in coords[1..last].iter_mut() {
            *c = 1;
        }
        'rows: loop {
            let base: usize = coords[..last]
                .iter()
                .zip(strides[..last].iter())
                .map(|(&c, &s)| c * s)
                .sum();
            for x in 1..dims[last] - 1 {
                visit(base + x);
            }

            let mut axis = last - 1;
            loop {
                if axis == 0 {
                    break 'rows;
                }
                coords[axis] += 1;
                if coords[axis] < dims[axis] - 1 {
                    continue 'rows;
                }
                coords[axis] = 1;
                axis -= 1;
            }
        }
    }
}
