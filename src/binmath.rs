//! Midpoint/edge geometry helpers for wavelength bins.
//!
//! Instrument products report bin *centers*; the canonical table stores bin
//! *edges*. These helpers reconstruct one from the other and locate
//! contiguous runs of flagged bins for detector-edge trimming.

/// How to reconstruct `n + 1` edges from `n` midpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeMode {
    /// Interior edges are the mean of neighboring midpoints; the outer edges
    /// extend the first/last bin by half its width.
    Simple,
    /// Left-anchored recurrence: seed `e[0] = m[0] - (m[1] - m[0]) / 2`, then
    /// `e[i+1] = 2 * m[i] - e[i]` so each midpoint is the exact bin center.
    Left,
}

/// Midpoints of consecutive samples: `(x[i] + x[i+1]) / 2`.
pub fn midpts(x: &[f64]) -> Vec<f64> {
    x.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
}

/// Reconstruct bin edges from bin midpoints.
///
/// Requires at least two midpoints; with fewer there is no bin width to
/// extrapolate from.
pub fn mids2edges(mids: &[f64], mode: EdgeMode) -> Option<Vec<f64>> {
    if mids.len() < 2 {
        return None;
    }
    let n = mids.len();
    let mut edges = Vec::with_capacity(n + 1);
    match mode {
        EdgeMode::Simple => {
            edges.push(mids[0] - (mids[1] - mids[0]) / 2.0);
            edges.extend(midpts(mids));
            edges.push(mids[n - 1] + (mids[n - 1] - mids[n - 2]) / 2.0);
        }
        EdgeMode::Left => {
            edges.push(mids[0] - (mids[1] - mids[0]) / 2.0);
            for &m in mids {
                let prev = *edges.last().unwrap_or(&0.0);
                edges.push(2.0 * m - prev);
            }
        }
    }
    Some(edges)
}

/// Boundaries of contiguous `true` runs in a mask.
///
/// Returns `(starts, ends)` where each run covers `starts[k]..ends[k]`
/// (half-open). The two vectors always have equal length.
pub fn block_edges(mask: &[bool]) -> (Vec<usize>, Vec<usize>) {
    let mut starts = Vec::new();
    let mut ends = Vec::new();
    let mut prev = false;
    for (i, &b) in mask.iter().enumerate() {
        if b && !prev {
            starts.push(i);
        }
        if !b && prev {
            ends.push(i);
        }
        prev = b;
    }
    if prev {
        ends.push(mask.len());
    }
    (starts, ends)
}

/// Interleave two slices starting with `a[offset == 0]` or `b[offset == 1]`,
/// appending whatever remains of the longer one.
pub fn lace(a: &[f64], b: &[f64], offset: usize) -> Vec<f64> {
    let (first, second) = if offset == 0 { (a, b) } else { (b, a) };
    let mut out = Vec::with_capacity(a.len() + b.len());
    let common = first.len().min(second.len());
    for i in 0..common {
        out.push(first[i]);
        out.push(second[i]);
    }
    if first.len() > common {
        out.extend_from_slice(&first[common..]);
    } else {
        out.extend_from_slice(&second[common..]);
    }
    out
}
