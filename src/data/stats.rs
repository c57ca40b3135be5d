//! Statistics behind the plot catalogue
//!
//! - Histogram binning with fixed edges or equal-width bins
//! - Box-and-whisker summaries (Tukey fences at 1.5 IQR)
//! - Pearson correlation over pairwise complete observations
//! - Gaussian kernel density estimates in one and two dimensions

/// Drop missing values.
pub fn finite(data: &[f64]) -> Vec<f64> {
    data.iter().copied().filter(|x| x.is_finite()).collect()
}

fn sorted_finite(data: &[f64]) -> Vec<f64> {
    let mut v = finite(data);
    v.sort_by(f64::total_cmp);
    v
}

/// Linear-interpolation quantile of already sorted data.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        }
    }
}

fn mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample standard deviation (n - 1).
fn std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    (data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (data.len() - 1) as f64).sqrt()
}

// ---------------------------------------------------------------------------
// Histograms
// ---------------------------------------------------------------------------

/// Bin edges and per-bin counts. `counts.len() == edges.len() - 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<f64>,
}

impl Histogram {
    /// Count values into the given monotonically increasing edges. Bins are
    /// half-open except the last, which includes its right edge; values
    /// outside the edges are ignored.
    pub fn with_edges(data: &[f64], edges: &[f64]) -> Self {
        let n_bins = edges.len().saturating_sub(1);
        let mut counts = vec![0.0; n_bins];
        if n_bins > 0 {
            let first = edges[0];
            let last = edges[n_bins];
            for &x in data.iter().filter(|x| x.is_finite()) {
                if x < first || x > last {
                    continue;
                }
                let idx = edges[1..].partition_point(|&e| e <= x).min(n_bins - 1);
                counts[idx] += 1.0;
            }
        }
        Histogram {
            edges: edges.to_vec(),
            counts,
        }
    }

    /// Equal-width bins spanning `[lo, hi]`. A zero-width range is widened
    /// by 0.5 on each side.
    pub fn equal_width(data: &[f64], bins: usize, (lo, hi): (f64, f64)) -> Self {
        Self::with_edges(data, &equal_width_edges(bins, lo, hi))
    }

    /// Bin count chosen as the larger of the Sturges and Freedman-Diaconis
    /// estimates.
    pub fn auto(data: &[f64]) -> Self {
        let sorted = sorted_finite(data);
        let range = value_range(&sorted);
        let bins = auto_bin_count(&sorted);
        Self::equal_width(&sorted, bins, range.unwrap_or((0.0, 1.0)))
    }

    pub fn bin_width(&self) -> f64 {
        match self.edges.as_slice() {
            [a, b, ..] => b - a,
            _ => 1.0,
        }
    }
}

/// `bins + 1` evenly spaced edges over `[lo, hi]`.
pub fn equal_width_edges(bins: usize, lo: f64, hi: f64) -> Vec<f64> {
    let bins = bins.max(1);
    let (lo, hi) = if (hi - lo).abs() < f64::EPSILON {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    };
    let step = (hi - lo) / bins as f64;
    (0..=bins).map(|i| lo + step * i as f64).collect()
}

/// Edges `start, start + step, ...` strictly below `stop`.
pub fn stepped_edges(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let n = ((stop - start) / step).ceil().max(0.0) as usize;
    (0..n).map(|i| start + step * i as f64).collect()
}

fn auto_bin_count(sorted: &[f64]) -> usize {
    let n = sorted.len();
    if n < 2 {
        return 1;
    }
    let range = sorted[n - 1] - sorted[0];
    let sturges = (n as f64).log2().ceil() as usize + 1;
    let iqr = quantile_sorted(sorted, 0.75) - quantile_sorted(sorted, 0.25);
    let fd = if iqr > 0.0 && range > 0.0 {
        let width = 2.0 * iqr / (n as f64).cbrt();
        (range / width).ceil() as usize
    } else {
        0
    };
    sturges.max(fd).clamp(1, 100)
}

/// Min and max of the finite values, if any.
pub fn value_range(data: &[f64]) -> Option<(f64, f64)> {
    data.iter()
        .copied()
        .filter(|x| x.is_finite())
        .fold(None, |acc, x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
        })
}

// ---------------------------------------------------------------------------
// Box plots
// ---------------------------------------------------------------------------

/// Five-number summary plus the points outside the whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub fliers: Vec<f64>,
}

impl BoxStats {
    /// `None` when the column has no finite values.
    pub fn from_data(data: &[f64]) -> Option<Self> {
        let sorted = sorted_finite(data);
        if sorted.is_empty() {
            return None;
        }
        let q1 = quantile_sorted(&sorted, 0.25);
        let median = quantile_sorted(&sorted, 0.5);
        let q3 = quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&x| x >= lo_fence)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&x| x <= hi_fence)
            .unwrap_or(q3);
        let fliers = sorted
            .iter()
            .copied()
            .filter(|&x| x < lower_whisker || x > upper_whisker)
            .collect();

        Some(BoxStats {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            fliers,
        })
    }
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pearson correlation over rows where both values are present. `NaN` when
/// fewer than two such rows exist or either side is constant.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| (x, y))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }
    let n = pairs.len() as f64;
    let ma = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mb = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut sab, mut saa, mut sbb) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        sab += (x - ma) * (y - mb);
        saa += (x - ma).powi(2);
        sbb += (y - mb).powi(2);
    }
    if saa == 0.0 || sbb == 0.0 {
        return f64::NAN;
    }
    (sab / (saa * sbb).sqrt()).clamp(-1.0, 1.0)
}

/// Symmetric correlation matrix, each value rounded to `decimals` places.
pub fn correlation_matrix(columns: &[&[f64]], decimals: i32) -> Vec<Vec<f64>> {
    let scale = 10f64.powi(decimals);
    let n = columns.len();
    let mut m = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = (pearson(columns[i], columns[j]) * scale).round() / scale;
            // no negative zero
            let r = if r == 0.0 { 0.0 } else { r };
            m[i][j] = r;
            m[j][i] = r;
        }
    }
    m
}

// ---------------------------------------------------------------------------
// Kernel density estimates
// ---------------------------------------------------------------------------

/// Grid points cover the data range extended by `CUT` bandwidths.
const CUT: f64 = 3.0;

/// Univariate Gaussian KDE evaluated on `points` grid positions, with
/// Scott's rule bandwidth. Returns `(x, density)` pairs; empty when the data
/// has fewer than two distinct values.
pub fn kde_1d(data: &[f64], points: usize) -> Vec<(f64, f64)> {
    let data = finite(data);
    let sd = std_dev(&data);
    if data.len() < 2 || sd == 0.0 {
        return Vec::new();
    }
    let n = data.len() as f64;
    let bw = sd * n.powf(-0.2);
    let Some((lo, hi)) = value_range(&data) else {
        return Vec::new();
    };
    let (lo, hi) = (lo - CUT * bw, hi + CUT * bw);
    let norm = 1.0 / (n * bw * (2.0 * std::f64::consts::PI).sqrt());

    linspace(lo, hi, points)
        .into_iter()
        .map(|x| {
            let density: f64 = data
                .iter()
                .map(|&xi| (-0.5 * ((x - xi) / bw).powi(2)).exp())
                .sum();
            (x, density * norm)
        })
        .collect()
}

/// Bivariate Gaussian KDE on a regular grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGrid {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    /// `values[iy][ix]`
    pub values: Vec<Vec<f64>>,
}

impl DensityGrid {
    pub fn max(&self) -> f64 {
        self.values
            .iter()
            .flatten()
            .copied()
            .fold(0.0, f64::max)
    }
}

/// Scott's rule with the full data covariance. `None` when fewer than three
/// complete rows exist or the covariance is singular.
pub fn kde_2d(x: &[f64], y: &[f64], grid: usize) -> Option<DensityGrid> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .collect();
    if pairs.len() < 3 {
        return None;
    }
    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        sxx += (a - mx).powi(2);
        syy += (b - my).powi(2);
        sxy += (a - mx) * (b - my);
    }
    let factor2 = n.powf(-1.0 / 3.0);
    let (cxx, cyy, cxy) = (
        sxx / (n - 1.0) * factor2,
        syy / (n - 1.0) * factor2,
        sxy / (n - 1.0) * factor2,
    );
    let det = cxx * cyy - cxy * cxy;
    if !det.is_finite() || det <= 1e-12 * cxx * cyy {
        return None;
    }
    let (ixx, iyy, ixy) = (cyy / det, cxx / det, -cxy / det);
    let norm = 1.0 / (n * 2.0 * std::f64::consts::PI * det.sqrt());

    let xs_data: Vec<f64> = pairs.iter().map(|p| p.0).collect();
    let ys_data: Vec<f64> = pairs.iter().map(|p| p.1).collect();
    let (x_lo, x_hi) = value_range(&xs_data)?;
    let (y_lo, y_hi) = value_range(&ys_data)?;
    let (bx, by) = (cxx.sqrt(), cyy.sqrt());
    let xs = linspace(x_lo - CUT * bx, x_hi + CUT * bx, grid);
    let ys = linspace(y_lo - CUT * by, y_hi + CUT * by, grid);

    let values = ys
        .iter()
        .map(|&gy| {
            xs.iter()
                .map(|&gx| {
                    let sum: f64 = pairs
                        .iter()
                        .map(|&(a, b)| {
                            let (dx, dy) = (gx - a, gy - b);
                            let q = ixx * dx * dx + 2.0 * ixy * dx * dy + iyy * dy * dy;
                            (-0.5 * q).exp()
                        })
                        .sum();
                    sum * norm
                })
                .collect()
        })
        .collect();

    Some(DensityGrid { xs, ys, values })
}

fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n).map(|i| lo + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_equal_width_includes_right_edge() {
        let h = Histogram::equal_width(&[1.0, 2.0, 2.0, 3.0], 4, (1.0, 3.0));
        assert_eq!(h.edges, vec![1.0, 1.5, 2.0, 2.5, 3.0]);
        assert_eq!(h.counts, vec![1.0, 0.0, 2.0, 1.0]);
    }

    #[test]
    fn test_histogram_fixed_edges_ignores_outside() {
        let edges = stepped_edges(1.0, 200.0, 10.0);
        assert_eq!(edges.len(), 20);
        assert_eq!(edges[19], 191.0);
        let h = Histogram::with_edges(&[0.5, 1.0, 10.9, 11.0, 191.0, 250.0, f64::NAN], &edges);
        assert_eq!(h.counts.len(), 19);
        assert_eq!(h.counts[0], 2.0);
        assert_eq!(h.counts[1], 1.0);
        assert_eq!(h.counts[18], 1.0);
        assert_eq!(h.counts.iter().sum::<f64>(), 4.0);
    }

    #[test]
    fn test_box_stats_whiskers_and_fliers() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let b = BoxStats::from_data(&data).unwrap();
        assert_eq!(b.median, 3.5);
        assert_eq!(b.q1, 2.25);
        assert_eq!(b.q3, 4.75);
        assert_eq!(b.lower_whisker, 1.0);
        assert_eq!(b.upper_whisker, 5.0);
        assert_eq!(b.fliers, vec![100.0]);
        assert!(BoxStats::from_data(&[f64::NAN]).is_none());
    }

    #[test]
    fn test_pearson() {
        assert!((pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]) - 1.0).abs() < 1e-12);
        assert!((pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]) + 1.0).abs() < 1e-12);
        assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_nan());
        // Missing values drop the row pairwise
        let r = pearson(&[1.0, f64::NAN, 2.0, 3.0], &[1.0, 9.0, 2.0, 3.0]);
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_matrix_rounded() {
        let a = [1.0, 2.0, 2.0, 3.0];
        let b = [2.0, 2.0, 3.0, 3.0];
        let m = correlation_matrix(&[&a, &b], 3);
        assert_eq!(m[0][0], 1.0);
        assert_eq!(m[1][1], 1.0);
        assert_eq!(m[0][1], m[1][0]);
        assert_eq!(m[0][1], 0.707);
    }

    #[test]
    fn test_kde_1d_integrates_to_one() {
        let data: Vec<f64> = (0..50).map(|i| (i % 7) as f64).collect();
        let curve = kde_1d(&data, 400);
        assert_eq!(curve.len(), 400);
        let dx = curve[1].0 - curve[0].0;
        let area: f64 = curve.iter().map(|(_, d)| d * dx).sum();
        assert!((area - 1.0).abs() < 0.02);
        assert!(kde_1d(&[2.0, 2.0, 2.0], 10).is_empty());
    }

    #[test]
    fn test_kde_2d_singular_is_none() {
        let x = [1.0, 2.0, 3.0, 4.0];
        assert!(kde_2d(&x, &x, 10).is_none());
        let y = [2.0, 1.0, 4.0, 3.0];
        let grid = kde_2d(&x, &y, 10).unwrap();
        assert_eq!(grid.values.len(), 10);
        assert!(grid.max() > 0.0);
    }
}
