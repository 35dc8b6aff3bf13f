//! Statistical Features Computation

/// Descriptive statistics of a flux series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FluxStatistics {
    /// Mean value
    pub mean: f64,
    /// Population standard deviation (divides by N)
    pub std_dev: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// max - min
    pub amplitude: f64,
    /// 95th percentile
    pub p95: f64,
    /// 5th percentile
    pub p5: f64,
    /// Number of strict interior local maxima
    pub num_peaks: usize,
}

impl FluxStatistics {
    /// Compute statistics from a slice of values
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;

        // Min/Max
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        // Constant series short-circuit so rounding in the sum cannot leak a
        // non-zero deviation.
        let (mean, std_dev) = if min == max {
            (min, 0.0)
        } else {
            let mean = values.iter().sum::<f64>() / n;
            (mean, population_std(values, mean))
        };

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Self {
            mean,
            std_dev,
            min,
            max,
            amplitude: max - min,
            p95: percentile_sorted(&sorted, 95.0),
            p5: percentile_sorted(&sorted, 5.0),
            num_peaks: count_peaks(values),
        }
    }
}

// Plain sum of squares, redone on deviations scaled into [-2, 2] when the
// squares underflow (tiny spread) or overflow (huge values).
fn population_std(values: &[f64], mean: f64) -> f64 {
    let n = values.len() as f64;
    let m2: f64 = values.iter().map(|&v| (v - mean) * (v - mean)).sum();
    if m2.is_normal() {
        return (m2 / n).sqrt();
    }

    let scale = values.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    let m2: f64 = values
        .iter()
        .map(|&v| {
            let d = (v - mean) / scale;
            d * d
        })
        .sum();
    scale * (m2 / n).sqrt()
}

/// Percentile of an ascending slice with linear interpolation between the
/// two nearest ranks (`rank = p/100 * (N-1)`).
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    lerp(sorted[lo], sorted[hi], frac)
}

// Interpolates from the nearer endpoint so the result stays inside [a, b].
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    let diff = b - a;
    if t >= 0.5 {
        b - diff * (1.0 - t)
    } else {
        a + diff * t
    }
}

/// Count indices with `v[i] > v[i-1] && v[i] > v[i+1]`; endpoints never count.
pub fn count_peaks(values: &[f64]) -> usize {
    values
        .windows(3)
        .filter(|w| w[1] > w[0] && w[1] > w[2])
        .count()
}
