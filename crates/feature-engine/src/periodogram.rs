//! Lomb-Scargle Periodogram
//!
//! Generalized (floating-mean) Lomb-Scargle over irregularly sampled data on
//! an automatically sized frequency grid. Small grids are evaluated directly,
//! larger ones through FFT-based trigonometric sums.

use crate::fft::trig_sums;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, warn};

/// Powers within this relative distance of the maximum count as ties.
pub const TIE_TOLERANCE: f64 = 1e-9;

/// Denominators at or below this are treated as an absent model term.
const DEGENERATE_TERM: f64 = f64::EPSILON;

/// Grids longer than this use the FFT evaluation.
pub const FAST_MIN_FREQUENCIES: usize = 200;

/// Frequency grid parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridParams {
    /// Grid points across the width of one periodogram peak
    pub samples_per_peak: f64,
    /// Multiple of the average Nyquist frequency used as the upper bound
    pub nyquist_factor: f64,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            samples_per_peak: 5.0,
            nyquist_factor: 5.0,
        }
    }
}

/// Regular frequency grid `f_k = f_min + k * df`, `k < len`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyGrid {
    pub f_min: f64,
    pub df: f64,
    pub len: usize,
}

impl FrequencyGrid {
    /// Frequency at index `k`
    pub fn frequency(&self, k: usize) -> f64 {
        self.f_min + self.df * k as f64
    }

    /// All grid frequencies in ascending order
    pub fn frequencies(&self) -> Vec<f64> {
        (0..self.len).map(|k| self.frequency(k)).collect()
    }
}

/// Outcome of a periodogram search
#[derive(Debug, Clone, Default)]
pub struct PeriodogramResult {
    /// Frequency with maximum power
    pub best_frequency: f64,
    /// 1 / best_frequency
    pub best_period: f64,
    /// Power at best_frequency (NaN when no finite power exists)
    pub max_power: f64,
    /// Size of the evaluated grid
    pub n_frequencies: usize,
}

/// Lomb-Scargle analyzer
#[derive(Debug, Clone, Default)]
pub struct LombScargle {
    params: GridParams,
}

impl LombScargle {
    /// Create a new analyzer
    pub fn new(params: GridParams) -> Self {
        Self { params }
    }

    /// Grid parameters in use
    pub fn params(&self) -> GridParams {
        self.params
    }

    /// Regular frequency grid derived from the sampling baseline and count.
    ///
    /// `df = 1 / (baseline * samples_per_peak)`, starting at `df / 2` and
    /// reaching `nyquist_factor * N / (2 * baseline)`. `None` when the
    /// baseline is zero or not finite.
    pub fn grid(&self, time: &[f64]) -> Option<FrequencyGrid> {
        let t_min = time.iter().cloned().fold(f64::INFINITY, f64::min);
        let t_max = time.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let baseline = t_max - t_min;
        if !(baseline.is_finite() && baseline > 0.0) {
            return None;
        }

        let df = 1.0 / (baseline * self.params.samples_per_peak);
        let f_min = 0.5 * df;
        let avg_nyquist = 0.5 * time.len() as f64 / baseline;
        let f_max = self.params.nyquist_factor * avg_nyquist;

        let steps = ((f_max - f_min) / df).round_ties_even().max(0.0) as usize;
        Some(FrequencyGrid {
            f_min,
            df,
            len: steps + 1,
        })
    }

    /// Grid frequencies, empty when no grid can be built
    pub fn frequency_grid(&self, time: &[f64]) -> Vec<f64> {
        self.grid(time).map(|g| g.frequencies()).unwrap_or_default()
    }

    /// Normalized power at each frequency, evaluated directly.
    ///
    /// Power is the fraction of flux variance explained by a sinusoid plus
    /// offset, in `[0, 1]`. All entries are NaN when the flux has no variance.
    pub fn power(&self, time: &[f64], flux: &[f64], frequencies: &[f64]) -> Vec<f64> {
        let Some(centered) = Centered::new(time, flux) else {
            return vec![f64::NAN; frequencies.len()];
        };

        frequencies
            .iter()
            .map(|&f| Self::power_at(time, &centered, 2.0 * PI * f))
            .collect()
    }

    /// Normalized power over a regular grid from FFT-based sums.
    ///
    /// Matches [`LombScargle::power`] up to interpolation error, which grows
    /// toward the top of the grid.
    pub fn fast_power(&self, time: &[f64], flux: &[f64], grid: &FrequencyGrid) -> Vec<f64> {
        let Some(centered) = Centered::new(time, flux) else {
            return vec![f64::NAN; grid.len];
        };

        let w = centered.w;
        let weighted: Vec<f64> = centered.y.iter().map(|v| v * w).collect();
        let uniform = vec![w; time.len()];

        let sh = trig_sums(time, &weighted, grid.f_min, grid.df, grid.len);
        let single = trig_sums(time, &uniform, grid.f_min, grid.df, grid.len);
        let double = trig_sums(time, &uniform, 2.0 * grid.f_min, 2.0 * grid.df, grid.len);

        (0..grid.len)
            .map(|k| {
                let (s, c) = (single.sin[k], single.cos[k]);
                let two_phase = (double.sin[k] - 2.0 * s * c).atan2(double.cos[k] - (c * c - s * s));
                let (s2w, c2w) = two_phase.sin_cos();
                let (sw, cw) = (0.5 * two_phase).sin_cos();

                let c_tau = c * cw + s * sw;
                let s_tau = s * cw - c * sw;
                let yc = sh.cos[k] * cw + sh.sin[k] * sw - centered.y_mean * c_tau;
                let ys = sh.sin[k] * cw - sh.cos[k] * sw - centered.y_mean * s_tau;
                let cc = 0.5 * (1.0 + double.cos[k] * c2w + double.sin[k] * s2w) - c_tau * c_tau;
                let ss = 0.5 * (1.0 - double.cos[k] * c2w - double.sin[k] * s2w) - s_tau * s_tau;
                explained(yc, ys, cc, ss, centered.yy)
            })
            .collect()
    }

    fn power_at(time: &[f64], centered: &Centered, omega: f64) -> f64 {
        let w = centered.w;

        // Phase offset tau that decouples the sine and cosine terms
        let (mut s, mut c, mut s2, mut c2) = (0.0, 0.0, 0.0, 0.0);
        for &t in time {
            let (sin, cos) = (omega * t).sin_cos();
            s += sin;
            c += cos;
            s2 += 2.0 * sin * cos;
            c2 += 2.0 * (0.5 - sin * sin);
        }
        let (s, c) = (s * w, c * w);
        let s2 = s2 * w - 2.0 * s * c;
        let c2 = c2 * w - (c * c - s * s);
        let half_phase = 0.5 * s2.atan2(c2);

        let (mut yc, mut ys, mut cc, mut ss, mut c_tau, mut s_tau) =
            (0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        for (&t, &yi) in time.iter().zip(&centered.y) {
            let (sin, cos) = (omega * t - half_phase).sin_cos();
            yc += yi * cos;
            ys += yi * sin;
            cc += cos * cos;
            ss += sin * sin;
            c_tau += cos;
            s_tau += sin;
        }
        let (c_tau, s_tau) = (c_tau * w, s_tau * w);
        let yc = yc * w - centered.y_mean * c_tau;
        let ys = ys * w - centered.y_mean * s_tau;
        let cc = cc * w - c_tau * c_tau;
        let ss = ss * w - s_tau * s_tau;

        explained(yc, ys, cc, ss, centered.yy)
    }

    /// Find the dominant period.
    ///
    /// The lowest frequency whose power is within [`TIE_TOLERANCE`] of the
    /// maximum wins. With no finite power the first grid frequency is
    /// reported; with no grid the period is infinite.
    pub fn analyze(&self, time: &[f64], flux: &[f64]) -> PeriodogramResult {
        let Some(grid) = self.grid(time) else {
            warn!("Zero time baseline, period is undefined");
            return PeriodogramResult {
                best_frequency: 0.0,
                best_period: f64::INFINITY,
                max_power: f64::NAN,
                n_frequencies: 0,
            };
        };

        let powers = if grid.len > FAST_MIN_FREQUENCIES {
            self.fast_power(time, flux, &grid)
        } else {
            self.power(time, flux, &grid.frequencies())
        };
        let max_power = powers
            .iter()
            .cloned()
            .filter(|p| p.is_finite())
            .fold(f64::NEG_INFINITY, f64::max);

        let best_index = if max_power.is_finite() {
            let threshold = max_power - TIE_TOLERANCE * max_power.abs();
            powers
                .iter()
                .position(|&p| p.is_finite() && p >= threshold)
                .unwrap_or(0)
        } else {
            warn!("Periodogram has no finite power, using lowest grid frequency");
            0
        };

        let best_frequency = grid.frequency(best_index);
        debug!(
            "Periodogram: {} frequencies, best f={:.6} power={:.4}",
            grid.len,
            best_frequency,
            powers[best_index]
        );

        PeriodogramResult {
            best_frequency,
            best_period: 1.0 / best_frequency,
            max_power: powers[best_index],
            n_frequencies: grid.len,
        }
    }
}

/// Mean-subtracted flux with the unit weights and variance both evaluations share
struct Centered {
    y: Vec<f64>,
    w: f64,
    y_mean: f64,
    yy: f64,
}

impl Centered {
    /// `None` for empty or mismatched input and for flux without variance
    fn new(time: &[f64], flux: &[f64]) -> Option<Self> {
        let n = flux.len();
        if n == 0 || time.len() != n {
            return None;
        }

        let w = 1.0 / n as f64;
        let mean = flux.iter().sum::<f64>() * w;
        let y: Vec<f64> = flux.iter().map(|v| v - mean).collect();
        let y_mean = y.iter().sum::<f64>() * w;
        let yy = y.iter().map(|v| v * v).sum::<f64>() * w - y_mean * y_mean;
        if !(yy > 0.0) {
            return None;
        }
        Some(Self { y, w, y_mean, yy })
    }
}

// Explained variance, skipping a term whose basis function vanishes on the samples
fn explained(yc: f64, ys: f64, cc: f64, ss: f64, yy: f64) -> f64 {
    let mut p = 0.0;
    if cc > DEGENERATE_TERM {
        p += yc * yc / cc;
    }
    if ss > DEGENERATE_TERM {
        p += ys * ys / ss;
    }
    p / yy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_bounds() {
        let analyzer = LombScargle::default();
        let time: Vec<f64> = (0..9).map(f64::from).collect();
        let grid = analyzer.frequency_grid(&time);

        // baseline 8: df = 1/40, f_min = 1/80, f_max = 5 * 9/16
        assert_eq!(grid.len(), 113);
        assert!((grid[0] - 1.0 / 80.0).abs() < 1e-15);
        assert!((grid[1] - grid[0] - 1.0 / 40.0).abs() < 1e-12);
        assert!((grid[112] - 2.8125).abs() < 1e-12);
    }

    #[test]
    fn test_grid_struct_matches_frequencies() {
        let analyzer = LombScargle::default();
        let time: Vec<f64> = (0..9).map(f64::from).collect();
        let grid = analyzer.grid(&time).unwrap();
        assert_eq!(grid.len, 113);
        assert_eq!(grid.frequencies(), analyzer.frequency_grid(&time));
        assert_eq!(grid.frequency(0), grid.f_min);
    }

    #[test]
    fn test_grid_zero_baseline() {
        let analyzer = LombScargle::default();
        assert!(analyzer.grid(&[3.0, 3.0]).is_none());
        assert!(analyzer.frequency_grid(&[3.0, 3.0]).is_empty());
        assert!(analyzer.frequency_grid(&[3.0]).is_empty());
        assert!(analyzer.frequency_grid(&[]).is_empty());
    }

    #[test]
    fn test_alternating_signal_period() {
        let analyzer = LombScargle::default();
        let time: Vec<f64> = (0..8).map(f64::from).collect();
        let flux = vec![1.0, 5.0, 1.0, 5.0, 1.0, 5.0, 1.0, 5.0];
        let result = analyzer.analyze(&time, &flux);
        assert!((result.best_period - 2.0).abs() < 1e-6);
        assert!((result.max_power - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_irregular_sine_period() {
        let analyzer = LombScargle::default();
        let true_period = 3.7;
        // deterministic irregular spacing
        let time: Vec<f64> = (0..120)
            .map(|i| {
                let i = f64::from(i);
                i * 0.41 + 0.17 * (i * 1.3).sin().abs()
            })
            .collect();
        let flux: Vec<f64> = time
            .iter()
            .map(|t| 10.0 + 2.0 * (2.0 * PI * t / true_period).sin())
            .collect();

        let result = analyzer.analyze(&time, &flux);
        assert!(
            (result.best_period - true_period).abs() < 0.05,
            "period {}",
            result.best_period
        );
        assert!(result.max_power > 0.9);
    }

    fn two_tone(n: usize) -> (Vec<f64>, Vec<f64>) {
        let time: Vec<f64> = (0..n)
            .map(|i| {
                let i = i as f64;
                50.0 + i * 0.37 + 0.15 * (i * 2.3).sin().abs()
            })
            .collect();
        let flux: Vec<f64> = time
            .iter()
            .map(|t| 3.0 + 1.5 * (2.0 * PI * t / 5.3).sin() + 0.4 * (2.0 * PI * t / 1.7).cos())
            .collect();
        (time, flux)
    }

    #[test]
    fn test_fast_power_matches_direct() {
        let analyzer = LombScargle::default();
        let (time, flux) = two_tone(150);
        let grid = analyzer.grid(&time).unwrap();
        assert!(grid.len > FAST_MIN_FREQUENCIES);

        let fast = analyzer.fast_power(&time, &flux, &grid);
        let direct = analyzer.power(&time, &flux, &grid.frequencies());
        assert_eq!(fast.len(), direct.len());

        let argmax = |p: &[f64]| {
            p.iter()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
                .0
        };
        let lower = grid.len / 4;
        for k in 0..lower {
            assert!((fast[k] - direct[k]).abs() < 1e-2, "k={} fast={} direct={}", k, fast[k], direct[k]);
        }
        assert_eq!(argmax(&fast[..lower]), argmax(&direct[..lower]));
    }

    #[test]
    fn test_large_curve_period() {
        let analyzer = LombScargle::default();
        let (time, flux) = two_tone(4000);
        let result = analyzer.analyze(&time, &flux);
        assert!(result.n_frequencies > 40_000);
        assert!((result.best_period - 5.3).abs() < 0.01, "period {}", result.best_period);
    }

    #[test]
    fn test_power_is_normalized() {
        let analyzer = LombScargle::default();
        let time: Vec<f64> = (0..40).map(|i| f64::from(i) * 0.7 + f64::from(i % 3) * 0.05).collect();
        let flux: Vec<f64> = time.iter().map(|t| (t * 1.9).cos() + 0.3 * (t * 0.4).sin()).collect();
        let grid = analyzer.frequency_grid(&time);
        for p in analyzer.power(&time, &flux, &grid) {
            assert!((-1e-9..=1.0 + 1e-9).contains(&p), "power {}", p);
        }
    }

    #[test]
    fn test_constant_flux_uses_first_frequency() {
        let analyzer = LombScargle::default();
        let time = vec![0.0, 1.0, 2.5, 4.0];
        let result = analyzer.analyze(&time, &[2.0, 2.0, 2.0, 2.0]);
        assert!(result.max_power.is_nan());
        // 1 / f_min = 2 * samples_per_peak * baseline
        assert!((result.best_period - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_baseline_period_is_infinite() {
        let analyzer = LombScargle::default();
        let result = analyzer.analyze(&[1.0], &[5.0]);
        assert!(result.best_period.is_infinite());
        assert_eq!(result.n_frequencies, 0);
    }

    #[test]
    fn test_deterministic() {
        let analyzer = LombScargle::default();
        let time = vec![0.0, 0.3, 1.1, 1.7, 2.2, 3.9, 4.4, 5.0];
        let flux = vec![1.0, 2.0, 0.5, 1.5, 2.5, 0.2, 1.1, 1.9];
        let a = analyzer.analyze(&time, &flux);
        let b = analyzer.analyze(&time, &flux);
        assert_eq!(a.best_period.to_bits(), b.best_period.to_bits());
        assert_eq!(a.max_power.to_bits(), b.max_power.to_bits());
    }
}
