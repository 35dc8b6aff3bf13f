//! FFT-based Trigonometric Sums
//!
//! Press & Rybicki extirpolation: irregular samples are spread onto a regular
//! grid with Lagrange weights, then one inverse FFT yields
//! `C_j = Σ h_i cos(2π f_j t_i)` and `S_j = Σ h_i sin(2π f_j t_i)` for every
//! `f_j = f0 + j * df` at once.

use rustfft::{num_complex::Complex, FftPlanner};
use std::f64::consts::PI;

/// FFT length per output frequency (rounded up to a power of two)
pub const OVERSAMPLING: usize = 5;

/// Grid points each sample is extirpolated onto
pub const EXTIRPOLATION_POINTS: usize = 4;

/// Sine and cosine sums over a regular frequency grid
#[derive(Debug, Clone, Default)]
pub struct TrigSums {
    pub sin: Vec<f64>,
    pub cos: Vec<f64>,
}

/// Weighted sine/cosine sums at `n` frequencies starting at `f0`, spaced `df`
pub fn trig_sums(time: &[f64], weights: &[f64], f0: f64, df: f64, n: usize) -> TrigSums {
    if n == 0 || time.is_empty() || !(df > 0.0) {
        return TrigSums {
            sin: vec![0.0; n],
            cos: vec![0.0; n],
        };
    }

    let n_fft = (n * OVERSAMPLING).next_power_of_two();
    let t0 = time.iter().cloned().fold(f64::INFINITY, f64::min);

    // Shift the grid to start at f0 by pre-rotating each sample
    let values: Vec<Complex<f64>> = time
        .iter()
        .zip(weights)
        .map(|(&t, &h)| {
            if f0 > 0.0 {
                Complex::from_polar(h, 2.0 * PI * f0 * (t - t0))
            } else {
                Complex::new(h, 0.0)
            }
        })
        .collect();
    let positions: Vec<f64> = time
        .iter()
        .map(|&t| ((t - t0) * n_fft as f64 * df).rem_euclid(n_fft as f64))
        .collect();

    let mut grid = extirpolate(&positions, &values, n_fft, EXTIRPOLATION_POINTS);
    FftPlanner::<f64>::new().plan_fft_inverse(n_fft).process(&mut grid);

    let mut sums = TrigSums {
        sin: Vec::with_capacity(n),
        cos: Vec::with_capacity(n),
    };
    for (j, &value) in grid.iter().take(n).enumerate() {
        let value = if t0 != 0.0 {
            value * Complex::from_polar(1.0, 2.0 * PI * t0 * (f0 + df * j as f64))
        } else {
            value
        };
        sums.cos.push(value.re);
        sums.sin.push(value.im);
    }
    sums
}

/// Spread each `(x, y)` onto the `m` grid points around `x` so that sums of
/// smooth functions over the grid match sums over the original abscissae.
fn extirpolate(x: &[f64], y: &[Complex<f64>], n: usize, m: usize) -> Vec<Complex<f64>> {
    let mut result = vec![Complex::new(0.0, 0.0); n];
    let factorial: f64 = (1..m).map(|k| k as f64).product();

    for (&xi, &yi) in x.iter().zip(y) {
        if xi.fract() == 0.0 {
            result[xi as usize % n] += yi;
            continue;
        }

        let ilo = ((xi - (m / 2) as f64) as i64).clamp(0, (n - m) as i64) as usize;
        let numerator = yi * (0..m).map(|k| xi - (ilo + k) as f64).product::<f64>();
        let mut denominator = factorial;
        for j in 0..m {
            if j > 0 {
                denominator *= j as f64 / (j as f64 - m as f64);
            }
            let index = ilo + (m - 1 - j);
            result[index] += numerator / (denominator * (xi - index as f64));
        }
    }
    result
}
