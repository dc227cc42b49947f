use crate::models::DensityCurve;
use crate::stats;

const GRID_POINTS: usize = 100;

/// Bandwidth when every sample is identical; keeps the kernel from
/// degenerating to zero width.
const FALLBACK_BANDWIDTH: f64 = 1.0;

/// Grid padding when the sample range is zero, wide enough that the fallback
/// kernel's mass stays inside the evaluated domain.
const FALLBACK_PAD: f64 = 4.0;

fn gaussian_kernel(u: f64) -> f64 {
    (-0.5 * u * u).exp() / (2.0 * std::f64::consts::PI).sqrt()
}

/// Silverman's rule of thumb: 1.06 * sigma * n^(-1/5), with the population
/// standard deviation.
pub fn silverman_bandwidth(samples: &[f64]) -> f64 {
    let n = samples.len();
    if n == 0 {
        return FALLBACK_BANDWIDTH;
    }

    let std_dev = stats::describe(samples).std_dev;
    if std_dev == 0.0 {
        return FALLBACK_BANDWIDTH;
    }

    1.06 * std_dev * (n as f64).powf(-0.2)
}

/// Smoothed probability density of `samples`, evaluated on a uniform grid
/// over the padded sample range. Empty input yields an empty curve.
pub fn estimate(samples: &[f64]) -> DensityCurve {
    if samples.is_empty() {
        return DensityCurve {
            x: Vec::new(),
            y: Vec::new(),
        };
    }

    let bandwidth = silverman_bandwidth(samples);
    let n = samples.len() as f64;

    let mut min = samples[0];
    let mut max = samples[0];
    for &s in samples {
        min = min.min(s);
        max = max.max(s);
    }

    let range = max - min;
    let pad = if range == 0.0 {
        FALLBACK_PAD
    } else {
        0.1 * range
    };

    let start = min - pad;
    let span = range + 2.0 * pad;

    let mut x = Vec::with_capacity(GRID_POINTS);
    let mut y = Vec::with_capacity(GRID_POINTS);

    for i in 0..GRID_POINTS {
        let xi = start + span * i as f64 / (GRID_POINTS - 1) as f64;

        let mut density = 0.0;
        for &sample in samples {
            density += gaussian_kernel((xi - sample) / bandwidth);
        }
        density /= n * bandwidth;

        x.push(xi);
        y.push(density);
    }

    DensityCurve { x, y }
}
