use crate::config::{SimConfig, SimConfigError};
use log::debug;
use std::slice::ChunksExact;

/// Radially symmetric convolution kernel approximating the dispersion relation.
///
/// Each tap is the Bessel-weighted spectral integral at the tap's distance,
/// divided by the spectral weight integrated alone. Built once in f64 and
/// stored as f32 rows indexed `[dx + R][dy + R]`.
#[derive(Clone, Debug)]
pub struct DispersionKernel {
    radius: usize,
    sigma: f64,
    weights: Vec<f32>,
}

/// `k^2 * exp(-sigma * k^2)`
fn spectral_weight(k: f64, sigma: f64) -> f64 {
    k * k * (-sigma * k * k).exp()
}

/// Left-endpoint rectangle rule. `k` advances by accumulation, so the sample
/// count is whatever `k < k_max` admits after repeated `k += dk`.
fn integrate(k_max: f64, dk: f64, mut f: impl FnMut(f64) -> f64) -> f64 {
    let mut sum = 0.0;
    let mut k = 0.0;
    while k < k_max {
        sum += f(k);
        k += dk;
    }
    sum
}

impl DispersionKernel {
    pub const DEFAULT_RADIUS: usize = 6;
    pub const DEFAULT_SIGMA: f64 = 1.0;
    pub const K_MAX: f64 = 10.0;
    pub const DK: f64 = 0.01;

    pub fn new(radius: usize, sigma: f64) -> Self {
        Self::try_new(radius, sigma).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_new(radius: usize, sigma: f64) -> Result<Self, SimConfigError> {
        Self::try_with_quadrature(radius, sigma, Self::K_MAX, Self::DK)
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::with_quadrature(config.kernel_radius, config.sigma, config.k_max, config.dk)
    }

    pub fn with_quadrature(radius: usize, sigma: f64, k_max: f64, dk: f64) -> Self {
        Self::try_with_quadrature(radius, sigma, k_max, dk).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Rejects a zero or oversized radius, a non-positive sigma and any
    /// quadrature step outside `(0, k_max)` before integrating.
    pub fn try_with_quadrature(
        radius: usize,
        sigma: f64,
        k_max: f64,
        dk: f64,
    ) -> Result<Self, SimConfigError> {
        SimConfig::validate_kernel(radius, sigma, k_max, dk)?;
        let norm = integrate(k_max, dk, |k| spectral_weight(k, sigma));
        let r = radius as i64;
        let size = 2 * radius + 1;
        let mut weights = Vec::with_capacity(size * size);
        for dx in -r..=r {
            for dy in -r..=r {
                // Distance is taken in single precision before widening.
                let dist = ((dx * dx + dy * dy) as f32).sqrt() as f64;
                let tap = integrate(k_max, dk, |k| {
                    spectral_weight(k, sigma) * libm::j0(dist * k)
                });
                weights.push((tap / norm) as f32);
            }
        }
        debug!("built {size}x{size} dispersion kernel (sigma={sigma}, k_max={k_max}, dk={dk})");
        Ok(Self {
            radius,
            sigma,
            weights,
        })
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Side length of the square support, `2R + 1`.
    pub fn size(&self) -> usize {
        2 * self.radius + 1
    }

    /// Tap at offset `(dx, dy)`, each in `-R..=R`.
    pub fn weight(&self, dx: isize, dy: isize) -> f32 {
        let r = self.radius as isize;
        assert!(
            dx.abs() <= r && dy.abs() <= r,
            "kernel offset ({dx}, {dy}) outside radius {r}"
        );
        self.weights[(dx + r) as usize * self.size() + (dy + r) as usize]
    }

    /// Rows of taps, one per x offset from `-R` to `R`, each ordered by y offset.
    pub fn rows(&self) -> ChunksExact<'_, f32> {
        self.weights.chunks_exact(self.size())
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn sum(&self) -> f64 {
        self.weights.iter().map(|&w| w as f64).sum()
    }
}

impl Default for DispersionKernel {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RADIUS, Self::DEFAULT_SIGMA)
    }
}
