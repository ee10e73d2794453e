use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// Simulation parameters. Missing JSON fields fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub width: usize,
    pub height: usize,
    /// Time step.
    pub dt: f32,
    /// Damping coefficient.
    pub alpha: f32,
    /// Unscaled gravitational acceleration; the integrator uses `gravity()`.
    pub gravity_accel: f32,
    pub kernel_radius: usize,
    /// Width of the Gaussian spectral weighting.
    pub sigma: f64,
    /// Upper bound of the wavenumber quadrature.
    pub k_max: f64,
    /// Wavenumber quadrature step.
    pub dk: f64,
    /// Seed for host-side randomness (rain scenario).
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            dt: 0.03,
            alpha: 0.3,
            gravity_accel: 9.8,
            kernel_radius: 6,
            sigma: 1.0,
            k_max: 10.0,
            dk: 0.01,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimConfigError {
    EmptyGrid { width: usize, height: usize },
    GridTooLarge { max: usize, width: usize, height: usize },
    CellCountOverflow,
    InvalidTimeStep(f32),
    InvalidDamping(f32),
    InvalidGravity(f32),
    InvalidKernelRadius { max: usize, actual: usize },
    InvalidSigma(f64),
    InvalidQuadrature { k_max: f64, dk: f64 },
}

impl fmt::Display for SimConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimConfigError::EmptyGrid { width, height } => {
                write!(f, "grid dimensions must be non-zero (got {width}x{height})")
            }
            SimConfigError::GridTooLarge { max, width, height } => write!(
                f,
                "grid dimensions {width}x{height} exceed supported maximum ({max} per side)"
            ),
            SimConfigError::CellCountOverflow => write!(f, "width * height overflows usize"),
            SimConfigError::InvalidTimeStep(dt) => {
                write!(f, "dt must be finite and positive (got {dt})")
            }
            SimConfigError::InvalidDamping(alpha) => {
                write!(f, "alpha must be finite and non-negative (got {alpha})")
            }
            SimConfigError::InvalidGravity(g) => {
                write!(f, "gravity_accel must be finite (got {g})")
            }
            SimConfigError::InvalidKernelRadius { max, actual } => {
                write!(f, "kernel_radius must be in 1..={max} (got {actual})")
            }
            SimConfigError::InvalidSigma(sigma) => {
                write!(f, "sigma must be finite and positive (got {sigma})")
            }
            SimConfigError::InvalidQuadrature { k_max, dk } => write!(
                f,
                "quadrature requires finite 0 < dk < k_max (got k_max={k_max}, dk={dk})"
            ),
        }
    }
}

impl Error for SimConfigError {}

impl SimConfig {
    pub const MAX_GRID_DIM: usize = 4096;
    pub const MAX_KERNEL_RADIUS: usize = 32;

    /// Gravity scaled by `dt^2`, as consumed by the time update.
    pub fn gravity(&self) -> f32 {
        self.gravity_accel * self.dt * self.dt
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn validate(&self) -> Result<(), SimConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(SimConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        if self.width > Self::MAX_GRID_DIM || self.height > Self::MAX_GRID_DIM {
            return Err(SimConfigError::GridTooLarge {
                max: Self::MAX_GRID_DIM,
                width: self.width,
                height: self.height,
            });
        }
        if self.width.checked_mul(self.height).is_none() {
            return Err(SimConfigError::CellCountOverflow);
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SimConfigError::InvalidTimeStep(self.dt));
        }
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(SimConfigError::InvalidDamping(self.alpha));
        }
        if !self.gravity_accel.is_finite() {
            return Err(SimConfigError::InvalidGravity(self.gravity_accel));
        }
        Self::validate_kernel(self.kernel_radius, self.sigma, self.k_max, self.dk)
    }

    /// Checks the kernel parameters on their own, for callers that build a
    /// kernel without a full grid config.
    pub fn validate_kernel(
        radius: usize,
        sigma: f64,
        k_max: f64,
        dk: f64,
    ) -> Result<(), SimConfigError> {
        if radius == 0 || radius > Self::MAX_KERNEL_RADIUS {
            return Err(SimConfigError::InvalidKernelRadius {
                max: Self::MAX_KERNEL_RADIUS,
                actual: radius,
            });
        }
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(SimConfigError::InvalidSigma(sigma));
        }
        if !k_max.is_finite() || !dk.is_finite() || dk <= 0.0 || dk >= k_max {
            return Err(SimConfigError::InvalidQuadrature { k_max, dk });
        }
        Ok(())
    }

    /// Replaces the grid size only where a dimension is given.
    pub fn with_size(mut self, width: Option<usize>, height: Option<usize>) -> Self {
        if let Some(width) = width {
            self.width = width;
        }
        if let Some(height) = height {
            self.height = height;
        }
        self
    }
}
