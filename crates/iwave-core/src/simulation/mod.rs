pub mod metrics;
pub mod step;
#[cfg(test)]
mod tests;

pub use metrics::*;

use crate::config::{SimConfig, SimConfigError};
use crate::grid::WaveGrid;
use crate::kernel::DispersionKernel;
use log::info;
use std::{error::Error, fmt};

/// Owned simulation state: the grid, its kernel and the physical constants.
pub struct Simulation {
    pub(crate) grid: WaveGrid,
    pub(crate) kernel: DispersionKernel,
    pub(crate) config: SimConfig,
    pub(crate) step_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimInitError {
    Config(SimConfigError),
    KernelRadiusMismatch { expected: usize, actual: usize },
}

impl fmt::Display for SimInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimInitError::Config(e) => write!(f, "{}", e),
            SimInitError::KernelRadiusMismatch { expected, actual } => write!(
                f,
                "kernel radius ({actual}) must match config.kernel_radius ({expected})"
            ),
        }
    }
}

impl From<SimConfigError> for SimInitError {
    fn from(err: SimConfigError) -> Self {
        SimInitError::Config(err)
    }
}

impl Error for SimInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SimInitError::Config(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExperimentError {
    InvalidSampleEvery,
    TooManySteps { max: usize, actual: usize },
    TooManySamples { max: usize, actual: usize },
}

impl fmt::Display for ExperimentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperimentError::InvalidSampleEvery => write!(f, "sample_every must be positive"),
            ExperimentError::TooManySteps { max, actual } => {
                write!(f, "steps ({actual}) exceed supported maximum ({max})")
            }
            ExperimentError::TooManySamples { max, actual } => {
                write!(
                    f,
                    "sample count ({actual}) exceeds supported maximum ({max})"
                )
            }
        }
    }
}

impl Error for ExperimentError {}

impl Simulation {
    pub const MAX_EXPERIMENT_STEPS: usize = 1_000_000;
    pub const MAX_EXPERIMENT_SAMPLES: usize = 50_000;

    /// Panics on an invalid config.
    pub fn new(config: SimConfig) -> Self {
        Self::try_new(config).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_new(config: SimConfig) -> Result<Self, SimInitError> {
        config.validate()?;
        let kernel = DispersionKernel::from_config(&config);
        Self::try_with_kernel(config, kernel)
    }

    /// Reuses a prebuilt kernel, e.g. across several grids of the same config.
    pub fn try_with_kernel(
        config: SimConfig,
        kernel: DispersionKernel,
    ) -> Result<Self, SimInitError> {
        config.validate()?;
        if kernel.radius() != config.kernel_radius {
            return Err(SimInitError::KernelRadiusMismatch {
                expected: config.kernel_radius,
                actual: kernel.radius(),
            });
        }
        info!(
            "initialized {}x{} wave grid (dt={}, alpha={}, gravity={})",
            config.width,
            config.height,
            config.dt,
            config.alpha,
            config.gravity()
        );
        Ok(Self {
            grid: WaveGrid::new(config.width, config.height),
            kernel,
            config,
            step_index: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn kernel(&self) -> &DispersionKernel {
        &self.kernel
    }

    pub fn grid(&self) -> &WaveGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut WaveGrid {
        &mut self.grid
    }

    /// Number of steps taken since construction.
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn clear_obstruction(&mut self) {
        self.grid.clear_obstruction();
    }

    pub fn clear_waves(&mut self) {
        self.grid.clear_waves();
    }

    pub fn clear_source(&mut self) {
        self.grid.clear_source();
    }

    fn check_experiment(steps: usize, sample_every: usize) -> Result<usize, ExperimentError> {
        if sample_every == 0 {
            return Err(ExperimentError::InvalidSampleEvery);
        }
        if steps > Self::MAX_EXPERIMENT_STEPS {
            return Err(ExperimentError::TooManySteps {
                max: Self::MAX_EXPERIMENT_STEPS,
                actual: steps,
            });
        }
        let estimated_samples = if steps == 0 {
            0
        } else {
            ((steps - 1) / sample_every) + 1
        };
        if estimated_samples > Self::MAX_EXPERIMENT_SAMPLES {
            return Err(ExperimentError::TooManySamples {
                max: Self::MAX_EXPERIMENT_SAMPLES,
                actual: estimated_samples,
            });
        }
        Ok(estimated_samples)
    }

    pub fn run_experiment(&mut self, steps: usize, sample_every: usize) -> RunSummary {
        self.try_run_experiment(steps, sample_every)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_run_experiment(
        &mut self,
        steps: usize,
        sample_every: usize,
    ) -> Result<RunSummary, ExperimentError> {
        self.try_run_experiment_with(steps, sample_every, |_, _| {})
    }

    /// Like `try_run_experiment`, but calls `before_step` with the grid and the
    /// 1-based step number ahead of every step, so a host can paint sources
    /// or obstructions between ticks.
    pub fn try_run_experiment_with<F>(
        &mut self,
        steps: usize,
        sample_every: usize,
        mut before_step: F,
    ) -> Result<RunSummary, ExperimentError>
    where
        F: FnMut(&mut WaveGrid, usize),
    {
        let estimated_samples = Self::check_experiment(steps, sample_every)?;
        let mut samples = Vec::with_capacity(estimated_samples);
        for step in 1..=steps {
            before_step(&mut self.grid, step);
            self.step();
            if step % sample_every == 0 || step == steps {
                samples.push(self.metrics());
            }
        }
        Ok(RunSummary {
            schema_version: 1,
            steps,
            sample_every,
            width: self.grid.width(),
            height: self.grid.height(),
            final_energy: self.energy(),
            samples,
        })
    }
}
