//! iWave height-field simulation.
//!
//! The engine (`kernel`, `grid`, `simulation`) advances a 2D wave field with a
//! precomputed dispersion kernel. The host modules (`paint`, `display`, `host`,
//! `scenario`) drive it without any windowing dependency.

pub mod config;
pub mod display;
pub mod grid;
pub mod host;
pub mod kernel;
pub mod paint;
pub mod scenario;
pub mod simulation;

pub use config::{SimConfig, SimConfigError};
pub use display::DisplayMap;
pub use grid::WaveGrid;
pub use host::{Host, HostCommand};
pub use kernel::DispersionKernel;
pub use paint::{Brush, PaintMode};
pub use scenario::Rain;
pub use simulation::{
    ExperimentError, RunSummary, SimInitError, Simulation, StepMetrics, StepTimings,
};
