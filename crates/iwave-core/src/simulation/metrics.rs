use super::step::convolve_interior;
use super::Simulation;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default)]
pub struct StepTimings {
    pub obstruction_us: u64,
    pub convolution_us: u64,
    pub integration_us: u64,
    pub total_us: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StepMetrics {
    pub step: usize,
    pub energy: f64,
    pub height_sq_sum: f64,
    pub max_abs_height: f32,
    pub mean_height: f32,
    pub non_finite_cells: usize,
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub steps: usize,
    pub sample_every: usize,
    pub width: usize,
    pub height: usize,
    pub final_energy: f64,
    pub samples: Vec<StepMetrics>,
}

impl Simulation {
    /// Discrete wave energy of the current `(h, hPrev)` pair:
    ///
    /// `Σh² − b·Σh·hPrev + p·ΣhPrev² + (gravity/(1+adt))·Σh·(K∗hPrev)`
    ///
    /// with `p = 1/(1+adt)`, `b = (2−adt)·p` and `K∗` the interior-only
    /// convolution used by `step`. In unobstructed, source-free water each
    /// step scales it by `p`.
    pub fn energy(&self) -> f64 {
        let grid = &self.grid;
        let adt = (self.config.alpha * self.config.dt) as f64;
        let p = 1.0 / (1.0 + adt);
        let b = (2.0 - adt) * p;
        let g = self.config.gravity() as f64 * p;

        let mut restoring = vec![0.0f32; grid.len()];
        convolve_interior(
            &self.kernel,
            grid.width(),
            grid.height(),
            &grid.prev_height,
            &mut restoring,
        );

        let mut energy = 0.0f64;
        for ((&h, &hp), &k_hp) in grid
            .height_field
            .iter()
            .zip(grid.prev_height.iter())
            .zip(restoring.iter())
        {
            let (h, hp, k_hp) = (h as f64, hp as f64, k_hp as f64);
            energy += h * h - b * h * hp + p * hp * hp + g * h * k_hp;
        }
        energy
    }

    /// Snapshot of the current field.
    pub fn metrics(&self) -> StepMetrics {
        let heights = self.grid.heights();
        let mut sum = 0.0f64;
        let mut max_abs = 0.0f32;
        let mut non_finite = 0usize;
        for &h in heights {
            if !h.is_finite() {
                non_finite += 1;
                continue;
            }
            sum += h as f64;
            max_abs = max_abs.max(h.abs());
        }
        let denom = heights.len().max(1) as f64;

        StepMetrics {
            step: self.step_index,
            energy: self.energy(),
            height_sq_sum: self.grid.height_sq_sum(),
            max_abs_height: max_abs,
            mean_height: (sum / denom) as f32,
            non_finite_cells: non_finite,
        }
    }
}
