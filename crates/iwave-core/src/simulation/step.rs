use super::metrics::StepTimings;
use super::Simulation;
use crate::kernel::DispersionKernel;
use std::time::Instant;

/// Correlates `field` with `kernel` into `out` for every cell at least
/// `radius` away from each border. Cells in the outer ring are not written.
pub(crate) fn convolve_interior(
    kernel: &DispersionKernel,
    width: usize,
    height: usize,
    field: &[f32],
    out: &mut [f32],
) {
    let r = kernel.radius();
    debug_assert!(field.len() == width * height && out.len() == width * height);
    for y in r..height.saturating_sub(r) {
        for x in r..width.saturating_sub(r) {
            let mut acc = 0.0f32;
            for (ox, row) in kernel.rows().enumerate() {
                let sx = x + ox - r;
                for (oy, &w) in row.iter().enumerate() {
                    acc += w * field[sx + width * (y + oy - r)];
                }
            }
            out[x + width * y] = acc;
        }
    }
}

impl Simulation {
    /// Suppress existing energy inside obstructed cells.
    fn step_obstruction_phase(&mut self) {
        for (h, &obs) in self
            .grid
            .height_field
            .iter_mut()
            .zip(self.grid.obstruction.iter())
        {
            *h *= obs;
        }
    }

    fn step_vertical_derivative_phase(&mut self) {
        let grid = &mut self.grid;
        convolve_interior(
            &self.kernel,
            grid.width(),
            grid.height(),
            &grid.height_field,
            &mut grid.vertical_derivative,
        );
    }

    /// Damped second-order update. Sources are injected after damping and the
    /// obstruction is applied last; `hPrev` takes the pre-update height.
    fn step_integration_phase(&mut self) {
        let adt = self.config.alpha * self.config.dt;
        let adt2 = 1.0 / (1.0 + adt);
        let gravity = self.config.gravity();
        let grid = &mut self.grid;
        let cells = grid
            .height_field
            .iter_mut()
            .zip(grid.prev_height.iter_mut())
            .zip(grid.vertical_derivative.iter())
            .zip(grid.source.iter_mut())
            .zip(grid.obstruction.iter());
        for ((((h, h_prev), &vd), src), &obs) in cells {
            let temp = *h;
            *h = *h * (2.0 - adt) - *h_prev - gravity * vd;
            *h *= adt2;
            *h += *src;
            *h *= obs;
            *h_prev = temp;
            *src = 0.0;
        }
    }

    /// Advance the field by one time step and consume the source buffer.
    pub fn step(&mut self) -> StepTimings {
        let total_start = Instant::now();
        debug_assert!(
            self.grid.buffers_consistent(),
            "wave grid buffers must all hold width * height cells"
        );
        self.step_index = self.step_index.saturating_add(1);

        let t0 = Instant::now();
        self.step_obstruction_phase();
        let obstruction_us = t0.elapsed().as_micros() as u64;

        let t1 = Instant::now();
        self.step_vertical_derivative_phase();
        let convolution_us = t1.elapsed().as_micros() as u64;

        let t2 = Instant::now();
        self.step_integration_phase();
        let integration_us = t2.elapsed().as_micros() as u64;

        StepTimings {
            obstruction_us,
            convolution_us,
            integration_us,
            total_us: total_start.elapsed().as_micros() as u64,
        }
    }
}
