use crate::grid::WaveGrid;

/// Height field mapped to `[0, 1]`-ish luminance, dimmed by the obstruction mask.
#[derive(Clone, Debug)]
pub struct DisplayMap {
    width: usize,
    height: usize,
    scaling_factor: f32,
    pixels: Vec<f32>,
}

impl DisplayMap {
    /// Per-keypress change of the scaling factor.
    pub const ZOOM_STEP: f32 = 0.9;

    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            scaling_factor: 1.0,
            pixels: vec![0.5; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn scaling_factor(&self) -> f32 {
        self.scaling_factor
    }

    pub fn rescale(&mut self, amount: f32) {
        self.scaling_factor *= amount;
    }

    /// Smaller heights become visible.
    pub fn zoom_in(&mut self) {
        self.rescale(Self::ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.rescale(1.0 / Self::ZOOM_STEP);
    }

    /// `0.5 * (h / scale + 1) * obs` per cell.
    pub fn refresh(&mut self, grid: &WaveGrid) {
        debug_assert_eq!(grid.len(), self.pixels.len());
        let scale = self.scaling_factor;
        for ((px, &h), &obs) in self
            .pixels
            .iter_mut()
            .zip(grid.heights())
            .zip(grid.obstruction())
        {
            *px = 0.5 * (h / scale + 1.0) * obs;
        }
    }

    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    /// 8-bit grey levels, rows top to bottom. Grid row 0 is the bottom of the
    /// image, so rows are emitted in reverse.
    pub fn to_luminance_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len());
        for row in self.pixels.chunks_exact(self.width.max(1)).rev() {
            out.extend(row.iter().map(|&v| {
                let v = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
                (v * 255.0).round() as u8
            }));
        }
        out
    }
}
