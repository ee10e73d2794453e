/// The five per-cell buffers of a fixed-size wave field.
/// Every buffer holds `width * height` cells addressed by `x + width * y`.

#[derive(Clone, Debug)]
pub struct WaveGrid {
    width: usize,
    height: usize,
    pub(crate) height_field: Vec<f32>,
    pub(crate) prev_height: Vec<f32>,
    pub(crate) vertical_derivative: Vec<f32>,
    pub(crate) obstruction: Vec<f32>,
    pub(crate) source: Vec<f32>,
}

impl WaveGrid {
    /// Still water, no obstruction, no pending sources.
    pub fn new(width: usize, height: usize) -> Self {
        let len = width * height;
        Self {
            width,
            height,
            height_field: vec![0.0; len],
            prev_height: vec![0.0; len],
            vertical_derivative: vec![0.0; len],
            obstruction: vec![1.0; len],
            source: vec![0.0; len],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        x + self.width * y
    }

    pub fn contains(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub(crate) fn buffers_consistent(&self) -> bool {
        let len = self.len();
        self.height_field.len() == len
            && self.prev_height.len() == len
            && self.vertical_derivative.len() == len
            && self.obstruction.len() == len
            && self.source.len() == len
    }

    /// Every cell back to open water.
    pub fn clear_obstruction(&mut self) {
        self.obstruction.fill(1.0);
    }

    /// Zeroes height, previous height and vertical derivative.
    pub fn clear_waves(&mut self) {
        self.height_field.fill(0.0);
        self.prev_height.fill(0.0);
        self.vertical_derivative.fill(0.0);
    }

    pub fn clear_source(&mut self) {
        self.source.fill(0.0);
    }

    pub fn heights(&self) -> &[f32] {
        &self.height_field
    }

    /// For seeding initial conditions between steps.
    pub fn heights_mut(&mut self) -> &mut [f32] {
        &mut self.height_field
    }

    pub fn prev_heights(&self) -> &[f32] {
        &self.prev_height
    }

    pub fn prev_heights_mut(&mut self) -> &mut [f32] {
        &mut self.prev_height
    }

    pub fn vertical_derivative(&self) -> &[f32] {
        &self.vertical_derivative
    }

    pub fn obstruction(&self) -> &[f32] {
        &self.obstruction
    }

    /// Painters blend multiplicatively; values near `[0, 1]` keep obstructed
    /// cells acting as energy sinks.
    pub fn obstruction_mut(&mut self) -> &mut [f32] {
        &mut self.obstruction
    }

    pub fn source(&self) -> &[f32] {
        &self.source
    }

    /// Painters blend additively; the next step consumes the whole buffer.
    pub fn source_mut(&mut self) -> &mut [f32] {
        &mut self.source
    }

    pub fn height_at(&self, x: usize, y: usize) -> f32 {
        self.height_field[self.idx(x, y)]
    }

    pub fn add_source(&mut self, x: usize, y: usize, amount: f32) {
        let i = self.idx(x, y);
        self.source[i] += amount;
    }

    pub fn scale_obstruction(&mut self, x: usize, y: usize, factor: f32) {
        let i = self.idx(x, y);
        self.obstruction[i] *= factor;
    }

    pub fn height_sq_sum(&self) -> f64 {
        self.height_field
            .iter()
            .map(|&h| (h as f64) * (h as f64))
            .sum()
    }
}
