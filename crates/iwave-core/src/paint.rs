//! Brush painting onto the obstruction and source buffers.

use crate::grid::WaveGrid;
use serde::{Deserialize, Serialize};

/// Which buffer a dab writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaintMode {
    /// Multiplies the obstruction mask.
    #[default]
    Obstruction,
    /// Adds to the source accumulator.
    Source,
}

impl PaintMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaintMode::Obstruction => "obstruction",
            PaintMode::Source => "source",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "obstruction" | "o" => Some(PaintMode::Obstruction),
            "source" | "s" => Some(PaintMode::Source),
            _ => None,
        }
    }
}

/// 3x3 stamp indexed `[dx + 1][dy + 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    weights: [[f32; 3]; 3],
}

impl Brush {
    pub fn new(weights: [[f32; 3]; 3]) -> Self {
        Self { weights }
    }

    /// Fully blocks the centre, partially damps the ring.
    pub fn obstruction() -> Self {
        Self::new([[0.75, 0.5, 0.75], [0.5, 0.0, 0.5], [0.75, 0.5, 0.75]])
    }

    pub fn source() -> Self {
        Self::new([[0.25, 0.5, 0.25], [0.5, 1.0, 0.5], [0.25, 0.5, 0.25]])
    }

    pub fn for_mode(mode: PaintMode) -> Self {
        match mode {
            PaintMode::Obstruction => Self::obstruction(),
            PaintMode::Source => Self::source(),
        }
    }

    pub fn scaled(mut self, factor: f32) -> Self {
        for w in self.weights.iter_mut().flatten() {
            *w *= factor;
        }
        self
    }

    pub fn weight(&self, dx: isize, dy: isize) -> f32 {
        self.weights[(dx + 1) as usize][(dy + 1) as usize]
    }

    /// Stamps the brush centred on `(x, y)`; cells off the grid are skipped.
    /// Returns the number of cells touched.
    pub fn dab(&self, grid: &mut WaveGrid, mode: PaintMode, x: isize, y: isize) -> usize {
        let mut touched = 0;
        for dx in -1..=1 {
            for dy in -1..=1 {
                let (cx, cy) = (x + dx, y + dy);
                if !grid.contains(cx, cy) {
                    continue;
                }
                let w = self.weight(dx, dy);
                let (cx, cy) = (cx as usize, cy as usize);
                match mode {
                    PaintMode::Obstruction => grid.scale_obstruction(cx, cy, w),
                    PaintMode::Source => grid.add_source(cx, cy, w),
                }
                touched += 1;
            }
        }
        touched
    }
}
