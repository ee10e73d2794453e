use crate::grid::WaveGrid;
use crate::paint::{Brush, PaintMode};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

/// Seeded random source drops, one chance per tick.
#[derive(Clone, Debug)]
pub struct Rain {
    rng: ChaCha12Rng,
    drop_probability: f64,
    brush: Brush,
}

impl Rain {
    pub fn new(seed: u64, drop_probability: f64, strength: f32) -> Self {
        let drop_probability = if drop_probability.is_nan() {
            0.0
        } else {
            drop_probability.clamp(0.0, 1.0)
        };
        Self {
            rng: ChaCha12Rng::seed_from_u64(seed),
            drop_probability,
            brush: Brush::source().scaled(strength),
        }
    }

    /// Possibly places one drop; returns its grid position.
    pub fn apply(&mut self, grid: &mut WaveGrid) -> Option<(usize, usize)> {
        if grid.is_empty() || !self.rng.random_bool(self.drop_probability) {
            return None;
        }
        let x = self.rng.random_range(0..grid.width());
        let y = self.rng.random_range(0..grid.height());
        self.brush
            .dab(grid, PaintMode::Source, x as isize, y as isize);
        Some((x, y))
    }
}
