use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::geometry::{Bounds, Position, Size};

/// Source of spawn positions for the snake and the food.
pub struct RandomPositionGenerator {
    rng: StdRng,
}

impl RandomPositionGenerator {
    pub fn from_seed(seed: u64) -> Self {
        RandomPositionGenerator { rng: StdRng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        RandomPositionGenerator { rng: StdRng::from_entropy() }
    }

    /// Any position where an entity of `size` does not cross the far edges.
    pub fn anywhere(&mut self, bounds: &Bounds, size: Size) -> Position {
        let x = self.axis(bounds.origin.x, bounds.origin.x + bounds.size.width - size.width);
        let y = self.axis(bounds.origin.y, bounds.origin.y + bounds.size.height - size.height);
        Position::new(x, y)
    }

    /// A position that passes `in_bounds` for an entity of `size`.
    pub fn strictly_inside(&mut self, bounds: &Bounds, size: Size) -> Position {
        let x = self.axis(bounds.origin.x + 1, bounds.origin.x + bounds.size.width - size.width);
        let y = self.axis(bounds.origin.y + 1, bounds.origin.y + bounds.size.height - size.height);
        Position::new(x, y)
    }

    fn axis(&mut self, low: i32, high: i32) -> i32 {
        // Degenerate ranges are rejected by config validation
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..high)
    }
}
