use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::basin::BasinId;

/// Order in which unvisited basins are picked up by the leveller.
///
/// The trapped volume does not depend on it; only the identity of the basin
/// that survives each contraction does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Order {
    #[default]
    RowMajor,
    Reverse,
    Shuffled(u64),
}

impl Order {
    /// Arranges `ids` (given in row-major order) into this order.
    pub fn arrange(self, mut ids: Vec<BasinId>) -> Vec<BasinId> {
        match self {
            Order::RowMajor => {}
            Order::Reverse => ids.reverse(),
            Order::Shuffled(seed) => ids.shuffle(&mut ChaCha8Rng::seed_from_u64(seed)),
        }
        ids
    }
}

#[derive(Clone, Debug, Default)]
pub struct Options {
    pub order: Order,
    /// Solve the grids of a batch on the rayon pool.
    pub parallel: bool,
    /// Record every raise and merge in the report.
    pub record_events: bool,
}
