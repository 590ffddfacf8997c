//! Oct-tree nearest-neighbor search.
//!
//! The tree partitions bias-shifted color space into `2^N` octants per
//! level. A leaf marks the only palette color inside its cell, which is not
//! necessarily the closest color to every point of that cell, so the search
//! backtracks through neighbouring cells until the distance bounds prove no
//! unexplored region can hold a closer entry.

mod scan;
mod search;
mod stack;
mod tree;

pub use search::{Nearest, TreeSearch};
pub use stack::{BacktrackStack, MAX_DEPTH};
pub use tree::{octant, OctTree, Slot};

#[cfg(test)]
pub(crate) use search::tests::linear_nearest;
