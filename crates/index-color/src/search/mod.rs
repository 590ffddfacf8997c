//! The four interchangeable search strategies.

mod brute_force;
mod cube;
mod dimensions;
pub mod octree;

pub use brute_force::nearest_brute_force;
pub use cube::{build_cube_table, cube_index, cube_table_len};
pub use dimensions::dimension_lookup;
pub use octree::{Nearest, OctTree, Slot, TreeSearch};
