//! Sample types and the color distance metric.

mod distance;
mod sample;

pub use distance::{distance, plane_distance};
pub use sample::{index_capacity, unsigned_color, IndexSample, Sample, SampleType};
