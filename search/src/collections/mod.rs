//! Growth- and ordering-aware containers shared across the search core.

pub mod ordered_set;
pub mod segmented_vec;

pub use ordered_set::OrderedSet;
pub use segmented_vec::{SegmentedArrayVec, SegmentedVec, SEGMENT_BYTES};
