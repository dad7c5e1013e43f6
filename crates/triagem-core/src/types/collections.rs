//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;

/// SmallVec optimized for per-record hazards (usually none or one).
pub type SmallVec2<T> = SmallVec<[T; 2]>;

/// SmallVec optimized for highlight segments (usually <8).
pub type SmallVec8<T> = SmallVec<[T; 8]>;
