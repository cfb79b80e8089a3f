//! Change detection.

mod change_set;
mod comparer;

pub use change_set::{Change, ChangeSet};
pub use comparer::Comparer;
