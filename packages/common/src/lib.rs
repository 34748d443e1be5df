pub mod api;
pub mod equipment;
pub mod format;

pub use equipment::{DEFAULT_MAX_BATCHES, REQUIRED_COLUMNS};
