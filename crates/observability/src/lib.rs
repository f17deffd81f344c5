//! Tracing and logging (shared setup).

pub mod tracing;

pub use self::tracing::{filter_directives, init, init_with};
