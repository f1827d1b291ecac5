//! Shared helpers.

pub mod fs;
pub mod plural;

pub use fs::{read_input, write_output};
pub use plural::plural_count;
