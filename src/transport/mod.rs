/// Input discovery and output writing on the local filesystem.
pub mod fs;

pub use fs::{InputOverrides, OutputWriter, discover_input, resolve_inputs};
