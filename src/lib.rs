pub mod error;
pub mod math;
pub mod operations;
pub mod progress;
pub mod topology;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{MeshTreeError, Result};
