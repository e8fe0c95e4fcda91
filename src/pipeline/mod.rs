pub mod dedup;
pub mod extraction;
pub mod fields;
pub mod processor;
pub mod summary;

pub use processor::*;
