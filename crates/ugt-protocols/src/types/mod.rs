//! Common types shared across UGT crates.

mod segment;
mod settings;
mod signal;

pub use segment::*;
pub use settings::*;
pub use signal::*;
