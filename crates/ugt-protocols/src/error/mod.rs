//! Error types for the UGT protocol layer.

mod provider;
mod translation;

pub use provider::*;
pub use translation::*;
