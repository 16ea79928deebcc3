//! Provider adapter protocol definitions.
//!
//! Adapters talk to one LLM backend each and turn its wire format into a
//! provider-agnostic stream of text fragments.

mod keepalive;
mod lines;
mod model;
mod request;
mod traits;

pub use keepalive::*;
pub use lines::*;
pub use model::*;
pub use request::*;
pub use traits::*;
