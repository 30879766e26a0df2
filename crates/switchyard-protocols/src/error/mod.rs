//! Error types for the Switchyard protocol layer.

mod definition;
mod dispatch;
mod provider;
mod registry;

pub use definition::*;
pub use dispatch::*;
pub use provider::*;
pub use registry::*;
