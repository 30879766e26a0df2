//! Generation provider protocol definitions.
//!
//! Providers connect to generation backends and expose a submit / status /
//! result / cancel lifecycle for one unit of work.

mod status;
mod traits;

pub use status::*;
pub use traits::*;
