//! Type definitions for revtrack

mod error;
mod review;

pub use error::*;
pub use review::*;
