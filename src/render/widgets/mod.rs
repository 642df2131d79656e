//! Report widgets

pub mod counters;
pub mod legend;
pub mod share;
pub mod trend;
