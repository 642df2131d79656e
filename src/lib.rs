//! revtrack: review analysis report
//!
//! Normalizes a flat review snapshot, aggregates it per publisher and per
//! premise, and drives chart/legend/counter collaborators.

pub mod cli;
pub mod config;
pub mod render;
pub mod report;
pub mod services;
pub mod types;
