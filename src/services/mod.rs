//! Services for review normalization and aggregation

pub mod aggregator;
pub mod dates;
pub mod loader;
pub mod providers;
pub mod store;
pub mod timeseries;

pub use aggregator::{Aggregator, GroupOptions, PublisherGroups};
pub use loader::{InputSource, SnapshotLoader};
pub use store::ReviewStore;
pub use timeseries::{TimeAxis, TimeSeriesBuilder};
