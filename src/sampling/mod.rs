//! The sampling-and-aggregation loop.
//!
//! A [`Supervisor`](supervisor::Supervisor) ticks every
//! [`Aggregator`](aggregator::Aggregator) once per sampling interval; after a
//! fixed number of ticks each aggregator averages its
//! [`SampleWindow`](window::SampleWindow) into one [`LogRow`](data::LogRow).

pub mod aggregator;
pub mod data;
pub mod supervisor;
pub mod window;

// Re-export commonly used items
pub use aggregator::Aggregator;
pub use data::{LogRow, Reading};
pub use supervisor::{RunSummary, Supervisor};
pub use window::SampleWindow;
