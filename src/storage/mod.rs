//! Durable storage for logged rows.

pub mod sink;

pub use sink::{CsvFileSink, LogSink, MemorySink};
