//! Traffic accounting for tally.
//!
//! [`CounterStore`] accumulates per-identity byte counts and holds the
//! one-shot kick markers. [`Reconciler`] periodically drains the store into a
//! [`TrafficSink`] and merges the drained counters back when the push fails,
//! so a broken panel delays billing but never loses it.

pub mod collector;
mod error;
pub mod reporter;
pub mod sink;

pub use collector::{CounterEntry, CounterStore, Recorded, Snapshot};
pub use error::AgentError;
pub use reporter::Reconciler;
pub use sink::{HttpTrafficSink, TrafficSink};
