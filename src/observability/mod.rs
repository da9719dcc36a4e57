//! Observability subsystem for aerofilter
//!
//! - Structured logging (JSON)
//! - Typed events
//! - Counters
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on compilation results
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use aerofilter::observability::{Event, Logger, MetricsRegistry, Severity};
//!
//! Logger::set_min_severity(Severity::Trace);
//! Logger::event(Event::SchemasLoaded, &[("count", "4")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_compilations();
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
