//! Observability subsystem
//!
//! - Structured logging (JSON)
//! - Operation counters
//! - Durable audit journal of committed hierarchy changes
//!
//! # Principles
//!
//! 1. Logging and metrics are read-only with respect to the directory
//! 2. No async or background threads
//! 3. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use namhatta::observability::{Event, Logger, MetricsRegistry};
//!
//! Logger::info(Event::SeedLoaded.as_str(), &[("devotees", "42")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_promotions();
//! ```

mod events;
mod logger;
mod metrics;
pub mod audit;

pub use audit::{read_journal, AuditJournal, FileAuditJournal, MemoryAuditJournal};
pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_fatal() {
        Severity::Fatal
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}
