//! Observable events
//!
//! Every log line the service emits is named by one of these.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Startup begins
    BootStart,
    /// Configuration loaded
    ConfigLoaded,
    /// Directory seeded from file
    SeedLoaded,
    /// Audit journal opened
    JournalOpened,
    /// HTTP listener bound, ready for requests
    Serving,
    /// Startup aborted
    BootFailed,

    // Hierarchy mutations
    /// Promotion committed
    PromotionCommitted,
    /// Demotion committed
    DemotionCommitted,
    /// Role removal committed
    RoleRemovalCommitted,
    /// Subordinate transfer committed
    TransferCommitted,
    /// Mutation rejected before any write
    MutationRejected,

    // Integrity
    /// Reports-to walk revisited a node
    CorruptChainDetected,
    /// Audit journal append failed; transaction aborted
    JournalAppendFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "NAMHATTA_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SeedLoaded => "DIRECTORY_SEED_LOADED",
            Event::JournalOpened => "AUDIT_JOURNAL_OPENED",
            Event::Serving => "NAMHATTA_SERVING",
            Event::BootFailed => "NAMHATTA_STARTUP_FAILED",

            Event::PromotionCommitted => "HIERARCHY_PROMOTION_COMMITTED",
            Event::DemotionCommitted => "HIERARCHY_DEMOTION_COMMITTED",
            Event::RoleRemovalCommitted => "HIERARCHY_ROLE_REMOVAL_COMMITTED",
            Event::TransferCommitted => "HIERARCHY_TRANSFER_COMMITTED",
            Event::MutationRejected => "HIERARCHY_MUTATION_REJECTED",

            Event::CorruptChainDetected => "HIERARCHY_CORRUPT_CHAIN",
            Event::JournalAppendFailed => "AUDIT_JOURNAL_APPEND_FAILED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::BootFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_screaming_snake_case() {
        let events = [
            Event::BootStart,
            Event::ConfigLoaded,
            Event::SeedLoaded,
            Event::JournalOpened,
            Event::Serving,
            Event::BootFailed,
            Event::PromotionCommitted,
            Event::DemotionCommitted,
            Event::RoleRemovalCommitted,
            Event::TransferCommitted,
            Event::MutationRejected,
            Event::CorruptChainDetected,
            Event::JournalAppendFailed,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_fatal_events() {
        assert!(Event::BootFailed.is_fatal());
        assert!(!Event::CorruptChainDetected.is_fatal());
        assert_eq!(format!("{}", Event::CorruptChainDetected), "HIERARCHY_CORRUPT_CHAIN");
    }
}
