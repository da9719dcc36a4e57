//! Observability events for aerofilter
//!
//! Events are explicit and typed; each carries its own log severity.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Startup
    /// Configuration loaded
    ConfigLoaded,
    /// Schema definitions loaded
    SchemasLoaded,

    // Filters
    /// Filter document decoded into expressions
    FilterDecoded,
    /// Filter document as received, before compiling
    FilterDocument,
    /// Compilation started
    FilterCompileBegin,
    /// Compilation produced a predicate
    FilterCompileComplete,
    /// Compilation failed
    FilterCompileRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::FilterDecoded => "FILTER_DECODED",
            Event::FilterDocument => "FILTER_DOCUMENT",
            Event::FilterCompileBegin => "FILTER_COMPILE_BEGIN",
            Event::FilterCompileComplete => "FILTER_COMPILE_COMPLETE",
            Event::FilterCompileRejected => "FILTER_COMPILE_REJECTED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ConfigLoaded | Event::SchemasLoaded => Severity::Info,
            Event::FilterCompileRejected => Severity::Warn,
            Event::FilterDecoded
            | Event::FilterDocument
            | Event::FilterCompileBegin
            | Event::FilterCompileComplete => Severity::Trace,
        }
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
    fn test_all_events_have_string_representation() {
        let events = [
            Event::ConfigLoaded,
            Event::SchemasLoaded,
            Event::FilterDecoded,
            Event::FilterDocument,
            Event::FilterCompileBegin,
            Event::FilterCompileComplete,
            Event::FilterCompileRejected,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_rejections_are_visible_by_default() {
        assert!(Event::FilterCompileRejected.severity() > Severity::Info);
        assert_eq!(Event::FilterCompileBegin.severity(), Severity::Trace);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::SchemasLoaded), "SCHEMAS_LOADED");
    }
}
