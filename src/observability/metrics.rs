//! Metrics registry for aerofilter
//!
//! - Counters only
//! - Monotonic increase
//! - Thread-safe, lock-free

use std::sync::atomic::{AtomicU64, Ordering};

/// Filter counters, shareable between compilers with `Arc`
///
/// Counters use Relaxed ordering; readers only need eventual totals.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Documents decoded into expressions
    documents_decoded: AtomicU64,
    /// Successful compilations
    compilations: AtomicU64,
    /// Failed compilations
    rejections: AtomicU64,
    /// Joins created across all compilations
    joins_created: AtomicU64,
    /// Compilations that required duplicate elimination
    distinct_queries: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_documents_decoded(&self) {
        self.documents_decoded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_compilations(&self) {
        self.compilations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rejections(&self) {
        self.rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_joins(&self, joins: u64) {
        self.joins_created.fetch_add(joins, Ordering::Relaxed);
    }

    pub fn increment_distinct_queries(&self) {
        self.distinct_queries.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current snapshot of all metrics as JSON
    pub fn to_json(&self) -> String {
        let s = self.snapshot();
        format!(
            r#"{{"compilations":{},"distinct_queries":{},"documents_decoded":{},"joins_created":{},"rejections":{}}}"#,
            s.compilations, s.distinct_queries, s.documents_decoded, s.joins_created, s.rejections,
        )
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_decoded: self.documents_decoded.load(Ordering::Relaxed),
            compilations: self.compilations.load(Ordering::Relaxed),
            rejections: self.rejections.load(Ordering::Relaxed),
            joins_created: self.joins_created.load(Ordering::Relaxed),
            distinct_queries: self.distinct_queries.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub documents_decoded: u64,
    pub compilations: u64,
    pub rejections: u64,
    pub joins_created: u64,
    pub distinct_queries: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_zero_values() {
        let snapshot = MetricsRegistry::new().snapshot();
        assert_eq!(snapshot.compilations, 0);
        assert_eq!(snapshot.rejections, 0);
        assert_eq!(snapshot.joins_created, 0);
    }

    #[test]
    fn test_increment_counters() {
        let registry = MetricsRegistry::new();

        registry.increment_documents_decoded();
        registry.increment_compilations();
        registry.increment_compilations();
        registry.increment_rejections();
        registry.add_joins(3);
        registry.increment_distinct_queries();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.documents_decoded, 1);
        assert_eq!(snapshot.compilations, 2);
        assert_eq!(snapshot.rejections, 1);
        assert_eq!(snapshot.joins_created, 3);
        assert_eq!(snapshot.distinct_queries, 1);
    }

    #[test]
    fn test_to_json() {
        let registry = MetricsRegistry::new();
        registry.add_joins(2);
        registry.increment_compilations();

        let parsed: serde_json::Value = serde_json::from_str(&registry.to_json()).unwrap();
        assert_eq!(parsed["joins_created"], 2);
        assert_eq!(parsed["compilations"], 1);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let reg = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    reg.increment_compilations();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.snapshot().compilations, 1000);
    }
}
