// THEORY:
// Cluster identities are ephemeral handles that let a map client tell the bubbles
// of one response apart. They are minted fresh on every call and mean nothing
// afterwards, so the only requirement is uniqueness within a response.
//
// Generation sits behind the `ClusterIdGenerator` trait so the reconciler never
// reaches for global randomness directly. Production uses random v4 UUIDs; tests
// inject `SequentialIdGenerator` and get reproducible output.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Source of ephemeral cluster identities.
///
/// Identities only need to be unique within one response. They carry no meaning
/// across calls and are never persisted.
pub trait ClusterIdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs. The default generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl ClusterIdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `"<prefix>-<n>"` identities, counting from zero.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(0),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("cluster")
    }
}

impl ClusterIdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}

impl<G: ClusterIdGenerator + ?Sized> ClusterIdGenerator for &G {
    fn next_id(&self) -> String {
        (**self).next_id()
    }
}

impl<G: ClusterIdGenerator + ?Sized> ClusterIdGenerator for std::sync::Arc<G> {
    fn next_id(&self) -> String {
        (**self).next_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn uuid_generator_produces_distinct_parseable_ids() {
        let generator = UuidGenerator;
        let ids: HashSet<String> = (0..100).map(|_| generator.next_id()).collect();
        assert_eq!(ids.len(), 100);
        for id in &ids {
            assert!(Uuid::parse_str(id).is_ok());
        }
    }

    #[test]
    fn sequential_generator_counts_up() {
        let generator = SequentialIdGenerator::new("c");
        assert_eq!(generator.next_id(), "c-0");
        assert_eq!(generator.next_id(), "c-1");
        assert_eq!((&generator).next_id(), "c-2");
    }
}
