//! Identifier generation capability.
//!
//! User and task ids are opaque ULID strings. Generation sits behind a
//! trait so tests can use predictable ids.

use ulid::Ulid;

/// Source of fresh unique identifiers.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Default generator producing lowercase ULIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UlidGenerator;

impl IdGenerator for UlidGenerator {
    fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }
}

/// Test generator handing out `<prefix>-1`, `<prefix>-2`, ...
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: std::sync::atomic::AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: std::sync::atomic::AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&self) -> String {
        let n = self
            .counter
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
            + 1;
        format!("{}-{}", self.prefix, n)
    }
}
