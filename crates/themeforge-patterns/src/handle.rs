//! Shared, hot-swappable registry snapshot.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::registry::PatternRegistry;

/// Cloneable handle to the current registry snapshot.
///
/// Readers take an `Arc` once and keep using it for a whole request; a
/// concurrent [`replace`](Self::replace) only affects later snapshots.
#[derive(Debug, Clone)]
pub struct RegistryHandle {
    current: Arc<RwLock<Arc<PatternRegistry>>>,
}

impl RegistryHandle {
    #[must_use]
    pub fn new(registry: PatternRegistry) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(registry))),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<PatternRegistry> {
        Arc::clone(&self.current.read())
    }

    /// Swap in a new snapshot, returning the previous one.
    pub fn replace(&self, registry: PatternRegistry) -> Arc<PatternRegistry> {
        let next = Arc::new(registry);
        let previous = std::mem::replace(&mut *self.current.write(), next);
        tracing::info!(
            previous = previous.digest(),
            current = self.current.read().digest(),
            "pattern registry replaced"
        );
        previous
    }
}

impl From<PatternRegistry> for RegistryHandle {
    fn from(registry: PatternRegistry) -> Self {
        Self::new(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_CATALOG: &str = r#"
[[presets]]
id = "generic"
"#;

    #[test]
    fn test_snapshot_survives_replace() {
        let handle = RegistryHandle::new(PatternRegistry::builtin().expect("builtin"));
        let before = handle.snapshot();
        let builtin_digest = before.digest().to_string();

        let previous = handle.replace(PatternRegistry::from_toml_str(SMALL_CATALOG).expect("small"));

        assert_eq!(previous.digest(), builtin_digest);
        assert_eq!(before.digest(), builtin_digest);
        assert!(before.get_definition("hero-centered").is_ok());
        assert_ne!(handle.snapshot().digest(), builtin_digest);
        assert!(handle.snapshot().get_definition("hero-centered").is_err());
    }

    #[test]
    fn test_clones_share_state() {
        let handle = RegistryHandle::new(PatternRegistry::builtin().expect("builtin"));
        let other = handle.clone();
        other.replace(PatternRegistry::from_toml_str(SMALL_CATALOG).expect("small"));
        assert_eq!(handle.snapshot().digest(), other.snapshot().digest());
    }
}
