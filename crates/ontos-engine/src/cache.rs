//! Per-scope snapshot cache using moka
//!
//! Stores one [`Ontology`] per [`Scope`]. Entries are never invalidated by
//! mutations; callers clear a scope (or everything) explicitly.
//!
//! A workspace whose snapshot contains nothing private is stored as the
//! public snapshot, so identical data is not cached twice.

use crate::error::OntologyResult;
use moka::sync::Cache;
use ontos_model::{Ontology, Scope};
use std::sync::Arc;

/// Loader invoked on a cache miss
pub type SnapshotLoader<'a> = dyn Fn(&Scope) -> OntologyResult<Ontology> + 'a;

/// Concurrent scope-keyed snapshot cache
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    inner: Cache<Scope, Arc<Ontology>>,
}

impl SnapshotCache {
    /// Create cache holding at most `max_capacity` scopes
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Cached snapshot for a scope
    #[inline]
    #[must_use]
    pub fn get(&self, scope: &Scope) -> Option<Arc<Ontology>> {
        self.inner.get(scope)
    }

    /// Check if a scope is cached
    #[inline]
    #[must_use]
    pub fn contains(&self, scope: &Scope) -> bool {
        self.inner.contains_key(scope)
    }

    /// Return the cached snapshot or build and store it
    ///
    /// Concurrent misses for the same scope may each build a snapshot; the
    /// results are equivalent and the last insert wins.
    ///
    /// # Errors
    /// Propagates loader failures; nothing is cached in that case
    pub fn get_or_load(
        &self,
        scope: &Scope,
        load: &SnapshotLoader<'_>,
    ) -> OntologyResult<Arc<Ontology>> {
        if let Some(hit) = self.inner.get(scope) {
            tracing::trace!(%scope, "snapshot cache hit");
            return Ok(hit);
        }
        tracing::trace!(%scope, "snapshot cache miss");

        let snapshot = load(scope)?;
        let stored = if !scope.is_public() && snapshot.sandbox_status().is_public() {
            self.get_or_load(&Scope::Public, load)?
        } else {
            Arc::new(snapshot)
        };
        self.inner.insert(scope.clone(), Arc::clone(&stored));
        Ok(stored)
    }

    /// Evict one scope
    #[inline]
    pub fn invalidate(&self, scope: &Scope) {
        self.inner.invalidate(scope);
    }

    /// Evict every scope
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Approximate number of cached scopes
    #[inline]
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontos_model::{
        Concept, ElementCore, ElementId, ElementKind, Iri, Visibility, WorkspaceId,
        ROOT_CONCEPT_IRI,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn concept(iri: &str, visibility: Visibility, scope: &Scope) -> Concept {
        let id = ElementId::derive(ElementKind::Concept, iri, scope);
        Concept::new(ElementCore::new(id, Iri::new(iri), visibility, scope.clone()), None)
    }

    fn public_only(scope: &Scope) -> OntologyResult<Ontology> {
        Ok(Ontology::new(
            scope.clone(),
            vec![concept(ROOT_CONCEPT_IRI, Visibility::public(), scope)],
            vec![],
            vec![],
        ))
    }

    #[test]
    fn hit_skips_loader() {
        let cache = SnapshotCache::new(8);
        let calls = AtomicUsize::new(0);
        let load = |scope: &Scope| {
            calls.fetch_add(1, Ordering::SeqCst);
            public_only(scope)
        };
        let a = cache.get_or_load(&Scope::Public, &load).unwrap();
        let b = cache.get_or_load(&Scope::Public, &load).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unchanged_workspace_shares_public_snapshot() {
        let cache = SnapshotCache::new(8);
        let w1 = Scope::workspace("w1");
        let public = cache.get_or_load(&Scope::Public, &public_only).unwrap();
        let workspace = cache.get_or_load(&w1, &public_only).unwrap();
        assert!(Arc::ptr_eq(&public, &workspace));
        assert_eq!(workspace.scope(), &Scope::Public);
    }

    #[test]
    fn private_workspace_keeps_own_snapshot() {
        let cache = SnapshotCache::new(8);
        let w1 = Scope::workspace("w1");
        let load = |scope: &Scope| -> OntologyResult<Ontology> {
            let mut concepts = vec![concept(ROOT_CONCEPT_IRI, Visibility::public(), scope)];
            if let Some(ws) = scope.workspace_id() {
                concepts.push(concept("http://x#mine", Visibility::workspace(ws.clone()), scope));
            }
            Ok(Ontology::new(scope.clone(), concepts, vec![], vec![]))
        };
        let snapshot = cache.get_or_load(&w1, &load).unwrap();
        assert_eq!(snapshot.concept_count(), 2);
        assert!(!cache.contains(&Scope::Public));
    }

    #[test]
    fn invalidate_one_scope() {
        let cache = SnapshotCache::new(8);
        let w1 = Scope::workspace("w1");
        let w2 = Scope::workspace("w2");
        let load = |scope: &Scope| -> OntologyResult<Ontology> {
            let ws = scope.workspace_id().cloned().unwrap_or_else(|| WorkspaceId::new("none"));
            Ok(Ontology::new(
                scope.clone(),
                vec![concept("http://x#mine", Visibility::workspace(ws), scope)],
                vec![],
                vec![],
            ))
        };
        cache.get_or_load(&w1, &load).unwrap();
        cache.get_or_load(&w2, &load).unwrap();
        cache.invalidate(&w1);
        assert!(!cache.contains(&w1));
        assert!(cache.contains(&w2));
        cache.invalidate_all();
        assert!(!cache.contains(&w2));
    }

    #[test]
    fn failed_load_is_not_cached() {
        let cache = SnapshotCache::default();
        let failing = |_: &Scope| -> OntologyResult<Ontology> {
            Err(crate::error::OntologyError::invariant("boom"))
        };
        assert!(cache.get_or_load(&Scope::Public, &failing).is_err());
        assert!(!cache.contains(&Scope::Public));
        assert_eq!(cache.entry_count(), 0);
    }
}
