//! Hot-swappable identity cache.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use arc_swap::ArcSwap;

use crate::error::AuthError;
use crate::generation::IdentityGeneration;
use crate::record::IdentityRecord;
use crate::traits::IdentitySource;

/// Credential → identity cache holding exactly one installed generation.
///
/// Uses `ArcSwap` for lock-free reads and atomic replacement. Readers that
/// need several lookups against the same generation should take it once
/// with [`current`](Self::current).
pub struct IdentityCache {
    inner: ArcSwap<IdentityGeneration>,
    next_generation: AtomicU64,
}

impl IdentityCache {
    /// Create a cache holding the empty generation 0.
    pub fn new() -> Self {
        Self {
            inner: ArcSwap::from_pointee(IdentityGeneration::empty()),
            next_generation: AtomicU64::new(1),
        }
    }

    /// The currently installed generation.
    #[inline]
    pub fn current(&self) -> Arc<IdentityGeneration> {
        self.inner.load_full()
    }

    /// Look up a credential in the installed generation.
    #[inline]
    pub fn lookup(&self, credential: &str) -> Option<Arc<IdentityRecord>> {
        self.inner.load().lookup(credential).cloned()
    }

    /// Check whether an identity key exists in the installed generation.
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.load().contains_key(key)
    }

    /// Number of credentials in the installed generation.
    pub fn len(&self) -> usize {
        self.inner.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.load().is_empty()
    }

    /// Build a new generation from `records` and install it atomically.
    ///
    /// Returns the number of the installed generation. In-flight readers
    /// finish against the generation they loaded; new readers see the new one.
    pub fn install<I>(&self, records: I) -> u64
    where
        I: IntoIterator<Item = IdentityRecord>,
    {
        let number = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let generation = IdentityGeneration::build(number, records);
        tally_metrics::set_identities(generation.len());
        self.inner.store(Arc::new(generation));
        number
    }

    /// Fetch the identity list from `source` and install it.
    ///
    /// The fetch is bounded by `timeout`. On any error the installed
    /// generation is left untouched.
    pub async fn refresh<S>(&self, source: &S, timeout: Duration) -> Result<u64, AuthError>
    where
        S: IdentitySource + ?Sized,
    {
        let records = tokio::time::timeout(timeout, source.fetch())
            .await
            .map_err(|_| AuthError::Timeout(timeout))??;
        Ok(self.install(records))
    }
}

impl Default for IdentityCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IdentityCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let current = self.inner.load();
        f.debug_struct("IdentityCache")
            .field("generation", &current.number())
            .field("identities", &current.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicBool;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::*;

    /// Source that replays scripted results.
    struct ScriptedSource {
        results: Mutex<VecDeque<Result<Vec<IdentityRecord>, AuthError>>>,
    }

    impl ScriptedSource {
        fn new(results: Vec<Result<Vec<IdentityRecord>, AuthError>>) -> Self {
            Self {
                results: Mutex::new(results.into()),
            }
        }
    }

    #[async_trait]
    impl IdentitySource for ScriptedSource {
        async fn fetch(&self) -> Result<Vec<IdentityRecord>, AuthError> {
            self.results
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(AuthError::Transport("script exhausted".into())))
        }
    }

    struct SlowSource;

    #[async_trait]
    impl IdentitySource for SlowSource {
        async fn fetch(&self) -> Result<Vec<IdentityRecord>, AuthError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec![IdentityRecord::new("1", "late", None)])
        }
    }

    fn records(pairs: &[(&str, &str)]) -> Vec<IdentityRecord> {
        pairs
            .iter()
            .map(|(key, cred)| IdentityRecord::new(*key, *cred, None))
            .collect()
    }

    #[test]
    fn new_cache_is_empty() {
        let cache = IdentityCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.current().number(), 0);
        assert!(cache.lookup("anything").is_none());
    }

    #[test]
    fn install_replaces_not_merges() {
        let cache = IdentityCache::new();
        let first = cache.install(records(&[("1", "a"), ("2", "b")]));
        assert!(cache.lookup("a").is_some());

        let second = cache.install(records(&[("2", "b"), ("3", "c")]));
        assert!(second > first);
        assert!(cache.lookup("a").is_none(), "removed identity still authenticates");
        assert!(!cache.contains_key("1"));
        assert_eq!(cache.lookup("c").unwrap().key, "3");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn held_generation_survives_install() {
        let cache = IdentityCache::new();
        cache.install(records(&[("1", "a")]));
        let held = cache.current();
        cache.install(records(&[("2", "b")]));

        assert!(held.lookup("a").is_some());
        assert!(held.lookup("b").is_none());
        assert!(cache.lookup("b").is_some());
    }

    #[test]
    fn readers_never_see_mixed_generation() {
        let cache = IdentityCache::new();
        let old = records(&[("1", "old-a"), ("2", "old-b"), ("3", "old-c")]);
        let new = records(&[("4", "new-a"), ("5", "new-b"), ("6", "new-c")]);
        cache.install(old.clone());

        let stop = AtomicBool::new(false);
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    while !stop.load(Ordering::Relaxed) {
                        let generation = cache.current();
                        let olds = ["old-a", "old-b", "old-c"]
                            .iter()
                            .filter(|c| generation.lookup(c).is_some())
                            .count();
                        let news = ["new-a", "new-b", "new-c"]
                            .iter()
                            .filter(|c| generation.lookup(c).is_some())
                            .count();
                        assert!(
                            (olds == 3 && news == 0) || (olds == 0 && news == 3),
                            "mixed generation: {olds} old, {news} new"
                        );
                    }
                });
            }
            for i in 0..2_000 {
                if i % 2 == 0 {
                    cache.install(new.clone());
                } else {
                    cache.install(old.clone());
                }
            }
            stop.store(true, Ordering::Relaxed);
        });
    }

    #[tokio::test]
    async fn refresh_success_installs() {
        let cache = IdentityCache::new();
        let source = ScriptedSource::new(vec![Ok(records(&[("1", "a")]))]);
        let number = cache
            .refresh(&source, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(cache.current().number(), number);
        assert!(cache.lookup("a").is_some());
    }

    #[tokio::test]
    async fn refresh_failure_keeps_previous_generation() {
        let cache = IdentityCache::new();
        let source = ScriptedSource::new(vec![
            Ok(records(&[("1", "a")])),
            Err(AuthError::Status(502)),
        ]);
        let first = cache.refresh(&source, Duration::from_secs(1)).await.unwrap();

        let err = cache
            .refresh(&source, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Status(502)));
        assert_eq!(cache.current().number(), first);
        assert!(cache.lookup("a").is_some());
    }

    #[tokio::test]
    async fn refresh_times_out() {
        let cache = IdentityCache::new();
        cache.install(records(&[("1", "a")]));
        let err = cache
            .refresh(&SlowSource, Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Timeout(_)));
        assert!(cache.lookup("a").is_some());
        assert!(cache.lookup("late").is_none());
    }
}
