//! Immutable identity generation.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::record::IdentityRecord;

/// One complete, immutable version of the identity list.
///
/// Indexed both by credential (for authentication) and by key (for
/// membership checks on the accounting path). A generation is built in full
/// before it is installed and is never modified afterwards.
#[derive(Debug, Default)]
pub struct IdentityGeneration {
    number: u64,
    by_credential: HashMap<String, Arc<IdentityRecord>>,
    by_key: HashMap<String, Arc<IdentityRecord>>,
}

impl IdentityGeneration {
    /// An empty generation with number 0.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a generation from a fetched record list.
    ///
    /// When two records share a credential the later one wins. Records with
    /// an empty credential can never authenticate and are skipped.
    pub fn build<I>(number: u64, records: I) -> Self
    where
        I: IntoIterator<Item = IdentityRecord>,
    {
        let records = records.into_iter();
        let (lower, _) = records.size_hint();
        let mut by_credential = HashMap::with_capacity(lower);
        let mut skipped = 0usize;

        for record in records {
            if record.credential.is_empty() {
                skipped += 1;
                continue;
            }
            by_credential.insert(record.credential.clone(), Arc::new(record));
        }

        // Derived after dedup so a key is present only if it still owns a credential.
        let by_key = by_credential
            .values()
            .map(|record| (record.key.clone(), record.clone()))
            .collect();

        if skipped > 0 {
            warn!(generation = number, skipped, "skipped identities with empty credential");
        }

        Self {
            number,
            by_credential,
            by_key,
        }
    }

    /// Generation number, increasing with every install.
    #[inline]
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Find the record for a credential.
    #[inline]
    pub fn lookup(&self, credential: &str) -> Option<&Arc<IdentityRecord>> {
        self.by_credential.get(credential)
    }

    /// Find the record for an identity key.
    #[inline]
    pub fn lookup_key(&self, key: &str) -> Option<&Arc<IdentityRecord>> {
        self.by_key.get(key)
    }

    /// Check whether an identity key exists in this generation.
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Number of authenticating credentials.
    #[inline]
    pub fn len(&self) -> usize {
        self.by_credential.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_credential.is_empty()
    }

    /// Iterate over all records.
    pub fn records(&self) -> impl Iterator<Item = &Arc<IdentityRecord>> {
        self.by_credential.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_indexes_both_ways() {
        let generation = IdentityGeneration::build(
            1,
            [
                IdentityRecord::new("1", "uuid-a", Some(10)),
                IdentityRecord::new("2", "uuid-b", None),
            ],
        );
        assert_eq!(generation.number(), 1);
        assert_eq!(generation.len(), 2);
        assert_eq!(generation.lookup("uuid-a").unwrap().key, "1");
        assert_eq!(generation.lookup_key("2").unwrap().credential, "uuid-b");
        assert!(generation.contains_key("1"));
        assert!(!generation.contains_key("uuid-a"));
        assert!(generation.lookup("missing").is_none());
    }

    #[test]
    fn duplicate_credential_last_wins() {
        let generation = IdentityGeneration::build(
            1,
            [
                IdentityRecord::new("1", "uuid-a", None),
                IdentityRecord::new("9", "uuid-a", Some(5)),
            ],
        );
        assert_eq!(generation.len(), 1);
        let record = generation.lookup("uuid-a").unwrap();
        assert_eq!(record.key, "9");
        assert_eq!(record.quota, Some(5));
        assert!(!generation.contains_key("1"));
        assert!(generation.contains_key("9"));
    }

    #[test]
    fn empty_credentials_skipped() {
        let generation = IdentityGeneration::build(
            3,
            [
                IdentityRecord::new("1", "", None),
                IdentityRecord::new("2", "uuid-b", None),
            ],
        );
        assert_eq!(generation.len(), 1);
        assert!(!generation.contains_key("1"));
        assert!(generation.lookup("").is_none());
    }

    #[test]
    fn empty_generation() {
        let generation = IdentityGeneration::empty();
        assert!(generation.is_empty());
        assert_eq!(generation.number(), 0);
        assert_eq!(generation.records().count(), 0);
    }
}
