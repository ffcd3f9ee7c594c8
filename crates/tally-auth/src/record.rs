//! Identity record as delivered by the panel.

/// One billable client.
///
/// Records are shared behind `Arc` by the generation that owns them and are
/// never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    /// Identity key that traffic is accounted under.
    pub key: String,
    /// Credential the client presents when connecting.
    pub credential: String,
    /// Optional quota (the panel's speed limit).
    pub quota: Option<u32>,
}

impl IdentityRecord {
    pub fn new(key: impl Into<String>, credential: impl Into<String>, quota: Option<u32>) -> Self {
        Self {
            key: key.into(),
            credential: credential.into(),
            quota,
        }
    }
}
