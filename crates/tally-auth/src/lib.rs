//! Identity cache for tally.
//!
//! The cache maps client credentials to [`IdentityRecord`]s. It is refreshed
//! wholesale from an [`IdentitySource`]: every refresh builds a complete
//! [`IdentityGeneration`] and installs it with a single atomic swap, so
//! lookups never observe a half-built list and removed identities stop
//! authenticating as soon as the new generation lands.
//!
//! # Example
//!
//! ```
//! use tally_auth::{IdentityCache, IdentityRecord};
//!
//! let cache = IdentityCache::new();
//! cache.install(vec![IdentityRecord::new("1", "uuid-a", Some(100))]);
//!
//! let record = cache.lookup("uuid-a").unwrap();
//! assert_eq!(record.key, "1");
//! assert!(cache.lookup("uuid-b").is_none());
//! ```

mod cache;
mod error;
mod generation;
pub mod http;
mod record;
mod refresh;
mod traits;

pub use cache::IdentityCache;
pub use error::AuthError;
pub use generation::IdentityGeneration;
pub use http::HttpIdentitySource;
pub use record::IdentityRecord;
pub use refresh::run_refresher;
pub use traits::IdentitySource;
