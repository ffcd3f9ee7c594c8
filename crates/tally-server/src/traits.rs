//! Callbacks a host proxy invokes per connection.

use std::sync::Arc;

/// Credential check on connect.
pub trait Authenticator: Send + Sync {
    /// Return the identity key for `credential`, or `None` to reject.
    ///
    /// Must not block on I/O.
    fn authenticate(&self, credential: &str) -> Option<String>;
}

/// Traffic report from a live connection.
pub trait TrafficLogger: Send + Sync {
    /// Account `tx`/`rx` bytes to `key`.
    ///
    /// Returns `false` when the host must close the connection. Must not
    /// block on I/O.
    fn log_traffic(&self, key: &str, tx: u64, rx: u64) -> bool;
}

impl<A: Authenticator + ?Sized> Authenticator for Arc<A> {
    #[inline]
    fn authenticate(&self, credential: &str) -> Option<String> {
        (**self).authenticate(credential)
    }
}

impl<T: TrafficLogger + ?Sized> TrafficLogger for Arc<T> {
    #[inline]
    fn log_traffic(&self, key: &str, tx: u64, rx: u64) -> bool {
        (**self).log_traffic(key, tx, rx)
    }
}
