//! Identity source trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AuthError;
use crate::record::IdentityRecord;

/// Source of the complete identity list.
///
/// Implementations must be thread-safe (`Send + Sync`); the refresher calls
/// [`fetch`](Self::fetch) from a background task.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    /// Fetch the full identity list.
    ///
    /// The result replaces the cached list wholesale, so it must be complete.
    async fn fetch(&self) -> Result<Vec<IdentityRecord>, AuthError>;
}

/// Blanket implementation for `Arc<S>` where `S: IdentitySource`.
#[async_trait]
impl<S: IdentitySource + ?Sized> IdentitySource for Arc<S> {
    #[inline]
    async fn fetch(&self) -> Result<Vec<IdentityRecord>, AuthError> {
        (**self).fetch().await
    }
}

/// Blanket implementation for `Box<S>` where `S: IdentitySource`.
#[async_trait]
impl<S: IdentitySource + ?Sized> IdentitySource for Box<S> {
    #[inline]
    async fn fetch(&self) -> Result<Vec<IdentityRecord>, AuthError> {
        (**self).fetch().await
    }
}
