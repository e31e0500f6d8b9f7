//! [`RecordStore`] trait — read access to token → stored record mappings.

use crate::token::LookupToken;

/// Trait for backends that hold location records keyed by token.
///
/// The lookup service only ever reads. Provisioning records happens
/// outside of it, so there is no write operation here.
///
/// Implementations must be `Send + Sync` so they can sit in axum state
/// shared across concurrently running requests.
pub trait RecordStore: Send + Sync {
    /// Storage-level fault, distinct from "key absent".
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the raw stored value for `token`.
    ///
    /// Returns `Ok(None)` if nothing is stored under the token.
    fn get(
        &self,
        token: &LookupToken,
    ) -> impl std::future::Future<Output = Result<Option<String>, Self::Error>> + Send;
}
