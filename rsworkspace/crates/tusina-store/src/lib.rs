//! Record store for location lookup tokens.
//!
//! Clients hold an opaque token; the store maps it to an encrypted
//! location record (`{"v":1,"iv":"…","ct":"…"}`) that this crate treats as
//! an uninterpreted string. The lookup service only reads.
//!
//! # Quick Start
//!
//! ```rust
//! use tusina_store::{LookupToken, MemoryStore, RecordStore};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = MemoryStore::new();
//! let token = LookupToken::new("a1b2c3d4e5f6").unwrap();
//!
//! store.insert(&token, r#"{"v":1,"iv":"abc","ct":"def"}"#).unwrap();
//!
//! let raw = store.get(&token).await.unwrap();
//! assert_eq!(raw.as_deref(), Some(r#"{"v":1,"iv":"abc","ct":"def"}"#));
//! # }
//! ```

pub mod backends;
pub mod store;
pub mod token;

pub use backends::memory::{MemoryStore, MemoryStoreError};
#[cfg(feature = "redis")]
pub use backends::redis::{RedisStore, RedisStoreConfig, RedisStoreError};
pub use store::RecordStore;
pub use token::{LookupToken, MAX_TOKEN_LEN, MIN_TOKEN_LEN, TokenError};
