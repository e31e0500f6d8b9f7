//! # tusina-loc
//!
//! Edge lookup service: resolves an opaque location token to the encrypted
//! location record stored for it.
//!
//! ## How it works
//!
//! 1. A browser page calls `GET /api/loc?t=<token>` (alias `token=`).
//! 2. The token is trimmed and checked against `[A-Za-z0-9_-]{12,64}`.
//! 3. The record store is read once; no retries.
//! 4. The stored JSON must carry non-empty `iv` and `ct` strings and a `v`
//!    of 1. Only `{"v":1,"iv":…,"ct":…}` is returned, with
//!    `Cache-Control: no-store`.
//! 5. Every response, including errors and preflights, carries the CORS
//!    headers computed by [`cors::OriginPolicy`].
//!
//! The service never decrypts anything; `iv` and `ct` are opaque here.
//!
//! ## Responses
//!
//! | Status | Body |
//! |---|---|
//! | 200 | `{"v":1,"iv":"…","ct":"…"}` |
//! | 204 | empty (any `OPTIONS`) |
//! | 400 | `missing_token`, `invalid_token`, `bad_request` |
//! | 404 | `not_found` (unknown route or token) |
//! | 500 | `bad_payload`, `invalid_fields` |
//! | 502 | `storage_error` |
//!
//! ## Configuration (env vars)
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `LOC_PORT` | `8080` | HTTP listening port |
//! | `LOC_ALLOWED_ORIGINS` | `https://ollijuutilainen.github.io,http://localhost:8080` | Exact origins reflected in `Access-Control-Allow-Origin` |
//! | `LOC_CORS_MAX_AGE_SECS` | `86400` | `Access-Control-Max-Age` |
//! | `LOC_REDIS_URL` | — | Use Redis as the record store (`redis` feature) |
//! | `LOC_REDIS_KEY_PREFIX` | empty | Prefix for Redis keys |
//! | `LOC_RECORD_<token>` | — | Seed the in-memory store when Redis is not used |
//! | `RUST_LOG` | `info` | Log filter (tracing-subscriber) |

pub mod config;
pub mod cors;
pub mod env;
pub mod error;
pub mod lookup;
pub mod server;

pub use config::LocConfig;
pub use cors::OriginPolicy;
pub use error::LookupError;
pub use lookup::{LocationRecord, LookupState};
pub use server::{router, serve};
