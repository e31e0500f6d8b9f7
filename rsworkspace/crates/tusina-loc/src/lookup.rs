//! `GET /api/loc` — resolve a token to its encrypted location record.
//!
//! Pipeline: query → [`extract_token`] → [`RecordStore::get`] →
//! [`parse_record`] → whitelisted `{"v","iv","ct"}` body. Each step returns
//! a [`LookupError`] naming the first thing that went wrong.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header::CACHE_CONTROL;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, instrument};
use tusina_store::{LookupToken, RecordStore};

use crate::error::LookupError;

/// The only record schema version served.
pub const SUPPORTED_VERSION: u8 = 1;

/// Shared handler state. The store is the only collaborator.
pub struct LookupState<S> {
    pub store: Arc<S>,
}

impl<S> LookupState<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

impl<S> Clone for LookupState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

/// Response body. Only these fields ever leave the service, whatever else
/// the stored value contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationRecord {
    pub v: u8,
    pub iv: String,
    pub ct: String,
}

#[instrument(name = "loc.lookup", skip_all)]
pub async fn lookup<S: RecordStore>(
    State(state): State<LookupState<S>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, LookupError> {
    let Query(pairs) = query.map_err(|e| LookupError::BadRequest(e.body_text()))?;

    let token = extract_token(&pairs)?;
    let record = resolve(state.store.as_ref(), &token).await?;

    info!(outcome = "ok", "Location lookup served");
    Ok(([(CACHE_CONTROL, "no-store")], Json(record)).into_response())
}

/// Pull the token from `t`, falling back to `token` when `t` is absent or
/// blank. Surrounding whitespace is trimmed before validation.
pub fn extract_token(pairs: &[(String, String)]) -> Result<LookupToken, LookupError> {
    let raw = first_nonblank(pairs, "t")
        .or_else(|| first_nonblank(pairs, "token"))
        .ok_or(LookupError::MissingToken)?;

    Ok(LookupToken::new(raw)?)
}

fn first_nonblank<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
}

/// Fetch and validate the record for an already validated token.
///
/// A store fault is reported immediately; there are no retries here.
pub async fn resolve<S: RecordStore>(
    store: &S,
    token: &LookupToken,
) -> Result<LocationRecord, LookupError> {
    let raw = store
        .get(token)
        .await
        .map_err(|e| LookupError::Storage(e.to_string()))?
        .filter(|raw| !raw.is_empty())
        .ok_or(LookupError::NotFound)?;

    parse_record(&raw)
}

/// Validate a raw stored value and keep only the whitelisted fields.
///
/// `iv` and `ct` must be strings that are non-empty after trimming; they
/// are passed through untouched. `v` may be missing or `null` (read as 1),
/// a number, or a numeric string, and must equal 1.
pub fn parse_record(raw: &str) -> Result<LocationRecord, LookupError> {
    let value: Value = serde_json::from_str(raw).map_err(LookupError::BadPayload)?;
    let Value::Object(fields) = value else {
        return Err(LookupError::InvalidFields("record is not an object"));
    };

    let iv = required_string(&fields, "iv")?;
    let ct = required_string(&fields, "ct")?;
    check_version(fields.get("v"))?;

    Ok(LocationRecord {
        v: SUPPORTED_VERSION,
        iv,
        ct,
    })
}

fn required_string(fields: &Map<String, Value>, name: &'static str) -> Result<String, LookupError> {
    match fields.get(name) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        _ => Err(LookupError::InvalidFields(name)),
    }
}

fn check_version(v: Option<&Value>) -> Result<(), LookupError> {
    let version = match v {
        None | Some(Value::Null) => Some(f64::from(SUPPORTED_VERSION)),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        // Booleans, arrays and objects are rejected outright rather than
        // coerced to a number.
        Some(_) => None,
    };

    match version {
        Some(n) if n == f64::from(SUPPORTED_VERSION) => Ok(()),
        _ => Err(LookupError::InvalidFields("v")),
    }
}
