//! Code validator - consumes a submitted code at most once

use crate::error::StoreError;

use super::store::CodeStore;

/// Validate a submitted code, marking it used on success.
///
/// An unknown code and an already-used code both come back as plain `false`;
/// callers cannot tell the two apart. The store's conditional update makes
/// acceptance at-most-once even under concurrent submissions.
pub async fn validate(store: &CodeStore, code: &str) -> Result<bool, StoreError> {
    Ok(store.consume(code).await?)
}
