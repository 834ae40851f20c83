//! Resolution and allocation logic
//!
//! `resolve` turns a short code into a redirect target while recording the
//! click; `allocate` produces a unique code (custom or random) and persists
//! the new link. Both lean on the store's transactional guarantees instead of
//! application-level check-then-act sequences.

use crate::code::{generate_code, validate_code, validate_url, CODE_MAX_LEN, DEFAULT_CODE_LEN};
use crate::database::LinkStore;
use crate::error::{AppError, StoreError};
use crate::model::Link;

/// Random-allocation attempts per code length before widening the code.
const ATTEMPTS_PER_LENGTH: usize = 8;

/// Resolves a short code to its target URL, recording the hit.
///
/// The lookup and the click increment happen in one store transaction, so a
/// concurrent delete either wins entirely (this returns `NotFound`) or loses
/// entirely; a hit is never counted against a deleted record.
pub fn resolve(store: &LinkStore, code: &str) -> Result<String, AppError> {
    match store.record_hit(code)? {
        Some(link) => Ok(link.target_url),
        None => Err(AppError::NotFound("Short link not found".to_string())),
    }
}

/// Creates a new link under a unique code.
///
/// The target URL is validated before the store is touched. A desired code
/// is trimmed (blank counts as absent), shape-checked, and handed to the
/// store, whose write-transaction uniqueness check turns duplicates into
/// `Conflict`. Without a desired code, random codes are tried against the
/// store until one sticks, bounded at 24 attempts across code lengths.
pub fn allocate(
    store: &LinkStore,
    target_url: Option<String>,
    desired_code: Option<String>,
) -> Result<Link, AppError> {
    let target_url = target_url.unwrap_or_default();
    if !validate_url(&target_url) {
        return Err(AppError::Validation(
            "Invalid URL. Must start with http:// or https://".to_string(),
        ));
    }

    let desired = desired_code
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    match desired {
        Some(code) => {
            if !validate_code(&code) {
                return Err(AppError::Validation(
                    "Code must match [A-Za-z0-9]{6,8}".to_string(),
                ));
            }
            store.create(&code, &target_url).map_err(AppError::from)
        }
        None => allocate_random(store, &target_url),
    }
}

/// Retries random codes against the store, widening the length on repeated
/// collision: 8 attempts each at 6, 7 and 8 characters, 24 in total.
///
/// Each length has a 62^length space, so exhausting the bound means the code
/// space is effectively saturated; that is reported as a conflict rather
/// than looping forever.
fn allocate_random(store: &LinkStore, target_url: &str) -> Result<Link, AppError> {
    for length in DEFAULT_CODE_LEN..=CODE_MAX_LEN {
        for _ in 0..ATTEMPTS_PER_LENGTH {
            let code = generate_code(length);
            match store.create(&code, target_url) {
                Ok(link) => return Ok(link),
                Err(StoreError::Duplicate) => continue,
                Err(e) => return Err(AppError::Store(e)),
            }
        }
    }

    Err(AppError::Conflict(
        "Could not allocate a unique code".to_string(),
    ))
}
