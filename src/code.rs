//! Short-code validation and generation
//!
//! Pure helpers with no shared state: shape checks for candidate codes,
//! scheme checks for target URLs, and random code generation. Uniqueness of
//! generated codes is not guaranteed here; the allocation path retries
//! against the store's uniqueness check instead.

use rand::{distr::Alphanumeric, Rng};
use url::Url;

/// Minimum accepted code length.
pub const CODE_MIN_LEN: usize = 6;

/// Maximum accepted code length.
pub const CODE_MAX_LEN: usize = 8;

/// Length used for generated codes before collision fallback widens them.
pub const DEFAULT_CODE_LEN: usize = 6;

/// Returns true iff `code` matches `[A-Za-z0-9]{6,8}`.
pub fn validate_code(code: &str) -> bool {
    (CODE_MIN_LEN..=CODE_MAX_LEN).contains(&code.len())
        && code.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Returns true iff `url` parses as an absolute URL with an `http` or
/// `https` scheme. Malformed input yields `false`, never an error.
pub fn validate_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Generates a random code of `length` characters, each drawn independently
/// and uniformly from the 62-character alphanumeric alphabet.
///
/// Uses the thread-local RNG; not cryptographically secured.
pub fn generate_code(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
