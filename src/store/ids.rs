//! Id, name and timestamp helpers for new entities.

use chrono::{SecondsFormat, Utc};
use rand::RngCore;
use std::collections::HashSet;

/// Returns 16 lowercase hex characters from 8 random bytes.
pub fn generate_id() -> String {
    let mut bytes = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Current UTC time in RFC 3339 with second precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Returns `base` if unused, else the first of `base (2)`, `base (3)`, ... not in `existing`.
///
/// Comparison is case-sensitive.
///
/// # Examples
///
/// ```
/// use api_workbench::store::unique_name;
///
/// let existing = vec!["Login".to_string(), "Login (2)".to_string()];
/// assert_eq!(unique_name("Login", &existing), "Login (3)");
/// assert_eq!(unique_name("login", &existing), "login");
/// ```
pub fn unique_name<S: AsRef<str>>(base: &str, existing: &[S]) -> String {
    let taken: HashSet<&str> = existing.iter().map(|s| s.as_ref()).collect();
    unique_name_in(base, &taken)
}

pub(crate) fn unique_name_in(base: &str, taken: &HashSet<&str>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }

    let mut counter = 2u64;
    loop {
        let candidate = format!("{} ({})", base, counter);
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        counter += 1;
    }
}
