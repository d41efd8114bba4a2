//! Webforge configuration
//!
//! Centralized environment variable names and small parse helpers shared
//! by the other packages. Values are read lazily at the point of use so
//! tests can override them per-process.

pub mod constants;

use std::env;
use std::str::FromStr;

use tracing::warn;

/// Read an environment variable and parse it, falling back to `default`
/// when unset, unparseable, or outside `range`.
pub fn env_parsed<T>(name: &str, default: T, range: std::ops::RangeInclusive<T>) -> T
where
    T: FromStr + PartialOrd + Copy,
{
    match env::var(name) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(value) if range.contains(&value) => value,
            Ok(_) => {
                warn!("{} out of range, using default", name);
                default
            }
            Err(_) => {
                warn!("{} is not a valid value, using default", name);
                default
            }
        },
        Err(_) => default,
    }
}

/// Read a boolean flag from the environment. Accepts "1"/"true"/"yes"
/// (case-insensitive); anything else is false.
pub fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Read an optional string value, treating the empty string as unset.
pub fn env_string(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
