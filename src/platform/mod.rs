//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Default storage backend (LocalStorage on web, files on native)

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

/// Current time as a unix timestamp in milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Current time as a unix timestamp in milliseconds
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// A seed for the spawn RNG taken from the clock
pub fn clock_seed() -> u64 {
    now_ms() as u64
}

/// Directory native saves live in: `$PHOENIX_RANGE_DATA`, else
/// `$HOME/.phoenix-range`, else `./.phoenix-range`
#[cfg(not(target_arch = "wasm32"))]
pub fn data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("PHOENIX_RANGE_DATA") {
        return PathBuf::from(dir);
    }
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".phoenix-range")
}
