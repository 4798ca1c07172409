//! Monotonic millisecond clock for timing sessions.
//!
//! In the browser this is `performance.now()`; natively it counts from the
//! first call in the process. Only differences between two readings are
//! meaningful.

#[cfg(not(target_arch = "wasm32"))]
use once_cell::sync::Lazy;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[cfg(not(target_arch = "wasm32"))]
static CLOCK_ORIGIN: Lazy<Instant> = Lazy::new(Instant::now);

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    CLOCK_ORIGIN.elapsed().as_secs_f64() * 1000.0
}

#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Whole seconds elapsed between two readings, floored. Never negative.
pub fn elapsed_secs(start_ms: f64, now_ms: f64) -> u64 {
    ((now_ms - start_ms).max(0.0) / 1000.0).floor() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_is_floored() {
        assert_eq!(elapsed_secs(1_000.0, 1_000.0), 0);
        assert_eq!(elapsed_secs(1_000.0, 1_999.9), 0);
        assert_eq!(elapsed_secs(1_000.0, 2_000.0), 1);
        assert_eq!(elapsed_secs(1_000.0, 6_500.0), 5);
    }

    #[test]
    fn test_elapsed_clamps_backwards_readings() {
        assert_eq!(elapsed_secs(5_000.0, 4_000.0), 0);
    }

    #[test]
    fn test_now_is_monotonic() {
        let a = now_ms();
        let b = now_ms();
        assert!(b >= a);
    }
}
