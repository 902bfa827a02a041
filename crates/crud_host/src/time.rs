//! Time and id helpers shared across host contracts and adapters.

use std::cell::Cell;
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

thread_local! {
    static LAST_ID: Cell<u64> = const { Cell::new(0) };
}

/// Returns the current unix timestamp in milliseconds.
pub fn unix_time_ms_now() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now().max(0.0) as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Returns a process-unique, strictly increasing id seeded from the wall clock.
///
/// Used for toast ids, form sessions, and browser file handles.
pub fn next_monotonic_id() -> u64 {
    let now = unix_time_ms_now();
    LAST_ID.with(|last| {
        let next = now.max(last.get().saturating_add(1));
        last.set(next);
        next
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_strictly_increase() {
        let first = next_monotonic_id();
        let second = next_monotonic_id();
        let third = next_monotonic_id();
        assert!(first < second && second < third);
    }
}
