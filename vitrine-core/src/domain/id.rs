//! Id generation for products, registered users and log entries
//!
//! Ids are decimal strings derived from the wall clock: milliseconds since the
//! epoch in the upper bits, a 16-bit process-wide counter in the lower 16.
//! Two ids drawn by the same process never collide unless more than 65536 are
//! drawn within one millisecond. Ids drawn by different processes can collide.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Counter for generating unique IDs within the same millisecond
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Next timestamp-derived id as a number
pub fn next_id() -> u64 {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();

    let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed) & 0xFFFF;
    (timestamp << 16) | counter
}

/// Generate a fresh timestamp-derived id
pub fn generate_id() -> String {
    next_id().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_distinct_in_a_burst() {
        let ids: HashSet<String> = (0..10_000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_ids_are_numeric() {
        assert!(generate_id().chars().all(|c| c.is_ascii_digit()));
    }
}
