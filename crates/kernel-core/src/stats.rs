//! Clamped arithmetic over the five-field stat vector.

use contracts::{StatDeltas, StatKey, Stats};

/// Add `delta` to `value` and clamp the result into `[0, key.upper_bound()]`.
pub fn clamp_stat(key: StatKey, value: i64, delta: i64) -> i64 {
    value.saturating_add(delta).clamp(0, key.upper_bound())
}

/// Returns a copy of `stats` with every present delta applied and clamped.
/// Keys absent from `deltas` are left untouched.
pub fn apply_deltas(stats: &Stats, deltas: &StatDeltas) -> Stats {
    let mut next = *stats;
    for (key, delta) in deltas {
        let slot = next.get_mut(*key);
        *slot = clamp_stat(*key, *slot, *delta);
    }
    next
}

/// Additively folds `extra` into `deltas`, key by key.
pub fn merge_deltas(deltas: &mut StatDeltas, extra: &StatDeltas) {
    for (key, delta) in extra {
        let entry = deltas.entry(*key).or_insert(0);
        *entry = entry.saturating_add(*delta);
    }
}
