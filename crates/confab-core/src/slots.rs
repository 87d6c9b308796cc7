//! Candidate meeting-slot generation.
//!
//! Two duration-parameterized modes over the interval algebra:
//! - exhaustive tiling of an arbitrary window, and
//! - anchored tiling of a day around a caller-preferred window, whose exact
//!   span both appears in the output and fixes the tile duration.
//!
//! Both are pure computations: no participant data, no I/O, no clock reads
//! (filtering out slots that already started is the caller's job).

use chrono::{DateTime, Duration, Utc};

use crate::interval::Interval;

/// Tile a window into consecutive fixed-duration slots.
///
/// Slots are contiguous and non-overlapping, starting at `window.start`; the
/// final partial slot, if any, is dropped rather than truncated. A
/// non-positive duration yields no slots.
pub fn tile_range(window: &Interval, duration: Duration) -> Vec<Interval> {
    if duration <= Duration::zero() {
        return Vec::new();
    }

    let mut slots = Vec::new();
    let mut cursor = window.start;
    while cursor + duration <= window.end {
        // Invariant upheld by the loop guard; duration is positive.
        slots.push(Interval {
            start: cursor,
            end: cursor + duration,
        });
        cursor += duration;
    }

    slots
}

/// Tile a day around an exact anchor window.
///
/// The anchor slot spans `[anchor_start, anchor_end)` unmodified and fixes
/// the tile duration. Equal-duration slots walk backward from the anchor to
/// the day start and forward from the anchor to the day end; the outermost
/// slot on each side is clipped to the day boundary if it would run short.
/// Output is in chronological order. A non-positive anchor duration is a
/// defined degenerate case and yields an empty list.
pub fn anchored_day_slots(
    day: &Interval,
    anchor_start: DateTime<Utc>,
    anchor_end: DateTime<Utc>,
) -> Vec<Interval> {
    let Some(anchor) = Interval::new(anchor_start, anchor_end) else {
        return Vec::new();
    };
    let duration = anchor.duration();

    // Walk backward to the day start, clipping the earliest slot.
    let mut before = Vec::new();
    let mut cursor = anchor.start;
    while cursor > day.start {
        let slot_start = (cursor - duration).max(day.start);
        before.push(Interval {
            start: slot_start,
            end: cursor,
        });
        cursor = slot_start;
    }
    before.reverse();

    // Walk forward to the day end, clipping the latest slot.
    let mut after = Vec::new();
    let mut cursor = anchor.end;
    while cursor < day.end {
        let slot_end = (cursor + duration).min(day.end);
        after.push(Interval {
            start: cursor,
            end: slot_end,
        });
        cursor = slot_end;
    }

    let mut slots = before;
    slots.push(anchor);
    slots.extend(after);
    slots
}
