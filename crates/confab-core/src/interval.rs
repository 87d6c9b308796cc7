//! Half-open time interval primitives.
//!
//! Everything in the availability pipeline is expressed over `[start, end)`
//! intervals on the UTC instant axis: busy time from connected calendars,
//! concrete availability windows, and candidate meeting slots.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A half-open time interval `[start, end)`.
///
/// Invariant: `start < end`. Construct through [`Interval::new`], which
/// rejects empty and inverted ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    /// Create a new interval, or `None` if the range is empty or inverted.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Get duration in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Get duration as a chrono `Duration`.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Check whether two intervals overlap.
    ///
    /// Touching intervals (`a.end == b.start`) do not overlap; this is the
    /// tie-break used everywhere busy and available time are compared, so
    /// back-to-back meetings never conflict.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check whether `other` lies fully inside this interval.
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Intersect two intervals, `None` if they only touch or are disjoint.
    pub fn intersect(&self, other: &Interval) -> Option<Interval> {
        Interval::new(self.start.max(other.start), self.end.min(other.end))
    }
}

/// Merge intervals into a minimal disjoint covering set.
///
/// Sorts by start and unions overlapping *and* touching intervals, so
/// duplicate provider data never double-counts and contiguous busy blocks
/// collapse into one. Empty input yields empty output; a single interval is
/// returned unchanged. Idempotent.
pub fn merge(mut intervals: Vec<Interval>) -> Vec<Interval> {
    if intervals.len() <= 1 {
        return intervals;
    }

    intervals.sort_by_key(|iv| iv.start);

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for iv in intervals {
        if let Some(last) = merged.last_mut() {
            // Touching counts as mergeable here: [9,10) + [10,11) = [9,11).
            if iv.start <= last.end {
                if iv.end > last.end {
                    last.end = iv.end;
                }
                continue;
            }
        }
        merged.push(iv);
    }

    merged
}

/// Intersect two disjoint, sorted interval lists.
///
/// Both inputs must already be merged (as produced by [`merge`]); the result
/// is the set of instants covered by both lists, again disjoint and sorted.
pub fn intersect_lists(a: &[Interval], b: &[Interval]) -> Vec<Interval> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if let Some(iv) = a[i].intersect(&b[j]) {
            out.push(iv);
        }
        // Advance whichever list ends first.
        if a[i].end <= b[j].end {
            i += 1;
        } else {
            j += 1;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn iv(start_min: i64, end_min: i64) -> Interval {
        let base = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        Interval::new(
            base + Duration::minutes(start_min),
            base + Duration::minutes(end_min),
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_empty_and_inverted() {
        let t = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        assert!(Interval::new(t, t).is_none());
        assert!(Interval::new(t, t - Duration::minutes(5)).is_none());
        assert!(Interval::new(t, t + Duration::minutes(5)).is_some());
    }

    #[test]
    fn overlaps_is_symmetric() {
        let a = iv(0, 60);
        let b = iv(30, 90);
        let c = iv(120, 180);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        let a = iv(0, 60);
        let b = iv(60, 120);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn contains_includes_boundaries() {
        let outer = iv(0, 120);
        assert!(outer.contains(&iv(0, 120)));
        assert!(outer.contains(&iv(30, 60)));
        assert!(!outer.contains(&iv(30, 150)));
        assert!(!iv(30, 60).contains(&outer));
    }

    #[test]
    fn merge_empty_and_single() {
        assert!(merge(Vec::new()).is_empty());
        assert_eq!(merge(vec![iv(0, 30)]), vec![iv(0, 30)]);
    }

    #[test]
    fn merge_unions_overlapping_and_touching() {
        let merged = merge(vec![iv(60, 120), iv(0, 70), iv(120, 150), iv(200, 230)]);
        assert_eq!(merged, vec![iv(0, 150), iv(200, 230)]);
    }

    #[test]
    fn merge_drops_contained_duplicates() {
        let merged = merge(vec![iv(0, 120), iv(30, 60), iv(0, 120)]);
        assert_eq!(merged, vec![iv(0, 120)]);
    }

    #[test]
    fn merge_is_idempotent() {
        let once = merge(vec![iv(0, 45), iv(30, 90), iv(100, 110), iv(110, 130)]);
        let twice = merge(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn intersect_lists_two_pointer_walk() {
        let a = vec![iv(0, 60), iv(90, 180)];
        let b = vec![iv(30, 100), iv(170, 200)];
        assert_eq!(
            intersect_lists(&a, &b),
            vec![iv(30, 60), iv(90, 100), iv(170, 180)]
        );
    }

    #[test]
    fn intersect_lists_touching_produces_nothing() {
        let a = vec![iv(0, 60)];
        let b = vec![iv(60, 120)];
        assert!(intersect_lists(&a, &b).is_empty());
        assert!(intersect_lists(&a, &[]).is_empty());
    }
}
