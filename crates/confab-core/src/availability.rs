//! Recurring weekly availability templates.
//!
//! An [`AvailabilityBlock`] describes when an account is willing to meet:
//! per-weekday time-of-day ranges, anchored to the owner's IANA timezone.
//! The engine converts a block plus a concrete calendar date into UTC
//! intervals so candidate slots from any viewer timezone compare on a shared
//! instant axis.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::interval::{merge, Interval};

/// Minutes in a full day; a range ending here runs to midnight.
pub const END_OF_DAY_MINUTE: u32 = 24 * 60;

/// A time-of-day range within a single weekday.
///
/// Stored as minutes from local midnight so `[0, 1440)` can express a full
/// day, which `NaiveTime` end-points cannot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_minute: u32,
    pub end_minute: u32,
}

impl TimeRange {
    /// Create a range; `None` if empty, inverted, or past end of day.
    pub fn new(start_minute: u32, end_minute: u32) -> Option<Self> {
        if start_minute < end_minute && end_minute <= END_OF_DAY_MINUTE {
            Some(Self {
                start_minute,
                end_minute,
            })
        } else {
            None
        }
    }

    fn is_well_formed(&self) -> bool {
        self.start_minute < self.end_minute && self.end_minute <= END_OF_DAY_MINUTE
    }
}

/// Availability ranges for one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyAvailability {
    /// 0 = Monday ... 6 = Sunday (chrono `num_days_from_monday`).
    pub weekday: u8,
    pub ranges: Vec<TimeRange>,
}

/// An account's recurring availability template.
///
/// Owned and mutated by the preferences layer; the engine treats it as
/// read-only input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityBlock {
    pub id: String,
    pub timezone: Tz,
    pub weekly: Vec<WeeklyAvailability>,
}

impl AvailabilityBlock {
    pub fn new(id: impl Into<String>, timezone: Tz, weekly: Vec<WeeklyAvailability>) -> Self {
        Self {
            id: id.into(),
            timezone,
            weekly,
        }
    }

    /// Concrete UTC availability intervals for one local calendar date.
    ///
    /// Malformed ranges and local times that do not exist on that date
    /// (spring-forward DST gaps) are skipped rather than reported; a weekday
    /// with no ranges simply yields nothing.
    pub fn day_intervals(&self, date: NaiveDate) -> Vec<Interval> {
        let weekday = date.weekday().num_days_from_monday() as u8;

        let mut intervals = Vec::new();
        for entry in self.weekly.iter().filter(|e| e.weekday == weekday) {
            for range in entry.ranges.iter().filter(|r| r.is_well_formed()) {
                let start = local_instant(self.timezone, date, range.start_minute);
                let end = local_instant(self.timezone, date, range.end_minute);
                if let (Some(start), Some(end)) = (start, end) {
                    if let Some(iv) = Interval::new(start, end) {
                        intervals.push(iv);
                    }
                }
            }
        }

        intervals
    }
}

/// Resolve a minutes-from-midnight wall-clock time on a local date to a UTC
/// instant. Minute 1440 means midnight at the start of the next date.
fn local_instant(tz: Tz, date: NaiveDate, minute: u32) -> Option<chrono::DateTime<Utc>> {
    let (date, minute) = if minute >= END_OF_DAY_MINUTE {
        (date.succ_opt()?, 0)
    } else {
        (date, minute)
    };

    let time = NaiveTime::from_hms_opt(minute / 60, minute % 60, 0)?;
    // `earliest` picks the first occurrence for fall-back ambiguity and
    // yields None inside a spring-forward gap.
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Check whether a candidate slot lies fully inside the block's availability.
///
/// The candidate is judged against the merged union of concrete availability
/// intervals for every local date it touches in the block's timezone, so a
/// slot that crosses local midnight is still contained when the template
/// covers both sides.
pub fn is_inside_availability(candidate: &Interval, block: &AvailabilityBlock) -> bool {
    let tz = block.timezone;
    let first_date = candidate.start.with_timezone(&tz).date_naive();
    // `end` is exclusive, so the last covered instant sits just before it.
    let last_date = (candidate.end - Duration::nanoseconds(1))
        .with_timezone(&tz)
        .date_naive();

    let mut intervals = Vec::new();
    let mut date = first_date;
    while date <= last_date {
        intervals.extend(block.day_intervals(date));
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    merge(intervals).iter().any(|iv| iv.contains(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};
    use chrono_tz::America::New_York;
    use chrono_tz::UTC;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn slot(start: DateTime<Utc>, minutes: i64) -> Interval {
        Interval::new(start, start + Duration::minutes(minutes)).unwrap()
    }

    fn weekday_block(tz: Tz, weekday: u8, start_minute: u32, end_minute: u32) -> AvailabilityBlock {
        AvailabilityBlock::new(
            "blk-1",
            tz,
            vec![WeeklyAvailability {
                weekday,
                ranges: vec![TimeRange::new(start_minute, end_minute).unwrap()],
            }],
        )
    }

    #[test]
    fn time_range_rejects_malformed() {
        assert!(TimeRange::new(540, 540).is_none());
        assert!(TimeRange::new(600, 540).is_none());
        assert!(TimeRange::new(0, 1441).is_none());
        assert!(TimeRange::new(0, END_OF_DAY_MINUTE).is_some());
    }

    #[test]
    fn day_intervals_for_matching_weekday() {
        // 2026-03-02 is a Monday.
        let block = weekday_block(UTC, 0, 9 * 60, 17 * 60);
        let intervals = block.day_intervals(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert_eq!(
            intervals,
            vec![Interval::new(utc(2026, 3, 2, 9, 0), utc(2026, 3, 2, 17, 0)).unwrap()]
        );

        // Tuesday has no ranges.
        assert!(block
            .day_intervals(NaiveDate::from_ymd_opt(2026, 3, 3).unwrap())
            .is_empty());
    }

    #[test]
    fn containment_respects_half_open_boundaries() {
        let block = weekday_block(UTC, 0, 9 * 60, 17 * 60);

        assert!(is_inside_availability(&slot(utc(2026, 3, 2, 9, 0), 30), &block));
        assert!(is_inside_availability(&slot(utc(2026, 3, 2, 16, 30), 30), &block));
        // Starts before the window opens.
        assert!(!is_inside_availability(&slot(utc(2026, 3, 2, 8, 30), 60), &block));
        // Runs past the window close.
        assert!(!is_inside_availability(&slot(utc(2026, 3, 2, 16, 45), 30), &block));
    }

    #[test]
    fn owner_timezone_shifts_the_instant_axis() {
        // New York is UTC-5 on 2026-03-02; local 09:00-17:00 is 14:00-22:00 UTC.
        let block = weekday_block(New_York, 0, 9 * 60, 17 * 60);

        assert!(is_inside_availability(&slot(utc(2026, 3, 2, 14, 0), 60), &block));
        assert!(!is_inside_availability(&slot(utc(2026, 3, 2, 13, 30), 60), &block));
        assert!(is_inside_availability(&slot(utc(2026, 3, 2, 21, 0), 60), &block));
        assert!(!is_inside_availability(&slot(utc(2026, 3, 2, 21, 30), 60), &block));
    }

    #[test]
    fn spring_forward_gap_degrades_to_no_availability() {
        // US DST starts 2026-03-08 02:00 local; 02:00-03:00 does not exist.
        let block = weekday_block(New_York, 6, 2 * 60, 3 * 60);
        let intervals = block.day_intervals(NaiveDate::from_ymd_opt(2026, 3, 8).unwrap());
        assert!(intervals.is_empty());
    }

    #[test]
    fn slot_crossing_local_midnight_uses_both_dates() {
        let block = AvailabilityBlock::new(
            "blk-night",
            UTC,
            vec![
                WeeklyAvailability {
                    weekday: 0,
                    ranges: vec![TimeRange::new(23 * 60, END_OF_DAY_MINUTE).unwrap()],
                },
                WeeklyAvailability {
                    weekday: 1,
                    ranges: vec![TimeRange::new(0, 60).unwrap()],
                },
            ],
        );

        // Mon 23:30 .. Tue 00:30 sits inside the merged [23:00, 01:00) union.
        assert!(is_inside_availability(&slot(utc(2026, 3, 2, 23, 30), 60), &block));
        // Without the Tuesday range the same slot falls out.
        let monday_only = weekday_block(UTC, 0, 23 * 60, END_OF_DAY_MINUTE);
        assert!(!is_inside_availability(&slot(utc(2026, 3, 2, 23, 30), 60), &monday_only));
    }

    #[test]
    fn empty_template_is_never_available() {
        let block = AvailabilityBlock::new("blk-empty", UTC, Vec::new());
        assert!(!is_inside_availability(&slot(utc(2026, 3, 2, 9, 0), 30), &block));
    }

    #[test]
    fn block_serialization_round_trips_the_timezone() {
        let block = weekday_block(New_York, 0, 9 * 60, 17 * 60);
        let json = serde_json::to_string(&block).unwrap();
        assert!(json.contains("America/New_York"));

        let decoded: AvailabilityBlock = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.timezone, New_York);
        assert_eq!(decoded.weekly, block.weekly);
    }
}
