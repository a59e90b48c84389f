/// Daily slot planning for a provider.
///
/// Lays out consecutive slots across working hours and marks each one
/// against the provider's recorded leave, so booking screens can offer
/// only the free ones.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike};

use crate::availability::is_available;
use crate::error::{Error, Result};
use crate::models::Schedule;

/// Working hours for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayHours {
    pub start_hour: u32,
    pub end_hour: u32,
    pub slot_minutes: i64,
    pub break_start: Option<NaiveTime>,
    pub break_end: Option<NaiveTime>,
}

impl Default for DayHours {
    fn default() -> Self {
        DayHours {
            start_hour: 9,
            end_hour: 17,
            slot_minutes: 30,
            break_start: NaiveTime::from_hms_opt(12, 0, 0),
            break_end: NaiveTime::from_hms_opt(13, 0, 0),
        }
    }
}

impl DayHours {
    fn validate(&self) -> Result<()> {
        if self.end_hour > 24 || self.start_hour >= self.end_hour {
            return Err(Error::validation(format!(
                "Working hours {}-{} are not a valid range",
                self.start_hour, self.end_hour
            )));
        }
        if self.slot_minutes <= 0 {
            return Err(Error::validation("Slot duration must be positive"));
        }
        let span = i64::from(self.end_hour - self.start_hour) * 60;
        if self.slot_minutes > span {
            return Err(Error::validation(format!(
                "Slot duration of {} minutes does not fit in {}-{}",
                self.slot_minutes, self.start_hour, self.end_hour
            )));
        }
        Ok(())
    }

    /// Overlap test in minutes of the day, so a slot ending at 24:00
    /// stays after any break that starts earlier.
    fn overlaps_break(&self, start: i64, end: i64) -> bool {
        let minute_of_day = |t: NaiveTime| i64::from(t.num_seconds_from_midnight()) / 60;

        match (self.break_start, self.break_end) {
            (Some(break_start), Some(break_end)) => {
                start < minute_of_day(break_end) && end > minute_of_day(break_start)
            }
            _ => false,
        }
    }
}

/// A candidate booking window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedSlot<Tz: TimeZone> {
    pub start_time: DateTime<Tz>,
    pub end_time: DateTime<Tz>,
    pub is_available: bool,
}

impl<Tz: TimeZone> PlannedSlot<Tz> {
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time.clone() - self.start_time.clone()).num_minutes()
    }
}

fn local_instant<Tz: TimeZone>(tz: &Tz, date: NaiveDate, minutes_of_day: i64) -> Option<DateTime<Tz>> {
    let naive = date.and_hms_opt(0, 0, 0)? + Duration::minutes(minutes_of_day);
    tz.from_local_datetime(&naive).earliest()
}

/// Lay out one day's slots for a provider.
///
/// Slots overlapping the break are left out. A slot is available when
/// its start instant is free; a full-day leave marks every slot taken.
/// Local times that do not exist in `tz` are skipped.
pub fn plan_day<Tz: TimeZone>(
    schedule: Option<&Schedule>,
    date: NaiveDate,
    tz: &Tz,
    hours: &DayHours,
) -> Result<Vec<PlannedSlot<Tz>>> {
    hours.validate()?;

    let end = i64::from(hours.end_hour) * 60;
    let mut current = i64::from(hours.start_hour) * 60;
    let mut slots = Vec::new();

    while current + hours.slot_minutes <= end {
        let slot_end = current + hours.slot_minutes;

        if hours.overlaps_break(current, slot_end) {
            current = slot_end;
            continue;
        }

        let (Some(start_time), Some(end_time)) = (
            local_instant(tz, date, current),
            local_instant(tz, date, slot_end),
        ) else {
            current = slot_end;
            continue;
        };

        let free = is_available(schedule, &start_time);
        slots.push(PlannedSlot {
            start_time,
            end_time,
            is_available: free,
        });

        current = slot_end;
    }

    Ok(slots)
}

/// Only the free slots of `plan_day`.
pub fn available_slots<Tz: TimeZone>(
    schedule: Option<&Schedule>,
    date: NaiveDate,
    tz: &Tz,
    hours: &DayHours,
) -> Result<Vec<PlannedSlot<Tz>>> {
    Ok(plan_day(schedule, date, tz, hours)?
        .into_iter()
        .filter(|slot| slot.is_available)
        .collect())
}
