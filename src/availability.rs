/// Doctor availability checks against recorded leave.
///
/// A provider's local calendar is the time zone of the instant being
/// queried; stored leave instants are moved into that zone before any
/// calendar comparison.

use chrono::{DateTime, NaiveDate, TimeZone, Timelike};

use crate::models::{Doctor, Schedule};

/// Calendar date and wall-clock minute of an instant.
fn minute_key<Tz: TimeZone>(instant: &DateTime<Tz>) -> (NaiveDate, u32, u32) {
    (instant.date_naive(), instant.hour(), instant.minute())
}

/// Check whether `date` is one of the schedule's full-day leaves.
///
/// Leave instants are read as calendar dates in `tz`.
pub fn is_on_full_day_leave<Tz: TimeZone>(schedule: &Schedule, date: NaiveDate, tz: &Tz) -> bool {
    schedule
        .full_day_leaves()
        .any(|leave| leave.with_timezone(tz).date_naive() == date)
}

/// Decide whether a provider can be booked at `instant`.
///
/// An absent schedule is open at every instant. Full-day leave blocks the
/// whole calendar date; a leave slot blocks only its exact minute.
pub fn is_available<Tz: TimeZone>(schedule: Option<&Schedule>, instant: &DateTime<Tz>) -> bool {
    let Some(schedule) = schedule else {
        return true;
    };

    let tz = instant.timezone();
    if is_on_full_day_leave(schedule, instant.date_naive(), &tz) {
        return false;
    }

    let wanted = minute_key(instant);
    !schedule
        .leave_time_slots()
        .any(|slot| minute_key(&slot.with_timezone(&tz)) == wanted)
}

impl Doctor {
    /// Check if the doctor can be booked at `instant`.
    pub fn is_available<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> bool {
        is_available(self.schedule.as_ref(), instant)
    }
}
