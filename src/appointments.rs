/// Appointment status classification and dashboard filtering.
///
/// Every function here is a pure transform over an already-loaded
/// snapshot of appointment records. Filters are stable: output keeps the
/// relative order of the input.

use crate::models::{AppointmentRecord, AppointmentStatus, ColorTag};

/// Map a status to its badge label and color.
pub fn classify(status: AppointmentStatus) -> (&'static str, ColorTag) {
    match status {
        AppointmentStatus::Scheduled => ("Scheduled", ColorTag::Blue),
        AppointmentStatus::InProgress => ("In Progress", ColorTag::Green),
        AppointmentStatus::Completed => ("Completed", ColorTag::Gray),
        AppointmentStatus::Cancelled => ("Cancelled", ColorTag::Red),
        AppointmentStatus::NoShow => ("Waiting", ColorTag::Orange),
        AppointmentStatus::Rescheduled => ("Rescheduled", ColorTag::Blue),
        AppointmentStatus::Unset => ("None", ColorTag::Gray),
    }
}

/// Buckets offered by the appointment list filter bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppointmentFilter {
    #[default]
    All,
    Upcoming,
    Completed,
    Cancelled,
    Waiting,
}

impl AppointmentFilter {
    pub const ALL: [AppointmentFilter; 5] = [
        AppointmentFilter::All,
        AppointmentFilter::Upcoming,
        AppointmentFilter::Completed,
        AppointmentFilter::Cancelled,
        AppointmentFilter::Waiting,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AppointmentFilter::All => "All",
            AppointmentFilter::Upcoming => "Upcoming",
            AppointmentFilter::Completed => "Completed",
            AppointmentFilter::Cancelled => "Cancelled",
            AppointmentFilter::Waiting => "Waitlist",
        }
    }

    /// Parse a filter name as typed by a user; titles and names both work.
    pub fn from_name(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "all" => Some(AppointmentFilter::All),
            "upcoming" => Some(AppointmentFilter::Upcoming),
            "completed" => Some(AppointmentFilter::Completed),
            "cancelled" => Some(AppointmentFilter::Cancelled),
            "waiting" | "waitlist" => Some(AppointmentFilter::Waiting),
            _ => None,
        }
    }

    pub fn matches(&self, status: AppointmentStatus) -> bool {
        use AppointmentStatus::*;

        match self {
            AppointmentFilter::All => true,
            AppointmentFilter::Upcoming => matches!(status, Scheduled | Rescheduled | InProgress),
            AppointmentFilter::Completed => status == Completed,
            AppointmentFilter::Cancelled => status == Cancelled,
            AppointmentFilter::Waiting => status == NoShow,
        }
    }
}

/// Keep the records whose status falls in `criterion`'s bucket.
pub fn filter(appointments: &[AppointmentRecord], criterion: AppointmentFilter) -> Vec<AppointmentRecord> {
    appointments
        .iter()
        .filter(|apt| criterion.matches(apt.status))
        .cloned()
        .collect()
}

/// Whether a status belongs on the dashboard's "current" strip.
///
/// Unlike `Upcoming`, this includes waitlisted (`NoShow`) bookings.
pub fn is_current(status: AppointmentStatus) -> bool {
    matches!(
        status,
        AppointmentStatus::Scheduled
            | AppointmentStatus::InProgress
            | AppointmentStatus::Rescheduled
            | AppointmentStatus::NoShow
    )
}

pub fn current_appointments(appointments: &[AppointmentRecord]) -> Vec<AppointmentRecord> {
    appointments
        .iter()
        .filter(|apt| is_current(apt.status))
        .cloned()
        .collect()
}

/// Number of records in each filter bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterCounts {
    pub all: usize,
    pub upcoming: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub waiting: usize,
}

impl FilterCounts {
    pub fn get(&self, criterion: AppointmentFilter) -> usize {
        match criterion {
            AppointmentFilter::All => self.all,
            AppointmentFilter::Upcoming => self.upcoming,
            AppointmentFilter::Completed => self.completed,
            AppointmentFilter::Cancelled => self.cancelled,
            AppointmentFilter::Waiting => self.waiting,
        }
    }

    /// Share of all records that were completed, as a percentage.
    pub fn completion_rate(&self) -> f64 {
        if self.all == 0 {
            return 0.0;
        }
        (self.completed as f64 / self.all as f64) * 100.0
    }
}

/// One immutable snapshot of a patient's appointments.
///
/// Build a new board for every snapshot a record source hands out; the
/// board never changes after construction.
#[derive(Debug, Clone, Default)]
pub struct AppointmentBoard {
    appointments: Vec<AppointmentRecord>,
}

impl AppointmentBoard {
    pub fn new(appointments: Vec<AppointmentRecord>) -> Self {
        AppointmentBoard { appointments }
    }

    pub fn appointments(&self) -> &[AppointmentRecord] {
        &self.appointments
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }

    pub fn filtered(&self, criterion: AppointmentFilter) -> Vec<AppointmentRecord> {
        filter(&self.appointments, criterion)
    }

    pub fn current(&self) -> Vec<AppointmentRecord> {
        current_appointments(&self.appointments)
    }

    pub fn counts(&self) -> FilterCounts {
        let count = |criterion: AppointmentFilter| {
            self.appointments
                .iter()
                .filter(|apt| criterion.matches(apt.status))
                .count()
        };

        FilterCounts {
            all: self.appointments.len(),
            upcoming: count(AppointmentFilter::Upcoming),
            completed: count(AppointmentFilter::Completed),
            cancelled: count(AppointmentFilter::Cancelled),
            waiting: count(AppointmentFilter::Waiting),
        }
    }
}
