/// Data models for the hospital management core.
///
/// This module defines the records loaded from the document store:
/// - AppointmentStatus: Closed set of appointment lifecycle stages
/// - ColorTag: Semantic color attached to a status
/// - Schedule: A provider's recorded leave
/// - Patient, Doctor, Staff: Profiles of the people in the system
/// - AppointmentRecord: A booking as seen by dashboards

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Semantic color used when rendering a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorTag {
    Blue,
    Green,
    Orange,
    Red,
    Gray,
}

impl ColorTag {
    pub fn name(&self) -> &'static str {
        match self {
            ColorTag::Blue => "blue",
            ColorTag::Green => "green",
            ColorTag::Orange => "orange",
            ColorTag::Red => "red",
            ColorTag::Gray => "gray",
        }
    }
}

/// Lifecycle stage of a booking.
///
/// `NoShow` doubles as the waitlist bucket on patient dashboards.
/// Raw values that match no stage decode to `Unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
    Rescheduled,
    #[default]
    Unset,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 7] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::NoShow,
        AppointmentStatus::Rescheduled,
        AppointmentStatus::Unset,
    ];

    /// Parse a stored status value.
    ///
    /// Case, spaces, `_` and `-` are ignored, so `"inProgress"`,
    /// `"in_progress"` and `"In Progress"` are the same stage.
    pub fn from_raw(value: &str) -> Self {
        let key: String = value
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "scheduled" => AppointmentStatus::Scheduled,
            "inprogress" => AppointmentStatus::InProgress,
            "completed" => AppointmentStatus::Completed,
            "cancelled" | "canceled" => AppointmentStatus::Cancelled,
            "noshow" => AppointmentStatus::NoShow,
            "rescheduled" => AppointmentStatus::Rescheduled,
            _ => AppointmentStatus::Unset,
        }
    }

    /// The value written back to the document store.
    pub fn raw_value(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::InProgress => "inProgress",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::NoShow => "noShow",
            AppointmentStatus::Rescheduled => "rescheduled",
            AppointmentStatus::Unset => "none",
        }
    }
}

impl From<String> for AppointmentStatus {
    fn from(value: String) -> Self {
        AppointmentStatus::from_raw(&value)
    }
}

impl From<AppointmentStatus> for String {
    fn from(status: AppointmentStatus) -> Self {
        status.raw_value().to_string()
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw_value())
    }
}

/// A provider's recorded leave.
///
/// Each list is optional on its own: `None` means the field was never
/// persisted, `Some` of an empty set means it was persisted empty. Both
/// mean "no leave" to the availability checker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leave_time_slots: Option<BTreeSet<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_day_leaves: Option<BTreeSet<DateTime<Utc>>>,
}

impl Schedule {
    pub fn new(
        leave_time_slots: Option<BTreeSet<DateTime<Utc>>>,
        full_day_leaves: Option<BTreeSet<DateTime<Utc>>>,
    ) -> Self {
        Schedule {
            leave_time_slots,
            full_day_leaves,
        }
    }

    pub fn leave_time_slots(&self) -> impl Iterator<Item = &DateTime<Utc>> {
        self.leave_time_slots.iter().flatten()
    }

    pub fn full_day_leaves(&self) -> impl Iterator<Item = &DateTime<Utc>> {
        self.full_day_leaves.iter().flatten()
    }

    /// True when no leave of either kind is recorded.
    pub fn is_clear(&self) -> bool {
        self.leave_time_slots().next().is_none() && self.full_day_leaves().next().is_none()
    }
}

fn years_between(from: Option<&DateTime<Utc>>, as_of: NaiveDate) -> Option<u32> {
    from.and_then(|start| as_of.years_since(start.date_naive()))
}

/// Represents a patient in the hospital system.
#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub number: Option<i64>,
    pub email: String,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub gender: Option<String>,
}

impl Patient {
    /// Age in whole years on the given date.
    pub fn age_on(&self, as_of: NaiveDate) -> Option<u32> {
        years_between(self.date_of_birth.as_ref(), as_of)
    }

    /// Name followed by age and gender when known.
    pub fn basic_info(&self, as_of: NaiveDate) -> String {
        let mut info = self.name.clone();

        match (self.age_on(as_of), &self.gender) {
            (Some(age), Some(gender)) => info.push_str(&format!(" (Age: {}, {})", age, gender)),
            (Some(age), None) => info.push_str(&format!(" (Age: {})", age)),
            (None, Some(gender)) => info.push_str(&format!(" ({})", gender)),
            (None, None) => {}
        }

        info
    }
}

/// Represents a doctor and their leave schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub number: Option<i64>,
    pub email: String,
    pub speciality: String,
    pub license_reg_no: Option<String>,
    pub smc: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub year_of_registration: Option<i32>,
    pub schedule: Option<Schedule>,
    pub license_verified: bool,
}

impl Doctor {
    pub fn age_on(&self, as_of: NaiveDate) -> Option<u32> {
        years_between(self.date_of_birth.as_ref(), as_of)
    }

    /// Name with license number and registration year when known.
    pub fn basic_info(&self) -> String {
        let mut info = self.name.clone();

        if let Some(license) = &self.license_reg_no {
            info.push_str(&format!(" (License: {})", license));
        }
        if let Some(year) = self.year_of_registration {
            info.push_str(&format!(" - Registered: {}", year));
        }

        info
    }
}

/// Duty status of a staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaffStatus {
    #[serde(rename = "Available")]
    Available,
    #[serde(rename = "Busy")]
    Busy,
    #[serde(rename = "On Break")]
    OnBreak,
    #[serde(rename = "Off Duty")]
    OffDuty,
}

impl StaffStatus {
    /// Parse a stored status; unknown values are `None`.
    pub fn from_raw(value: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::from(value.trim())).ok()
    }

    pub fn raw_value(&self) -> &'static str {
        match self {
            StaffStatus::Available => "Available",
            StaffStatus::Busy => "Busy",
            StaffStatus::OnBreak => "On Break",
            StaffStatus::OffDuty => "Off Duty",
        }
    }

    pub fn color(&self) -> ColorTag {
        match self {
            StaffStatus::Available => ColorTag::Green,
            StaffStatus::Busy => ColorTag::Orange,
            StaffStatus::OnBreak => ColorTag::Blue,
            StaffStatus::OffDuty => ColorTag::Red,
        }
    }
}

/// Represents a staff member.
#[derive(Debug, Clone, PartialEq)]
pub struct Staff {
    pub id: String,
    pub name: String,
    pub email: String,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub join_date: Option<DateTime<Utc>>,
    pub educational_qualification: Option<String>,
    pub certificates: Option<Vec<String>>,
    pub staff_role: Option<String>,
    pub status: Option<StaffStatus>,
}

impl Staff {
    pub fn age_on(&self, as_of: NaiveDate) -> Option<u32> {
        years_between(self.date_of_birth.as_ref(), as_of)
    }

    pub fn years_of_service_on(&self, as_of: NaiveDate) -> Option<u32> {
        years_between(self.join_date.as_ref(), as_of)
    }

    /// Name with role and years of service when known.
    pub fn basic_info(&self, as_of: NaiveDate) -> String {
        let mut info = self.name.clone();

        if let Some(role) = &self.staff_role {
            info.push_str(&format!(" - {}", role));
        }
        if let Some(years) = self.years_of_service_on(as_of) {
            info.push_str(&format!(" ({} years of service)", years));
        }

        info
    }

    pub fn education_info(&self) -> String {
        let mut parts = Vec::new();

        if let Some(qualification) = &self.educational_qualification {
            if !qualification.is_empty() {
                parts.push(qualification.clone());
            }
        }
        if let Some(certificates) = &self.certificates {
            if !certificates.is_empty() {
                parts.push(certificates.join(", "));
            }
        }

        if parts.is_empty() {
            "No educational information available".to_string()
        } else {
            parts.join(" - ")
        }
    }
}

/// A booking as read by dashboards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRecord {
    pub id: String,
    pub doctor_name: String,
    pub patient_id: String,
    pub appointment_date_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<u32>,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
}

impl AppointmentRecord {
    /// Create a new scheduled appointment with validation.
    ///
    /// A missing time means the patient joins the waitlist, which is
    /// recorded as `NoShow`.
    pub fn new(
        doctor_name: String,
        patient_id: String,
        appointment_date_time: Option<DateTime<Utc>>,
        duration_minutes: Option<u32>,
        notes: Option<String>,
    ) -> Result<Self> {
        if doctor_name.trim().is_empty() {
            return Err(Error::validation("Doctor name cannot be empty"));
        }
        if patient_id.trim().is_empty() {
            return Err(Error::validation("Patient reference cannot be empty"));
        }
        if duration_minutes == Some(0) {
            return Err(Error::validation("Duration must be positive"));
        }

        let status = if appointment_date_time.is_some() {
            AppointmentStatus::Scheduled
        } else {
            AppointmentStatus::NoShow
        };

        Ok(AppointmentRecord {
            id: Uuid::new_v4().to_string(),
            doctor_name,
            patient_id,
            appointment_date_time,
            duration_minutes,
            notes,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn status_parses_loose_spellings() {
        assert_eq!(AppointmentStatus::from_raw("inProgress"), AppointmentStatus::InProgress);
        assert_eq!(AppointmentStatus::from_raw("In Progress"), AppointmentStatus::InProgress);
        assert_eq!(AppointmentStatus::from_raw("no_show"), AppointmentStatus::NoShow);
        assert_eq!(AppointmentStatus::from_raw("No-Show"), AppointmentStatus::NoShow);
        assert_eq!(AppointmentStatus::from_raw("CANCELLED"), AppointmentStatus::Cancelled);
    }

    #[test]
    fn unknown_status_is_unset() {
        assert_eq!(AppointmentStatus::from_raw("pending"), AppointmentStatus::Unset);
        assert_eq!(AppointmentStatus::from_raw(""), AppointmentStatus::Unset);
    }

    #[test]
    fn status_raw_values_parse_back() {
        for status in AppointmentStatus::ALL {
            assert_eq!(AppointmentStatus::from_raw(status.raw_value()), status);
        }
    }

    #[test]
    fn status_serializes_as_raw_value() {
        let json = serde_json::to_string(&AppointmentStatus::NoShow).unwrap();
        assert_eq!(json, "\"noShow\"");
        let parsed: AppointmentStatus = serde_json::from_str("\"bogus\"").unwrap();
        assert_eq!(parsed, AppointmentStatus::Unset);
    }

    #[test]
    fn empty_schedule_is_clear_but_not_absent() {
        let empty = Schedule::new(Some(BTreeSet::new()), Some(BTreeSet::new()));
        assert!(empty.is_clear());
        assert_ne!(empty, Schedule::default());
    }

    #[test]
    fn patient_basic_info_variants() {
        let mut patient = Patient {
            id: "sample123".to_string(),
            name: "Jane Doe".to_string(),
            number: Some(10042),
            email: "jane.doe@example.com".to_string(),
            date_of_birth: Some(Utc.with_ymd_and_hms(1985, 6, 15, 0, 0, 0).unwrap()),
            gender: Some("Female".to_string()),
        };
        assert_eq!(patient.basic_info(date(2025, 6, 14)), "Jane Doe (Age: 39, Female)");
        assert_eq!(patient.basic_info(date(2025, 6, 15)), "Jane Doe (Age: 40, Female)");

        patient.date_of_birth = None;
        assert_eq!(patient.basic_info(date(2025, 6, 15)), "Jane Doe (Female)");

        patient.gender = None;
        assert_eq!(patient.basic_info(date(2025, 6, 15)), "Jane Doe");
    }

    #[test]
    fn doctor_basic_info_includes_license() {
        let doctor = Doctor {
            id: "doc123".to_string(),
            name: "Dr. John Smith".to_string(),
            number: Some(12345),
            email: "dr.john.smith@hospital.com".to_string(),
            speciality: "Cardiology".to_string(),
            license_reg_no: Some("MED-12345-XY".to_string()),
            smc: None,
            gender: None,
            date_of_birth: None,
            year_of_registration: Some(2005),
            schedule: None,
            license_verified: false,
        };
        assert_eq!(
            doctor.basic_info(),
            "Dr. John Smith (License: MED-12345-XY) - Registered: 2005"
        );
    }

    #[test]
    fn staff_info_and_colors() {
        let staff = Staff {
            id: "staff789".to_string(),
            name: "Sarah Johnson".to_string(),
            email: "sarah123@gmail.com".to_string(),
            date_of_birth: None,
            join_date: Some(Utc.with_ymd_and_hms(2018, 3, 1, 0, 0, 0).unwrap()),
            educational_qualification: Some("BSc Nursing".to_string()),
            certificates: Some(vec![
                "BLS Certification".to_string(),
                "ACLS Certification".to_string(),
            ]),
            staff_role: Some("Head Nurse".to_string()),
            status: Some(StaffStatus::Available),
        };

        assert_eq!(
            staff.basic_info(date(2025, 3, 1)),
            "Sarah Johnson - Head Nurse (7 years of service)"
        );
        assert_eq!(
            staff.education_info(),
            "BSc Nursing - BLS Certification, ACLS Certification"
        );
        assert_eq!(StaffStatus::OnBreak.color(), ColorTag::Blue);
        assert_eq!(StaffStatus::from_raw("Off Duty"), Some(StaffStatus::OffDuty));
        assert_eq!(StaffStatus::from_raw(" On Break "), Some(StaffStatus::OnBreak));
        assert_eq!(StaffStatus::from_raw("Sleeping"), None);
        assert_eq!(
            serde_json::to_value(StaffStatus::OffDuty).unwrap(),
            serde_json::Value::from("Off Duty")
        );
    }

    #[test]
    fn staff_without_education() {
        let staff = Staff {
            id: "s1".to_string(),
            name: "Sam".to_string(),
            email: String::new(),
            date_of_birth: None,
            join_date: None,
            educational_qualification: None,
            certificates: Some(Vec::new()),
            staff_role: None,
            status: None,
        };
        assert_eq!(staff.education_info(), "No educational information available");
        assert_eq!(staff.basic_info(date(2025, 1, 1)), "Sam");
    }

    #[test]
    fn new_appointment_validates_and_assigns_status() {
        let when = Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap();
        let booked = AppointmentRecord::new(
            "Dr. Jane Doe".to_string(),
            "P001".to_string(),
            Some(when),
            Some(30),
            None,
        )
        .unwrap();
        assert_eq!(booked.status, AppointmentStatus::Scheduled);
        assert!(Uuid::parse_str(&booked.id).is_ok());

        let waitlisted =
            AppointmentRecord::new("Dr. Jane Doe".to_string(), "P001".to_string(), None, None, None)
                .unwrap();
        assert_eq!(waitlisted.status, AppointmentStatus::NoShow);

        assert!(AppointmentRecord::new(" ".to_string(), "P001".to_string(), None, None, None).is_err());
        assert!(AppointmentRecord::new(
            "Dr. Jane Doe".to_string(),
            "P001".to_string(),
            Some(when),
            Some(0),
            None
        )
        .is_err());
    }
}
