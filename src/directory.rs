/// Doctor and patient search for the directory screens.

use chrono::{DateTime, TimeZone};
use std::collections::BTreeSet;

use crate::availability::is_available;
use crate::models::{Doctor, Patient};

pub const ALL_DEPARTMENTS: &str = "All";

/// Criteria for the doctor list.
#[derive(Debug, Clone)]
pub struct DoctorQuery<Tz: TimeZone> {
    /// Exact speciality, or `"All"`/empty for any
    pub department: String,
    /// Case-insensitive text matched against name and speciality
    pub search: String,
    /// Keep only doctors free at this instant
    pub available_at: Option<DateTime<Tz>>,
}

impl<Tz: TimeZone> Default for DoctorQuery<Tz> {
    fn default() -> Self {
        DoctorQuery {
            department: ALL_DEPARTMENTS.to_string(),
            search: String::new(),
            available_at: None,
        }
    }
}

impl<Tz: TimeZone> DoctorQuery<Tz> {
    pub fn matches(&self, doctor: &Doctor) -> bool {
        let department = self.department.trim();
        let matches_department = department.is_empty()
            || department == ALL_DEPARTMENTS
            || doctor.speciality == department;

        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || doctor.name.to_lowercase().contains(&needle)
            || doctor.speciality.to_lowercase().contains(&needle);

        let matches_availability = self
            .available_at
            .as_ref()
            .map_or(true, |instant| is_available(doctor.schedule.as_ref(), instant));

        matches_department && matches_search && matches_availability
    }
}

pub fn search_doctors<Tz: TimeZone>(doctors: &[Doctor], query: &DoctorQuery<Tz>) -> Vec<Doctor> {
    doctors.iter().filter(|d| query.matches(d)).cloned().collect()
}

/// `"All"` followed by every distinct speciality in sorted order.
pub fn departments(doctors: &[Doctor]) -> Vec<String> {
    let specialities: BTreeSet<&str> = doctors
        .iter()
        .map(|d| d.speciality.trim())
        .filter(|s| !s.is_empty())
        .collect();

    std::iter::once(ALL_DEPARTMENTS.to_string())
        .chain(specialities.into_iter().map(str::to_string))
        .collect()
}

/// Patients whose name, email or gender contains `text`.
pub fn search_patients(patients: &[Patient], text: &str) -> Vec<Patient> {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return patients.to_vec();
    }

    patients
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.email.to_lowercase().contains(&needle)
                || p.gender
                    .as_ref()
                    .is_some_and(|g| g.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}
