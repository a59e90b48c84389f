/// Decoding of document-store records into domain models.
///
/// Decoding is permissive: a field that is missing or has the wrong type
/// falls back to an empty or absent value instead of failing the whole
/// document. The only hard failure is a document that is not an object.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::warn;

use crate::error::{Error, Result};
use crate::models::{AppointmentRecord, AppointmentStatus, Doctor, Patient, Schedule, Staff, StaffStatus};

type Object = Map<String, Value>;

fn as_object<'a>(collection: &str, doc: &'a Value) -> Result<&'a Object> {
    doc.as_object()
        .ok_or_else(|| Error::decode(collection, "document is not an object"))
}

fn text(obj: &Object, key: &str) -> String {
    opt_text(obj, key).unwrap_or_default()
}

fn opt_text(obj: &Object, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn opt_int(obj: &Object, key: &str) -> Option<i64> {
    obj.get(key).and_then(Value::as_i64)
}

fn opt_time(obj: &Object, key: &str) -> Option<DateTime<Utc>> {
    obj.get(key).and_then(parse_timestamp)
}

/// Read a stored timestamp.
///
/// Accepts an RFC 3339 string, whole epoch seconds, or a timestamp object
/// with `seconds`/`nanoseconds` (underscore-prefixed keys also work).
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        Value::Object(obj) => {
            let secs = obj
                .get("seconds")
                .or_else(|| obj.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = obj
                .get("nanoseconds")
                .or_else(|| obj.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .unwrap_or(0);
            let nanos = u32::try_from(nanos).ok()?;
            Utc.timestamp_opt(secs, nanos).single()
        }
        _ => None,
    }
}

pub fn timestamp_value(instant: &DateTime<Utc>) -> Value {
    Value::String(instant.to_rfc3339())
}

/// Decode one leave list. A missing or non-array field is absent; entries
/// that are not timestamps are dropped.
fn leave_list(obj: &Object, key: &str) -> Option<BTreeSet<DateTime<Utc>>> {
    let entries = obj.get(key)?.as_array()?;

    let mut leaves = BTreeSet::new();
    for entry in entries {
        match parse_timestamp(entry) {
            Some(instant) => {
                leaves.insert(instant);
            }
            None => warn!(field = key, value = %entry, "Skipping unreadable leave entry"),
        }
    }
    Some(leaves)
}

pub fn decode_schedule(value: &Value) -> Option<Schedule> {
    let obj = value.as_object()?;
    Some(Schedule::new(
        leave_list(obj, "leaveTimeSlots"),
        leave_list(obj, "fullDayLeaves"),
    ))
}

/// Encode a schedule, writing only the lists that are present.
pub fn encode_schedule(schedule: &Schedule) -> Result<Value> {
    Ok(serde_json::to_value(schedule)?)
}

pub fn decode_doctor(collection: &str, doc: &Value) -> Result<Doctor> {
    let obj = as_object(collection, doc)?;

    let license_verified = obj
        .get("licenseDetails")
        .and_then(|details| details.get("verificationStatus"))
        .and_then(Value::as_str)
        .map(|status| status.eq_ignore_ascii_case("verified"))
        .unwrap_or(false);

    Ok(Doctor {
        id: text(obj, "id"),
        name: text(obj, "name"),
        number: opt_int(obj, "number"),
        email: text(obj, "email"),
        speciality: text(obj, "speciality"),
        license_reg_no: opt_text(obj, "licenseRegNo"),
        smc: opt_text(obj, "smc"),
        gender: opt_text(obj, "gender"),
        date_of_birth: opt_time(obj, "dob"),
        year_of_registration: opt_int(obj, "yearOfRegistration").and_then(|y| i32::try_from(y).ok()),
        schedule: obj.get("schedule").and_then(decode_schedule),
        license_verified,
    })
}

pub fn decode_patient(collection: &str, doc: &Value) -> Result<Patient> {
    let obj = as_object(collection, doc)?;

    Ok(Patient {
        id: text(obj, "id"),
        name: text(obj, "name"),
        number: opt_int(obj, "number"),
        email: text(obj, "email"),
        date_of_birth: opt_time(obj, "dob"),
        gender: opt_text(obj, "gender"),
    })
}

pub fn decode_staff(collection: &str, doc: &Value) -> Result<Staff> {
    let obj = as_object(collection, doc)?;

    let certificates = obj.get("certificates").and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    });

    Ok(Staff {
        id: text(obj, "uuid"),
        name: text(obj, "name"),
        email: text(obj, "email"),
        date_of_birth: opt_time(obj, "dob"),
        join_date: opt_time(obj, "joinDate"),
        educational_qualification: opt_text(obj, "educationalQualification"),
        certificates,
        staff_role: opt_text(obj, "staffRole"),
        status: obj
            .get("status")
            .and_then(Value::as_str)
            .and_then(StaffStatus::from_raw),
    })
}

pub fn decode_appointment(collection: &str, doc: &Value) -> Result<AppointmentRecord> {
    let obj = as_object(collection, doc)?;

    let doctor_name = opt_text(obj, "doctorName").unwrap_or_else(|| text(obj, "name"));
    let status = obj
        .get("status")
        .and_then(Value::as_str)
        .map(AppointmentStatus::from_raw)
        .unwrap_or_default();

    Ok(AppointmentRecord {
        id: text(obj, "id"),
        doctor_name,
        patient_id: text(obj, "patientId"),
        appointment_date_time: opt_time(obj, "appointmentDateTime"),
        duration_minutes: opt_int(obj, "durationMinutes").and_then(|m| u32::try_from(m).ok()),
        notes: opt_text(obj, "notes"),
        status,
    })
}

pub fn encode_appointment(record: &AppointmentRecord) -> Result<Value> {
    Ok(serde_json::to_value(record)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap();
        assert_eq!(parse_timestamp(&json!("2025-06-10T09:00:00Z")), Some(expected));
        assert_eq!(parse_timestamp(&json!("2025-06-10T14:30:00+05:30")), Some(expected));
        assert_eq!(parse_timestamp(&json!(expected.timestamp())), Some(expected));
        assert_eq!(
            parse_timestamp(&json!({"seconds": expected.timestamp(), "nanoseconds": 0})),
            Some(expected)
        );
        assert_eq!(
            parse_timestamp(&json!({"_seconds": expected.timestamp(), "_nanoseconds": 0})),
            Some(expected)
        );
        assert_eq!(parse_timestamp(&json!("next tuesday")), None);
        assert_eq!(parse_timestamp(&json!(null)), None);
    }

    #[test]
    fn schedule_keeps_absent_and_empty_apart() {
        let absent = decode_schedule(&json!({})).unwrap();
        assert_eq!(absent, Schedule::default());

        let empty = decode_schedule(&json!({"leaveTimeSlots": [], "fullDayLeaves": []})).unwrap();
        assert_eq!(empty.leave_time_slots, Some(BTreeSet::new()));
        assert_eq!(empty.full_day_leaves, Some(BTreeSet::new()));

        assert_eq!(decode_schedule(&encode_schedule(&absent).unwrap()), Some(absent));
        assert_eq!(decode_schedule(&encode_schedule(&empty).unwrap()), Some(empty));

        assert_eq!(encode_schedule(&Schedule::default()).unwrap(), json!({}));
    }

    #[test]
    fn schedule_skips_bad_entries() {
        let schedule = decode_schedule(&json!({
            "fullDayLeaves": ["2025-06-01T00:00:00Z", "soon", 17],
            "leaveTimeSlots": "not a list"
        }))
        .unwrap();
        assert_eq!(schedule.full_day_leaves.map(|d| d.len()), Some(2));
        assert_eq!(schedule.leave_time_slots, None);
    }

    #[test]
    fn doctor_without_schedule_has_none() {
        let doctor = decode_doctor(
            "hms4_doctors",
            &json!({"id": "doc1", "name": "Dr. A", "speciality": "Cardiology"}),
        )
        .unwrap();
        assert!(doctor.schedule.is_none());
        assert!(!doctor.license_verified);
        assert_eq!(doctor.email, "");
    }

    #[test]
    fn doctor_fields_decode() {
        let doctor = decode_doctor(
            "hms4_doctors",
            &json!({
                "id": "doc123",
                "name": "Dr. Jane Doe",
                "number": 67890,
                "email": "dr.jane.doe@hospital.com",
                "speciality": "Neurology",
                "licenseRegNo": "MED-67890-AB",
                "dob": "1980-06-15T00:00:00Z",
                "yearOfRegistration": 2008,
                "licenseDetails": {"verificationStatus": "Verified"},
                "schedule": {"fullDayLeaves": ["2025-06-01T00:00:00Z"]}
            }),
        )
        .unwrap();
        assert_eq!(doctor.number, Some(67890));
        assert_eq!(doctor.year_of_registration, Some(2008));
        assert!(doctor.license_verified);
        let schedule = doctor.schedule.unwrap();
        assert_eq!(schedule.full_day_leaves.map(|d| d.len()), Some(1));
        assert_eq!(schedule.leave_time_slots, None);
    }

    #[test]
    fn non_object_is_rejected() {
        let err = decode_patient("hms4_patients", &json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn appointment_defaults_are_permissive() {
        let record = decode_appointment(
            "hms4_appointments",
            &json!({"id": "apt1", "name": "Dr. B", "status": "pending", "durationMinutes": "thirty"}),
        )
        .unwrap();
        assert_eq!(record.doctor_name, "Dr. B");
        assert_eq!(record.status, AppointmentStatus::Unset);
        assert_eq!(record.duration_minutes, None);
        assert_eq!(record.appointment_date_time, None);
    }

    #[test]
    fn appointment_round_trips() {
        let record = AppointmentRecord {
            id: "apt9".to_string(),
            doctor_name: "Dr. Jane Doe".to_string(),
            patient_id: "P001".to_string(),
            appointment_date_time: Some(Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap()),
            duration_minutes: Some(30),
            notes: Some("Bring reports".to_string()),
            status: AppointmentStatus::InProgress,
        };
        let decoded = decode_appointment("hms4_appointments", &encode_appointment(&record).unwrap()).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn appointment_encodes_store_field_names() {
        let record = AppointmentRecord {
            id: "apt3".to_string(),
            doctor_name: "Dr. John Smith".to_string(),
            patient_id: "P002".to_string(),
            appointment_date_time: Some(Utc.with_ymd_and_hms(2025, 6, 10, 14, 30, 0).unwrap()),
            duration_minutes: None,
            notes: None,
            status: AppointmentStatus::NoShow,
        };
        let doc = encode_appointment(&record).unwrap();

        assert_eq!(doc["doctorName"], json!("Dr. John Smith"));
        assert_eq!(doc["patientId"], json!("P002"));
        assert_eq!(doc["status"], json!("noShow"));
        assert_eq!(doc["durationMinutes"], Value::Null);
        assert_eq!(
            parse_timestamp(&doc["appointmentDateTime"]),
            record.appointment_date_time
        );

        let unscheduled = AppointmentRecord {
            appointment_date_time: None,
            status: AppointmentStatus::Unset,
            ..record
        };
        let doc = encode_appointment(&unscheduled).unwrap();
        assert_eq!(doc["appointmentDateTime"], Value::Null);
        assert_eq!(doc["status"], json!("none"));
    }

    #[test]
    fn staff_decodes_status_and_certificates() {
        let staff = decode_staff(
            "hms4_staff",
            &json!({
                "uuid": "staff789",
                "name": "Sarah Johnson",
                "certificates": ["BLS Certification", 5],
                "status": "On Break"
            }),
        )
        .unwrap();
        assert_eq!(staff.id, "staff789");
        assert_eq!(staff.certificates, Some(vec!["BLS Certification".to_string()]));
        assert_eq!(staff.status, Some(StaffStatus::OnBreak));
    }
}
