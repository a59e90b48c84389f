/// Record sources: the data-fetch side of the dashboards.
///
/// Each call hands back an owned snapshot. Callers run the pure filters
/// on that snapshot and fetch again when they want fresher data; nothing
/// here is shared or updated in place.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::document;
use crate::error::{Error, Result};
use crate::models::{AppointmentRecord, Doctor, Patient, Staff};

pub trait DoctorSource {
    fn doctors(&self) -> Result<Vec<Doctor>>;

    fn doctor(&self, id: &str) -> Result<Option<Doctor>> {
        Ok(self.doctors()?.into_iter().find(|doctor| doctor.id == id))
    }
}

pub trait AppointmentSource {
    fn appointments(&self) -> Result<Vec<AppointmentRecord>>;

    fn appointments_for_patient(&self, patient_id: &str) -> Result<Vec<AppointmentRecord>> {
        Ok(self
            .appointments()?
            .into_iter()
            .filter(|apt| apt.patient_id == patient_id)
            .collect())
    }

    fn appointments_for_doctor(&self, doctor_name: &str) -> Result<Vec<AppointmentRecord>> {
        Ok(self
            .appointments()?
            .into_iter()
            .filter(|apt| apt.doctor_name == doctor_name)
            .collect())
    }
}

pub trait PatientSource {
    fn patients(&self) -> Result<Vec<Patient>>;
}

pub trait StaffSource {
    fn staff(&self) -> Result<Vec<Staff>>;
}

/// Document collections held in memory, keyed by collection name.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    config: Config,
    collections: HashMap<String, Vec<Value>>,
}

impl InMemoryStore {
    pub fn new(config: Config) -> Self {
        InMemoryStore {
            config,
            collections: HashMap::new(),
        }
    }

    /// Build a store from a JSON object mapping collection names to
    /// arrays of documents.
    pub fn from_json(config: Config, snapshot: Value) -> Result<Self> {
        let Value::Object(top) = snapshot else {
            return Err(Error::decode("snapshot", "top level must be an object"));
        };

        let mut store = InMemoryStore::new(config);
        for (name, docs) in top {
            match docs {
                Value::Array(docs) => {
                    debug!(collection = %name, count = docs.len(), "Loaded collection");
                    store.collections.insert(name, docs);
                }
                other => warn!(collection = %name, kind = %kind_of(&other), "Ignoring non-array collection"),
            }
        }

        Ok(store)
    }

    pub fn load(config: Config, path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let snapshot: Value = serde_json::from_str(&raw)?;
        let store = Self::from_json(config, snapshot)?;
        info!(path = %path.display(), collections = store.collections.len(), "Snapshot loaded");
        Ok(store)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Append a document to the named collection kind.
    pub fn insert(&mut self, kind: &str, doc: Value) {
        self.collections
            .entry(self.config.collection(kind))
            .or_default()
            .push(doc);
    }

    pub fn document_count(&self, kind: &str) -> usize {
        self.collections
            .get(&self.config.collection(kind))
            .map_or(0, Vec::len)
    }

    /// Decode every document of a collection, skipping malformed ones.
    fn decode_all<T>(&self, kind: &str, decode: fn(&str, &Value) -> Result<T>) -> Vec<T> {
        let name = self.config.collection(kind);
        let Some(docs) = self.collections.get(&name) else {
            return Vec::new();
        };

        docs.iter()
            .filter_map(|doc| match decode(&name, doc) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(error = %err, "Skipping document");
                    None
                }
            })
            .collect()
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .collections
            .iter()
            .map(|(name, docs)| (name.clone(), Value::Array(docs.clone())))
            .collect();
        Value::Object(map)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl DoctorSource for InMemoryStore {
    fn doctors(&self) -> Result<Vec<Doctor>> {
        Ok(self.decode_all("doctors", document::decode_doctor))
    }
}

impl AppointmentSource for InMemoryStore {
    fn appointments(&self) -> Result<Vec<AppointmentRecord>> {
        Ok(self.decode_all("appointments", document::decode_appointment))
    }
}

impl PatientSource for InMemoryStore {
    fn patients(&self) -> Result<Vec<Patient>> {
        Ok(self.decode_all("patients", document::decode_patient))
    }
}

impl StaffSource for InMemoryStore {
    fn staff(&self) -> Result<Vec<Staff>> {
        Ok(self.decode_all("staff", document::decode_staff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppointmentStatus;
    use serde_json::json;

    fn store() -> InMemoryStore {
        InMemoryStore::from_json(
            Config::default(),
            json!({
                "hms4_doctors": [
                    {"id": "doc1", "name": "Dr. Jane Doe", "speciality": "Cardiology"},
                    "garbage",
                    {"id": "doc2", "name": "Dr. Raj Patel", "speciality": "Neurology"}
                ],
                "hms4_appointments": [
                    {"id": "a1", "doctorName": "Dr. Jane Doe", "patientId": "P1", "status": "scheduled"},
                    {"id": "a2", "doctorName": "Dr. Raj Patel", "patientId": "P2", "status": "completed"},
                    {"id": "a3", "doctorName": "Dr. Jane Doe", "patientId": "P1", "status": "noShow"}
                ],
                "hms4_staff": {"not": "a list"}
            }),
        )
        .unwrap()
    }

    #[test]
    fn malformed_documents_are_skipped() {
        let doctors = store().doctors().unwrap();
        assert_eq!(doctors.len(), 2);
        assert_eq!(doctors[1].id, "doc2");
    }

    #[test]
    fn lookup_by_id() {
        let store = store();
        assert_eq!(store.doctor("doc2").unwrap().map(|d| d.name), Some("Dr. Raj Patel".to_string()));
        assert!(store.doctor("missing").unwrap().is_none());
    }

    #[test]
    fn appointments_by_patient_and_doctor() {
        let store = store();
        let mine = store.appointments_for_patient("P1").unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[1].status, AppointmentStatus::NoShow);

        let raj = store.appointments_for_doctor("Dr. Raj Patel").unwrap();
        assert_eq!(raj.len(), 1);
        assert_eq!(raj[0].id, "a2");
    }

    #[test]
    fn missing_collections_are_empty() {
        let store = store();
        assert!(store.staff().unwrap().is_empty());
        assert!(store.patients().unwrap().is_empty());
        assert_eq!(store.document_count("staff"), 0);
    }

    #[test]
    fn snapshots_are_independent() {
        let mut store = store();
        let before = store.appointments().unwrap();
        store.insert(
            "appointments",
            json!({"id": "a4", "doctorName": "Dr. Jane Doe", "patientId": "P1", "status": "cancelled"}),
        );
        assert_eq!(before.len(), 3);
        assert_eq!(store.appointments().unwrap().len(), 4);
    }

    #[test]
    fn non_object_snapshot_is_rejected() {
        assert!(InMemoryStore::from_json(Config::default(), json!([])).is_err());
    }

    #[test]
    fn json_round_trip_keeps_documents() {
        let store = store();
        let again = InMemoryStore::from_json(Config::default(), store.to_json()).unwrap();
        assert_eq!(again.document_count("doctors"), 3);
        assert_eq!(again.appointments().unwrap().len(), 3);
    }
}
