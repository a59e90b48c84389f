//! Domain core of a hospital management client.
//!
//! Records come from a document store through the sources in [`store`];
//! the dashboards then run the pure checks in [`availability`] and
//! [`appointments`] on each snapshot.

pub mod appointments;
pub mod availability;
pub mod config;
pub mod directory;
pub mod document;
pub mod error;
pub mod models;
pub mod planner;
pub mod store;

pub use appointments::{classify, current_appointments, filter, AppointmentBoard, AppointmentFilter, FilterCounts};
pub use availability::is_available;
pub use config::Config;
pub use error::{Error, Result};
pub use models::{AppointmentRecord, AppointmentStatus, ColorTag, Doctor, Patient, Schedule, Staff, StaffStatus};
