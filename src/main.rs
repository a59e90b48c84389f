/// Command-line front desk for the hospital management core.
///
/// This binary provides an interactive menu for loading a snapshot of the
/// document store, checking doctor availability, planning a doctor's day
/// and browsing patient appointments through the dashboard filters.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use hms_care::appointments::{classify, AppointmentBoard, AppointmentFilter};
use hms_care::directory::{departments, search_doctors, search_patients, DoctorQuery};
use hms_care::document::timestamp_value;
use hms_care::planner::{plan_day, DayHours};
use hms_care::store::{AppointmentSource, DoctorSource, InMemoryStore, PatientSource, StaffSource};
use hms_care::{AppointmentRecord, Config};
use serde_json::json;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

struct FrontDeskCli {
    store: InMemoryStore,
    offset: FixedOffset,
    running: bool,
}

impl FrontDeskCli {
    fn new(config: Config, offset: FixedOffset) -> Self {
        FrontDeskCli {
            store: InMemoryStore::new(config),
            offset,
            running: true,
        }
    }

    fn print_header(&self) {
        println!("\n{}", "=".repeat(60));
        println!("       HOSPITAL MANAGEMENT FRONT DESK");
        println!("{}", "=".repeat(60));
    }

    fn print_menu(&self) {
        println!("\n--- Main Menu ---");
        println!("1. Load snapshot file");
        println!("2. List doctors");
        println!("3. Check doctor availability");
        println!("4. Plan a doctor's day");
        println!("5. View patient appointments");
        println!("6. View current appointments");
        println!("7. Search patients and staff");
        println!("8. Run demo");
        println!("9. Exit");
        println!("{}", "-".repeat(20));
    }

    fn get_input(&mut self, prompt: &str, default: Option<&str>) -> String {
        if let Some(def) = default {
            print!("{} [{}]: ", prompt, def);
        } else {
            print!("{}: ", prompt);
        }
        if let Err(e) = io::stdout().flush() {
            error!(error = %e, "Failed to flush prompt");
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => {
                // stdin closed
                self.running = false;
                return default.unwrap_or("").to_string();
            }
            Ok(_) => {}
            Err(e) => {
                error!(error = %e, "Failed to read input");
                self.running = false;
                return default.unwrap_or("").to_string();
            }
        }

        let input = input.trim();
        if input.is_empty() {
            default.unwrap_or("").to_string()
        } else {
            input.to_string()
        }
    }

    fn get_int_input(&mut self, prompt: &str, default: Option<i32>) -> i32 {
        loop {
            let default_str = default.map(|d| d.to_string());
            let input = self.get_input(prompt, default_str.as_deref());

            if let Ok(value) = input.parse::<i32>() {
                return value;
            }
            if !self.running {
                return default.unwrap_or(0);
            }
            println!("Please enter a valid number");
        }
    }

    /// Read a local date-time in the providers' calendar.
    fn get_instant(&mut self, prompt: &str, default: &str) -> Option<DateTime<FixedOffset>> {
        let input = self.get_input(&format!("{} (YYYY-MM-DD HH:MM)", prompt), Some(default));

        let naive = match NaiveDateTime::parse_from_str(&input, "%Y-%m-%d %H:%M") {
            Ok(naive) => naive,
            Err(_) => {
                println!("Could not read '{}' as a date and time", input);
                return None;
            }
        };
        self.offset.from_local_datetime(&naive).single()
    }

    fn get_date(&mut self, prompt: &str, default: &str) -> Option<NaiveDate> {
        let input = self.get_input(&format!("{} (YYYY-MM-DD)", prompt), Some(default));
        match NaiveDate::parse_from_str(&input, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                println!("Could not read '{}' as a date", input);
                None
            }
        }
    }

    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }

    fn load_snapshot(&mut self, path: PathBuf) {
        match InMemoryStore::load(self.store.config().clone(), &path) {
            Ok(store) => {
                self.store = store;
                println!("\nLoaded snapshot from {}", path.display());
                println!(
                    "Doctors: {}, appointments: {}, patients: {}, staff: {}",
                    self.store.document_count("doctors"),
                    self.store.document_count("appointments"),
                    self.store.document_count("patients"),
                    self.store.document_count("staff")
                );
            }
            Err(e) => println!("\nError loading snapshot: {}", e),
        }
    }

    fn prompt_snapshot(&mut self) {
        println!("\n--- Load Snapshot ---");
        let path = self.get_input("Snapshot file", Some("snapshot.json"));
        self.load_snapshot(PathBuf::from(path));
    }

    fn list_doctors(&mut self) {
        let doctors = match self.store.doctors() {
            Ok(doctors) => doctors,
            Err(e) => {
                println!("\nError fetching doctors: {}", e);
                return;
            }
        };
        if doctors.is_empty() {
            println!("\nNo doctors loaded (option 1 or 8)");
            return;
        }

        println!("\nDepartments: {}", departments(&doctors).join(", "));
        let department = self.get_input("Department", Some("All"));
        let search = self.get_input("Search by name or speciality", Some(""));

        let query: DoctorQuery<FixedOffset> = DoctorQuery {
            department,
            search,
            available_at: None,
        };
        let matches = search_doctors(&doctors, &query);

        println!("\n--- Doctors ({} of {}) ---", matches.len(), doctors.len());
        for doctor in &matches {
            let verified = if doctor.license_verified { "verified" } else { "unverified" };
            println!("  [{}] {} - {} ({})", doctor.id, doctor.basic_info(), doctor.speciality, verified);
        }
    }

    fn check_availability(&mut self) {
        println!("\n--- Check Doctor Availability ---");
        let doctor_id = self.get_input("Doctor ID", None);

        let doctor = match self.store.doctor(&doctor_id) {
            Ok(Some(doctor)) => doctor,
            Ok(None) => {
                println!("\nNo doctor with ID '{}'", doctor_id);
                return;
            }
            Err(e) => {
                println!("\nError fetching doctor: {}", e);
                return;
            }
        };

        let Some(instant) = self.get_instant("When", "2025-06-10 09:00") else {
            return;
        };

        if doctor.is_available(&instant) {
            println!("\n{} is available at {}", doctor.name, instant.format("%Y-%m-%d %H:%M"));
        } else {
            println!("\n{} is on leave at {}", doctor.name, instant.format("%Y-%m-%d %H:%M"));
        }
    }

    fn plan_doctor_day(&mut self) {
        println!("\n--- Plan a Doctor's Day ---");
        let doctor_id = self.get_input("Doctor ID", None);
        let doctor = match self.store.doctor(&doctor_id) {
            Ok(Some(doctor)) => doctor,
            Ok(None) => {
                println!("\nNo doctor with ID '{}'", doctor_id);
                return;
            }
            Err(e) => {
                println!("\nError fetching doctor: {}", e);
                return;
            }
        };

        let today = self.today().format("%Y-%m-%d").to_string();
        let Some(date) = self.get_date("Date", &today) else {
            return;
        };
        let hours = DayHours {
            start_hour: self.get_int_input("Working hours start", Some(9)).max(0) as u32,
            end_hour: self.get_int_input("Working hours end", Some(17)).max(0) as u32,
            slot_minutes: i64::from(self.get_int_input("Slot duration (minutes)", Some(30))),
            ..DayHours::default()
        };

        match plan_day(doctor.schedule.as_ref(), date, &self.offset, &hours) {
            Ok(slots) => {
                let free = slots.iter().filter(|s| s.is_available).count();
                println!("\n{}: {} of {} slots free", date.format("%A, %Y-%m-%d"), free, slots.len());
                for slot in &slots {
                    println!(
                        "  {} - {}  {}",
                        slot.start_time.format("%H:%M"),
                        slot.end_time.format("%H:%M"),
                        if slot.is_available { "free" } else { "on leave" }
                    );
                }
            }
            Err(e) => println!("\nError planning day: {}", e),
        }
    }

    fn print_appointments(&self, appointments: &[AppointmentRecord]) {
        if appointments.is_empty() {
            println!("  (none)");
            return;
        }

        for apt in appointments {
            let (label, color) = classify(apt.status);
            let when = apt
                .appointment_date_time
                .map(|dt| dt.with_timezone(&self.offset).format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "not scheduled".to_string());
            let duration = apt
                .duration_minutes
                .map(|m| format!(" ({} min)", m))
                .unwrap_or_default();

            println!("  {:12} [{:6}] {} - {}{}", label, color.name(), apt.doctor_name, when, duration);
            if let Some(notes) = &apt.notes {
                println!("    {}", notes);
            }
        }
    }

    fn patient_board(&mut self) -> Option<AppointmentBoard> {
        let patient_id = self.get_input("Patient ID", Some("P001"));
        match self.store.appointments_for_patient(&patient_id) {
            Ok(appointments) => Some(AppointmentBoard::new(appointments)),
            Err(e) => {
                println!("\nError fetching appointments: {}", e);
                None
            }
        }
    }

    fn view_patient_appointments(&mut self) {
        println!("\n--- Patient Appointments ---");
        let Some(board) = self.patient_board() else {
            return;
        };

        let counts = board.counts();
        let bar: Vec<String> = AppointmentFilter::ALL
            .iter()
            .map(|f| format!("{} ({})", f.title(), counts.get(*f)))
            .collect();
        println!("\nFilters: {}", bar.join(" | "));

        let choice = self.get_input("Filter", Some("All"));
        let criterion = AppointmentFilter::from_name(&choice).unwrap_or_else(|| {
            println!("Unknown filter '{}', showing all", choice);
            AppointmentFilter::All
        });

        println!("\n--- {} Appointments ---", criterion.title());
        self.print_appointments(&board.filtered(criterion));
        println!("\nCompleted: {:.1}%", counts.completion_rate());
    }

    fn view_current_appointments(&mut self) {
        println!("\n--- Current Appointments ---");
        let Some(board) = self.patient_board() else {
            return;
        };
        self.print_appointments(&board.current());
    }

    fn search_people(&mut self) {
        println!("\n--- Search Patients and Staff ---");
        let text = self.get_input("Search text", Some(""));
        let today = self.today();

        match self.store.patients() {
            Ok(patients) => {
                let found = search_patients(&patients, &text);
                println!("\nPatients ({}):", found.len());
                for patient in &found {
                    println!("  [{}] {} <{}>", patient.id, patient.basic_info(today), patient.email);
                }
            }
            Err(e) => println!("\nError fetching patients: {}", e),
        }

        match self.store.staff() {
            Ok(staff) => {
                let needle = text.trim().to_lowercase();
                println!("\nStaff:");
                for member in staff
                    .iter()
                    .filter(|s| needle.is_empty() || s.name.to_lowercase().contains(&needle))
                {
                    let status = member
                        .status
                        .map(|s| format!("{} [{}]", s.raw_value(), s.color().name()))
                        .unwrap_or_else(|| "Unknown".to_string());
                    println!("  {} - {}", member.basic_info(today), status);
                    println!("    {}", member.education_info());
                }
            }
            Err(e) => println!("\nError fetching staff: {}", e),
        }
    }

    fn local(&self, y: i32, m: u32, d: u32, h: u32, min: u32) -> serde_json::Value {
        match self.offset.with_ymd_and_hms(y, m, d, h, min, 0).single() {
            Some(dt) => timestamp_value(&dt.with_timezone(&Utc)),
            None => serde_json::Value::Null,
        }
    }

    fn run_demo(&mut self) {
        println!("\n--- Running Demo ---");

        let mut store = InMemoryStore::new(self.store.config().clone());
        store.insert(
            "doctors",
            json!({
                "id": "doc123",
                "name": "Dr. Jane Doe",
                "number": 67890,
                "email": "dr.jane.doe@hospital.com",
                "speciality": "Neurology",
                "licenseRegNo": "MED-67890-AB",
                "smc": "Medical Council of India",
                "gender": "Female",
                "yearOfRegistration": 2008,
                "licenseDetails": {"verificationStatus": "verified"},
                "schedule": {
                    "fullDayLeaves": [self.local(2025, 6, 1, 0, 0)],
                    "leaveTimeSlots": [self.local(2025, 6, 10, 9, 0)]
                }
            }),
        );
        store.insert(
            "doctors",
            json!({"id": "doc456", "name": "Dr. John Smith", "email": "dr.john.smith@hospital.com", "speciality": "Cardiology"}),
        );

        let statuses = ["scheduled", "completed", "cancelled", "noShow", "rescheduled"];
        for (i, status) in statuses.iter().enumerate() {
            store.insert(
                "appointments",
                json!({
                    "id": format!("apt{}", i + 1),
                    "doctorName": "Dr. Jane Doe",
                    "patientId": "P001",
                    "appointmentDateTime": self.local(2025, 6, 2 + i as u32, 10, 0),
                    "durationMinutes": 30,
                    "status": status
                }),
            );
        }
        store.insert(
            "patients",
            json!({"id": "P001", "name": "Jane Roe", "email": "jane.roe@example.com", "gender": "Female", "dob": "1985-06-15T00:00:00Z"}),
        );
        store.insert(
            "staff",
            json!({"uuid": "staff789", "name": "Sarah Johnson", "staffRole": "Head Nurse", "educationalQualification": "BSc Nursing", "status": "Available"}),
        );

        self.store = store;
        info!("Demo snapshot installed");

        let doctor = match self.store.doctor("doc123") {
            Ok(Some(doctor)) => doctor,
            _ => {
                println!("Demo doctor missing");
                return;
            }
        };

        println!("\nAvailability for {}:", doctor.basic_info());
        let probes = [(2025, 6, 1, 14, 0), (2025, 6, 10, 9, 0), (2025, 6, 10, 9, 1), (2025, 6, 2, 9, 0)];
        for (y, m, d, h, min) in probes {
            if let Some(instant) = self.offset.with_ymd_and_hms(y, m, d, h, min, 0).single() {
                let answer = if doctor.is_available(&instant) { "available" } else { "on leave" };
                println!("  {} -> {}", instant.format("%Y-%m-%d %H:%M"), answer);
            }
        }

        let board = match self.store.appointments_for_patient("P001") {
            Ok(appointments) => AppointmentBoard::new(appointments),
            Err(e) => {
                println!("Error fetching appointments: {}", e);
                return;
            }
        };

        for criterion in [AppointmentFilter::Upcoming, AppointmentFilter::Waiting] {
            println!("\n{}:", criterion.title());
            self.print_appointments(&board.filtered(criterion));
        }
        println!("\nCurrent (dashboard):");
        self.print_appointments(&board.current());
    }

    fn run(&mut self) {
        self.print_header();

        while self.running {
            self.print_menu();

            let choice = self.get_int_input("Enter choice", Some(8));
            if !self.running {
                break;
            }

            match choice {
                1 => self.prompt_snapshot(),
                2 => self.list_doctors(),
                3 => self.check_availability(),
                4 => self.plan_doctor_day(),
                5 => self.view_patient_appointments(),
                6 => self.view_current_appointments(),
                7 => self.search_people(),
                8 => self.run_demo(),
                9 => {
                    self.running = false;
                    println!("\nGoodbye!");
                }
                _ => println!("Invalid choice"),
            }
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Configuration rejected");
            std::process::exit(2);
        }
    };
    let offset = match config.calendar_offset() {
        Ok(offset) => offset,
        Err(e) => {
            error!(error = %e, "Configuration rejected");
            std::process::exit(2);
        }
    };

    let snapshot = config.snapshot_path.clone();
    let mut cli = FrontDeskCli::new(config, offset);
    if let Some(path) = snapshot {
        cli.load_snapshot(path);
    }
    cli.run();
}
