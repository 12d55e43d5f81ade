use chrono::{DateTime, NaiveDate, Utc};
use forms::{Country, Gender, Hobby};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::{Record, UniqueKey};

pub const PATIENTS: &str = "patients";
pub const REGISTRATIONS: &str = "registrations";
pub const PROJECTS: &str = "project_submissions";
pub const USERS: &str = "users";
pub const STUDENTS: &str = "students";
pub const UPLOADS: &str = "uploaded_files";
pub const NOTES: &str = "notes";
pub const GROCERIES: &str = "grocery_items";

pub const RESUMES_DIR: &str = "resumes";
pub const PROJECTS_DIR: &str = "projects";
pub const UPLOADS_DIR: &str = "uploads";

/// `PAT-` and the first 8 hex digits of a v4 UUID, uppercased.
pub fn generate_patient_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("PAT-{}", hex[..8].to_uppercase())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: u64,
    pub name: String,
    pub patient_id: String,
    pub mobile: String,
    pub gender: Gender,
    pub address: Option<String>,
    pub dob: NaiveDate,
    pub doctor_name: String,
    pub created_at: DateTime<Utc>,
}

impl Record for Patient {
    const COLLECTION: &'static str = PATIENTS;

    fn id(&self) -> u64 {
        self.id
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::new("patient_id", &self.patient_id)]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub id: u64,
    pub name: String,
    pub gender: Gender,
    pub hobbies: Vec<Hobby>,
    pub appointment: DateTime<Utc>,
    pub country: Country,
    pub email: String,
    pub phone: String,
    pub resume: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl Record for Registration {
    const COLLECTION: &'static str = REGISTRATIONS;

    fn id(&self) -> u64 {
        self.id
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::new("email", &self.email)]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSubmission {
    pub id: u64,
    pub tu_registration_number: String,
    pub email: String,
    pub project_file: String,
    pub uploaded_at: DateTime<Utc>,
}

impl Record for ProjectSubmission {
    const COLLECTION: &'static str = PROJECTS;

    fn id(&self) -> u64 {
        self.id
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::new(
            "tu_registration_number",
            &self.tu_registration_number,
        )]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl Record for User {
    const COLLECTION: &'static str = USERS;

    fn id(&self) -> u64 {
        self.id
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![
            UniqueKey::new("email", &self.email),
            UniqueKey::new("username", &self.username),
        ]
    }
}

/// What the user listing shows; the password hash stays server side.
#[derive(Debug, Serialize)]
pub struct UserSummary<'a> {
    pub id: u64,
    pub full_name: &'a str,
    pub email: &'a str,
    pub username: &'a str,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn summary(&self) -> UserSummary<'_> {
        UserSummary {
            id: self.id,
            full_name: &self.full_name,
            email: &self.email,
            username: &self.username,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl Record for Student {
    const COLLECTION: &'static str = STUDENTS;

    fn id(&self) -> u64 {
        self.id
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![
            UniqueKey::new("username", &self.username),
            UniqueKey::new("email", &self.email),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: u64,
    pub file: String,
    pub filename: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

impl Record for UploadedFile {
    const COLLECTION: &'static str = UPLOADS;

    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Record for Note {
    const COLLECTION: &'static str = NOTES;

    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroceryItem {
    pub id: u64,
    pub name: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Record for GroceryItem {
    const COLLECTION: &'static str = GROCERIES;

    fn id(&self) -> u64 {
        self.id
    }
}
