//! Declarations for every form the application accepts.

mod grocery;
mod note;
mod patient;
mod project;
mod registration;
mod student;
mod upload;
mod user;

pub use grocery::{GroceryForm, GroceryInput};
pub use note::{NoteForm, NoteInput};
pub use patient::{PatientForm, PatientInput};
pub use project::{ProjectSubmissionForm, ProjectSubmissionInput};
pub use registration::{RegistrationForm, RegistrationInput};
pub use student::{LoginForm, LoginInput, StudentRegistrationForm, StudentRegistrationInput};
pub use upload::{FileUploadForm, FileUploadInput};
pub use user::{UserRegistrationForm, UserRegistrationInput};
