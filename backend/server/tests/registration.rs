mod support;

use support::{Multipart, spawn_app, spawn_app_with};

const RESUME: &[u8] = b"%PDF-1.4 resume";

fn applicant(email: &str, resume: &str) -> Multipart {
    details(email).file("resume", resume, RESUME)
}

fn details(email: &str) -> Multipart {
    Multipart::new()
        .text("name", "Sita Sharma")
        .text("gender", "F")
        .text("hobbies", "football")
        .text("hobbies", "tableTennis")
        .text("appointment", "2099-01-01T10:00")
        .text("country", "Nepal")
        .text("email", email)
        .text("phone", "9812345678")
        .text("password", "Secret#123")
        .text("confirm_password", "Secret#123")
}

#[tokio::test]
async fn valid_registration_stores_resume() {
    let app = spawn_app().await;

    let reply = app
        .post_multipart("/registration", applicant("sita@example.com", "cv.pdf"))
        .await;
    assert_eq!(reply.status, 303);
    assert_eq!(reply.location(), Some("/registration"));

    let stored = app.stored_files("resumes");
    assert_eq!(stored.len(), 1);
    assert_eq!(std::fs::read(&stored[0]).unwrap(), RESUME);

    let listing = app.get("/registrations", &[]).await.json();
    let registration = &listing["registrations"][0];
    assert_eq!(registration["email"], "sita@example.com");
    assert_eq!(registration["hobbies"][1], "tableTennis");
    assert!(registration["resume"].as_str().unwrap().ends_with("_cv.pdf"));
    assert!(registration.get("password").is_none());
}

#[tokio::test]
async fn executable_resume_is_rejected_and_nothing_persisted() {
    let app = spawn_app().await;

    let reply = app
        .post_multipart("/registration", applicant("sita@example.com", "resume.exe"))
        .await;
    assert_eq!(reply.status, 422);
    assert_eq!(reply.codes("resume"), vec!["UnsupportedFileType"]);
    assert!(app.stored_files("resumes").is_empty());

    // the email is still free
    let reply = app
        .post_multipart("/registration", applicant("sita@example.com", "cv.pdf"))
        .await;
    assert_eq!(reply.status, 303);
}

#[tokio::test]
async fn duplicate_email_is_reported() {
    let app = spawn_app().await;

    let reply = app
        .post_multipart("/registration", applicant("sita@example.com", "cv.pdf"))
        .await;
    assert_eq!(reply.status, 303);

    let reply = app
        .post_multipart("/registration", applicant("sita@example.com", "cv.docx"))
        .await;
    assert_eq!(reply.status, 422);
    assert_eq!(reply.codes("email"), vec!["DuplicateValue"]);
    assert_eq!(reply.json()["errors"]["email"][0], "Email already registered");
    assert_eq!(app.stored_files("resumes").len(), 1);
}

#[tokio::test]
async fn rejected_form_echoes_values_but_not_passwords() {
    let app = spawn_app().await;
    let form = Multipart::new()
        .text("name", "Sita Sharma")
        .text("hobbies", "football")
        .text("hobbies", "basketball")
        .text("appointment", "2001-01-01T10:00")
        .text("password", "Secret#123")
        .text("confirm_password", "Secret#124");

    let reply = app.post_multipart("/registration", form).await;
    assert_eq!(reply.status, 422);
    assert_eq!(reply.codes("appointment"), vec!["PastAppointment"]);
    // cross-field rules wait for every field to pass
    assert!(reply.codes("confirm_password").is_empty());

    let values = &reply.json()["values"];
    assert_eq!(values["name"], "Sita Sharma");
    assert_eq!(values["hobbies"][1], "basketball");
    assert!(values.get("password").is_none());
    assert!(values.get("confirm_password").is_none());
}

#[tokio::test]
async fn mismatched_passwords() {
    let app = spawn_app().await;
    let form = applicant("ram@example.com", "cv.pdf").text("confirm_password", "Secret#124");

    let reply = app.post_multipart("/registration", form).await;
    assert_eq!(reply.status, 422);
    assert_eq!(reply.codes("confirm_password"), vec!["PasswordMismatch"]);
}

#[tokio::test]
async fn garbage_multipart_is_bad_request() {
    let app = spawn_app().await;
    let reply = app
        .post_form("/registration", &[("name", "not multipart")])
        .await;

    assert_eq!(reply.status / 100, 4);
    assert_ne!(reply.status, 422);
}

#[tokio::test]
async fn resume_over_body_limit_is_a_size_error() {
    let app = spawn_app_with(|config| config.max_body_bytes = 64 * 1024).await;

    let form = details("sita@example.com").file("resume", "cv.pdf", &vec![0u8; 96 * 1024]);
    let reply = app.post_multipart("/registration", form).await;

    assert_eq!(reply.status, 422);
    assert_eq!(reply.codes("resume"), vec!["FileTooLarge"]);
    assert_eq!(
        reply.json()["errors"]["resume"][0],
        "File size should be less than 2MB"
    );
    assert_eq!(reply.json()["values"]["name"], "Sita Sharma");
    assert!(app.stored_files("resumes").is_empty());
}

#[tokio::test]
async fn text_over_body_limit_is_payload_too_large() {
    let app = spawn_app_with(|config| config.max_body_bytes = 64 * 1024).await;

    let form = Multipart::new().text("name", &"a".repeat(96 * 1024));
    let reply = app.post_multipart("/registration", form).await;

    assert_eq!(reply.status, 413);
    assert_eq!(reply.json()["error"], "PayloadTooLarge");
}

#[tokio::test]
async fn repeated_hobby_is_stored_once() {
    let app = spawn_app().await;

    let form = applicant("sita@example.com", "cv.pdf").text("hobbies", "football");
    let reply = app.post_multipart("/registration", form).await;
    assert_eq!(reply.status, 303);

    let listing = app.get("/registrations", &[]).await.json();
    assert_eq!(
        listing["registrations"][0]["hobbies"],
        serde_json::json!(["football", "tableTennis"])
    );
}
