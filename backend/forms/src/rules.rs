//! Per-field constraints.
//!
//! A [`Rule`] turns the current value of a field into the next one or rejects it.
//! Rules that parse (dates, timestamps) change the value's shape, so later rules in
//! the same field see the parsed form.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

use crate::{error::ErrorKind, input::FileUpload};

pub const MB: u64 = 1024 * 1024;

static MOBILE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(98|97|96)\d{8}$").unwrap());
static PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:9\d{9}|01\d{7})$").unwrap());
static DOB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").unwrap()
});
static USERNAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z]+\d+$").unwrap());
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").unwrap());

static LOWER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z]").unwrap());
static UPPER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z]").unwrap());
static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").unwrap());
static SYMBOL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z\d\s]").unwrap());

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Mobile,
    Phone,
    Dob,
    Username,
    Email,
}

impl Pattern {
    pub fn regex(self) -> &'static Regex {
        match self {
            Pattern::Mobile => &MOBILE,
            Pattern::Phone => &PHONE,
            Pattern::Dob => &DOB,
            Pattern::Username => &USERNAME,
            Pattern::Email => &EMAIL,
        }
    }

    pub fn matches(self, value: &str) -> bool {
        self.regex().is_match(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilePolicy {
    pub extensions: &'static [&'static str],
    pub max_bytes: u64,
    pub type_message: &'static str,
    pub size_message: &'static str,
}

pub const IMAGE_POLICY: FilePolicy = FilePolicy {
    extensions: &["jpg", "jpeg", "png", "gif"],
    max_bytes: 2 * MB,
    type_message: "Invalid file type. Allowed: jpg, jpeg, png, gif",
    size_message: "File size must be less than 2MB",
};

pub const DOCUMENT_POLICY: FilePolicy = FilePolicy {
    extensions: &["pdf", "doc", "docx", "ppt", "pptx", "jpeg", "jpg"],
    max_bytes: 5 * MB,
    type_message: "File format must be pdf, doc, docx, ppt, pptx, or jpeg",
    size_message: "File size must be less than 5MB",
};

pub const RESUME_POLICY: FilePolicy = FilePolicy {
    extensions: &["pdf", "jpg", "jpeg", "png", "doc", "docx"],
    max_bytes: 2 * MB,
    type_message: "Unsupported file format",
    size_message: "File size should be less than 2MB",
};

impl FilePolicy {
    pub fn check(&self, file: &FileUpload) -> Result<(), (ErrorKind, String)> {
        let extension = file.extension();
        if !self.extensions.contains(&extension.as_str()) {
            return Err((ErrorKind::UnsupportedFileType, self.type_message.to_string()));
        }

        if file.size() > self.max_bytes {
            return Err((ErrorKind::FileTooLarge, self.size_message.to_string()));
        }

        Ok(())
    }
}

/// A value moving through a field's rule chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Absent,
    Text(String),
    List(Vec<String>),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    File(FileUpload),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Optional custom message, otherwise the generic one.
    MaxLength(usize, Option<&'static str>),
    MinLength(usize, &'static str),
    Pattern(Pattern, &'static str),
    Strength(&'static str),
    /// Parses a pattern-checked `YYYY-MM-DD` into a real calendar date.
    CalendarDate(&'static str),
    /// Parses a local date-time input, read as UTC.
    Timestamp,
    NotPast(&'static str),
    /// Membership for scalars, per element for lists.
    Choice(&'static [&'static str]),
    File(FilePolicy),
}

impl Rule {
    pub fn apply(&self, value: Value, now: DateTime<Utc>) -> Result<Value, (ErrorKind, String)> {
        match (self, value) {
            (Rule::MaxLength(max, message), Value::Text(text)) => {
                let length = text.chars().count();
                if length > *max {
                    let message = message.map(str::to_string).unwrap_or_else(|| {
                        format!("Ensure this value has at most {max} characters (it has {length}).")
                    });
                    return Err((ErrorKind::TooLong, message));
                }
                Ok(Value::Text(text))
            }
            (Rule::MinLength(min, message), Value::Text(text)) => {
                if text.chars().count() < *min {
                    return Err((ErrorKind::TooShort, message.to_string()));
                }
                Ok(Value::Text(text))
            }
            (Rule::Pattern(pattern, message), Value::Text(text)) => {
                if !pattern.matches(&text) {
                    return Err((ErrorKind::PatternMismatch, message.to_string()));
                }
                Ok(Value::Text(text))
            }
            (Rule::Strength(message), Value::Text(text)) => {
                if !is_strong_password(&text) {
                    return Err((ErrorKind::PatternMismatch, message.to_string()));
                }
                Ok(Value::Text(text))
            }
            (Rule::CalendarDate(message), Value::Text(text)) => {
                NaiveDate::parse_from_str(&text, "%Y-%m-%d")
                    .map(Value::Date)
                    .map_err(|_| (ErrorKind::InvalidDate, message.to_string()))
            }
            (Rule::Timestamp, Value::Text(text)) => parse_timestamp(&text)
                .map(Value::DateTime)
                .ok_or_else(|| (ErrorKind::InvalidDate, "Enter a valid date/time.".to_string())),
            (Rule::NotPast(message), Value::DateTime(at)) => {
                if at < now {
                    return Err((ErrorKind::PastAppointment, message.to_string()));
                }
                Ok(Value::DateTime(at))
            }
            (Rule::Choice(choices), Value::Text(text)) => {
                check_choice(choices, &text)?;
                Ok(Value::Text(text))
            }
            (Rule::Choice(choices), Value::List(values)) => {
                for value in &values {
                    check_choice(choices, value)?;
                }
                Ok(Value::List(values))
            }
            (Rule::File(policy), Value::File(file)) => {
                policy.check(&file)?;
                Ok(Value::File(file))
            }
            (_, value) => Ok(value),
        }
    }
}

fn check_choice(choices: &[&str], value: &str) -> Result<(), (ErrorKind, String)> {
    if choices.contains(&value) {
        return Ok(());
    }

    Err((
        ErrorKind::InvalidChoice,
        format!("Select a valid choice. {value} is not one of the available choices."),
    ))
}

/// Eight or more characters on one line with a lowercase, an uppercase, a digit
/// and a symbol.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= 8
        && !password.contains(['\n', '\r'])
        && LOWER.is_match(password)
        && UPPER.is_match(password)
        && DIGIT.is_match(password)
        && SYMBOL.is_match(password)
}

pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn test_mobile_pattern() {
        for ok in ["9812345678", "9700000000", "9699999999"] {
            assert!(Pattern::Mobile.matches(ok), "{ok}");
        }
        for bad in ["9512345678", "981234567", "98123456789", "98-1234567", "", " 9812345678"] {
            assert!(!Pattern::Mobile.matches(bad), "{bad}");
        }
    }

    #[test]
    fn test_phone_pattern() {
        assert!(Pattern::Phone.matches("9841234567"));
        assert!(Pattern::Phone.matches("014123456"));
        assert!(!Pattern::Phone.matches("0141234567"));
        assert!(!Pattern::Phone.matches("8841234567"));
    }

    #[test]
    fn test_username_pattern() {
        assert!(Pattern::Username.matches("ram123"));
        assert!(!Pattern::Username.matches("123ram"));
        assert!(!Pattern::Username.matches("ram"));
        assert!(!Pattern::Username.matches("ram_1"));
    }

    #[test]
    fn test_email_pattern() {
        assert!(Pattern::Email.matches("a@b.com"));
        assert!(!Pattern::Email.matches("a@b"));
        assert!(!Pattern::Email.matches("a b@c.com"));
        assert!(!Pattern::Email.matches("@b.com"));
    }

    #[test]
    fn test_password_strength() {
        assert!(is_strong_password("Secret#1"));
        assert!(is_strong_password("Pässw0rd!"));
        assert!(!is_strong_password("Sh0rt#"));
        assert!(!is_strong_password("alllower#1"));
        assert!(!is_strong_password("ALLUPPER#1"));
        assert!(!is_strong_password("NoDigits#!"));
        assert!(!is_strong_password("NoSymbol12"));
        assert!(!is_strong_password("Only Space1"));
        assert!(!is_strong_password("Line\nBreak#1"));
    }

    #[test]
    fn test_calendar_date_rejects_impossible_days() {
        let rule = Rule::CalendarDate("Invalid calendar date");
        for bad in ["2023-02-30", "2024-02-30", "2023-02-29", "2023-04-31"] {
            let err = rule.apply(text(bad), now()).unwrap_err();
            assert_eq!(err.0, ErrorKind::InvalidDate, "{bad}");
        }

        let ok = rule.apply(text("2024-02-29"), now()).unwrap();
        assert_eq!(ok, Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
    }

    #[test]
    fn test_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 7, 1, 9, 30, 0).unwrap();
        for input in ["2025-07-01T09:30", "2025-07-01 09:30", "2025-07-01T09:30:00"] {
            assert_eq!(parse_timestamp(input), Some(expected), "{input}");
        }
        assert_eq!(parse_timestamp("tomorrow"), None);
    }

    #[test]
    fn test_not_past() {
        let rule = Rule::NotPast("past");
        let earlier = now() - chrono::Duration::seconds(1);

        assert_eq!(
            rule.apply(Value::DateTime(earlier), now()).unwrap_err().0,
            ErrorKind::PastAppointment
        );
        assert!(rule.apply(Value::DateTime(now()), now()).is_ok());
    }

    #[test]
    fn test_choice_checks_each_list_element() {
        let rule = Rule::Choice(&["football", "basketball"]);

        assert!(rule.apply(Value::List(vec!["football".into()]), now()).is_ok());

        let err = rule
            .apply(Value::List(vec!["football".into(), "chess".into()]), now())
            .unwrap_err();
        assert_eq!(err.0, ErrorKind::InvalidChoice);
        assert!(err.1.contains("chess"));
    }

    #[test]
    fn test_max_length_messages() {
        let generic = Rule::MaxLength(3, None).apply(text("abcd"), now()).unwrap_err();
        assert_eq!(generic.1, "Ensure this value has at most 3 characters (it has 4).");

        let custom = Rule::MaxLength(3, Some("too long")).apply(text("abcd"), now()).unwrap_err();
        assert_eq!(custom, (ErrorKind::TooLong, "too long".to_string()));

        assert!(Rule::MaxLength(3, None).apply(text("äöü"), now()).is_ok());
    }

    #[test]
    fn test_file_policy() {
        let pdf = FileUpload::new("resume.PDF", vec![0u8; 10]);
        assert!(RESUME_POLICY.check(&pdf).is_ok());

        let exe = FileUpload::new("resume.exe", vec![0u8; 10]);
        assert_eq!(RESUME_POLICY.check(&exe).unwrap_err().0, ErrorKind::UnsupportedFileType);

        let at_cap = FileUpload::new("photo.png", vec![0u8; (2 * MB) as usize]);
        assert!(IMAGE_POLICY.check(&at_cap).is_ok());

        let over = FileUpload::new("photo.png", vec![0u8; (2 * MB + 1) as usize]);
        assert_eq!(IMAGE_POLICY.check(&over).unwrap_err().0, ErrorKind::FileTooLarge);

        let slides = FileUpload::new("deck.pptx", vec![0u8; (3 * MB) as usize]);
        assert!(DOCUMENT_POLICY.check(&slides).is_ok());
        assert_eq!(
            DOCUMENT_POLICY
                .check(&FileUpload::new("logo.png", vec![1]))
                .unwrap_err()
                .0,
            ErrorKind::UnsupportedFileType
        );
    }
}
