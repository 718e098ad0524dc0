//! Form input validation.
//!
//! Each `validate_*` function checks one form's raw text inputs and
//! returns every failing field, so the UI can flag all problems at once
//! instead of stopping at the first.

use chrono::{Duration, NaiveDateTime};

/// Minimum password length accepted by the backend
const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum reservation description length
const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Review comment length bounds
const MIN_COMMENT_LENGTH: usize = 10;
const MAX_COMMENT_LENGTH: usize = 500;

/// Input format for date-time fields, e.g. "2026-03-02 14:30"
pub const DATETIME_INPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Wire format the backend accepts for date-time values
const DATETIME_WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:00";

/// A validation failure on a single named field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Minimal email shape check: one '@' with characters around it and a
/// dot in the domain part. Real validation is the backend's job.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

/// Parse a "YYYY-MM-DD HH:MM" input into a naive local timestamp
pub fn parse_datetime_input(input: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input.trim(), DATETIME_INPUT_FORMAT).ok()
}

/// Format a parsed timestamp the way the backend expects it
pub fn to_wire_datetime(value: NaiveDateTime) -> String {
    value.format(DATETIME_WIRE_FORMAT).to_string()
}

// ===== Login =====

pub fn validate_login(email: &str, password: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if email.trim().is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !is_valid_email(email.trim()) {
        errors.push(FieldError::new("email", "Enter a valid email address"));
    }
    if password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }
    errors
}

// ===== Registration =====

pub struct RegistrationInput<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
    pub phone_number: &'a str,
    pub terms_accepted: bool,
}

pub fn validate_registration(input: &RegistrationInput<'_>) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if input.first_name.trim().is_empty() {
        errors.push(FieldError::new("first_name", "First name is required"));
    }
    if input.last_name.trim().is_empty() {
        errors.push(FieldError::new("last_name", "Last name is required"));
    }
    if input.email.trim().is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !is_valid_email(input.email.trim()) {
        errors.push(FieldError::new("email", "Enter a valid email address"));
    }
    if input.password.len() < MIN_PASSWORD_LENGTH {
        errors.push(FieldError::new(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
        ));
    }
    if input.confirm_password != input.password {
        errors.push(FieldError::new("confirm_password", "Passwords do not match"));
    }
    if input.phone_number.trim().is_empty() {
        errors.push(FieldError::new("phone_number", "Phone number is required"));
    }
    if !input.terms_accepted {
        errors.push(FieldError::new(
            "terms",
            "You must accept the terms and conditions",
        ));
    }
    errors
}

// ===== Reservation wizard =====

pub struct ReservationInput<'a> {
    pub start: &'a str,
    pub end: &'a str,
    pub description: &'a str,
    pub attendees: &'a str,
    pub capacity: i32,
    pub max_hours: Option<i32>,
    pub is_recurring: bool,
    pub recurrence_pattern: &'a str,
    pub recurrence_interval: &'a str,
    pub recurrence_end_date: &'a str,
}

pub fn validate_reservation(input: &ReservationInput<'_>, now: NaiveDateTime) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let start = match parse_datetime_input(input.start) {
        Some(start) => {
            if start <= now {
                errors.push(FieldError::new("start", "Start time must be in the future"));
            }
            Some(start)
        }
        None => {
            errors.push(FieldError::new(
                "start",
                "Enter a start time as YYYY-MM-DD HH:MM",
            ));
            None
        }
    };

    match parse_datetime_input(input.end) {
        Some(end) => {
            if let Some(start) = start {
                if end <= start {
                    errors.push(FieldError::new("end", "End time must be after the start time"));
                } else if let Some(max_hours) = input.max_hours {
                    let max = Duration::hours(max_hours as i64);
                    if end - start > max {
                        errors.push(FieldError::new(
                            "end",
                            format!("Reservations are limited to {} hours", max_hours),
                        ));
                    }
                }
            }
        }
        None => {
            errors.push(FieldError::new("end", "Enter an end time as YYYY-MM-DD HH:MM"));
        }
    }

    if input.description.chars().count() > MAX_DESCRIPTION_LENGTH {
        errors.push(FieldError::new(
            "description",
            format!("Description must be at most {} characters", MAX_DESCRIPTION_LENGTH),
        ));
    }

    match input.attendees.trim().parse::<i32>() {
        Ok(attendees) if attendees >= 1 => {
            if attendees > input.capacity {
                errors.push(FieldError::new(
                    "attendees",
                    format!("This resource holds at most {} attendees", input.capacity),
                ));
            }
        }
        _ => {
            errors.push(FieldError::new("attendees", "Enter at least 1 attendee"));
        }
    }

    if input.is_recurring {
        errors.extend(validate_recurrence(input, start));
    }

    errors
}

fn validate_recurrence(
    input: &ReservationInput<'_>,
    start: Option<NaiveDateTime>,
) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let pattern = input.recurrence_pattern.trim().to_lowercase();
    if !matches!(pattern.as_str(), "daily" | "weekly" | "monthly") {
        errors.push(FieldError::new(
            "recurrence_pattern",
            "Pattern must be daily, weekly, or monthly",
        ));
    }

    match input.recurrence_interval.trim().parse::<i32>() {
        Ok(interval) if interval >= 1 => {}
        _ => {
            errors.push(FieldError::new(
                "recurrence_interval",
                "Repeat interval must be at least 1",
            ));
        }
    }

    match parse_datetime_input(input.recurrence_end_date).or_else(|| {
        // A bare date is accepted for the recurrence end; it means end of that day
        chrono::NaiveDate::parse_from_str(input.recurrence_end_date.trim(), "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(23, 59, 0))
    }) {
        Some(end_date) => {
            if let Some(start) = start {
                if end_date <= start {
                    errors.push(FieldError::new(
                        "recurrence_end_date",
                        "Recurrence end date must be after the start time",
                    ));
                }
            }
        }
        None => {
            errors.push(FieldError::new(
                "recurrence_end_date",
                "Enter a recurrence end date as YYYY-MM-DD",
            ));
        }
    }

    errors
}

// ===== Payment =====

pub fn validate_payment(amount: &str, payment_method: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    match amount.trim().parse::<f64>() {
        Ok(value) if value > 0.0 => {}
        _ => {
            errors.push(FieldError::new("amount", "Enter an amount greater than zero"));
        }
    }
    let method = payment_method.trim().to_lowercase();
    if !matches!(method.as_str(), "credit" | "paypal") {
        errors.push(FieldError::new(
            "payment_method",
            "Payment method must be credit or paypal",
        ));
    }
    errors
}

// ===== Review =====

pub fn validate_review(rating: i32, comment: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if !(1..=5).contains(&rating) {
        errors.push(FieldError::new("rating", "Rating must be between 1 and 5"));
    }
    let len = comment.trim().chars().count();
    if len < MIN_COMMENT_LENGTH {
        errors.push(FieldError::new(
            "comment",
            format!("Comment must be at least {} characters", MIN_COMMENT_LENGTH),
        ));
    } else if len > MAX_COMMENT_LENGTH {
        errors.push(FieldError::new(
            "comment",
            format!("Comment must be at most {} characters", MAX_COMMENT_LENGTH),
        ));
    }
    errors
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fields(errors: &[FieldError]) -> Vec<&'static str> {
        errors.iter().map(|e| e.field).collect()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn base_input<'a>() -> ReservationInput<'a> {
        ReservationInput {
            start: "2026-03-02 14:00",
            end: "2026-03-02 16:00",
            description: "Team sync",
            attendees: "4",
            capacity: 10,
            max_hours: Some(8),
            is_recurring: false,
            recurrence_pattern: "",
            recurrence_interval: "",
            recurrence_end_date: "",
        }
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("mara@example.com"));
        assert!(!is_valid_email("mara"));
        assert!(!is_valid_email("mara@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("mara@example"));
        assert!(!is_valid_email("mara voss@example.com"));
    }

    #[test]
    fn test_login_requires_both_fields() {
        let errors = validate_login("", "");
        assert_eq!(fields(&errors), vec!["email", "password"]);

        assert!(validate_login("mara@example.com", "hunter22").is_empty());
    }

    #[test]
    fn test_registration_rules() {
        let input = RegistrationInput {
            first_name: "Mara",
            last_name: "Voss",
            email: "not-an-email",
            password: "short",
            confirm_password: "different",
            phone_number: "5551234567",
            terms_accepted: false,
        };
        let errors = validate_registration(&input);
        assert_eq!(
            fields(&errors),
            vec!["email", "password", "confirm_password", "terms"]
        );

        let ok = RegistrationInput {
            email: "mara@example.com",
            password: "hunter22",
            confirm_password: "hunter22",
            terms_accepted: true,
            ..input
        };
        assert!(validate_registration(&ok).is_empty());
    }

    #[test]
    fn test_reservation_happy_path() {
        let now = at(2026, 3, 1, 12, 0);
        assert!(validate_reservation(&base_input(), now).is_empty());
    }

    #[test]
    fn test_reservation_start_in_past() {
        let now = at(2026, 3, 3, 12, 0);
        let errors = validate_reservation(&base_input(), now);
        assert_eq!(fields(&errors), vec!["start"]);
    }

    #[test]
    fn test_reservation_end_before_start() {
        let now = at(2026, 3, 1, 12, 0);
        let input = ReservationInput {
            end: "2026-03-02 13:00",
            ..base_input()
        };
        let errors = validate_reservation(&input, now);
        assert_eq!(fields(&errors), vec!["end"]);
    }

    #[test]
    fn test_reservation_exceeds_max_hours() {
        let now = at(2026, 3, 1, 12, 0);
        let input = ReservationInput {
            end: "2026-03-03 14:00",
            max_hours: Some(8),
            ..base_input()
        };
        let errors = validate_reservation(&input, now);
        assert_eq!(fields(&errors), vec!["end"]);
        assert!(errors[0].message.contains("8 hours"));
    }

    #[test]
    fn test_reservation_attendees_bounds() {
        let now = at(2026, 3, 1, 12, 0);

        let over = ReservationInput {
            attendees: "11",
            ..base_input()
        };
        assert_eq!(fields(&validate_reservation(&over, now)), vec!["attendees"]);

        let zero = ReservationInput {
            attendees: "0",
            ..base_input()
        };
        assert_eq!(fields(&validate_reservation(&zero, now)), vec!["attendees"]);

        let junk = ReservationInput {
            attendees: "many",
            ..base_input()
        };
        assert_eq!(fields(&validate_reservation(&junk, now)), vec!["attendees"]);
    }

    #[test]
    fn test_reservation_description_too_long() {
        let now = at(2026, 3, 1, 12, 0);
        let long = "x".repeat(501);
        let input = ReservationInput {
            description: &long,
            ..base_input()
        };
        assert_eq!(fields(&validate_reservation(&input, now)), vec!["description"]);
    }

    #[test]
    fn test_recurrence_rules() {
        let now = at(2026, 3, 1, 12, 0);
        let input = ReservationInput {
            is_recurring: true,
            recurrence_pattern: "yearly",
            recurrence_interval: "0",
            recurrence_end_date: "2026-02-01",
            ..base_input()
        };
        let errors = validate_reservation(&input, now);
        assert_eq!(
            fields(&errors),
            vec![
                "recurrence_pattern",
                "recurrence_interval",
                "recurrence_end_date"
            ]
        );

        let ok = ReservationInput {
            is_recurring: true,
            recurrence_pattern: "weekly",
            recurrence_interval: "2",
            recurrence_end_date: "2026-06-01",
            ..base_input()
        };
        assert!(validate_reservation(&ok, now).is_empty());
    }

    #[test]
    fn test_payment_rules() {
        assert_eq!(fields(&validate_payment("0", "credit")), vec!["amount"]);
        assert_eq!(fields(&validate_payment("abc", "credit")), vec!["amount"]);
        assert_eq!(
            fields(&validate_payment("25.00", "")),
            vec!["payment_method"]
        );
        assert_eq!(
            fields(&validate_payment("25.00", "cash")),
            vec!["payment_method"]
        );
        assert!(validate_payment("25.00", "credit").is_empty());
        assert!(validate_payment("25.00", "PayPal").is_empty());
    }

    #[test]
    fn test_review_rules() {
        assert_eq!(fields(&validate_review(0, "perfectly fine")), vec!["rating"]);
        assert_eq!(fields(&validate_review(6, "perfectly fine")), vec!["rating"]);
        assert_eq!(fields(&validate_review(4, "short")), vec!["comment"]);
        let long = "x".repeat(501);
        assert_eq!(fields(&validate_review(4, &long)), vec!["comment"]);
        assert!(validate_review(5, "Great space, would book again").is_empty());
    }

    #[test]
    fn test_wire_datetime_format() {
        let parsed = parse_datetime_input("2026-03-02 14:30").expect("parse");
        assert_eq!(to_wire_datetime(parsed), "2026-03-02T14:30:00");
    }
}
