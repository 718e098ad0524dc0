use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::models::{Payment, Review};

/// Reservation lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReservationStatus::Pending => write!(f, "Pending"),
            ReservationStatus::Confirmed => write!(f, "Confirmed"),
            ReservationStatus::Cancelled => write!(f, "Cancelled"),
            ReservationStatus::Completed => write!(f, "Completed"),
        }
    }
}

impl ReservationStatus {
    /// Whether the reservation still occupies its time window
    pub fn is_active(&self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Confirmed)
    }
}

/// A booking of a resource for a time window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    #[serde(rename = "resourceId")]
    pub resource_id: i64,
    #[serde(rename = "resourceName", default)]
    pub resource_name: Option<String>,
    #[serde(rename = "userId", default)]
    pub user_id: String,
    #[serde(rename = "userName", default)]
    pub user_name: Option<String>,
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "endTime")]
    pub end_time: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: ReservationStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(rename = "isPaid", default)]
    pub is_paid: bool,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub attendees: i32,
    #[serde(rename = "isRecurring", default)]
    pub is_recurring: bool,
    #[serde(rename = "recurrencePattern", default)]
    pub recurrence_pattern: Option<String>,
    #[serde(rename = "recurrenceInterval", default)]
    pub recurrence_interval: Option<i32>,
    #[serde(rename = "recurrenceEndDate", default)]
    pub recurrence_end_date: Option<String>,
    #[serde(rename = "paymentDetails", default)]
    pub payment_details: Option<Payment>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(rename = "resourceCapacity", default)]
    pub resource_capacity: Option<i32>,
    #[serde(rename = "resourceLocation", default)]
    pub resource_location: Option<String>,
}

impl Reservation {
    pub fn resource_label(&self) -> String {
        self.resource_name
            .clone()
            .unwrap_or_else(|| format!("Resource #{}", self.resource_id))
    }

    /// Compact start for list view: "Mar 04 2:30p"
    pub fn formatted_start_short(&self) -> String {
        Self::format_short(&self.start_time)
    }

    /// Formatted window: "Mar 04, 2026 @ 02:30 PM - 04:30 PM" (same-day) or
    /// both full datetimes when the window spans days.
    pub fn formatted_window(&self) -> String {
        let (start, end) = (
            DateTime::parse_from_rfc3339(&self.start_time),
            DateTime::parse_from_rfc3339(&self.end_time),
        );
        match (start, end) {
            (Ok(s), Ok(e)) if s.date_naive() == e.date_naive() => format!(
                "{} - {}",
                s.format("%b %d, %Y @ %I:%M %p"),
                e.format("%I:%M %p")
            ),
            (Ok(s), Ok(e)) => format!(
                "{} - {}",
                s.format("%b %d, %Y @ %I:%M %p"),
                e.format("%b %d, %Y @ %I:%M %p")
            ),
            _ => format!("{} - {}", self.start_time, self.end_time),
        }
    }

    /// Duration in whole hours, rounded up; None if the timestamps don't parse
    pub fn duration_hours(&self) -> Option<i64> {
        let s = DateTime::parse_from_rfc3339(&self.start_time).ok()?;
        let e = DateTime::parse_from_rfc3339(&self.end_time).ok()?;
        let minutes = (e - s).num_minutes();
        if minutes <= 0 {
            return None;
        }
        Some((minutes + 59) / 60)
    }

    pub fn recurrence_label(&self) -> Option<String> {
        if !self.is_recurring {
            return None;
        }
        let pattern = self.recurrence_pattern.as_deref().unwrap_or("?");
        let interval = self.recurrence_interval.unwrap_or(1);
        let until = self
            .recurrence_end_date
            .as_deref()
            .map(Self::format_short)
            .unwrap_or_else(|| "?".to_string());
        Some(format!("{} x{} until {}", pattern, interval, until))
    }

    fn format_short(date: &str) -> String {
        match DateTime::parse_from_rfc3339(date) {
            Ok(dt) => {
                let hour = dt.format("%I").to_string();
                let hour = hour.trim_start_matches('0');
                let minute = dt.format("%M").to_string();
                let ampm = dt
                    .format("%p")
                    .to_string()
                    .to_lowercase()
                    .chars()
                    .next()
                    .unwrap_or('a');
                if minute == "00" {
                    format!("{} {}{}", dt.format("%b %d"), hour, ampm)
                } else {
                    format!("{} {}:{}{}", dt.format("%b %d"), hour, minute, ampm)
                }
            }
            Err(_) => date.chars().take(10).collect(),
        }
    }
}

/// Request body for POST /Reservation.
#[derive(Debug, Clone, Serialize)]
pub struct NewReservation {
    #[serde(rename = "resourceId")]
    pub resource_id: i64,
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "endTime")]
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub attendees: i32,
    #[serde(rename = "isRecurring")]
    pub is_recurring: bool,
    #[serde(rename = "recurrencePattern", skip_serializing_if = "Option::is_none")]
    pub recurrence_pattern: Option<String>,
    #[serde(rename = "recurrenceInterval", skip_serializing_if = "Option::is_none")]
    pub recurrence_interval: Option<i32>,
    #[serde(rename = "recurrenceEndDate", skip_serializing_if = "Option::is_none")]
    pub recurrence_end_date: Option<String>,
}

/// Request body for PATCH /Reservation/{id}/status.
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    pub status: ReservationStatus,
}

/// Sorting options for the reservations table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReservationSortColumn {
    #[default]
    Start,
    Resource,
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "id": 42,
            "resourceId": 7,
            "resourceName": "Conference Room A",
            "userId": "a1b2c3",
            "startTime": "2026-03-04T14:30:00Z",
            "endTime": "2026-03-04T16:30:00Z",
            "description": "Sprint planning",
            "status": "Confirmed",
            "isPaid": false,
            "price": 50.0,
            "createdAt": "2026-03-01T10:00:00Z",
            "attendees": 8,
            "isRecurring": true,
            "recurrencePattern": "Weekly",
            "recurrenceInterval": 1,
            "recurrenceEndDate": "2026-04-01T14:30:00Z"
        }"#
    }

    #[test]
    fn test_parse_reservation() {
        let r: Reservation = serde_json::from_str(sample_json()).expect("Failed to parse reservation");
        assert_eq!(r.id, 42);
        assert_eq!(r.status, ReservationStatus::Confirmed);
        assert!(r.status.is_active());
        assert_eq!(r.attendees, 8);
        assert_eq!(r.duration_hours(), Some(2));
        assert!(r.reviews.is_empty());
    }

    #[test]
    fn test_status_roundtrip() {
        assert_eq!(
            serde_json::to_string(&ReservationStatus::Cancelled).unwrap(),
            "\"Cancelled\""
        );
        let s: ReservationStatus = serde_json::from_str("\"Completed\"").unwrap();
        assert_eq!(s, ReservationStatus::Completed);
        assert!(!s.is_active());
    }

    #[test]
    fn test_formatted_window_same_day() {
        let r: Reservation = serde_json::from_str(sample_json()).expect("parse");
        let window = r.formatted_window();
        assert!(window.starts_with("Mar 04, 2026 @ 02:30 PM - "), "{}", window);
        assert!(window.ends_with("04:30 PM"), "{}", window);
    }

    #[test]
    fn test_duration_rounds_up() {
        let mut r: Reservation = serde_json::from_str(sample_json()).expect("parse");
        r.end_time = "2026-03-04T15:31:00Z".to_string();
        assert_eq!(r.duration_hours(), Some(2));
        // end before start is not a duration
        r.end_time = "2026-03-04T13:00:00Z".to_string();
        assert_eq!(r.duration_hours(), None);
    }

    #[test]
    fn test_recurrence_label() {
        let r: Reservation = serde_json::from_str(sample_json()).expect("parse");
        let label = r.recurrence_label().expect("recurring");
        assert!(label.starts_with("Weekly x1 until "), "{}", label);
    }

    #[test]
    fn test_new_reservation_skips_absent_recurrence() {
        let body = NewReservation {
            resource_id: 7,
            start_time: "2026-03-04T14:30:00Z".to_string(),
            end_time: "2026-03-04T16:30:00Z".to_string(),
            description: None,
            attendees: 2,
            is_recurring: false,
            recurrence_pattern: None,
            recurrence_interval: None,
            recurrence_end_date: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("recurrencePattern"));
        assert!(!json.contains("description"));
        assert!(json.contains("\"resourceId\":7"));
    }
}
