use serde::{Deserialize, Serialize};

use crate::utils::format::format_datetime;

/// A notification delivered to the current user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    #[serde(rename = "userId", default)]
    pub user_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(rename = "reservationId", default)]
    pub reservation_id: Option<i64>,
    #[serde(rename = "isRead", default)]
    pub is_read: bool,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
}

impl Notification {
    pub fn created_label(&self) -> String {
        format_datetime(&self.created_at)
    }

    /// Marker for list rendering: unread entries get a bullet
    pub fn read_marker(&self) -> &'static str {
        if self.is_read {
            " "
        } else {
            "●"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_notification() {
        let json = r#"{
            "id": 11,
            "userId": "a1b2c3",
            "title": "Reservation confirmed",
            "message": "Your booking of Conference Room A was confirmed.",
            "type": "ReservationStatus",
            "reservationId": 42,
            "isRead": false,
            "createdAt": "2026-03-02T12:00:00Z"
        }"#;
        let n: Notification = serde_json::from_str(json).expect("Failed to parse notification");
        assert_eq!(n.kind, "ReservationStatus");
        assert_eq!(n.reservation_id, Some(42));
        assert_eq!(n.read_marker(), "●");
    }
}
