use serde::{Deserialize, Serialize};

use crate::utils::format::format_datetime;

/// A bookable resource from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
    #[serde(rename = "isAvailable", default)]
    pub is_available: bool,
    #[serde(rename = "hourlyRate", default)]
    pub hourly_rate: Option<f64>,
    #[serde(rename = "dailyRate", default)]
    pub daily_rate: Option<f64>,
    #[serde(default)]
    pub capacity: i32,
    #[serde(rename = "maxReservationHours", default)]
    pub max_reservation_hours: Option<i32>,
    #[serde(default)]
    pub rules: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<String>,
    #[serde(rename = "isActive", default)]
    pub is_active: bool,
    #[serde(rename = "isAvailableNow", default)]
    pub is_available_now: Option<bool>,
    #[serde(rename = "nextAvailableTime", default)]
    pub next_available_time: Option<String>,
    #[serde(rename = "averageRating", default)]
    pub average_rating: Option<f64>,
}

impl Resource {
    /// Short availability label for the list view
    pub fn availability_label(&self) -> &'static str {
        match self.is_available_now {
            Some(true) => "now",
            Some(false) => "busy",
            None => {
                if self.is_available {
                    "yes"
                } else {
                    "no"
                }
            }
        }
    }

    /// Rate column for the list view: hourly preferred, daily as fallback
    pub fn rate_label(&self) -> String {
        match (self.hourly_rate, self.daily_rate) {
            (Some(h), _) => format!("{:.2}/hr", h),
            (None, Some(d)) => format!("{:.2}/day", d),
            (None, None) => "free".to_string(),
        }
    }

    /// Star rating for display: "4.2" or "-" when unrated
    pub fn rating_label(&self) -> String {
        match self.average_rating {
            Some(r) => format!("{:.1}", r),
            None => "-".to_string(),
        }
    }

    pub fn next_available_label(&self) -> Option<String> {
        self.next_available_time.as_deref().map(format_datetime)
    }
}

/// Sorting options for the resources table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResourceSortColumn {
    #[default]
    Name,
    Category,
    Rate,
    Rating,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "id": 7,
            "name": "Conference Room A",
            "description": "Large meeting room with projector",
            "location": "Building 2, Floor 3",
            "category": "Meeting Room",
            "imageUrl": null,
            "isAvailable": true,
            "hourlyRate": 25.0,
            "dailyRate": 150.0,
            "capacity": 12,
            "maxReservationHours": 8,
            "createdAt": "2025-11-02T09:00:00Z",
            "isActive": true,
            "isAvailableNow": true,
            "averageRating": 4.25
        }"#
    }

    #[test]
    fn test_parse_resource() {
        let r: Resource = serde_json::from_str(sample_json()).expect("Failed to parse resource");
        assert_eq!(r.id, 7);
        assert_eq!(r.capacity, 12);
        assert_eq!(r.availability_label(), "now");
        assert_eq!(r.rate_label(), "25.00/hr");
        assert_eq!(r.rating_label(), "4.2");
    }

    #[test]
    fn test_resource_rate_fallbacks() {
        let mut r: Resource = serde_json::from_str(sample_json()).expect("parse");
        r.hourly_rate = None;
        assert_eq!(r.rate_label(), "150.00/day");
        r.daily_rate = None;
        assert_eq!(r.rate_label(), "free");
    }

    #[test]
    fn test_resource_availability_without_live_flag() {
        let mut r: Resource = serde_json::from_str(sample_json()).expect("parse");
        r.is_available_now = None;
        assert_eq!(r.availability_label(), "yes");
        r.is_available = false;
        assert_eq!(r.availability_label(), "no");
    }
}
