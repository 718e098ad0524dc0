use serde::{Deserialize, Serialize};

/// A review left for a resource after a reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    #[serde(rename = "reservationId")]
    pub reservation_id: i64,
    #[serde(rename = "userId", default)]
    pub user_id: String,
    #[serde(rename = "userName", default)]
    pub user_name: Option<String>,
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
    #[serde(rename = "resourceId", default)]
    pub resource_id: Option<i64>,
    #[serde(rename = "resourceName", default)]
    pub resource_name: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<String>,
}

impl Review {
    /// "★★★★☆" style bar, clamped to 0..=5
    pub fn stars(&self) -> String {
        let filled = self.rating.clamp(0, 5) as usize;
        let mut s = String::with_capacity(5 * 3);
        for _ in 0..filled {
            s.push('★');
        }
        for _ in filled..5 {
            s.push('☆');
        }
        s
    }

    pub fn author_label(&self) -> &str {
        self.user_name.as_deref().unwrap_or("anonymous")
    }
}

/// Request body for POST /Review.
#[derive(Debug, Clone, Serialize)]
pub struct NewReview {
    #[serde(rename = "reservationId")]
    pub reservation_id: i64,
    pub rating: i32,
    pub comment: String,
}

/// Request body for PUT /Review/{id}.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewUpdate {
    pub rating: i32,
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_review() {
        let json = r#"{
            "id": 9,
            "reservationId": 42,
            "userId": "a1b2c3",
            "userName": "Mara Voss",
            "rating": 4,
            "comment": "Projector works, chairs could be better",
            "resourceId": 7,
            "createdAt": "2026-03-05T08:00:00Z"
        }"#;
        let r: Review = serde_json::from_str(json).expect("Failed to parse review");
        assert_eq!(r.rating, 4);
        assert_eq!(r.stars(), "★★★★☆");
        assert_eq!(r.author_label(), "Mara Voss");
    }

    #[test]
    fn test_stars_clamped() {
        let json = r#"{"id": 1, "reservationId": 2, "rating": 9, "comment": "x"}"#;
        let r: Review = serde_json::from_str(json).expect("parse");
        assert_eq!(r.stars(), "★★★★★");
        assert_eq!(r.author_label(), "anonymous");
    }
}
