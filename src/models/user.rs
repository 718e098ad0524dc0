use serde::{Deserialize, Serialize};

/// The authenticated account, as returned alongside the token by /Auth/login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: Option<String>,
    #[serde(rename = "profileImageUrl", default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub role: String,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_profile() {
        let json = r#"{
            "id": "a1b2c3",
            "email": "mara@example.com",
            "firstName": "Mara",
            "lastName": "Voss",
            "phoneNumber": "5551234567",
            "profileImageUrl": null,
            "role": "User"
        }"#;

        let user: UserProfile = serde_json::from_str(json).expect("Failed to parse user JSON");
        assert_eq!(user.email, "mara@example.com");
        assert_eq!(user.full_name(), "Mara Voss");
        assert_eq!(user.display_name(), "Voss, Mara");
        assert!(user.profile_image_url.is_none());
    }

    #[test]
    fn test_parse_user_profile_minimal() {
        // role and profileImageUrl may be absent entirely
        let json = r#"{"id": "x", "email": "e@x.io", "firstName": "A", "lastName": "B", "phoneNumber": null}"#;
        let user: UserProfile = serde_json::from_str(json).expect("Failed to parse minimal user");
        assert_eq!(user.role, "");
    }
}
