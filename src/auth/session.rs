use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::UserProfile;

/// Session file name in config directory
const SESSION_FILE: &str = "session.json";

/// Token expiry time in hours.
/// The backend issues JWTs valid for 24 hours.
const TOKEN_EXPIRY_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub user: UserProfile,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn is_expired(&self) -> bool {
        let expiry = self.created_at + Duration::hours(TOKEN_EXPIRY_HOURS);
        Utc::now() > expiry
    }

    /// Hours remaining until the token expires (for the account view)
    pub fn hours_until_expiry(&self) -> i64 {
        let expiry = self.created_at + Duration::hours(TOKEN_EXPIRY_HOURS);
        (expiry - Utc::now()).num_hours().max(0)
    }
}

pub struct Session {
    config_dir: PathBuf,
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            config_dir,
            data: None,
        }
    }

    /// Load session from disk. Expired sessions are ignored, not deleted,
    /// so a failed load never touches the filesystem.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.session_path();
        if path.exists() {
            let contents =
                std::fs::read_to_string(&path).context("Failed to read session file")?;
            let data: SessionData =
                serde_json::from_str(&contents).context("Failed to parse session file")?;

            if !data.is_expired() {
                self.data = Some(data);
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Save session to disk
    pub fn save(&self) -> Result<()> {
        if let Some(ref data) = self.data {
            let path = self.session_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            std::fs::write(path, contents)?;
        }
        Ok(())
    }

    /// Clear session data and remove the file (logout, or a 401 response)
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Update session with new data
    pub fn update(&mut self, data: SessionData) {
        self.data = Some(data);
    }

    /// Get the bearer token if a session exists
    pub fn token(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.token.as_str())
    }

    /// Get the signed-in user's profile
    pub fn user(&self) -> Option<&UserProfile> {
        self.data.as_ref().map(|d| &d.user)
    }

    /// Check if session is valid (exists and not expired)
    pub fn is_valid(&self) -> bool {
        self.data.as_ref().map(|d| !d.is_expired()).unwrap_or(false)
    }

    fn session_path(&self) -> PathBuf {
        self.config_dir.join(SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> UserProfile {
        serde_json::from_str(
            r#"{"id": "a1b2c3", "email": "mara@example.com",
                "firstName": "Mara", "lastName": "Voss"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_fresh_session_is_valid() {
        let data = SessionData {
            token: "tok".to_string(),
            user: test_user(),
            created_at: Utc::now(),
        };
        assert!(!data.is_expired());
        assert!(data.hours_until_expiry() >= 23);
    }

    #[test]
    fn test_old_session_is_expired() {
        let data = SessionData {
            token: "tok".to_string(),
            user: test_user(),
            created_at: Utc::now() - Duration::hours(TOKEN_EXPIRY_HOURS + 1),
        };
        assert!(data.is_expired());
        assert_eq!(data.hours_until_expiry(), 0);
    }

    #[test]
    fn test_save_load_clear_roundtrip() {
        let dir = std::env::temp_dir().join(format!("bookdesk-session-test-{}", std::process::id()));
        let mut session = Session::new(dir.clone());
        session.update(SessionData {
            token: "tok".to_string(),
            user: test_user(),
            created_at: Utc::now(),
        });
        session.save().expect("save");

        let mut loaded = Session::new(dir.clone());
        assert!(loaded.load().expect("load"));
        assert_eq!(loaded.token(), Some("tok"));
        assert_eq!(loaded.user().map(|u| u.email.as_str()), Some("mara@example.com"));

        loaded.clear().expect("clear");
        let mut again = Session::new(dir.clone());
        assert!(!again.load().expect("reload"));

        let _ = std::fs::remove_dir_all(dir);
    }
}
