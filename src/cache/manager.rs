use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{Notification, Payment, Reservation, Resource, Review};

/// Consider cache stale after 1 hour.
/// Balances freshness with reducing unnecessary API calls for slowly-changing data.
const CACHE_STALE_MINUTES: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew (negative ages)
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            let remaining_mins = minutes % 60;
            if remaining_mins >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            let remaining_hours = (minutes % 1440) / 60;
            if remaining_hours >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > CACHE_STALE_MINUTES
    }
}

pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", name))?;

        Ok(Some(cached))
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let cached = CachedData::new(data);
        let path = self.cache_path(name);
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(&path, contents)?;
        Ok(())
    }

    // ===== Resources =====

    pub fn load_resources(&self) -> Result<Option<CachedData<Vec<Resource>>>> {
        self.load("resources")
    }

    pub fn save_resources(&self, resources: &[Resource]) -> Result<()> {
        self.save("resources", &resources)
    }

    // ===== Reservations =====

    pub fn load_reservations(&self) -> Result<Option<CachedData<Vec<Reservation>>>> {
        self.load("reservations")
    }

    pub fn save_reservations(&self, reservations: &[Reservation]) -> Result<()> {
        self.save("reservations", &reservations)
    }

    pub fn load_upcoming(&self) -> Result<Option<CachedData<Vec<Reservation>>>> {
        self.load("upcoming")
    }

    pub fn save_upcoming(&self, reservations: &[Reservation]) -> Result<()> {
        self.save("upcoming", &reservations)
    }

    // ===== Notifications =====

    pub fn load_notifications(&self) -> Result<Option<CachedData<Vec<Notification>>>> {
        self.load("notifications")
    }

    pub fn save_notifications(&self, notifications: &[Notification]) -> Result<()> {
        self.save("notifications", &notifications)
    }

    // ===== Payments =====

    pub fn load_payments(&self) -> Result<Option<CachedData<Vec<Payment>>>> {
        self.load("payments")
    }

    pub fn save_payments(&self, payments: &[Payment]) -> Result<()> {
        self.save("payments", &payments)
    }

    // ===== Per-resource reviews =====

    pub fn load_reviews(&self, resource_id: i64) -> Result<Option<CachedData<Vec<Review>>>> {
        self.load(&format!("reviews_{}", resource_id))
    }

    pub fn save_reviews(&self, resource_id: i64, reviews: &[Review]) -> Result<()> {
        self.save(&format!("reviews_{}", resource_id), &reviews)
    }

    // ===== Cache Age Information =====

    /// Helper to load cache and log errors without failing
    fn load_age<T>(
        &self,
        name: &str,
        loader: impl FnOnce() -> Result<Option<CachedData<T>>>,
    ) -> Option<String> {
        match loader() {
            Ok(Some(cached)) => Some(cached.age_display()),
            Ok(None) => None,
            Err(e) => {
                debug!(cache = name, error = %e, "Failed to load cache for age display");
                None
            }
        }
    }

    pub fn get_cache_ages(&self) -> CacheAges {
        CacheAges {
            resources: self.load_age("resources", || self.load_resources()),
            reservations: self.load_age("reservations", || self.load_reservations()),
            upcoming: self.load_age("upcoming", || self.load_upcoming()),
            notifications: self.load_age("notifications", || self.load_notifications()),
            payments: self.load_age("payments", || self.load_payments()),
        }
    }

    /// Helper to check staleness and log errors without failing
    fn is_cache_stale<T>(
        &self,
        name: &str,
        loader: impl FnOnce() -> Result<Option<CachedData<T>>>,
    ) -> bool {
        match loader() {
            Ok(Some(cached)) => cached.is_stale(),
            Ok(None) => true, // No cache = stale
            Err(e) => {
                debug!(cache = name, error = %e, "Failed to load cache for staleness check");
                true // Error reading = treat as stale
            }
        }
    }

    /// Check if any of the core cached data is stale
    pub fn any_stale(&self) -> bool {
        let stale_checks = [
            self.is_cache_stale("resources", || self.load_resources()),
            self.is_cache_stale("reservations", || self.load_reservations()),
            self.is_cache_stale("upcoming", || self.load_upcoming()),
            self.is_cache_stale("notifications", || self.load_notifications()),
        ];
        stale_checks.iter().any(|&stale| stale)
    }
}

#[derive(Debug, Default)]
pub struct CacheAges {
    pub resources: Option<String>,
    pub reservations: Option<String>,
    pub upcoming: Option<String>,
    pub notifications: Option<String>,
    pub payments: Option<String>,
}

impl CacheAges {
    pub fn resources_age(&self) -> String {
        self.resources.clone().unwrap_or_else(|| "never".to_string())
    }

    pub fn reservations_age(&self) -> String {
        self.reservations
            .clone()
            .or_else(|| self.upcoming.clone())
            .unwrap_or_else(|| "never".to_string())
    }

    /// Returns the most recent update time across the main cache types
    pub fn last_updated(&self) -> String {
        let ages = [&self.resources, &self.reservations, &self.notifications];

        for a in ages.iter().copied().flatten() {
            return a.clone();
        }

        "never".to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_cached_data_age_display_just_now() {
        let cached = CachedData::new(vec![1, 2, 3]);
        assert_eq!(cached.age_display(), "just now");
    }

    #[test]
    fn test_cached_data_is_stale() {
        let fresh = CachedData::new(vec![1]);
        assert!(!fresh.is_stale());

        let mut old = CachedData::new(vec![1]);
        old.cached_at = Utc::now() - Duration::minutes(61);
        assert!(old.is_stale());
    }

    #[test]
    fn test_age_display_rounds_hours() {
        let mut cached = CachedData::new(vec![1]);
        cached.cached_at = Utc::now() - Duration::minutes(95);
        assert_eq!(cached.age_display(), "2h ago");

        cached.cached_at = Utc::now() - Duration::minutes(70);
        assert_eq!(cached.age_display(), "1h ago");
    }

    #[test]
    fn test_cache_ages_last_updated_with_values() {
        let ages = CacheAges {
            resources: Some("5m ago".to_string()),
            ..Default::default()
        };
        assert_eq!(ages.last_updated(), "5m ago");
    }

    #[test]
    fn test_cache_ages_last_updated_empty() {
        let ages = CacheAges::default();
        assert_eq!(ages.last_updated(), "never");
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!("bookdesk-cache-test-{}", std::process::id()));
        let manager = CacheManager::new(dir.clone()).expect("create cache dir");

        let notifications = vec![Notification {
            id: 1,
            user_id: "a1b2c3".to_string(),
            title: "Reminder".to_string(),
            message: "Upcoming booking".to_string(),
            kind: "Reminder".to_string(),
            reservation_id: Some(7),
            is_read: false,
            created_at: "2026-03-02T12:00:00Z".to_string(),
        }];
        manager.save_notifications(&notifications).expect("save");

        let loaded = manager
            .load_notifications()
            .expect("load")
            .expect("cache present");
        assert_eq!(loaded.data.len(), 1);
        assert_eq!(loaded.data[0].id, 1);
        assert!(!loaded.is_stale());

        let _ = std::fs::remove_dir_all(dir);
    }
}
