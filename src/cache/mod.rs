//! Local caching module for fast startup and resilience to flaky networks.
//!
//! This module provides the `CacheManager` for storing and retrieving
//! reservation data locally. Data is cached in JSON format and considered
//! stale after 60 minutes.
//!
//! Cached data types include:
//! - The resource catalog
//! - The user's reservations and upcoming reservations
//! - Notifications and payment history
//! - Per-resource reviews

pub mod manager;

pub use manager::CacheManager;
