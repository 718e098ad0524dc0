//! REST API client module for the reservation service.
//!
//! This module provides the `ApiClient` for communicating with the
//! backend to manage resources, reservations, payments, reviews, and
//! notifications.
//!
//! Every authenticated request carries a JWT bearer token obtained
//! through the /Auth/login endpoint.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
