//! API client for communicating with the reservation service REST API.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests to the resource, reservation, payment, review, and
//! notification endpoints.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::SessionData;
use crate::models::{
    NewPayment, NewReservation, Notification, Payment, Reservation, ReservationStatus, Resource,
    Review, ReviewUpdate, StatusUpdate, UserProfile,
};
use crate::models::NewReview;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Response from POST /Auth/login
#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    user: UserProfile,
}

/// Minimal shape of a created record; POST /Reservation returns at least the id
#[derive(Debug, Deserialize)]
struct Created {
    id: i64,
}

/// Request body for POST /Auth/register
#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    #[serde(rename = "firstName")]
    first_name: &'a str,
    #[serde(rename = "lastName")]
    last_name: &'a str,
    email: &'a str,
    password: &'a str,
    #[serde(rename = "phoneNumber")]
    phone_number: &'a str,
}

/// API client for the reservation service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client against the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.into()),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning Ok(None) for 429 (should retry)
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .get(&url)
                .headers(self.auth_headers()?)
                .send()
                .await
                .with_context(|| format!("Failed to send GET request to {}", url))?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    return response
                        .json()
                        .await
                        .with_context(|| format!("Failed to parse JSON response from {}", url));
                }
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited.into());
                    }
                    warn!(url = %url, retry = retries, backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2;
                }
            }
        }
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.url(path);
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .post(&url)
                .headers(self.auth_headers()?)
                .json(body)
                .send()
                .await
                .with_context(|| format!("Failed to send POST request to {}", url))?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    return response
                        .json()
                        .await
                        .with_context(|| format!("Failed to parse JSON response from {}", url));
                }
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited.into());
                    }
                    warn!(url = %url, retry = retries, backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2;
                }
            }
        }
    }

    async fn post_no_content<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let url = self.url(path);
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send POST request to {}", url))?;
        Self::check_response(response).await?;
        Ok(())
    }

    async fn patch_no_content<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let url = self.url(path);
        let response = self
            .client
            .patch(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send PATCH request to {}", url))?;
        Self::check_response(response).await?;
        Ok(())
    }

    async fn put_no_content(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        let response = self
            .client
            .put(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send PUT request to {}", url))?;
        Self::check_response(response).await?;
        Ok(())
    }

    async fn put_json_no_content<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let url = self.url(path);
        let response = self
            .client
            .put(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send PUT request to {}", url))?;
        Self::check_response(response).await?;
        Ok(())
    }

    async fn delete_no_content(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        let response = self
            .client
            .delete(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send DELETE request to {}", url))?;
        Self::check_response(response).await?;
        Ok(())
    }

    // ===== Authentication =====

    /// Authenticate and return session data (token + user profile)
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionData> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });

        let response = self
            .client
            .post(self.url("/Auth/login"))
            .json(&body)
            .send()
            .await
            .context("Failed to send login request")?;

        let response = Self::check_response(response).await?;

        let auth: AuthResponse = response
            .json()
            .await
            .context("Failed to parse auth response")?;

        Ok(SessionData {
            token: auth.token,
            user: auth.user,
            created_at: Utc::now(),
        })
    }

    /// Register a new account. The user still logs in afterwards.
    pub async fn register(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
        phone_number: &str,
    ) -> Result<()> {
        let body = RegisterRequest {
            first_name,
            last_name,
            email,
            password,
            phone_number,
        };

        let response = self
            .client
            .post(self.url("/Auth/register"))
            .json(&body)
            .send()
            .await
            .context("Failed to send register request")?;

        Self::check_response(response).await?;
        Ok(())
    }

    // ===== Resources =====

    /// Fetch the full resource catalog
    pub async fn fetch_resources(&self) -> Result<Vec<Resource>> {
        self.get("/Resource").await
    }

    /// Fetch a single resource by id
    #[allow(dead_code)]
    pub async fn fetch_resource(&self, id: i64) -> Result<Resource> {
        self.get(&format!("/Resource/{}", id)).await
    }

    /// Fetch upcoming reservations for a resource (shown on the detail panel)
    pub async fn fetch_resource_upcoming(&self, resource_id: i64) -> Result<Vec<Reservation>> {
        self.get(&format!("/Reservation/Resource/{}/upcoming", resource_id))
            .await
    }

    // ===== Reservations =====

    /// Fetch all reservations visible to the current user
    #[allow(dead_code)]
    pub async fn fetch_reservations(&self) -> Result<Vec<Reservation>> {
        self.get("/Reservation").await
    }

    /// Fetch the current user's reservations
    pub async fn fetch_user_reservations(&self) -> Result<Vec<Reservation>> {
        self.get("/Reservation/user").await
    }

    /// Fetch the current user's upcoming reservations (dashboard view)
    pub async fn fetch_upcoming_reservations(&self) -> Result<Vec<Reservation>> {
        self.get("/Reservation/upcoming").await
    }

    /// Fetch a single reservation by id
    #[allow(dead_code)]
    pub async fn fetch_reservation(&self, id: i64) -> Result<Reservation> {
        self.get(&format!("/Reservation/{}", id)).await
    }

    /// Create a reservation, returning the new reservation's id
    pub async fn create_reservation(&self, reservation: &NewReservation) -> Result<i64> {
        debug!(resource_id = reservation.resource_id, "Creating reservation");
        let created: Created = self.post("/Reservation", reservation).await?;
        Ok(created.id)
    }

    /// Update a reservation's lifecycle status
    pub async fn update_reservation_status(
        &self,
        id: i64,
        status: ReservationStatus,
    ) -> Result<()> {
        self.patch_no_content(&format!("/Reservation/{}/status", id), &StatusUpdate { status })
            .await
    }

    // ===== Notifications =====

    /// Fetch all notifications for the current user
    pub async fn fetch_notifications(&self) -> Result<Vec<Notification>> {
        self.get("/Notification").await
    }

    /// Fetch only unread notifications; the unread count is this list's length
    pub async fn fetch_unread_notifications(&self) -> Result<Vec<Notification>> {
        self.get("/Notification/unread").await
    }

    /// Mark a single notification read
    pub async fn mark_notification_read(&self, id: i64) -> Result<()> {
        self.put_no_content(&format!("/Notification/{}/read", id)).await
    }

    /// Mark every notification read
    pub async fn mark_all_notifications_read(&self) -> Result<()> {
        self.put_no_content("/Notification/markAllRead").await
    }

    // ===== Payments =====

    /// Fetch the current user's payment history
    pub async fn fetch_payments(&self) -> Result<Vec<Payment>> {
        self.get("/Payment").await
    }

    /// Fetch a single payment by id
    #[allow(dead_code)]
    pub async fn fetch_payment(&self, id: i64) -> Result<Payment> {
        self.get(&format!("/Payment/{}", id)).await
    }

    /// Submit a payment for a reservation
    pub async fn create_payment(&self, payment: &NewPayment) -> Result<()> {
        debug!(
            reservation_id = payment.reservation_id,
            amount = payment.amount,
            "Submitting payment"
        );
        self.post_no_content("/Payment", payment).await
    }

    /// Request a refund for a payment
    pub async fn refund_payment(&self, id: i64) -> Result<()> {
        self.post_no_content(&format!("/Payment/{}/refund", id), &serde_json::json!({}))
            .await
    }

    // ===== Reviews =====

    /// Fetch reviews for a resource
    pub async fn fetch_resource_reviews(&self, resource_id: i64) -> Result<Vec<Review>> {
        self.get(&format!("/Review/Resource/{}", resource_id)).await
    }

    /// Submit a review for a completed reservation
    pub async fn submit_review(&self, review: &NewReview) -> Result<()> {
        self.post_no_content("/Review", review).await
    }

    /// Update an existing review
    pub async fn update_review(&self, id: i64, update: &ReviewUpdate) -> Result<()> {
        self.put_json_no_content(&format!("/Review/{}", id), update).await
    }

    /// Delete a review
    pub async fn delete_review(&self, id: i64) -> Result<()> {
        self.delete_no_content(&format!("/Review/{}", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_auth_response() {
        let json = r#"{
            "token": "eyJhbGciOiJIUzI1NiJ9.payload.sig",
            "user": {
                "id": "a1b2c3",
                "email": "mara@example.com",
                "firstName": "Mara",
                "lastName": "Voss",
                "phoneNumber": "5551234567",
                "role": "User"
            }
        }"#;

        let auth: AuthResponse = serde_json::from_str(json).expect("Failed to parse auth JSON");
        assert_eq!(auth.token, "eyJhbGciOiJIUzI1NiJ9.payload.sig");
        assert_eq!(auth.user.email, "mara@example.com");
    }

    #[test]
    fn test_parse_created_ignores_extra_fields() {
        // POST /Reservation echoes the whole record; only the id matters here
        let json = r#"{"id": 42, "resourceId": 7, "status": "Pending", "isPaid": false}"#;
        let created: Created = serde_json::from_str(json).expect("Failed to parse created JSON");
        assert_eq!(created.id, 42);
    }

    #[test]
    fn test_register_request_shape() {
        let body = RegisterRequest {
            first_name: "Mara",
            last_name: "Voss",
            email: "mara@example.com",
            password: "hunter22",
            phone_number: "5551234567",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["firstName"], "Mara");
        assert_eq!(json["phoneNumber"], "5551234567");
    }

    #[test]
    fn test_url_join() {
        let api = ApiClient::new("http://localhost:5120/api").expect("client");
        assert_eq!(
            api.url("/Reservation/7/status"),
            "http://localhost:5120/api/Reservation/7/status"
        );
    }
}
