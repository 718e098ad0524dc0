//! Application state management for Bookdesk.
//!
//! This module contains the core `App` struct that manages all application state,
//! including UI state, cached data, session management, and background task coordination.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::{CredentialStore, Session};
use crate::cache::CacheManager;
use crate::config::Config;
use crate::forms::{self, FieldError};

use crate::models::{
    NewPayment, NewReservation, Notification, Payment, Reservation, ReservationSortColumn,
    ReservationStatus, Resource, ResourceSortColumn, Review, ReviewUpdate,
};
use crate::models::NewReview;
use crate::utils::{cmp_ignore_case, contains_ignore_case};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// 32 is sufficient for a full refresh (~6 API calls) with headroom.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for email input
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for free-text inputs (descriptions, review comments)
const MAX_TEXT_LENGTH: usize = 1000;

/// Number of items to scroll on page up/down
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Resources,
    Reservations,
    Notifications,
    Account,
}

impl Tab {
    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Resources => "Resources",
            Tab::Reservations => "Reservations",
            Tab::Notifications => "Notifications",
            Tab::Account => "Account",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Resources => Tab::Reservations,
            Tab::Reservations => Tab::Notifications,
            Tab::Notifications => Tab::Account,
            Tab::Account => Tab::Resources,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Resources => Tab::Account,
            Tab::Reservations => Tab::Resources,
            Tab::Notifications => Tab::Reservations,
            Tab::Account => Tab::Notifications,
        }
    }
}

/// Current UI focus area (list panel or detail panel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Detail,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    LoggingIn,
    Registering,
    Booking,
    Paying,
    Reviewing,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

/// Registration form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegisterFocus {
    FirstName,
    LastName,
    Email,
    Password,
    ConfirmPassword,
    Phone,
    Terms,
    Button,
}

impl RegisterFocus {
    pub fn next(&self) -> Self {
        match self {
            RegisterFocus::FirstName => RegisterFocus::LastName,
            RegisterFocus::LastName => RegisterFocus::Email,
            RegisterFocus::Email => RegisterFocus::Password,
            RegisterFocus::Password => RegisterFocus::ConfirmPassword,
            RegisterFocus::ConfirmPassword => RegisterFocus::Phone,
            RegisterFocus::Phone => RegisterFocus::Terms,
            RegisterFocus::Terms => RegisterFocus::Button,
            RegisterFocus::Button => RegisterFocus::FirstName,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            RegisterFocus::FirstName => RegisterFocus::Button,
            RegisterFocus::LastName => RegisterFocus::FirstName,
            RegisterFocus::Email => RegisterFocus::LastName,
            RegisterFocus::Password => RegisterFocus::Email,
            RegisterFocus::ConfirmPassword => RegisterFocus::Password,
            RegisterFocus::Phone => RegisterFocus::ConfirmPassword,
            RegisterFocus::Terms => RegisterFocus::Phone,
            RegisterFocus::Button => RegisterFocus::Terms,
        }
    }
}

/// Registration form state
#[derive(Debug, Default)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone_number: String,
    pub terms_accepted: bool,
    pub errors: Vec<FieldError>,
}

/// Booking wizard steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStep {
    Times,
    Details,
    Confirm,
}

/// Booking wizard field focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingFocus {
    Start,
    End,
    Attendees,
    Description,
    Recurring,
    Pattern,
    Interval,
    EndDate,
}

/// State for the reservation booking wizard.
/// Created against a specific resource from the Resources tab.
#[derive(Debug)]
pub struct BookingForm {
    pub resource_id: i64,
    pub resource_name: String,
    pub capacity: i32,
    pub max_hours: Option<i32>,
    pub hourly_rate: Option<f64>,
    pub daily_rate: Option<f64>,

    pub step: BookingStep,
    pub focus: BookingFocus,

    pub start: String,
    pub end: String,
    pub attendees: String,
    pub description: String,
    pub is_recurring: bool,
    pub recurrence_pattern: String,
    pub recurrence_interval: String,
    pub recurrence_end_date: String,

    pub errors: Vec<FieldError>,
    pub submitting: bool,
}

impl BookingForm {
    pub fn for_resource(resource: &Resource) -> Self {
        Self {
            resource_id: resource.id,
            resource_name: resource.name.clone(),
            capacity: resource.capacity,
            max_hours: resource.max_reservation_hours,
            hourly_rate: resource.hourly_rate,
            daily_rate: resource.daily_rate,
            step: BookingStep::Times,
            focus: BookingFocus::Start,
            start: String::new(),
            end: String::new(),
            attendees: "1".to_string(),
            description: String::new(),
            is_recurring: false,
            recurrence_pattern: "weekly".to_string(),
            recurrence_interval: "1".to_string(),
            recurrence_end_date: String::new(),
            errors: Vec::new(),
            submitting: false,
        }
    }

    /// Validate the whole form against the current clock
    pub fn validate(&mut self) -> bool {
        let input = forms::ReservationInput {
            start: &self.start,
            end: &self.end,
            description: &self.description,
            attendees: &self.attendees,
            capacity: self.capacity,
            max_hours: self.max_hours,
            is_recurring: self.is_recurring,
            recurrence_pattern: &self.recurrence_pattern,
            recurrence_interval: &self.recurrence_interval,
            recurrence_end_date: &self.recurrence_end_date,
        };
        self.errors = forms::validate_reservation(&input, Local::now().naive_local());
        self.errors.is_empty()
    }

    /// Rough cost estimate shown on the confirm step.
    /// Hourly rate wins when both rates are set.
    pub fn estimated_cost(&self) -> Option<f64> {
        let start = forms::parse_datetime_input(&self.start)?;
        let end = forms::parse_datetime_input(&self.end)?;
        if end <= start {
            return None;
        }
        let minutes = (end - start).num_minutes() as f64;
        let hours = (minutes / 60.0).ceil();
        if let Some(rate) = self.hourly_rate {
            return Some(hours * rate);
        }
        self.daily_rate.map(|rate| (hours / 24.0).ceil() * rate)
    }

    /// Build the request body. Call only after validate() succeeds.
    pub fn to_request(&self) -> Option<NewReservation> {
        let start = forms::parse_datetime_input(&self.start)?;
        let end = forms::parse_datetime_input(&self.end)?;
        let attendees = self.attendees.trim().parse().ok()?;

        let (pattern, interval, end_date) = if self.is_recurring {
            (
                Some(self.recurrence_pattern.trim().to_lowercase()),
                self.recurrence_interval.trim().parse().ok(),
                Some(self.recurrence_end_date.trim().to_string()),
            )
        } else {
            (None, None, None)
        };

        let description = if self.description.trim().is_empty() {
            None
        } else {
            Some(self.description.trim().to_string())
        };

        Some(NewReservation {
            resource_id: self.resource_id,
            start_time: forms::to_wire_datetime(start),
            end_time: forms::to_wire_datetime(end),
            description,
            attendees,
            is_recurring: self.is_recurring,
            recurrence_pattern: pattern,
            recurrence_interval: interval,
            recurrence_end_date: end_date,
        })
    }
}

/// Payment form focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentFocus {
    Amount,
    Method,
    Button,
}

/// State for the payment overlay, opened from a pending reservation
#[derive(Debug)]
pub struct PaymentForm {
    pub reservation_id: i64,
    pub amount: String,
    pub payment_method: String,
    pub focus: PaymentFocus,
    pub errors: Vec<FieldError>,
    pub submitting: bool,
}

impl PaymentForm {
    pub fn for_reservation(reservation: &Reservation) -> Self {
        let amount = reservation
            .price
            .map(|p| format!("{:.2}", p))
            .unwrap_or_default();
        Self {
            reservation_id: reservation.id,
            amount,
            payment_method: "credit".to_string(),
            focus: PaymentFocus::Amount,
            errors: Vec::new(),
            submitting: false,
        }
    }

    pub fn validate(&mut self) -> bool {
        self.errors = forms::validate_payment(&self.amount, &self.payment_method);
        self.errors.is_empty()
    }

    pub fn to_request(&self) -> Option<NewPayment> {
        Some(NewPayment {
            reservation_id: self.reservation_id,
            amount: self.amount.trim().parse().ok()?,
            currency: "USD".to_string(),
            payment_method: self.payment_method.trim().to_lowercase(),
        })
    }
}

/// State for the review overlay.
/// `editing_review_id` is set when updating an existing review.
#[derive(Debug)]
pub struct ReviewForm {
    pub reservation_id: i64,
    pub resource_id: i64,
    pub rating: i32,
    pub comment: String,
    pub editing_review_id: Option<i64>,
    pub errors: Vec<FieldError>,
    pub submitting: bool,
}

impl ReviewForm {
    pub fn for_reservation(reservation: &Reservation) -> Self {
        Self {
            reservation_id: reservation.id,
            resource_id: reservation.resource_id,
            rating: 5,
            comment: String::new(),
            editing_review_id: None,
            errors: Vec::new(),
            submitting: false,
        }
    }

    pub fn for_existing(reservation_id: i64, resource_id: i64, review: &Review) -> Self {
        Self {
            reservation_id,
            resource_id,
            rating: review.rating,
            comment: review.comment.clone(),
            editing_review_id: Some(review.id),
            errors: Vec::new(),
            submitting: false,
        }
    }

    pub fn validate(&mut self) -> bool {
        self.errors = forms::validate_review(self.rating, &self.comment);
        self.errors.is_empty()
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Result types from background tasks.
///
/// These variants are sent through an MPSC channel from background tasks
/// back to the main application. Each variant represents either fetched
/// data or the outcome of a write operation.
enum RefreshResult {
    /// Resource catalog fetched successfully
    Resources(Vec<Resource>),
    /// The current user's reservations
    Reservations(Vec<Reservation>),
    /// The current user's upcoming reservations
    Upcoming(Vec<Reservation>),
    /// All notifications for the current user
    Notifications(Vec<Notification>),
    /// Unread notifications; the badge count is this list's length
    Unread(Vec<Notification>),
    /// Payment history
    Payments(Vec<Payment>),
    /// Reviews for a specific resource (resource_id, reviews)
    Reviews(i64, Vec<Review>),
    /// Upcoming reservations for a specific resource (resource_id, reservations)
    ResourceUpcoming(i64, Vec<Reservation>),
    /// A reservation was created (new reservation id)
    ReservationCreated(i64),
    /// A reservation's status changed (reservation_id, new status)
    StatusUpdated(i64, ReservationStatus),
    /// A notification was marked read server-side
    NotificationRead(i64),
    /// Every notification was marked read server-side
    AllNotificationsRead,
    /// A payment was accepted (reservation_id)
    PaymentSubmitted(i64),
    /// A review was created, updated, or deleted (resource_id)
    ReviewsChanged(i64),
    /// Signal that a full refresh has completed
    RefreshComplete,
    /// The backend rejected our token
    Unauthorized,
    /// An error occurred during a background task
    Error(String),
}

/// True when the error chain bottoms out in a 401
fn error_is_unauthorized(e: &anyhow::Error) -> bool {
    e.chain()
        .any(|cause| matches!(cause.downcast_ref::<ApiError>(), Some(ApiError::Unauthorized)))
}

/// User-facing message for a background task failure
fn error_banner(e: &anyhow::Error) -> String {
    for cause in e.chain() {
        if let Some(api_error) = cause.downcast_ref::<ApiError>() {
            return api_error.user_message();
        }
    }
    format!("Error: {}", e)
}

/// Mark a notification read in the local list, decrementing the unread
/// count only on the unread-to-read transition so repeats stay harmless.
fn apply_read_mark(notifications: &mut [Notification], unread_count: &mut usize, id: i64) {
    if let Some(notification) = notifications.iter_mut().find(|n| n.id == id) {
        if !notification.is_read {
            notification.is_read = true;
            *unread_count = unread_count.saturating_sub(1);
        }
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: Session,
    pub api: ApiClient,
    pub cache: CacheManager,

    // UI State
    pub state: AppState,
    pub current_tab: Tab,
    pub focus: Focus,
    pub search_query: String,
    pub resource_sort_column: ResourceSortColumn,
    pub resource_sort_ascending: bool,
    pub reservation_sort_column: ReservationSortColumn,
    pub reservation_sort_ascending: bool,
    /// When set, the Reservations tab shows only this status
    pub status_filter: Option<ReservationStatus>,

    // Login form state
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Overlay forms
    pub register_form: RegisterForm,
    pub register_focus: RegisterFocus,
    pub booking_form: Option<BookingForm>,
    pub payment_form: Option<PaymentForm>,
    pub review_form: Option<ReviewForm>,

    // Selection indices
    pub resource_selection: usize,
    pub reservation_selection: usize,
    pub notification_selection: usize,
    pub review_selection: usize,

    // Cached data
    pub resources: Vec<Resource>,
    pub reservations: Vec<Reservation>,
    pub upcoming: Vec<Reservation>,
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
    pub payments: Vec<Payment>,

    /// Reviews per resource, keyed by resource id
    pub resource_reviews: HashMap<i64, Vec<Review>>,

    /// Upcoming reservations per resource, keyed by resource id
    pub resource_upcoming: HashMap<i64, Vec<Reservation>>,

    // Background task channel
    refresh_rx: Option<mpsc::Receiver<RefreshResult>>,
    refresh_tx: mpsc::Sender<RefreshResult>,

    // Status message
    pub status_message: Option<String>,

    // Cache ages for status bar
    pub cache_ages: crate::cache::manager::CacheAges,
}

impl App {
    /// Create a new application instance
    pub async fn new() -> Result<Self> {
        debug!("App::new() starting");
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let config_dir = Config::config_dir().unwrap_or_else(|_| PathBuf::from("./config"));
        let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
        debug!(?cache_dir, "Cache directory configured");

        // Load session from disk if it exists
        let mut session = Session::new(config_dir);
        let load_result = session.load();
        debug!(?load_result, has_data = session.data.is_some(), "Session loaded");

        let mut api = ApiClient::new(config.api_url())?;

        // If we have a valid session, set the token on the API client
        if let Some(ref data) = session.data {
            if !data.is_expired() {
                api.set_token(data.token.clone());
                debug!("Token set on API client");
            }
        }

        let cache = CacheManager::new(cache_dir)?;

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        // Prefill login form from env vars or config
        let login_email = std::env::var("BOOKDESK_EMAIL")
            .ok()
            .or_else(|| config.last_email.clone())
            .unwrap_or_default();

        let login_password = std::env::var("BOOKDESK_PASSWORD").unwrap_or_default();

        Ok(Self {
            config,
            session,
            api,
            cache,

            state: AppState::Normal,
            current_tab: Tab::Resources,
            focus: Focus::List,
            search_query: String::new(),
            resource_sort_column: ResourceSortColumn::Name,
            resource_sort_ascending: true,
            reservation_sort_column: ReservationSortColumn::Start,
            reservation_sort_ascending: true,
            status_filter: None,

            login_email,
            login_password,
            login_focus: LoginFocus::Email,
            login_error: None,

            register_form: RegisterForm::default(),
            register_focus: RegisterFocus::FirstName,
            booking_form: None,
            payment_form: None,
            review_form: None,

            resource_selection: 0,
            reservation_selection: 0,
            notification_selection: 0,
            review_selection: 0,

            resources: Vec::new(),
            reservations: Vec::new(),
            upcoming: Vec::new(),
            notifications: Vec::new(),
            unread_count: 0,
            payments: Vec::new(),
            resource_reviews: HashMap::new(),
            resource_upcoming: HashMap::new(),

            refresh_rx: Some(rx),
            refresh_tx: tx,

            status_message: None,
            cache_ages: Default::default(),
        })
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Check if the user is authenticated with a valid session
    pub fn is_authenticated(&self) -> bool {
        self.session.is_valid()
    }

    /// Attempt login with the credentials from the login form
    pub async fn attempt_login(&mut self) -> Result<()> {
        let email = self.login_email.trim().to_string();
        let password = self.login_password.clone();

        let errors = forms::validate_login(&email, &password);
        if let Some(first) = errors.first() {
            self.login_error = Some(first.message.clone());
            return Err(anyhow::anyhow!("{}", first.message));
        }

        self.login_error = None;

        match self.api.login(&email, &password).await {
            Ok(session_data) => {
                if let Err(e) = CredentialStore::store(&email, &password) {
                    warn!(error = %e, "Failed to store credentials");
                }

                self.config.last_email = Some(email);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.session.update(session_data);
                if let Err(e) = self.session.save() {
                    warn!(error = %e, "Failed to save session");
                }

                if let Some(ref data) = self.session.data {
                    self.api.set_token(data.token.clone());
                }

                self.login_password.clear();
                self.state = AppState::Normal;
                info!("Login successful");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                let user_message = if error_is_unauthorized(&e) {
                    "Invalid email or password".to_string()
                } else {
                    error_banner(&e)
                };
                self.login_error = Some(user_message);
                Err(e)
            }
        }
    }

    /// Attempt registration with the register form, then drop back to the
    /// login overlay with the new email prefilled.
    pub async fn attempt_register(&mut self) -> Result<()> {
        let input = forms::RegistrationInput {
            first_name: &self.register_form.first_name,
            last_name: &self.register_form.last_name,
            email: &self.register_form.email,
            password: &self.register_form.password,
            confirm_password: &self.register_form.confirm_password,
            phone_number: &self.register_form.phone_number,
            terms_accepted: self.register_form.terms_accepted,
        };
        let errors = forms::validate_registration(&input);
        if !errors.is_empty() {
            self.register_form.errors = errors;
            return Err(anyhow::anyhow!("Registration form has errors"));
        }
        self.register_form.errors.clear();

        let result = self
            .api
            .register(
                self.register_form.first_name.trim(),
                self.register_form.last_name.trim(),
                self.register_form.email.trim(),
                &self.register_form.password,
                self.register_form.phone_number.trim(),
            )
            .await;

        match result {
            Ok(()) => {
                info!("Registration successful");
                self.login_email = self.register_form.email.trim().to_string();
                self.login_password.clear();
                self.register_form = RegisterForm::default();
                self.start_login();
                self.status_message = Some("Account created. Please log in.".to_string());
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Registration failed");
                self.register_form.errors = vec![FieldError {
                    field: "form",
                    message: error_banner(&e),
                }];
                Err(e)
            }
        }
    }

    /// Start the login process (show login overlay)
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login_focus = if self.login_email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };
        self.login_error = None;
    }

    /// Show the registration overlay
    pub fn start_register(&mut self) {
        self.state = AppState::Registering;
        self.register_form = RegisterForm::default();
        self.register_focus = RegisterFocus::FirstName;
    }

    /// Log out: drop the session and return to the login overlay
    pub fn logout(&mut self) {
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to clear session");
        }
        self.api = match ApiClient::new(self.config.api_url()) {
            Ok(api) => api,
            Err(e) => {
                error!(error = %e, "Failed to recreate API client");
                return;
            }
        };
        self.start_login();
    }

    /// The backend rejected our token. Drop the session and force re-login.
    fn handle_unauthorized(&mut self) {
        warn!("Received 401, clearing session");
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to clear session");
        }
        self.start_login();
        self.login_error = Some("Session expired. Please log in again.".to_string());
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Load all data from cache
    pub fn load_from_cache(&mut self) {
        if let Ok(Some(cached)) = self.cache.load_resources() {
            self.resources = cached.data;
        }

        if let Ok(Some(cached)) = self.cache.load_reservations() {
            self.reservations = cached.data;
        }

        if let Ok(Some(cached)) = self.cache.load_upcoming() {
            self.upcoming = cached.data;
        }

        if let Ok(Some(cached)) = self.cache.load_notifications() {
            self.unread_count = cached.data.iter().filter(|n| !n.is_read).count();
            self.notifications = cached.data;
        }

        if let Ok(Some(cached)) = self.cache.load_payments() {
            self.payments = cached.data;
        }

        self.cache_ages = self.cache.get_cache_ages();
    }

    /// Check if any cache data is stale
    pub fn is_cache_stale(&self) -> bool {
        self.cache.any_stale()
    }

    // =========================================================================
    // Background Data Refresh
    // =========================================================================

    /// Spawn a background task to refresh all data
    pub fn refresh_all_background(&mut self) {
        info!("Starting background refresh of all data");

        let api = match self.session.token() {
            Some(token) => self.api.with_token(token.to_string()),
            None => {
                warn!("No token available for refresh");
                return;
            }
        };

        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            Self::execute_background_refresh(tx, api).await;
        });

        self.status_message = Some("Refreshing data...".to_string());
    }

    /// Helper to send refresh results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<RefreshResult>, result: RefreshResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send refresh result - channel closed");
        }
    }

    /// Helper to send a successful fetch result or an error.
    /// A 401 becomes an Unauthorized signal instead of an error banner.
    async fn send_fetch_result<T, F>(
        tx: &mpsc::Sender<RefreshResult>,
        name: &str,
        result: Result<T>,
        wrapper: F,
    ) where
        F: FnOnce(T) -> RefreshResult,
    {
        match result {
            Ok(data) => {
                debug!("{} fetched successfully", name);
                Self::send_result(tx, wrapper(data)).await;
            }
            Err(e) if error_is_unauthorized(&e) => {
                warn!("{} fetch rejected with 401", name);
                Self::send_result(tx, RefreshResult::Unauthorized).await;
            }
            Err(e) => {
                error!(error = %e, "{} fetch failed", name);
                Self::send_result(tx, RefreshResult::Error(error_banner(&e))).await;
            }
        }
    }

    /// Execute the full background refresh.
    ///
    /// Runs in a spawned Tokio task and fetches all user data in parallel.
    /// Results are sent back through the MPSC channel as `RefreshResult`
    /// variants. Cloning the client is cheap, the connection pool is shared.
    async fn execute_background_refresh(tx: mpsc::Sender<RefreshResult>, api: ApiClient) {
        info!("Background refresh task started");

        let api1 = api.clone();
        let api2 = api.clone();
        let api3 = api.clone();
        let api4 = api.clone();
        let api5 = api.clone();

        let (resources_res, reservations_res, upcoming_res, notifications_res, unread_res, payments_res) = tokio::join!(
            api1.fetch_resources(),
            api2.fetch_user_reservations(),
            api3.fetch_upcoming_reservations(),
            api4.fetch_notifications(),
            api5.fetch_unread_notifications(),
            api.fetch_payments(),
        );

        Self::send_fetch_result(&tx, "Resources", resources_res, RefreshResult::Resources).await;
        Self::send_fetch_result(&tx, "Reservations", reservations_res, RefreshResult::Reservations)
            .await;
        Self::send_fetch_result(&tx, "Upcoming", upcoming_res, RefreshResult::Upcoming).await;
        Self::send_fetch_result(&tx, "Notifications", notifications_res, RefreshResult::Notifications)
            .await;
        Self::send_fetch_result(&tx, "Unread", unread_res, RefreshResult::Unread).await;
        Self::send_fetch_result(&tx, "Payments", payments_res, RefreshResult::Payments).await;

        info!("Background refresh complete");
        Self::send_result(&tx, RefreshResult::RefreshComplete).await;
    }

    /// Fetch reviews and upcoming reservations for a resource, cache-first
    pub fn fetch_resource_detail(&mut self, resource_id: i64) {
        if let Ok(Some(cached)) = self.cache.load_reviews(resource_id) {
            if !cached.is_stale() {
                self.resource_reviews.insert(resource_id, cached.data);
            }
        }

        let api = match self.session.token() {
            Some(token) => self.api.with_token(token.to_string()),
            None => return,
        };

        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            let (reviews_res, upcoming_res) = tokio::join!(
                api.fetch_resource_reviews(resource_id),
                api.fetch_resource_upcoming(resource_id),
            );

            Self::send_fetch_result(&tx, "Reviews", reviews_res, |data| {
                RefreshResult::Reviews(resource_id, data)
            })
            .await;
            Self::send_fetch_result(&tx, "ResourceUpcoming", upcoming_res, |data| {
                RefreshResult::ResourceUpcoming(resource_id, data)
            })
            .await;
        });
    }

    /// Submit the booking wizard. Validation must already have passed.
    pub fn submit_booking(&mut self) {
        let Some(ref mut form) = self.booking_form else {
            return;
        };
        let Some(request) = form.to_request() else {
            warn!("Booking form could not be converted to a request");
            return;
        };
        form.submitting = true;

        let api = match self.session.token() {
            Some(token) => self.api.with_token(token.to_string()),
            None => return,
        };
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            match api.create_reservation(&request).await {
                Ok(id) => {
                    info!(reservation_id = id, "Reservation created");
                    Self::send_result(&tx, RefreshResult::ReservationCreated(id)).await;
                    // Pull the fresh lists so the new booking shows up immediately
                    let (reservations_res, upcoming_res) = tokio::join!(
                        api.fetch_user_reservations(),
                        api.fetch_upcoming_reservations(),
                    );
                    Self::send_fetch_result(&tx, "Reservations", reservations_res, RefreshResult::Reservations).await;
                    Self::send_fetch_result(&tx, "Upcoming", upcoming_res, RefreshResult::Upcoming).await;
                }
                Err(e) if error_is_unauthorized(&e) => {
                    Self::send_result(&tx, RefreshResult::Unauthorized).await;
                }
                Err(e) => {
                    error!(error = %e, "Failed to create reservation");
                    Self::send_result(&tx, RefreshResult::Error(error_banner(&e))).await;
                }
            }
        });
    }

    /// Change a reservation's status (cancel, confirm, complete)
    pub fn update_reservation_status(&mut self, reservation_id: i64, status: ReservationStatus) {
        let api = match self.session.token() {
            Some(token) => self.api.with_token(token.to_string()),
            None => return,
        };
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            match api.update_reservation_status(reservation_id, status).await {
                Ok(()) => {
                    info!(reservation_id, ?status, "Reservation status updated");
                    Self::send_result(&tx, RefreshResult::StatusUpdated(reservation_id, status))
                        .await;
                }
                Err(e) if error_is_unauthorized(&e) => {
                    Self::send_result(&tx, RefreshResult::Unauthorized).await;
                }
                Err(e) => {
                    error!(error = %e, reservation_id, "Failed to update reservation status");
                    Self::send_result(&tx, RefreshResult::Error(error_banner(&e))).await;
                }
            }
        });
    }

    /// Submit the payment form. Validation must already have passed.
    pub fn submit_payment(&mut self) {
        let Some(ref mut form) = self.payment_form else {
            return;
        };
        let Some(request) = form.to_request() else {
            warn!("Payment form could not be converted to a request");
            return;
        };
        form.submitting = true;
        let reservation_id = form.reservation_id;

        let api = match self.session.token() {
            Some(token) => self.api.with_token(token.to_string()),
            None => return,
        };
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            match api.create_payment(&request).await {
                Ok(()) => {
                    info!(reservation_id, "Payment submitted");
                    Self::send_result(&tx, RefreshResult::PaymentSubmitted(reservation_id)).await;
                    let (reservations_res, payments_res) =
                        tokio::join!(api.fetch_user_reservations(), api.fetch_payments());
                    Self::send_fetch_result(&tx, "Reservations", reservations_res, RefreshResult::Reservations).await;
                    Self::send_fetch_result(&tx, "Payments", payments_res, RefreshResult::Payments).await;
                }
                Err(e) if error_is_unauthorized(&e) => {
                    Self::send_result(&tx, RefreshResult::Unauthorized).await;
                }
                Err(e) => {
                    error!(error = %e, reservation_id, "Payment failed");
                    Self::send_result(&tx, RefreshResult::Error(error_banner(&e))).await;
                }
            }
        });
    }

    /// Request a refund for a payment
    pub fn refund_payment(&mut self, payment_id: i64) {
        let api = match self.session.token() {
            Some(token) => self.api.with_token(token.to_string()),
            None => return,
        };
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            match api.refund_payment(payment_id).await {
                Ok(()) => {
                    info!(payment_id, "Refund requested");
                    let payments_res = api.fetch_payments().await;
                    Self::send_fetch_result(&tx, "Payments", payments_res, RefreshResult::Payments)
                        .await;
                }
                Err(e) if error_is_unauthorized(&e) => {
                    Self::send_result(&tx, RefreshResult::Unauthorized).await;
                }
                Err(e) => {
                    error!(error = %e, payment_id, "Refund failed");
                    Self::send_result(&tx, RefreshResult::Error(error_banner(&e))).await;
                }
            }
        });
    }

    /// Submit the review form: create or update depending on `editing_review_id`
    pub fn submit_review(&mut self) {
        let Some(ref mut form) = self.review_form else {
            return;
        };
        form.submitting = true;
        let resource_id = form.resource_id;
        let comment = form.comment.trim().to_string();

        let request = match form.editing_review_id {
            Some(review_id) => ReviewAction::Update(
                review_id,
                ReviewUpdate {
                    rating: form.rating,
                    comment: comment.clone(),
                },
            ),
            None => ReviewAction::Create(NewReview {
                reservation_id: form.reservation_id,
                rating: form.rating,
                comment,
            }),
        };

        let api = match self.session.token() {
            Some(token) => self.api.with_token(token.to_string()),
            None => return,
        };
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            let result = match &request {
                ReviewAction::Create(new_review) => api.submit_review(new_review).await,
                ReviewAction::Update(id, update) => api.update_review(*id, update).await,
            };
            match result {
                Ok(()) => {
                    info!(resource_id, "Review saved");
                    Self::send_result(&tx, RefreshResult::ReviewsChanged(resource_id)).await;
                    let reviews_res = api.fetch_resource_reviews(resource_id).await;
                    Self::send_fetch_result(&tx, "Reviews", reviews_res, |data| {
                        RefreshResult::Reviews(resource_id, data)
                    })
                    .await;
                }
                Err(e) if error_is_unauthorized(&e) => {
                    Self::send_result(&tx, RefreshResult::Unauthorized).await;
                }
                Err(e) => {
                    error!(error = %e, resource_id, "Failed to save review");
                    Self::send_result(&tx, RefreshResult::Error(error_banner(&e))).await;
                }
            }
        });
    }

    /// Delete one of the current user's reviews
    pub fn delete_review(&mut self, review_id: i64, resource_id: i64) {
        let api = match self.session.token() {
            Some(token) => self.api.with_token(token.to_string()),
            None => return,
        };
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            match api.delete_review(review_id).await {
                Ok(()) => {
                    info!(review_id, "Review deleted");
                    Self::send_result(&tx, RefreshResult::ReviewsChanged(resource_id)).await;
                    let reviews_res = api.fetch_resource_reviews(resource_id).await;
                    Self::send_fetch_result(&tx, "Reviews", reviews_res, |data| {
                        RefreshResult::Reviews(resource_id, data)
                    })
                    .await;
                }
                Err(e) if error_is_unauthorized(&e) => {
                    Self::send_result(&tx, RefreshResult::Unauthorized).await;
                }
                Err(e) => {
                    error!(error = %e, review_id, "Failed to delete review");
                    Self::send_result(&tx, RefreshResult::Error(error_banner(&e))).await;
                }
            }
        });
    }

    /// Mark a notification read on the server. The local list updates
    /// optimistically; the server result is idempotent either way.
    pub fn mark_notification_read(&mut self, notification_id: i64) {
        apply_read_mark(&mut self.notifications, &mut self.unread_count, notification_id);

        let api = match self.session.token() {
            Some(token) => self.api.with_token(token.to_string()),
            None => return,
        };
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            match api.mark_notification_read(notification_id).await {
                Ok(()) => {
                    Self::send_result(&tx, RefreshResult::NotificationRead(notification_id)).await;
                }
                Err(e) if error_is_unauthorized(&e) => {
                    Self::send_result(&tx, RefreshResult::Unauthorized).await;
                }
                Err(e) => {
                    warn!(error = %e, notification_id, "Failed to mark notification read");
                }
            }
        });
    }

    /// Mark every notification read
    pub fn mark_all_notifications_read(&mut self) {
        for notification in &mut self.notifications {
            notification.is_read = true;
        }
        self.unread_count = 0;

        let api = match self.session.token() {
            Some(token) => self.api.with_token(token.to_string()),
            None => return,
        };
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            match api.mark_all_notifications_read().await {
                Ok(()) => {
                    Self::send_result(&tx, RefreshResult::AllNotificationsRead).await;
                }
                Err(e) if error_is_unauthorized(&e) => {
                    Self::send_result(&tx, RefreshResult::Unauthorized).await;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to mark all notifications read");
                }
            }
        });
    }

    /// Check for completed background tasks and process results
    pub fn check_background_tasks(&mut self) {
        // Collect all pending results first to avoid borrow conflicts
        let results: Vec<RefreshResult> = {
            if let Some(ref mut rx) = self.refresh_rx {
                let mut results = Vec::new();
                while let Ok(result) = rx.try_recv() {
                    results.push(result);
                }
                results
            } else {
                Vec::new()
            }
        };

        for result in results {
            self.process_refresh_result(result);
        }
    }

    /// Process a single result from a background task.
    ///
    /// Updates the corresponding app state and caches the data. This is called
    /// by `check_background_tasks` for each result received from the channel.
    fn process_refresh_result(&mut self, result: RefreshResult) {
        match result {
            RefreshResult::Resources(data) => {
                if let Err(e) = self.cache.save_resources(&data) {
                    warn!(error = %e, "Failed to cache resources");
                }
                self.resources = data;
                self.cache_ages = self.cache.get_cache_ages();
            }
            RefreshResult::Reservations(data) => {
                if let Err(e) = self.cache.save_reservations(&data) {
                    warn!(error = %e, "Failed to cache reservations");
                }
                self.reservations = data;
                self.cache_ages = self.cache.get_cache_ages();
            }
            RefreshResult::Upcoming(data) => {
                if let Err(e) = self.cache.save_upcoming(&data) {
                    warn!(error = %e, "Failed to cache upcoming reservations");
                }
                self.upcoming = data;
            }
            RefreshResult::Notifications(data) => {
                if let Err(e) = self.cache.save_notifications(&data) {
                    warn!(error = %e, "Failed to cache notifications");
                }
                self.notifications = data;
            }
            RefreshResult::Unread(data) => {
                self.unread_count = data.len();
            }
            RefreshResult::Payments(data) => {
                if let Err(e) = self.cache.save_payments(&data) {
                    warn!(error = %e, "Failed to cache payments");
                }
                self.payments = data;
            }
            RefreshResult::Reviews(resource_id, data) => {
                if let Err(e) = self.cache.save_reviews(resource_id, &data) {
                    warn!(error = %e, "Failed to cache reviews");
                }
                self.resource_reviews.insert(resource_id, data);
            }
            RefreshResult::ResourceUpcoming(resource_id, data) => {
                self.resource_upcoming.insert(resource_id, data);
            }
            RefreshResult::ReservationCreated(id) => {
                debug!(reservation_id = id, "Reservation created result received");
                self.booking_form = None;
                self.state = AppState::Normal;
                self.current_tab = Tab::Reservations;
                self.status_message = Some("Reservation created".to_string());
            }
            RefreshResult::StatusUpdated(reservation_id, status) => {
                if let Some(reservation) =
                    self.reservations.iter_mut().find(|r| r.id == reservation_id)
                {
                    reservation.status = status;
                }
                // A cancelled or completed booking no longer belongs in upcoming
                if !status.is_active() {
                    self.upcoming.retain(|r| r.id != reservation_id);
                }
                if let Err(e) = self.cache.save_reservations(&self.reservations) {
                    warn!(error = %e, "Failed to cache reservations");
                }
                self.status_message = Some(format!("Reservation {}", status));
            }
            RefreshResult::NotificationRead(id) => {
                // Already applied optimistically; repeat application is harmless
                apply_read_mark(&mut self.notifications, &mut self.unread_count, id);
                if let Err(e) = self.cache.save_notifications(&self.notifications) {
                    warn!(error = %e, "Failed to cache notifications");
                }
            }
            RefreshResult::AllNotificationsRead => {
                for notification in &mut self.notifications {
                    notification.is_read = true;
                }
                self.unread_count = 0;
                if let Err(e) = self.cache.save_notifications(&self.notifications) {
                    warn!(error = %e, "Failed to cache notifications");
                }
            }
            RefreshResult::PaymentSubmitted(reservation_id) => {
                if let Some(reservation) =
                    self.reservations.iter_mut().find(|r| r.id == reservation_id)
                {
                    reservation.is_paid = true;
                }
                self.payment_form = None;
                self.state = AppState::Normal;
                self.status_message = Some("Payment submitted".to_string());
            }
            RefreshResult::ReviewsChanged(_resource_id) => {
                self.review_form = None;
                self.state = AppState::Normal;
                self.status_message = Some("Review saved".to_string());
            }
            RefreshResult::RefreshComplete => {
                // Only clear status if it's a progress message, preserve errors
                if let Some(ref msg) = self.status_message {
                    if !msg.starts_with("Error") {
                        self.status_message = None;
                    }
                }
            }
            RefreshResult::Unauthorized => {
                self.booking_form = None;
                self.payment_form = None;
                self.review_form = None;
                self.handle_unauthorized();
            }
            RefreshResult::Error(msg) => {
                error!(error = %msg, "Background task error");
                if let Some(ref mut form) = self.booking_form {
                    form.submitting = false;
                }
                if let Some(ref mut form) = self.payment_form {
                    form.submitting = false;
                }
                if let Some(ref mut form) = self.review_form {
                    form.submitting = false;
                }
                self.status_message = Some(msg);
            }
        }
    }

    // =========================================================================
    // Data Access Methods
    // =========================================================================

    /// Check if a resource matches the search query.
    /// Query should already be lowercased.
    fn resource_matches_search(resource: &Resource, query: &str) -> bool {
        contains_ignore_case(&resource.name, query)
            || contains_ignore_case(&resource.description, query)
            || contains_ignore_case(&resource.location, query)
            || contains_ignore_case(&resource.category, query)
    }

    /// Get resources sorted by current sort settings, filtered by search query
    pub fn get_sorted_resources(&self) -> Vec<&Resource> {
        let mut sorted: Vec<&Resource> = self.resources.iter().collect();

        if !self.search_query.is_empty() {
            let query = self.search_query.to_lowercase();
            sorted.retain(|r| Self::resource_matches_search(r, &query));
        }

        sorted.sort_by(|a, b| {
            let name_cmp = |x: &Resource, y: &Resource| cmp_ignore_case(&x.name, &y.name);

            let cmp = match self.resource_sort_column {
                ResourceSortColumn::Name => name_cmp(a, b),
                ResourceSortColumn::Category => {
                    cmp_ignore_case(&a.category, &b.category).then_with(|| name_cmp(a, b))
                }
                ResourceSortColumn::Rate => a
                    .hourly_rate
                    .unwrap_or(f64::MAX)
                    .total_cmp(&b.hourly_rate.unwrap_or(f64::MAX))
                    .then_with(|| name_cmp(a, b)),
                ResourceSortColumn::Rating => {
                    // Reversed so ascending shows best rated first
                    b.average_rating
                        .unwrap_or(0.0)
                        .total_cmp(&a.average_rating.unwrap_or(0.0))
                        .then_with(|| name_cmp(a, b))
                }
            };

            if self.resource_sort_ascending {
                cmp
            } else {
                cmp.reverse()
            }
        });

        sorted
    }

    /// Check if a reservation matches the search query.
    /// Query should already be lowercased.
    fn reservation_matches_search(reservation: &Reservation, query: &str) -> bool {
        reservation
            .resource_name
            .as_ref()
            .map(|s| contains_ignore_case(s, query))
            .unwrap_or(false)
            || reservation
                .description
                .as_ref()
                .map(|s| contains_ignore_case(s, query))
                .unwrap_or(false)
            || contains_ignore_case(&reservation.status.to_string(), query)
    }

    /// Get reservations filtered by status and search query, sorted by
    /// current sort settings
    pub fn get_sorted_reservations(&self) -> Vec<&Reservation> {
        let mut sorted: Vec<&Reservation> = self.reservations.iter().collect();

        if let Some(filter) = self.status_filter {
            sorted.retain(|r| r.status == filter);
        }

        if !self.search_query.is_empty() {
            let query = self.search_query.to_lowercase();
            sorted.retain(|r| Self::reservation_matches_search(r, &query));
        }

        sorted.sort_by(|a, b| {
            let start_cmp =
                |x: &Reservation, y: &Reservation| x.start_time.cmp(&y.start_time);

            let cmp = match self.reservation_sort_column {
                ReservationSortColumn::Start => start_cmp(a, b),
                ReservationSortColumn::Resource => cmp_ignore_case(
                    a.resource_name.as_deref().unwrap_or(""),
                    b.resource_name.as_deref().unwrap_or(""),
                )
                .then_with(|| start_cmp(a, b)),
                ReservationSortColumn::Status => a
                    .status
                    .to_string()
                    .cmp(&b.status.to_string())
                    .then_with(|| start_cmp(a, b)),
            };

            if self.reservation_sort_ascending {
                cmp
            } else {
                cmp.reverse()
            }
        });

        sorted
    }

    /// The currently selected resource, honoring filter and sort
    pub fn selected_resource(&self) -> Option<&Resource> {
        self.get_sorted_resources()
            .get(self.resource_selection)
            .copied()
    }

    /// The currently selected reservation, honoring filter and sort
    pub fn selected_reservation(&self) -> Option<&Reservation> {
        self.get_sorted_reservations()
            .get(self.reservation_selection)
            .copied()
    }

    // =========================================================================
    // Sort and Filter Toggle Helpers
    // =========================================================================

    /// Toggle resource sort column - if already sorting by this column, flip
    /// direction; otherwise switch to this column with ascending=true.
    /// Resets selection to 0.
    pub fn toggle_resource_sort(&mut self, column: ResourceSortColumn) {
        if self.resource_sort_column == column {
            self.resource_sort_ascending = !self.resource_sort_ascending;
        } else {
            self.resource_sort_column = column;
            self.resource_sort_ascending = true;
        }
        self.resource_selection = 0;
    }

    /// Toggle reservation sort column - if already sorting by this column,
    /// flip direction; otherwise switch to this column with ascending=true.
    /// Resets selection to 0.
    pub fn toggle_reservation_sort(&mut self, column: ReservationSortColumn) {
        if self.reservation_sort_column == column {
            self.reservation_sort_ascending = !self.reservation_sort_ascending;
        } else {
            self.reservation_sort_column = column;
            self.reservation_sort_ascending = true;
        }
        self.reservation_selection = 0;
    }

    /// Cycle the reservation status filter:
    /// All -> Pending -> Confirmed -> Cancelled -> Completed -> All
    pub fn cycle_status_filter(&mut self) {
        self.status_filter = match self.status_filter {
            None => Some(ReservationStatus::Pending),
            Some(ReservationStatus::Pending) => Some(ReservationStatus::Confirmed),
            Some(ReservationStatus::Confirmed) => Some(ReservationStatus::Cancelled),
            Some(ReservationStatus::Cancelled) => Some(ReservationStatus::Completed),
            Some(ReservationStatus::Completed) => None,
        };
        self.reservation_selection = 0;
    }
}

/// What submit_review sends to the backend
enum ReviewAction {
    Create(NewReview),
    Update(i64, ReviewUpdate),
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if an email character should be accepted
pub fn can_add_email_char(current_len: usize, c: char) -> bool {
    current_len < MAX_EMAIL_LENGTH && is_valid_input_char(c)
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

/// Check if a free-text character should be accepted
pub fn can_add_text_char(current_len: usize, c: char) -> bool {
    current_len < MAX_TEXT_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(id: i64, is_read: bool) -> Notification {
        Notification {
            id,
            user_id: "u1".to_string(),
            title: "t".to_string(),
            message: "m".to_string(),
            kind: "Reminder".to_string(),
            reservation_id: None,
            is_read,
            created_at: "2026-03-02T12:00:00Z".to_string(),
        }
    }

    fn resource(id: i64, name: &str) -> Resource {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "capacity": 10,
        }))
        .unwrap()
    }

    // -------------------------------------------------------------------------
    // Tab Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_tab_next() {
        assert_eq!(Tab::Resources.next(), Tab::Reservations);
        assert_eq!(Tab::Reservations.next(), Tab::Notifications);
        assert_eq!(Tab::Notifications.next(), Tab::Account);
        assert_eq!(Tab::Account.next(), Tab::Resources); // Wraps around
    }

    #[test]
    fn test_tab_prev() {
        assert_eq!(Tab::Resources.prev(), Tab::Account); // Wraps around
        assert_eq!(Tab::Account.prev(), Tab::Notifications);
        assert_eq!(Tab::Notifications.prev(), Tab::Reservations);
        assert_eq!(Tab::Reservations.prev(), Tab::Resources);
    }

    // -------------------------------------------------------------------------
    // Unread Bookkeeping Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_apply_read_mark_decrements_once() {
        let mut notifications = vec![notification(1, false), notification(2, false)];
        let mut unread = 2;

        apply_read_mark(&mut notifications, &mut unread, 1);
        assert!(notifications[0].is_read);
        assert_eq!(unread, 1);

        // Marking the same one again must not decrement further
        apply_read_mark(&mut notifications, &mut unread, 1);
        assert_eq!(unread, 1);
    }

    #[test]
    fn test_apply_read_mark_unknown_id_is_noop() {
        let mut notifications = vec![notification(1, false)];
        let mut unread = 1;
        apply_read_mark(&mut notifications, &mut unread, 99);
        assert_eq!(unread, 1);
        assert!(!notifications[0].is_read);
    }

    #[test]
    fn test_apply_read_mark_saturates_at_zero() {
        let mut notifications = vec![notification(1, false)];
        let mut unread = 0; // count already drifted low
        apply_read_mark(&mut notifications, &mut unread, 1);
        assert_eq!(unread, 0);
    }

    // -------------------------------------------------------------------------
    // Search Matching Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_resource_matches_search() {
        let mut r = resource(1, "Conference Room A");
        r.location = "Building 2".to_string();
        r.category = "Meeting Room".to_string();

        assert!(App::resource_matches_search(&r, "conference"));
        assert!(App::resource_matches_search(&r, "building 2"));
        assert!(App::resource_matches_search(&r, "meeting"));
        assert!(!App::resource_matches_search(&r, "projector"));
    }

    #[test]
    fn test_reservation_matches_search() {
        let reservation: Reservation = serde_json::from_value(serde_json::json!({
            "id": 1,
            "resourceId": 2,
            "resourceName": "Conference Room A",
            "startTime": "2026-03-02T14:00:00",
            "endTime": "2026-03-02T16:00:00",
            "status": "Confirmed",
            "description": "Quarterly planning",
        }))
        .unwrap();

        assert!(App::reservation_matches_search(&reservation, "quarterly"));
        assert!(App::reservation_matches_search(&reservation, "confirmed"));
        assert!(App::reservation_matches_search(&reservation, "room a"));
        assert!(!App::reservation_matches_search(&reservation, "pending"));
    }

    // -------------------------------------------------------------------------
    // Booking Form Tests
    // -------------------------------------------------------------------------

    fn booking_form() -> BookingForm {
        let mut r = resource(7, "Conference Room A");
        r.hourly_rate = Some(20.0);
        let mut form = BookingForm::for_resource(&r);
        form.start = "2099-03-02 14:00".to_string();
        form.end = "2099-03-02 16:30".to_string();
        form
    }

    #[test]
    fn test_booking_estimated_cost_rounds_up_hours() {
        let form = booking_form();
        // 2.5 hours rounds up to 3 at 20.00/hr
        assert_eq!(form.estimated_cost(), Some(60.0));
    }

    #[test]
    fn test_booking_estimated_cost_daily_rate() {
        let mut form = booking_form();
        form.hourly_rate = None;
        form.daily_rate = Some(100.0);
        form.end = "2099-03-03 14:00".to_string();
        assert_eq!(form.estimated_cost(), Some(100.0));
    }

    #[test]
    fn test_booking_form_to_request() {
        let mut form = booking_form();
        form.attendees = "4".to_string();
        form.description = "Planning session".to_string();
        assert!(form.validate());

        let request = form.to_request().expect("request");
        assert_eq!(request.resource_id, 7);
        assert_eq!(request.start_time, "2099-03-02T14:00:00");
        assert_eq!(request.attendees, 4);
        assert!(!request.is_recurring);
        assert!(request.recurrence_pattern.is_none());
    }

    #[test]
    fn test_booking_form_recurring_request() {
        let mut form = booking_form();
        form.is_recurring = true;
        form.recurrence_pattern = "Weekly".to_string();
        form.recurrence_interval = "2".to_string();
        form.recurrence_end_date = "2099-06-01".to_string();
        assert!(form.validate());

        let request = form.to_request().expect("request");
        assert_eq!(request.recurrence_pattern.as_deref(), Some("weekly"));
        assert_eq!(request.recurrence_interval, Some(2));
    }

    #[test]
    fn test_booking_form_validation_rejects_bad_times() {
        let mut form = booking_form();
        form.end = "2099-03-02 13:00".to_string();
        assert!(!form.validate());
        assert_eq!(form.errors[0].field, "end");
    }

    // -------------------------------------------------------------------------
    // Payment Form Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_payment_form_to_request() {
        let mut form = PaymentForm {
            reservation_id: 42,
            amount: "50.00".to_string(),
            payment_method: "PayPal".to_string(),
            focus: PaymentFocus::Amount,
            errors: Vec::new(),
            submitting: false,
        };
        assert!(form.validate());

        let request = form.to_request().expect("request");
        assert_eq!(request.reservation_id, 42);
        assert_eq!(request.amount, 50.0);
        assert_eq!(request.currency, "USD");
        assert_eq!(request.payment_method, "paypal");
    }

    // -------------------------------------------------------------------------
    // Input Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_email_char() {
        assert!(can_add_email_char(0, 'a'));
        assert!(can_add_email_char(253, '@'));
        assert!(!can_add_email_char(254, 'a'));
        assert!(!can_add_email_char(0, '\n'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, 'a'));
        assert!(can_add_password_char(127, '!'));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\r'));
    }
}
