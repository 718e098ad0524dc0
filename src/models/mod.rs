//! Data models mirroring the reservation service's JSON payloads.
//!
//! - `UserProfile`: the authenticated account
//! - `Resource`: a bookable item (room, equipment, ...)
//! - `Reservation`: a booking of a resource with a lifecycle status
//! - `Payment`, `Review`, `Notification`: per-reservation records

pub mod notification;
pub mod payment;
pub mod reservation;
pub mod resource;
pub mod review;
pub mod user;

pub use notification::Notification;
pub use payment::{NewPayment, Payment, PaymentStatus};
pub use reservation::{
    NewReservation, Reservation, ReservationSortColumn, ReservationStatus, StatusUpdate,
};
pub use resource::{Resource, ResourceSortColumn};
pub use review::{NewReview, Review, ReviewUpdate};
pub use user::UserProfile;
