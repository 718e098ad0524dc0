//! Tab-specific content rendering.

pub mod account;
pub mod notifications;
pub mod reservations;
pub mod resources;
