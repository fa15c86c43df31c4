//! # Dental Core
//!
//! Booking logic for the clinic console.
//!
//! This crate contains:
//! - catalog value objects and the [`CatalogApi`] contract the backend is consumed through
//! - the booking selection state machine ([`booking::SelectionState`]) and its async driver
//!   ([`booking::BookingSession`])
//! - client configuration and self-service link construction
//!
//! **No transport concerns**: HTTP lives in `api-client`, which implements [`CatalogApi`].

pub mod booking;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod links;

pub use booking::{
    BookingSession, FetchOutcome, FetchRequest, FetchTicket, Lineage, SelectionState, Stage,
};
pub use catalog::{
    dispatch, BookingConfirmation, BookingRequest, CatalogApi, CatalogPayload, CatalogQuery,
    Clinic, Doctor, PatientInfo, Service, TimeSlot,
};
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult, BookingError, BookingResult, ConfigError, ConfigResult};
pub use links::{BookingLinks, ConfirmationLinks};
