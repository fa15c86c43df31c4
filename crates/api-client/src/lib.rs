//! # API Client
//!
//! REST implementation of [`dental_core::CatalogApi`].
//!
//! Handles:
//! - the `{ isSuccess, message, data }` response envelope
//! - URL building for catalog, availability and booking endpoints
//! - bearer-token session state
//!
//! Booking rules live in `dental-core`; this crate only moves JSON.

#![warn(rust_2018_idioms)]

pub mod auth;
pub mod client;
pub mod envelope;

pub use auth::AuthSession;
pub use client::HttpCatalogApi;
pub use envelope::ApiEnvelope;
