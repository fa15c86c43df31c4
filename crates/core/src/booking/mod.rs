//! Booking wizard orchestration.
//!
//! The wizard walks four dependent stages: clinic, service and doctor, date and time slot,
//! then patient details. [`SelectionState`] is the state machine behind it and performs no I/O;
//! [`BookingSession`] drives it against a [`crate::CatalogApi`].

mod selection;
mod session;
mod stage;

pub use selection::{FetchOutcome, FetchRequest, FetchTicket, Lineage, SelectionState};
pub use session::BookingSession;
pub use stage::Stage;
