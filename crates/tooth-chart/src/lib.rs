//! Tooth-status payloads embedded in clinical notes.
//!
//! Doctors record a per-tooth status map during an examination. The map is stored inside the
//! free-text note of the examination, after the literal marker `[ToothStatus]:`, so the backend
//! only ever sees a string.
//!
//! This crate focuses on:
//! - encoding a status map into note text and decoding it back ([`codec`])
//! - classifying free-text status labels for display ([`status`])
//! - the doctor-side chart editor and chart views ([`editor`])
//!
//! Decoding is total: notes that are not tooth-status payloads come back as structured or
//! plain text instead of an error.

pub mod codec;
pub mod editor;
pub mod status;

pub use codec::{decode, encode, is_tooth_key, DecodedNote, ToothStatusMap, TOOTH_STATUS_MARKER};
pub use editor::{chart_view, ToothCell, ToothChartEditor, PERMANENT_TEETH};
pub use status::{classify, ToothStatusCategory};

/// Errors returned by the `tooth-chart` crate.
#[derive(Debug, thiserror::Error)]
pub enum ToothChartError {
    #[error("invalid tooth identifier: {0}")]
    InvalidToothId(String),

    #[error("tooth status cannot be empty")]
    EmptyStatus,
}

/// Type alias for Results that can fail with a [`ToothChartError`].
pub type ToothChartResult<T> = Result<T, ToothChartError>;
