//! Catalog value objects and the backend contract.
//!
//! Clinics, services, doctors and time slots are fetched from the backend, identified by opaque
//! string ids and never modified locally. Every fetch replaces the previous list wholesale.

use crate::ApiResult;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clinic {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: String,
    pub full_name: String,
    #[serde(default)]
    pub specialty: Option<String>,
}

/// A bookable interval in the clinic's local time.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
}

/// Contact details entered in the last booking stage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatientInfo {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub note: String,
}

impl PatientInfo {
    /// Name and phone are mandatory; email and note are not.
    pub fn is_complete(&self) -> bool {
        !self.full_name.trim().is_empty() && !self.phone.trim().is_empty()
    }
}

/// Body of the booking-creation call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub clinic_id: String,
    pub doctor_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub full_name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub appointment_id: String,
    pub cancel_token: String,
    pub reschedule_token: String,
}

/// Catalog, availability and booking operations offered by the backend.
#[async_trait::async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list_clinics(&self) -> ApiResult<Vec<Clinic>>;

    async fn list_services(&self, clinic_id: &str) -> ApiResult<Vec<Service>>;

    async fn list_doctors(
        &self,
        clinic_id: &str,
        service_id: Option<&str>,
    ) -> ApiResult<Vec<Doctor>>;

    async fn list_slots(
        &self,
        clinic_id: &str,
        doctor_id: &str,
        date: NaiveDate,
        service_id: Option<&str>,
    ) -> ApiResult<Vec<TimeSlot>>;

    async fn create_booking(&self, request: &BookingRequest) -> ApiResult<BookingConfirmation>;
}

/// A dependent-data fetch, described without performing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogQuery {
    Clinics,
    Services {
        clinic_id: String,
    },
    Doctors {
        clinic_id: String,
        service_id: Option<String>,
    },
    Slots {
        clinic_id: String,
        doctor_id: String,
        date: NaiveDate,
        service_id: Option<String>,
    },
}

/// Result list of a [`CatalogQuery`].
#[derive(Clone, Debug, PartialEq)]
pub enum CatalogPayload {
    Clinics(Vec<Clinic>),
    Services(Vec<Service>),
    Doctors(Vec<Doctor>),
    Slots(Vec<TimeSlot>),
}

/// Run one query against `api`.
///
/// Callers that want fetches in flight concurrently can drive several of these themselves and
/// feed each result back through [`crate::SelectionState::apply`].
pub async fn dispatch<A>(api: &A, query: &CatalogQuery) -> ApiResult<CatalogPayload>
where
    A: CatalogApi + ?Sized,
{
    tracing::debug!(?query, "dispatching catalog query");

    let payload = match query {
        CatalogQuery::Clinics => CatalogPayload::Clinics(api.list_clinics().await?),
        CatalogQuery::Services { clinic_id } => {
            CatalogPayload::Services(api.list_services(clinic_id).await?)
        }
        CatalogQuery::Doctors {
            clinic_id,
            service_id,
        } => CatalogPayload::Doctors(api.list_doctors(clinic_id, service_id.as_deref()).await?),
        CatalogQuery::Slots {
            clinic_id,
            doctor_id,
            date,
            service_id,
        } => CatalogPayload::Slots(
            api.list_slots(clinic_id, doctor_id, *date, service_id.as_deref())
                .await?,
        ),
    };

    Ok(payload)
}
