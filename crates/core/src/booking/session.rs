use super::{FetchRequest, SelectionState, Stage};
use crate::catalog::{dispatch, BookingConfirmation, CatalogApi, Clinic, Doctor, PatientInfo, Service, TimeSlot};
use crate::{ApiError, BookingError, BookingResult};
use chrono::NaiveDate;
use uuid::Uuid;

/// One live booking wizard bound to a backend.
///
/// Selection methods apply the transition and then await the fetches it triggered, one at a
/// time. Callers that need fetches to overlap with other UI events should drive
/// [`SelectionState`] directly with [`dispatch`].
pub struct BookingSession<A> {
    id: Uuid,
    api: A,
    state: SelectionState,
}

impl<A: CatalogApi> BookingSession<A> {
    pub fn new(api: A) -> Self {
        Self {
            id: Uuid::new_v4(),
            api,
            state: SelectionState::new(),
        }
    }

    /// Identifier attached to this session's log events.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Reset the wizard and load the clinic list.
    pub async fn open(&mut self) -> BookingResult<()> {
        tracing::info!(session = %self.id, "booking session opened");
        let requests = self.state.open();
        self.run(requests).await
    }

    pub async fn select_clinic(&mut self, clinic: Clinic) -> BookingResult<()> {
        tracing::debug!(session = %self.id, clinic = %clinic.id, "clinic selected");
        let requests = self.state.select_clinic(clinic);
        self.run(requests).await
    }

    pub async fn select_service(&mut self, service: Service) -> BookingResult<()> {
        tracing::debug!(session = %self.id, service = %service.id, "service selected");
        let requests = self.state.select_service(service)?;
        self.run(requests).await
    }

    pub async fn clear_service(&mut self) -> BookingResult<()> {
        let requests = self.state.clear_service()?;
        self.run(requests).await
    }

    pub fn select_doctor(&mut self, doctor: Doctor) -> BookingResult<()> {
        tracing::debug!(session = %self.id, doctor = %doctor.id, "doctor selected");
        self.state.select_doctor(doctor)
    }

    pub async fn select_date(&mut self, date: NaiveDate) -> BookingResult<()> {
        tracing::debug!(session = %self.id, %date, "date selected");
        let requests = self.state.select_date(date)?;
        self.run(requests).await
    }

    pub fn select_slot(&mut self, slot: TimeSlot) -> BookingResult<()> {
        self.state.select_slot(slot)
    }

    pub fn set_patient_info(&mut self, patient_info: PatientInfo) {
        self.state.set_patient_info(patient_info);
    }

    pub fn set_patient_id(&mut self, patient_id: Option<String>) {
        self.state.set_patient_id(patient_id);
    }

    pub fn can_advance(&self, stage: Stage) -> bool {
        self.state.can_advance(stage)
    }

    /// Create the booking.
    ///
    /// All four stages are validated locally first; an incomplete wizard never reaches the
    /// network. Exactly one creation request is sent and it is never retried. On success the
    /// session is reset.
    ///
    /// # Errors
    ///
    /// - [`BookingError::Incomplete`] if a stage cannot advance.
    /// - [`BookingError::Submission`] carrying the backend's message unchanged.
    pub async fn submit(&mut self) -> BookingResult<BookingConfirmation> {
        let request = self.state.booking_request()?;

        tracing::info!(
            session = %self.id,
            clinic = %request.clinic_id,
            doctor = %request.doctor_id,
            start_at = %request.start_at,
            "submitting booking"
        );

        match self.api.create_booking(&request).await {
            Ok(confirmation) => {
                tracing::info!(
                    session = %self.id,
                    appointment = %confirmation.appointment_id,
                    "booking confirmed"
                );
                self.state.close();
                Ok(confirmation)
            }
            Err(ApiError::Rejected(message)) => {
                tracing::warn!(session = %self.id, %message, "booking rejected");
                Err(BookingError::Submission(message))
            }
            Err(e) => {
                tracing::error!(session = %self.id, error = %e, "booking request failed");
                Err(BookingError::Submission(e.to_string()))
            }
        }
    }

    /// Discard every selection.
    pub fn close(&mut self) {
        tracing::info!(session = %self.id, "booking session closed");
        self.state.close();
    }

    /// Perform triggered fetches in order and apply each result.
    ///
    /// Every request is attempted even if an earlier one fails; the first failure is returned.
    async fn run(&mut self, requests: Vec<FetchRequest>) -> BookingResult<()> {
        let mut first_error = None;
        for request in requests {
            let result = dispatch(&self.api, &request.query).await;
            if let Err(e) = self.state.apply(request.ticket, result) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
