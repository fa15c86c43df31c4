//! Selection state machine of the booking wizard.
//!
//! Selections form a strict dependency chain: clinic -> service -> doctor -> date/slot -> patient
//! details. Changing an upstream selection clears everything downstream of it.
//!
//! Each option list (clinics, services, doctors, slots) is a fetch *lineage* with a generation
//! counter. Triggering a fetch bumps the generation and hands out a [`FetchTicket`]; a response is
//! only applied if its ticket still matches, so the last trigger wins regardless of the order in
//! which responses arrive.

use super::Stage;
use crate::catalog::{
    BookingRequest, CatalogPayload, CatalogQuery, Clinic, Doctor, PatientInfo, Service, TimeSlot,
};
use crate::{ApiResult, BookingError, BookingResult};
use chrono::NaiveDate;

/// Option list a fetch populates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lineage {
    Clinics,
    Services,
    Doctors,
    Slots,
}

impl Lineage {
    /// Wizard stage the options belong to.
    pub fn stage(self) -> Stage {
        match self {
            Lineage::Clinics => Stage::Clinic,
            Lineage::Services | Lineage::Doctors => Stage::Doctor,
            Lineage::Slots => Stage::Slot,
        }
    }
}

/// Identity of the trigger that issued a fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    lineage: Lineage,
    generation: u64,
}

impl FetchTicket {
    pub fn lineage(&self) -> Lineage {
        self.lineage
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A fetch the caller must perform and hand back through [`SelectionState::apply`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: FetchTicket,
    pub query: CatalogQuery,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// The ticket was superseded by a later trigger; the response was dropped.
    Discarded,
}

#[derive(Clone, Debug)]
struct Options<T> {
    items: Vec<T>,
    generation: u64,
    pending: bool,
}

impl<T> Default for Options<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            generation: 0,
            pending: false,
        }
    }
}

impl<T> Options<T> {
    fn trigger(&mut self, lineage: Lineage) -> FetchTicket {
        self.invalidate();
        self.pending = true;
        FetchTicket {
            lineage,
            generation: self.generation,
        }
    }

    /// Clear the list and orphan any fetch in flight.
    fn invalidate(&mut self) {
        self.generation += 1;
        self.items.clear();
        self.pending = false;
    }

    fn accepts(&self, ticket: FetchTicket) -> bool {
        self.pending && self.generation == ticket.generation
    }

    fn fill(&mut self, items: Vec<T>) {
        self.items = items;
        self.pending = false;
    }

    fn fail(&mut self) {
        self.items.clear();
        self.pending = false;
    }
}

/// Selections and option lists of one booking session.
#[derive(Clone, Debug, Default)]
pub struct SelectionState {
    clinic: Option<Clinic>,
    service: Option<Service>,
    doctor: Option<Doctor>,
    date: Option<NaiveDate>,
    slot: Option<TimeSlot>,
    patient_info: PatientInfo,
    patient_id: Option<String>,

    clinics: Options<Clinic>,
    services: Options<Service>,
    doctors: Options<Doctor>,
    slots: Options<TimeSlot>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset every selection and request the clinic list.
    pub fn open(&mut self) -> Vec<FetchRequest> {
        self.close();
        let ticket = self.clinics.trigger(Lineage::Clinics);
        vec![FetchRequest {
            ticket,
            query: CatalogQuery::Clinics,
        }]
    }

    /// Discard all selections and options. Outstanding tickets become stale.
    pub fn close(&mut self) {
        self.clinic = None;
        self.service = None;
        self.doctor = None;
        self.date = None;
        self.slot = None;
        self.patient_info = PatientInfo::default();
        self.patient_id = None;

        self.clinics.invalidate();
        self.services.invalidate();
        self.doctors.invalidate();
        self.slots.invalidate();
    }

    /// Select a clinic, clearing every downstream selection.
    ///
    /// Requests the clinic's services and its unfiltered doctor list, so a doctor can be chosen
    /// before (or without) a service.
    pub fn select_clinic(&mut self, clinic: Clinic) -> Vec<FetchRequest> {
        let clinic_id = clinic.id.clone();
        self.clinic = Some(clinic);
        self.service = None;
        self.doctor = None;
        self.date = None;
        self.slot = None;
        self.slots.invalidate();

        let services = self.services.trigger(Lineage::Services);
        let doctors = self.doctors.trigger(Lineage::Doctors);
        vec![
            FetchRequest {
                ticket: services,
                query: CatalogQuery::Services {
                    clinic_id: clinic_id.clone(),
                },
            },
            FetchRequest {
                ticket: doctors,
                query: CatalogQuery::Doctors {
                    clinic_id,
                    service_id: None,
                },
            },
        ]
    }

    /// Select a service and request the doctors offering it at the selected clinic.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidState`] if no clinic is selected.
    pub fn select_service(&mut self, service: Service) -> BookingResult<Vec<FetchRequest>> {
        let clinic_id = self.require_clinic("a clinic must be selected before a service")?;
        let service_id = service.id.clone();
        self.service = Some(service);
        Ok(vec![self.refetch_doctors(clinic_id, Some(service_id))])
    }

    /// Drop the service selection and go back to the clinic's unfiltered doctor list.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidState`] if no clinic is selected.
    pub fn clear_service(&mut self) -> BookingResult<Vec<FetchRequest>> {
        let clinic_id = self.require_clinic("a clinic must be selected before a service")?;
        if self.service.take().is_none() {
            return Ok(Vec::new());
        }
        Ok(vec![self.refetch_doctors(clinic_id, None)])
    }

    fn refetch_doctors(&mut self, clinic_id: String, service_id: Option<String>) -> FetchRequest {
        self.doctor = None;
        self.slot = None;
        self.slots.invalidate();

        let ticket = self.doctors.trigger(Lineage::Doctors);
        FetchRequest {
            ticket,
            query: CatalogQuery::Doctors {
                clinic_id,
                service_id,
            },
        }
    }

    /// Select a doctor, clearing the date and slot.
    ///
    /// The doctor must come from the current doctor list, which is filtered by the selected
    /// service when there is one.
    ///
    /// # Errors
    ///
    /// - [`BookingError::InvalidState`] if no clinic is selected.
    /// - [`BookingError::StaleSelection`] if the doctor is not in the current list, including
    ///   while that list is still being fetched.
    pub fn select_doctor(&mut self, doctor: Doctor) -> BookingResult<()> {
        self.require_clinic("a clinic must be selected before a doctor")?;
        if !self.doctors.items.contains(&doctor) {
            return Err(BookingError::StaleSelection);
        }

        self.doctor = Some(doctor);
        self.date = None;
        self.slot = None;
        self.slots.invalidate();
        Ok(())
    }

    /// Select a date. Requests slots once both a doctor and a date are set.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidState`] if no clinic is selected.
    pub fn select_date(&mut self, date: NaiveDate) -> BookingResult<Vec<FetchRequest>> {
        let clinic_id = self.require_clinic("a clinic must be selected before a date")?;
        self.date = Some(date);
        self.slot = None;

        let Some(doctor) = &self.doctor else {
            self.slots.invalidate();
            return Ok(Vec::new());
        };

        let query = CatalogQuery::Slots {
            clinic_id,
            doctor_id: doctor.id.clone(),
            date,
            service_id: self.service.as_ref().map(|s| s.id.clone()),
        };
        let ticket = self.slots.trigger(Lineage::Slots);
        Ok(vec![FetchRequest { ticket, query }])
    }

    /// Select a time slot from the most recent slot list.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::StaleSelection`] if the slot is not in the current list, for
    /// example because it came from a superseded fetch.
    pub fn select_slot(&mut self, slot: TimeSlot) -> BookingResult<()> {
        if !self.slots.items.contains(&slot) {
            return Err(BookingError::StaleSelection);
        }
        self.slot = Some(slot);
        Ok(())
    }

    pub fn set_patient_info(&mut self, patient_info: PatientInfo) {
        self.patient_info = patient_info;
    }

    /// Attach the signed-in patient's id, if any.
    pub fn set_patient_id(&mut self, patient_id: Option<String>) {
        self.patient_id = patient_id;
    }

    /// Whether the wizard may move past `stage`.
    pub fn can_advance(&self, stage: Stage) -> bool {
        match stage {
            Stage::Clinic => self.clinic.is_some(),
            Stage::Doctor => self.doctor.is_some(),
            Stage::Slot => self.slot.is_some(),
            Stage::PatientInfo => self.patient_info.is_complete(),
        }
    }

    /// Build the booking-creation body after checking every stage in order.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Incomplete`] naming the first stage that cannot advance.
    pub fn booking_request(&self) -> BookingResult<BookingRequest> {
        if let Some(stage) = Stage::ALL.into_iter().find(|s| !self.can_advance(*s)) {
            return Err(BookingError::Incomplete { stage });
        }

        let (Some(clinic), Some(doctor), Some(slot)) = (&self.clinic, &self.doctor, &self.slot)
        else {
            return Err(BookingError::InvalidState(
                "validated booking is missing a selection",
            ));
        };

        let info = &self.patient_info;
        Ok(BookingRequest {
            clinic_id: clinic.id.clone(),
            doctor_id: doctor.id.clone(),
            service_id: self.service.as_ref().map(|s| s.id.clone()),
            patient_id: self.patient_id.clone(),
            start_at: slot.start_at,
            end_at: slot.end_at,
            full_name: info.full_name.trim().to_owned(),
            phone: info.phone.trim().to_owned(),
            email: non_blank(&info.email),
            notes: non_blank(&info.note),
        })
    }

    /// Apply the result of a fetch.
    ///
    /// Responses whose ticket has been superseded are dropped with
    /// [`FetchOutcome::Discarded`]. A failed current fetch leaves its list empty.
    ///
    /// # Errors
    ///
    /// - [`BookingError::Unavailable`] if the current fetch failed.
    /// - [`BookingError::InvalidState`] if the payload kind does not match the ticket.
    pub fn apply(
        &mut self,
        ticket: FetchTicket,
        result: ApiResult<CatalogPayload>,
    ) -> BookingResult<FetchOutcome> {
        if !self.accepts(ticket) {
            tracing::warn!(
                lineage = ?ticket.lineage,
                generation = ticket.generation,
                "discarding stale catalog response"
            );
            return Ok(FetchOutcome::Discarded);
        }

        let payload = match result {
            Ok(payload) => payload,
            Err(source) => {
                tracing::warn!(lineage = ?ticket.lineage, error = %source, "catalog fetch failed");
                self.fail(ticket.lineage);
                return Err(BookingError::Unavailable {
                    stage: ticket.lineage.stage(),
                    source,
                });
            }
        };

        match (ticket.lineage, payload) {
            (Lineage::Clinics, CatalogPayload::Clinics(items)) => self.clinics.fill(items),
            (Lineage::Services, CatalogPayload::Services(items)) => self.services.fill(items),
            (Lineage::Doctors, CatalogPayload::Doctors(items)) => self.doctors.fill(items),
            (Lineage::Slots, CatalogPayload::Slots(items)) => self.slots.fill(items),
            _ => {
                self.fail(ticket.lineage);
                return Err(BookingError::InvalidState(
                    "catalog payload does not match the fetch it answers",
                ));
            }
        }

        Ok(FetchOutcome::Applied)
    }

    fn accepts(&self, ticket: FetchTicket) -> bool {
        match ticket.lineage {
            Lineage::Clinics => self.clinics.accepts(ticket),
            Lineage::Services => self.services.accepts(ticket),
            Lineage::Doctors => self.doctors.accepts(ticket),
            Lineage::Slots => self.slots.accepts(ticket),
        }
    }

    fn fail(&mut self, lineage: Lineage) {
        match lineage {
            Lineage::Clinics => self.clinics.fail(),
            Lineage::Services => self.services.fail(),
            Lineage::Doctors => self.doctors.fail(),
            Lineage::Slots => self.slots.fail(),
        }
    }

    fn require_clinic(&self, message: &'static str) -> BookingResult<String> {
        self.clinic
            .as_ref()
            .map(|c| c.id.clone())
            .ok_or(BookingError::InvalidState(message))
    }

    pub fn clinic(&self) -> Option<&Clinic> {
        self.clinic.as_ref()
    }

    pub fn service(&self) -> Option<&Service> {
        self.service.as_ref()
    }

    pub fn doctor(&self) -> Option<&Doctor> {
        self.doctor.as_ref()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn slot(&self) -> Option<&TimeSlot> {
        self.slot.as_ref()
    }

    pub fn patient_info(&self) -> &PatientInfo {
        &self.patient_info
    }

    pub fn clinics(&self) -> &[Clinic] {
        &self.clinics.items
    }

    pub fn services(&self) -> &[Service] {
        &self.services.items
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors.items
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots.items
    }

    /// Whether a fetch for `lineage` is in flight.
    pub fn is_pending(&self, lineage: Lineage) -> bool {
        match lineage {
            Lineage::Clinics => self.clinics.pending,
            Lineage::Services => self.services.pending,
            Lineage::Doctors => self.doctors.pending,
            Lineage::Slots => self.slots.pending,
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}
