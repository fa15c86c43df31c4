//! HTTP client for the booking backend.

use crate::{ApiEnvelope, AuthSession};
use chrono::NaiveDate;
use dental_core::{
    ApiError, ApiResult, BookingConfirmation, BookingRequest, CatalogApi, ClientConfig, Clinic,
    Doctor, Service, TimeSlot,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;

/// User agent string for API requests.
const USER_AGENT_VALUE: &str = concat!("dental-console/", env!("CARGO_PKG_VERSION"));

/// [`CatalogApi`] over the backend's REST endpoints.
#[derive(Debug)]
pub struct HttpCatalogApi {
    client: reqwest::Client,
    base_url: Url,
    auth: AuthSession,
}

impl HttpCatalogApi {
    /// Build a client from startup configuration.
    ///
    /// The configured token, if any, signs the auth session in.
    pub fn new(cfg: &ClientConfig) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(cfg.request_timeout())
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: cfg.api_base_url().clone(),
            auth: AuthSession::new(cfg.api_token()),
        })
    }

    pub fn auth(&self) -> &AuthSession {
        &self.auth
    }

    /// `{base}/{segments...}`, keeping any path already on the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        tracing::debug!("GET {}", url);
        self.send(self.client.get(url)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let request = match self.auth.authorization() {
            Some(value) => request.header(AUTHORIZATION, value),
            None => request,
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        // Backends report business failures as envelopes on 4xx as well, so try the envelope
        // before looking at the status code.
        match serde_json::from_str::<ApiEnvelope<T>>(&body) {
            Ok(envelope) => envelope.into_result(),
            Err(e) if status.is_success() => Err(ApiError::Decode(e.to_string())),
            Err(_) => Err(ApiError::Transport(format!("HTTP {status}: {}", body.trim()))),
        }
    }
}

fn transport(e: reqwest::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

#[async_trait::async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn list_clinics(&self) -> ApiResult<Vec<Clinic>> {
        self.get(self.endpoint(&["clinics"])).await
    }

    async fn list_services(&self, clinic_id: &str) -> ApiResult<Vec<Service>> {
        self.get(self.endpoint(&["clinics", clinic_id, "services"]))
            .await
    }

    async fn list_doctors(
        &self,
        clinic_id: &str,
        service_id: Option<&str>,
    ) -> ApiResult<Vec<Doctor>> {
        let mut url = self.endpoint(&["clinics", clinic_id, "doctors"]);
        if let Some(service_id) = service_id {
            url.query_pairs_mut().append_pair("serviceId", service_id);
        }
        self.get(url).await
    }

    async fn list_slots(
        &self,
        clinic_id: &str,
        doctor_id: &str,
        date: NaiveDate,
        service_id: Option<&str>,
    ) -> ApiResult<Vec<TimeSlot>> {
        let mut url = self.endpoint(&["availability", "slots"]);
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("clinicId", clinic_id)
                .append_pair("doctorId", doctor_id)
                .append_pair("date", &date.format("%Y-%m-%d").to_string());
            if let Some(service_id) = service_id {
                query.append_pair("serviceId", service_id);
            }
        }
        self.get(url).await
    }

    async fn create_booking(&self, request: &BookingRequest) -> ApiResult<BookingConfirmation> {
        let url = self.endpoint(&["appointments"]);
        tracing::debug!("POST {}", url);
        self.send(self.client.post(url).json(request)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, Query},
        http::{HeaderMap as AxumHeaders, StatusCode},
        response::Json,
        routing::{get, post},
        Router,
    };
    use dental_core::{BookingError, BookingLinks, BookingSession, PatientInfo, Stage};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::time::Duration;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub backend");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve stub backend");
        });
        format!("http://{addr}/api")
    }

    fn client(base_url: &str, token: Option<&str>) -> HttpCatalogApi {
        let cfg = ClientConfig::new(
            base_url,
            "https://portal.test",
            token.map(str::to_owned),
            Duration::from_secs(5),
        )
        .expect("valid config");
        HttpCatalogApi::new(&cfg).expect("build client")
    }

    fn ok(data: Value) -> Json<Value> {
        Json(json!({ "isSuccess": true, "message": "OK", "data": data }))
    }

    async fn clinics(headers: AxumHeaders) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        ok(json!([{ "id": "c1", "name": "Downtown", "address": auth }]))
    }

    async fn services(Path(clinic_id): Path<String>) -> Json<Value> {
        ok(json!([{ "id": format!("{clinic_id}-s1"), "name": "Whitening", "price": 1500000 }]))
    }

    async fn doctors(
        Path(clinic_id): Path<String>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        let service = params.get("serviceId").cloned().unwrap_or_default();
        ok(json!([{ "id": format!("{clinic_id}-d1"), "fullName": "Dr. Ngo", "specialty": service }]))
    }

    async fn slots(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        let date = params.get("date").cloned().unwrap_or_default();
        ok(json!([
            { "startAt": format!("{date}T09:00:00"), "endAt": format!("{date}T09:30:00") },
            { "startAt": format!("{date}T10:00:00"), "endAt": format!("{date}T10:30:00") },
        ]))
    }

    async fn appointments(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        if body["startAt"] == "2025-08-01T10:00:00" {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "isSuccess": false, "message": "Khung giờ đã có người đặt", "data": null })),
            );
        }
        (
            StatusCode::OK,
            ok(json!({
                "appointmentId": "appt-9",
                "cancelToken": body["fullName"],
                "rescheduleToken": "r-9",
            })),
        )
    }

    fn backend() -> Router {
        Router::new()
            .route("/api/clinics", get(clinics))
            .route("/api/clinics/:clinic_id/services", get(services))
            .route("/api/clinics/:clinic_id/doctors", get(doctors))
            .route("/api/availability/slots", get(slots))
            .route("/api/appointments", post(appointments))
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 1).expect("valid date")
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let api = client("http://localhost:5000/api/", None);
        assert_eq!(
            api.endpoint(&["clinics", "c 1", "doctors"]).as_str(),
            "http://localhost:5000/api/clinics/c%201/doctors"
        );
    }

    #[tokio::test]
    async fn lists_catalog_with_bearer_token() {
        let base = serve(backend()).await;
        let api = client(&base, Some("secret"));

        let clinics = api.list_clinics().await.expect("clinics");
        assert_eq!(clinics[0].address.as_deref(), Some("Bearer secret"));

        api.auth().sign_out();
        let clinics = api.list_clinics().await.expect("clinics");
        assert_eq!(clinics[0].address.as_deref(), Some(""));

        let services = api.list_services("c1").await.expect("services");
        assert_eq!(services[0].id, "c1-s1");
        assert_eq!(services[0].price, Some(1_500_000.0));
    }

    #[tokio::test]
    async fn passes_filters_as_query_parameters() {
        let base = serve(backend()).await;
        let api = client(&base, None);

        let doctors = api.list_doctors("c1", Some("s1")).await.expect("doctors");
        assert_eq!(doctors[0].specialty.as_deref(), Some("s1"));

        let slots = api
            .list_slots("c1", "c1-d1", day(), None)
            .await
            .expect("slots");
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].start_at.date(), day());
    }

    #[tokio::test]
    async fn non_envelope_error_is_a_transport_failure() {
        let router = Router::new().route(
            "/api/clinics",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let base = serve(router).await;
        let err = client(&base, None)
            .list_clinics()
            .await
            .expect_err("should fail");
        assert!(matches!(err, ApiError::Transport(msg) if msg.contains("502")));
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_decode_failure() {
        let router = Router::new().route("/api/clinics", get(|| async { "[]" }));
        let base = serve(router).await;
        let err = client(&base, None)
            .list_clinics()
            .await
            .expect_err("should fail");
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn booking_session_end_to_end() {
        let base = serve(backend()).await;
        let mut session = BookingSession::new(client(&base, None));

        session.open().await.expect("open");
        let clinic = session.state().clinics()[0].clone();
        session.select_clinic(clinic).await.expect("clinic");
        let service = session.state().services()[0].clone();
        session.select_service(service).await.expect("service");
        let doctor = session.state().doctors()[0].clone();
        session.select_doctor(doctor).expect("doctor");
        session.select_date(day()).await.expect("date");
        let slot = session.state().slots()[0].clone();
        session.select_slot(slot).expect("slot");
        session.set_patient_info(PatientInfo {
            full_name: "Dang Van E".into(),
            phone: "0977000111".into(),
            ..PatientInfo::default()
        });
        assert!(session.can_advance(Stage::PatientInfo));

        let confirmation = session.submit().await.expect("submit");
        assert_eq!(confirmation.appointment_id, "appt-9");

        let links = BookingLinks::new(Url::parse("https://portal.test").expect("url"))
            .for_confirmation(&confirmation);
        assert_eq!(
            links.cancel.as_str(),
            "https://portal.test/booking/cancel?token=Dang+Van+E"
        );
    }

    #[tokio::test]
    async fn rejected_booking_message_reaches_the_caller() {
        let base = serve(backend()).await;
        let mut session = BookingSession::new(client(&base, None));

        session.open().await.expect("open");
        let clinic = session.state().clinics()[0].clone();
        session.select_clinic(clinic).await.expect("clinic");
        let doctor = session.state().doctors()[0].clone();
        session.select_doctor(doctor).expect("doctor");
        session.select_date(day()).await.expect("date");
        let slot = session.state().slots()[1].clone();
        session.select_slot(slot).expect("slot");
        session.set_patient_info(PatientInfo {
            full_name: "Bui Thi F".into(),
            phone: "0966000222".into(),
            ..PatientInfo::default()
        });

        let err = session.submit().await.expect_err("should be rejected");
        assert!(matches!(err, BookingError::Submission(msg) if msg == "Khung giờ đã có người đặt"));
    }
}
