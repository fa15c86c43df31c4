use dental_core::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};

/// Wrapper the backend puts around every response body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    pub is_success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Rejected`] with the backend message when `isSuccess` is false.
    /// - [`ApiError::MissingData`] when a successful envelope has no `data`.
    pub fn into_result(self) -> ApiResult<T> {
        if !self.is_success {
            return Err(ApiError::Rejected(self.message));
        }
        self.data.ok_or(ApiError::MissingData)
    }
}
