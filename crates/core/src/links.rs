//! Self-service links sent to patients after booking.
//!
//! Cancel and reschedule pages live on the patient portal and identify the appointment by the
//! token returned from booking creation.

use crate::constants::{CANCEL_PATH, RESCHEDULE_PATH, TOKEN_QUERY_PARAM};
use crate::{BookingConfirmation, ClientConfig};
use url::Url;

/// Cancel and reschedule URLs for one confirmed booking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmationLinks {
    pub cancel: Url,
    pub reschedule: Url,
}

#[derive(Clone, Debug)]
pub struct BookingLinks {
    portal_base_url: Url,
}

impl BookingLinks {
    pub fn new(portal_base_url: Url) -> Self {
        Self { portal_base_url }
    }

    pub fn from_config(cfg: &ClientConfig) -> Self {
        Self::new(cfg.portal_base_url().clone())
    }

    pub fn cancel_url(&self, cancel_token: &str) -> Url {
        self.link(&CANCEL_PATH, cancel_token)
    }

    pub fn reschedule_url(&self, reschedule_token: &str) -> Url {
        self.link(&RESCHEDULE_PATH, reschedule_token)
    }

    pub fn for_confirmation(&self, confirmation: &BookingConfirmation) -> ConfirmationLinks {
        ConfirmationLinks {
            cancel: self.cancel_url(&confirmation.cancel_token),
            reschedule: self.reschedule_url(&confirmation.reschedule_token),
        }
    }

    fn link(&self, segments: &[&str], token: &str) -> Url {
        let mut url = self.portal_base_url.clone();
        // Only cannot-be-a-base URLs refuse path segments; config admits http(s) only.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.query_pairs_mut()
            .clear()
            .append_pair(TOKEN_QUERY_PARAM, token);
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(base: &str) -> BookingLinks {
        BookingLinks::new(Url::parse(base).expect("valid url"))
    }

    #[test]
    fn builds_cancel_and_reschedule_links() {
        let confirmation = BookingConfirmation {
            appointment_id: "a1".into(),
            cancel_token: "c-123".into(),
            reschedule_token: "r-456".into(),
        };
        let built = links("https://portal.example.com").for_confirmation(&confirmation);
        assert_eq!(
            built.cancel.as_str(),
            "https://portal.example.com/booking/cancel?token=c-123"
        );
        assert_eq!(
            built.reschedule.as_str(),
            "https://portal.example.com/booking/reschedule?token=r-456"
        );
    }

    #[test]
    fn keeps_base_path_and_encodes_token() {
        let url = links("https://example.com/portal/").cancel_url("a+b/c=d");
        assert_eq!(
            url.as_str(),
            "https://example.com/portal/booking/cancel?token=a%2Bb%2Fc%3Dd"
        );
    }
}
