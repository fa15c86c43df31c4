//! Bearer-token session state.
//!
//! Initialised from configuration at startup (or by [`AuthSession::sign_in`]) and torn down by
//! [`AuthSession::sign_out`], which drops the token so later requests go out anonymous.

use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct AuthSession {
    token: RwLock<Option<String>>,
}

impl AuthSession {
    pub fn new(token: Option<&str>) -> Self {
        let session = Self::default();
        if let Some(token) = token {
            session.sign_in(token);
        }
        session
    }

    /// Store a token. Blank tokens sign the session out instead.
    pub fn sign_in(&self, token: &str) {
        let token = token.trim();
        let mut slot = self.token.write().unwrap_or_else(|e| e.into_inner());
        *slot = (!token.is_empty()).then(|| token.to_owned());
    }

    pub fn sign_out(&self) {
        tracing::debug!("auth session cleared");
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn is_signed_in(&self) -> bool {
        self.token().is_some()
    }

    /// Value for the `Authorization` header, if signed in.
    pub fn authorization(&self) -> Option<String> {
        self.token().map(|t| format!("Bearer {t}"))
    }

    fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
