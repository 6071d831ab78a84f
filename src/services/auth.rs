// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Login, signup and logout against the backend, with the session persisted
//! between runs.

use crate::models::auth::{LoginRequest, SignupForm, UserProfile};
use crate::services::api::{ApiClient, ApiError};
use crate::services::logging::{anonymize_email, redact_token};
use crate::services::session::{SessionState, SessionStore};
use anyhow::{Context, Result};
use chrono::Utc;

/// Authentication service.
///
/// Owns the [`SessionStore`] and keeps the shared [`ApiClient`] credentials in
/// sync with it.
#[derive(Debug)]
pub struct AuthService {
    api: ApiClient,
    store: SessionStore,
}

impl AuthService {
    /// Create the service and hand any saved credentials to `api`.
    pub fn new(api: ApiClient, store: SessionStore) -> Self {
        let state = store.state();
        if let Some(token) = &state.token {
            tracing::debug!(token = %redact_token(token), "restoring saved token");
            api.set_token(Some(token.clone()));
        }
        if let Some(cookies) = &state.cookies {
            api.restore_session_cookies(cookies);
        }
        Self { api, store }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &SessionState {
        self.store.state()
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        self.store.state().user.as_ref()
    }

    /// Log in and remember the session.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<UserProfile> {
        let email = email.trim();
        tracing::info!(email = %anonymize_email(email), "logging in");

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.api.login(&request).await.context("Login failed")?;
        if response.token.is_some() {
            self.api.set_token(response.token.clone());
        }

        let profile = match self.api.profile().await {
            Ok(profile) => profile,
            Err(e) => {
                self.api.set_token(None);
                return Err(e).context("Logged in, but the profile could not be loaded");
            }
        };

        let cookies = self.api.session_cookies();
        self.store.update(|state| {
            state.token = response.token;
            state.cookies = cookies;
            state.user = Some(profile.clone());
            state.logged_in_at = Some(Utc::now());
        })?;

        tracing::info!(email = %anonymize_email(&profile.email), "logged in");
        Ok(profile)
    }

    /// Validate the form, create the account, then log in with it.
    pub async fn signup(&mut self, form: SignupForm) -> Result<UserProfile> {
        let request = form.validate()?;
        tracing::info!(email = %anonymize_email(&request.email), "creating account");

        let response = self.api.signup(&request).await.context("Signup failed")?;
        if let Some(message) = response.message {
            tracing::debug!(%message, "signup response");
        }

        self.login(&request.email, &request.password).await
    }

    /// End the session. The local session is cleared even if the backend call fails.
    pub async fn logout(&mut self) -> Result<()> {
        if let Err(e) = self.api.logout().await {
            tracing::warn!(error = %e, "backend logout failed, clearing local session anyway");
        }
        self.forget()?;
        tracing::info!("logged out");
        Ok(())
    }

    /// Ask the backend whether the session is still valid. An invalid session
    /// is forgotten locally.
    pub async fn check_auth(&mut self) -> Result<bool> {
        let valid = self.api.check_auth().await?;
        if !valid {
            self.forget()?;
        }
        Ok(valid)
    }

    /// Re-read the current user from the backend.
    pub async fn whoami(&mut self) -> Result<UserProfile> {
        match self.api.profile().await {
            Ok(profile) => {
                self.store.update(|state| state.user = Some(profile.clone()))?;
                Ok(profile)
            }
            Err(ApiError::Unauthorized) => {
                self.forget()?;
                Err(ApiError::Unauthorized.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The backend rejected the session during some other call.
    pub fn session_expired(&mut self) -> Result<()> {
        tracing::warn!("session expired, log in again");
        self.forget()
    }

    fn forget(&mut self) -> Result<()> {
        self.api.clear_session();
        self.store.clear()
    }
}
