//! Typed bindings for the intake backend
//!
//! Thin JSON glue over [`AuthClient`]: the applicant-facing two-phase
//! intake flow (pre-application, then the detailed application), the
//! status-tracking endpoint, and the admin surface for reviewing cases,
//! scheduling appointments, and promoting applicants to clients.
//!
//! Every call rides the client's refresh-and-retry protocol; nothing here
//! handles tokens directly.

mod types;

pub use types::{
    ApplicantProfile, Application, Appointment, AppointmentRequest, CaseStatus, DocumentRef,
    NewPreApplication, Page,
};

use crate::error::Result;
use crate::http::{AuthClient, RequestConfig};
use crate::session::SessionEvents;
use crate::store::{Credential, CredentialStore};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    status: CaseStatus,
}

/// Client for the intake backend's REST surface
#[derive(Debug)]
pub struct IntakeApi {
    client: AuthClient,
}

impl IntakeApi {
    /// Create an API client over an already-configured [`AuthClient`]
    pub fn new(client: AuthClient) -> Self {
        Self { client }
    }

    /// The underlying authenticated client, for endpoints not covered here
    pub fn client(&self) -> &AuthClient {
        &self.client
    }

    /// Session event registry, for registering invalidation handlers
    pub fn session(&self) -> &SessionEvents {
        self.client.session()
    }

    fn store(&self) -> &Arc<dyn CredentialStore> {
        self.client.store()
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    /// Log in and persist the returned credential pair to the store.
    ///
    /// All subsequent requests through this client carry the new access
    /// token.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let credential: Credential = self
            .client
            .post_json("/auth/login", json!({"email": email, "password": password}))
            .await?;
        self.store().set(credential);
        Ok(())
    }

    /// End the session: best-effort server-side logout, then clear the
    /// stored credential and notify invalidation handlers.
    ///
    /// The local session is terminated even when the server call fails.
    pub async fn logout(&self) -> Result<()> {
        if let Err(e) = self.client.post("/auth/logout", json!({})).await {
            warn!("Server-side logout failed, clearing local session anyway: {e}");
        }
        self.store().clear();
        self.session().notify_invalidated();
        Ok(())
    }

    // ========================================================================
    // Applicant surface
    // ========================================================================

    /// Open a pre-application with the applicant's profile and the
    /// documents collected so far
    pub async fn create_pre_application(&self, new: &NewPreApplication) -> Result<Application> {
        self.client
            .post_json("/applications", serde_json::to_value(new)?)
            .await
    }

    /// Submit the detailed application form for an existing
    /// pre-application. Form contents are backend-defined and passed
    /// through as-is.
    pub async fn submit_application(&self, id: u64, form: Value) -> Result<Application> {
        self.client
            .put_json(&format!("/applications/{id}/submit"), form)
            .await
    }

    /// Current status of an application, for the tracking page
    pub async fn application_status(&self, id: u64) -> Result<CaseStatus> {
        let response: StatusResponse = self
            .client
            .get_json(&format!("/applications/{id}/status"))
            .await?;
        Ok(response.status)
    }

    // ========================================================================
    // Admin surface
    // ========================================================================

    /// One page of the admin application listing
    pub async fn list_applications(&self, page: u32) -> Result<Page<Application>> {
        self.client
            .request_json(
                Method::GET,
                "/admin/applications",
                RequestConfig::new().query("page", page.to_string()),
            )
            .await
    }

    /// Fetch a single application for review
    pub async fn get_application(&self, id: u64) -> Result<Application> {
        self.client
            .get_json(&format!("/admin/applications/{id}"))
            .await
    }

    /// Apply a partial edit to an application's fields
    pub async fn update_application(&self, id: u64, patch: Value) -> Result<Application> {
        self.client
            .put_json(&format!("/admin/applications/{id}"), patch)
            .await
    }

    /// Move an application to a new case status
    pub async fn set_status(&self, id: u64, status: &CaseStatus) -> Result<Application> {
        self.client
            .post_json(
                &format!("/admin/applications/{id}/status"),
                json!({"status": status}),
            )
            .await
    }

    /// Schedule an appointment on a case
    pub async fn schedule_appointment(
        &self,
        id: u64,
        request: &AppointmentRequest,
    ) -> Result<Appointment> {
        self.client
            .post_json(
                &format!("/admin/applications/{id}/appointments"),
                serde_json::to_value(request)?,
            )
            .await
    }

    /// Promote an applicant to client status
    pub async fn promote_to_client(&self, id: u64) -> Result<Application> {
        self.client
            .post_json(&format!("/admin/applications/{id}/promote"), json!({}))
            .await
    }
}
