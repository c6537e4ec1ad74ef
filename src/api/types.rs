//! Wire types for the intake API
//!
//! Field names follow the backend's camelCase JSON. The case-status
//! taxonomy is owned by the backend and treated as opaque here.

use serde::{Deserialize, Serialize};

/// Opaque case status supplied by the backend (e.g. "PRE_APPLICATION",
/// "IN_REVIEW", "CLIENT"). The client never interprets the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseStatus(pub String);

impl CaseStatus {
    /// Wrap a backend-supplied status value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Contact details collected in the first wizard step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Reference to a document already uploaded to object storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    /// Display name of the document
    pub name: String,
    /// Storage URL returned by the upload endpoint
    pub url: String,
}

/// Payload for opening a new pre-application
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPreApplication {
    pub applicant: ApplicantProfile,
    #[serde(default)]
    pub documents: Vec<DocumentRef>,
}

/// An application as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: u64,
    pub status: CaseStatus,
    pub applicant: ApplicantProfile,
    #[serde(default)]
    pub documents: Vec<DocumentRef>,
    /// RFC3339 timestamp, absent until the detailed form is submitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
}

/// Payload for scheduling an appointment on a case
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    /// RFC3339 timestamp of the appointment
    pub scheduled_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A scheduled appointment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: u64,
    pub application_id: u64,
    pub scheduled_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// One page of an admin listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub total: u64,
}
