// src/types/application.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Statuses an employer can move an application to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Shortlisted,
    Interview,
    Offered,
    Hired,
    Rejected,
    Withdrawn,
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Shortlisted => "shortlisted",
            Self::Interview => "interview",
            Self::Offered => "offered",
            Self::Hired => "hired",
            Self::Rejected => "rejected",
            Self::Withdrawn => "withdrawn",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(default, alias = "_id")]
    pub id: String,
    /// Job id, or the populated job document
    #[serde(default)]
    pub job: Value,
    #[serde(default)]
    pub applicant: Value,
    // Kept as text so statuses added server-side still decode
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Application {
    pub fn job_title(&self) -> String {
        match &self.job {
            Value::Object(job) => job
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            Value::String(id) => id.clone(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplicationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_status_still_decodes() {
        let application: Application = serde_json::from_value(json!({
            "_id": "a1",
            "job": { "_id": "j1", "title": "ICU Nurse" },
            "status": "on-hold",
            "createdAt": "2026-01-02T03:04:05Z"
        }))
        .unwrap();
        assert_eq!(application.status, "on-hold");
        assert_eq!(application.job_title(), "ICU Nurse");
        assert_eq!(application.applied_at.as_deref(), Some("2026-01-02T03:04:05Z"));
    }

    #[test]
    fn test_update_serializes_lowercase_status() {
        let update = ApplicationUpdate {
            status: Some(ApplicationStatus::Shortlisted),
            notes: None,
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({ "status": "shortlisted" }));
    }
}
