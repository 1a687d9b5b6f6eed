// src/types/job.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Job posting. Only the fields the client displays are typed; the rest of
/// the backend payload rides along in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    /// Either a plain string or `{ city, state, country }`
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub location: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Job {
    /// Human-readable location, joining whichever parts are present
    pub fn location_label(&self) -> String {
        match &self.location {
            Value::String(s) => s.clone(),
            Value::Object(parts) => ["city", "state", "country"]
                .iter()
                .filter_map(|key| parts.get(*key).and_then(Value::as_str))
                .filter(|s| !s.trim().is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            _ => String::new(),
        }
    }
}

/// Filters for `GET /api/jobs`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Job listing page; the backend may send the bare array or a paged object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "JobListWire")]
pub struct JobList {
    pub jobs: Vec<Job>,
    pub total: Option<u64>,
    pub page: Option<u32>,
    pub pages: Option<u32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JobListWire {
    Paged {
        jobs: Vec<Job>,
        #[serde(default)]
        total: Option<u64>,
        #[serde(default)]
        page: Option<u32>,
        #[serde(default, alias = "totalPages")]
        pages: Option<u32>,
    },
    Bare(Vec<Job>),
}

impl From<JobListWire> for JobList {
    fn from(wire: JobListWire) -> Self {
        match wire {
            JobListWire::Paged {
                jobs,
                total,
                page,
                pages,
            } => JobList {
                jobs,
                total,
                page,
                pages,
            },
            JobListWire::Bare(jobs) => JobList {
                total: Some(jobs.len() as u64),
                jobs,
                page: None,
                pages: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_location_label_variants() {
        let mut job = Job {
            location: json!({ "city": "Pune", "state": "MH", "country": "" }),
            ..Default::default()
        };
        assert_eq!(job.location_label(), "Pune, MH");

        job.location = json!("Remote");
        assert_eq!(job.location_label(), "Remote");

        job.location = Value::Null;
        assert_eq!(job.location_label(), "");
    }

    #[test]
    fn test_job_list_accepts_both_shapes() {
        let paged: JobList = serde_json::from_value(json!({
            "jobs": [{ "_id": "j1", "title": "Staff Nurse" }],
            "total": 12,
            "totalPages": 2
        }))
        .unwrap();
        assert_eq!(paged.jobs[0].id, "j1");
        assert_eq!(paged.total, Some(12));
        assert_eq!(paged.pages, Some(2));

        let bare: JobList = serde_json::from_value(json!([{ "id": "j2", "title": "Radiologist" }])).unwrap();
        assert_eq!(bare.jobs.len(), 1);
        assert_eq!(bare.total, Some(1));
    }

    #[test]
    fn test_query_skips_unset_filters() {
        let query = JobQuery {
            specialization: Some("Cardiology".to_string()),
            job_type: Some("Full-time".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value, json!({ "specialization": "Cardiology", "jobType": "Full-time" }));
    }
}
