// src/editor.rs
//! Draft lifecycle for one editable resource (job seeker profile, resume,
//! employer profile, job post).

use serde_json::Value;
use std::fmt::Display;
use std::future::Future;
use tracing::{info, warn};

use crate::form::FormDocument;

pub const SPECIALIZATIONS: &[&str] = &[
    "Anesthesiology",
    "Cardiology",
    "Dermatology",
    "Emergency Medicine",
    "General Medicine",
    "General Surgery",
    "Gynecology",
    "Neurology",
    "Nursing",
    "Oncology",
    "Orthopedics",
    "Pediatrics",
    "Pharmacy",
    "Physiotherapy",
    "Psychiatry",
    "Radiology",
];

pub const JOB_TYPES: &[&str] = &[
    "Full-time",
    "Part-time",
    "Contract",
    "Locum",
    "Internship",
    "Temporary",
];

/// Option list behind a multi-select field, matched on the last path segment
pub fn options_for(path: &str) -> Option<&'static [&'static str]> {
    match path.rsplit('.').next()? {
        "specializations" | "specialization" | "preferredSpecializations" => Some(SPECIALIZATIONS),
        "jobTypes" | "jobType" | "preferredJobTypes" => Some(JOB_TYPES),
        _ => None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct DraftEditor {
    document: FormDocument,
    dirty: bool,
}

impl DraftEditor {
    /// Start from a fetch result. A failed fetch yields an empty draft.
    pub fn from_fetch<E: Display>(label: &str, fetched: Result<Value, E>) -> Self {
        let document = match fetched {
            Ok(Value::Null) => FormDocument::new(),
            Ok(value) => FormDocument::from(value),
            Err(e) => {
                warn!("Could not load {}, starting from an empty draft: {}", label, e);
                FormDocument::new()
            }
        };
        Self {
            document,
            dirty: false,
        }
    }

    pub fn document(&self) -> &FormDocument {
        &self.document
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set(&mut self, path: &str, value: Value) {
        self.document.set(path, value);
        self.dirty = true;
    }

    pub fn clear(&mut self, path: &str) {
        self.document.clear(path);
        self.dirty = true;
    }

    /// Checkbox-style toggle. Values outside the known option list are still
    /// applied, with a warning.
    pub fn toggle(&mut self, path: &str, value: Value) {
        if let (Some(options), Some(text)) = (options_for(path), value.as_str()) {
            if !options.contains(&text) {
                warn!("'{}' is not a known option for {}", text, path);
            }
        }
        self.document.toggle(path, value);
        self.dirty = true;
    }

    /// Send the whole draft through `save`. On success the server's copy
    /// replaces the draft; on failure the draft is kept as is.
    pub async fn save_with<F, Fut, E>(&mut self, save: F) -> Result<(), E>
    where
        F: FnOnce(Value) -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        let saved = save(self.document.as_value().clone()).await?;
        if !saved.is_null() {
            self.document = FormDocument::from(saved);
        }
        self.dirty = false;
        info!("Draft saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failed_fetch_defaults_to_empty_object() {
        let editor = DraftEditor::from_fetch::<&str>("profile", Err("boom"));
        assert_eq!(editor.document().as_value(), &json!({}));
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_edits_mark_dirty() {
        let mut editor = DraftEditor::from_fetch::<&str>("profile", Ok(json!({ "bio": "x" })));
        editor.set("experience.totalYears", json!(7));
        editor.toggle("specializations", json!("Cardiology"));
        assert!(editor.is_dirty());
        assert_eq!(
            editor.document().as_value(),
            &json!({ "bio": "x", "experience": { "totalYears": 7 }, "specializations": ["Cardiology"] })
        );
    }

    #[tokio::test]
    async fn test_save_replaces_draft_with_server_copy() {
        let mut editor = DraftEditor::from_fetch::<&str>("profile", Ok(json!({})));
        editor.set("bio", json!("ICU nurse"));

        let result: Result<(), String> = editor
            .save_with(|draft| async move {
                assert_eq!(draft, json!({ "bio": "ICU nurse" }));
                Ok(json!({ "bio": "ICU nurse", "_id": "p1" }))
            })
            .await;

        assert!(result.is_ok());
        assert!(!editor.is_dirty());
        assert_eq!(editor.document().get("_id"), Some(&json!("p1")));
    }

    #[tokio::test]
    async fn test_failed_save_keeps_draft() {
        let mut editor = DraftEditor::from_fetch::<&str>("profile", Ok(json!({})));
        editor.set("bio", json!("ICU nurse"));

        let result = editor
            .save_with(|_| async { Err::<Value, _>("network down".to_string()) })
            .await;

        assert_eq!(result, Err("network down".to_string()));
        assert!(editor.is_dirty());
        assert_eq!(editor.document().get("bio"), Some(&json!("ICU nurse")));
    }

    #[test]
    fn test_options_for_multi_select_fields() {
        assert_eq!(options_for("jobPreferences.jobTypes"), Some(JOB_TYPES));
        assert_eq!(options_for("specializations"), Some(SPECIALIZATIONS));
        assert_eq!(options_for("education.0.degree"), None);
    }
}
