// src/form/mod.rs
//! Schema-less form drafts (profiles, job posts, resumes) edited by dotted path

pub mod path;
pub mod update;

pub use path::{FormPath, Segment, MAX_INDEX};
pub use update::{clear_at_path, read_at_path, set_at_path, toggle_array_member};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// In-memory draft of a resource being edited.
///
/// Each edit swaps the inner tree for an updated copy, so a clone taken before
/// an edit never observes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormDocument(Value);

impl FormDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, path: &str, value: Value) {
        self.0 = set_at_path(&self.0, &FormPath::parse(path), value);
    }

    pub fn clear(&mut self, path: &str) {
        self.0 = clear_at_path(&self.0, &FormPath::parse(path));
    }

    pub fn toggle(&mut self, path: &str, value: Value) {
        self.0 = toggle_array_member(&self.0, &FormPath::parse(path), value);
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        read_at_path(&self.0, &FormPath::parse(path))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl Default for FormDocument {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl From<Value> for FormDocument {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
