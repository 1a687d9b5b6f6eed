// src/types/response.rs
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Fields an envelope may carry its resource under
const DATA_FIELDS: [&str; 7] = [
    "data",
    "profile",
    "job",
    "application",
    "applications",
    "resume",
    "savedJobs",
];

/// Response body that is either `{ success, message, data }` or the bare resource.
///
/// A body is only unwrapped when it carries a boolean `success`, or is made of
/// nothing but `data`/`message`/`success`. Bare resources with a `job` or
/// `profile` field of their own are decoded whole.
#[derive(Debug)]
pub enum Payload<T> {
    Wrapped { data: T, message: Option<String> },
    Bare(T),
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Payload<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut value = Value::deserialize(deserializer)?;

        if let Value::Object(map) = &mut value {
            if is_envelope(map) {
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                if let Some(data) = DATA_FIELDS.iter().find_map(|field| map.remove(*field)) {
                    let data = T::deserialize(data).map_err(de::Error::custom)?;
                    return Ok(Payload::Wrapped { data, message });
                }
            }
        }

        T::deserialize(value)
            .map(Payload::Bare)
            .map_err(de::Error::custom)
    }
}

fn is_envelope(map: &Map<String, Value>) -> bool {
    map.get("success").map_or(false, Value::is_boolean)
        || (map.contains_key("data")
            && map
                .keys()
                .all(|key| matches!(key.as_str(), "data" | "message" | "success")))
}

impl<T> Payload<T> {
    pub fn into_inner(self) -> T {
        match self {
            Payload::Wrapped { data, .. } => data,
            Payload::Bare(data) => data,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Payload::Wrapped { message, .. } => message.as_deref(),
            Payload::Bare(_) => None,
        }
    }
}

/// Error body of a non-2xx response
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
    }
}
