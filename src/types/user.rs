// src/types/user.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Jobseeker,
    Employer,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Jobseeker => "jobseeker",
            Role::Employer => "employer",
            Role::Admin => "admin",
        };
        f.write_str(name)
    }
}

/// User record as returned by the auth endpoints and cached in the session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    // Checked locally, never sent
    #[serde(skip)]
    pub confirm_password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(alias = "token")]
    pub access_token: String,
    #[serde(default)]
    pub user: User,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_accepts_mongo_id_and_keeps_extra_fields() {
        let user: User = serde_json::from_value(json!({
            "_id": "u1",
            "firstName": "Asha",
            "lastName": "Rao",
            "email": "asha@example.com",
            "role": "employer",
            "avatar": "a.png"
        }))
        .unwrap();

        assert_eq!(user.id, "u1");
        assert_eq!(user.role, Role::Employer);
        assert_eq!(user.extra.get("avatar"), Some(&json!("a.png")));
        assert_eq!(user.display_name(), "Asha Rao");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let user = User {
            email: "x@example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(user.display_name(), "x@example.com");
    }

    #[test]
    fn test_register_request_omits_confirmation() {
        let request = RegisterRequest {
            first_name: "Asha".to_string(),
            password: "secret123".to_string(),
            confirm_password: "secret123".to_string(),
            ..Default::default()
        };
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("confirmPassword").is_none());
        assert!(body.get("phone").is_none());
        assert_eq!(body["firstName"], "Asha");
        assert_eq!(body["role"], "jobseeker");
    }

    #[test]
    fn test_auth_response_accepts_token_alias() {
        let response: AuthResponse =
            serde_json::from_value(json!({ "token": "abc", "user": { "email": "e@x.io" } })).unwrap();
        assert_eq!(response.access_token, "abc");
        assert_eq!(response.user.email, "e@x.io");
    }
}
