// src/auth.rs
//! Client session: access token plus the cached user record.
//!
//! The session is an explicit value handed to the API client. It is written
//! to a local JSON file on login, register or OAuth callback and removed on
//! logout.

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::core::FsOps;
use crate::types::{AuthResponse, Role, User};

/// Claims the client reads from the access token payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: Option<String>,
    pub id: Option<String>,
    pub role: Option<String>,
    pub exp: Option<i64>,
    pub iat: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub user: User,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(access_token: String, user: User) -> Self {
        Self {
            access_token,
            user,
            created_at: Utc::now(),
        }
    }

    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Decode the token payload. The signature is not checked: only the
    /// backend holds the key.
    pub fn claims(&self) -> Option<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        match decode::<TokenClaims>(&self.access_token, &DecodingKey::from_secret(&[]), &validation)
        {
            Ok(data) => Some(data.claims),
            Err(e) => {
                debug!("Access token is not a readable JWT: {}", e);
                None
            }
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.claims()
            .and_then(|claims| claims.exp)
            .and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }

    /// Opaque tokens and tokens without `exp` never expire client side.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map(|exp| exp <= now).unwrap_or(false)
    }

    pub fn role(&self) -> Role {
        self.claims()
            .and_then(|claims| claims.role)
            .and_then(|role| serde_json::from_value(serde_json::Value::String(role)).ok())
            .unwrap_or(self.user.role)
    }
}

impl From<AuthResponse> for Session {
    fn from(response: AuthResponse) -> Self {
        Session::new(response.access_token, response.user)
    }
}

/// Build a session from the OAuth redirect URL (`?token=...&user=<json>`).
pub fn session_from_oauth_callback(callback_url: &str) -> Result<Session> {
    let url = Url::parse(callback_url)
        .with_context(|| format!("Invalid callback URL: {}", callback_url))?;

    let mut token = None;
    let mut user = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "token" | "accessToken" => token = Some(value.into_owned()),
            "user" => user = Some(value.into_owned()),
            _ => {}
        }
    }

    let token = token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Callback URL has no token parameter"))?;

    let user = match user {
        Some(raw) => serde_json::from_str::<User>(&raw).context("Failed to parse user in callback URL")?,
        None => {
            warn!("OAuth callback carried no user record");
            User::default()
        }
    };

    Ok(Session::new(token, user))
}

/// File-backed session storage
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when nobody is signed in; an unreadable file is an error.
    pub async fn load(&self) -> Result<Option<Session>> {
        if !FsOps::file_exists(&self.path).await {
            return Ok(None);
        }

        let content = FsOps::read_file_safe(&self.path).await?;
        let session: Session = serde_json::from_str(&content)
            .with_context(|| format!("Corrupt session file: {}", self.path.display()))?;
        Ok(Some(session))
    }

    pub async fn save(&self, session: &Session) -> Result<()> {
        let content =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;
        FsOps::write_file_safe(&self.path, &content).await?;
        info!("Session saved for {}", session.user.email);
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        FsOps::remove_file(&self.path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn jwt(claims: serde_json::Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"server-secret"),
        )
        .unwrap()
    }

    #[test]
    fn test_bearer_header() {
        let session = Session::new("abc".to_string(), User::default());
        assert_eq!(session.bearer_header(), "Bearer abc");
    }

    #[test]
    fn test_expiry_read_from_token() {
        let now = Utc::now();
        let past = jwt(json!({ "sub": "u1", "exp": (now - Duration::hours(1)).timestamp() }));
        let future = jwt(json!({ "sub": "u1", "exp": (now + Duration::hours(1)).timestamp() }));

        assert!(Session::new(past, User::default()).is_expired(now));
        assert!(!Session::new(future, User::default()).is_expired(now));
    }

    #[test]
    fn test_opaque_token_never_expires() {
        let session = Session::new("not-a-jwt".to_string(), User::default());
        assert!(session.claims().is_none());
        assert!(!session.is_expired(Utc::now()));
    }

    #[test]
    fn test_role_prefers_token_claim() {
        let token = jwt(json!({ "id": "u1", "role": "employer" }));
        let session = Session::new(token, User::default());
        assert_eq!(session.role(), Role::Employer);

        let session = Session::new("opaque".to_string(), User::default());
        assert_eq!(session.role(), Role::Jobseeker);
    }

    #[test]
    fn test_oauth_callback_parses_token_and_user() {
        let url = "http://localhost:3000/auth/callback?token=tok123&user=%7B%22email%22%3A%22a%40b.io%22%2C%22role%22%3A%22employer%22%7D";
        let session = session_from_oauth_callback(url).unwrap();
        assert_eq!(session.access_token, "tok123");
        assert_eq!(session.user.email, "a@b.io");
        assert_eq!(session.user.role, Role::Employer);
    }

    #[test]
    fn test_oauth_callback_without_token_fails() {
        assert!(session_from_oauth_callback("http://localhost/cb?user=%7B%7D").is_err());
        assert!(session_from_oauth_callback("not a url").is_err());
    }

    #[tokio::test]
    async fn test_store_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));

        assert!(store.load().await.unwrap().is_none());

        let session = Session::new(
            "tok".to_string(),
            User {
                email: "a@b.io".to_string(),
                ..Default::default()
            },
        );
        store.save(&session).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(session));

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
        // Clearing twice is fine
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_store_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();
        assert!(SessionStore::new(path).load().await.is_err());
    }
}
