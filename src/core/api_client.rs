// src/core/api_client.rs
//! HTTP client for the job-board REST API.
//!
//! One request per call: no retry, no cancellation, no de-duplication.
//! Authenticated endpoints need a [`Session`]; the bearer header is taken
//! from it on every request.

use anyhow::{Context, Result};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, trace};

use super::api_error::ApiError;
use super::config_manager::ApiConfig;
use crate::auth::Session;
use crate::types::{
    Application, ApplicationUpdate, ApplyRequest, AuthResponse, Job, JobList, JobQuery,
    LoginRequest, Payload, RegisterRequest,
};
use crate::utils::{content_type_for, validate_file_extension};

const LOGIN_ENDPOINT: &str = "/auth/login";
const REGISTER_ENDPOINT: &str = "/auth/register";
const JOBS_ENDPOINT: &str = "/jobs";
const APPLICATIONS_ENDPOINT: &str = "/applications";
const SAVED_JOBS_ENDPOINT: &str = "/saved-jobs";
const JOBSEEKER_PROFILE_ENDPOINT: &str = "/jobseeker/profile";
const RESUME_BUILDER_ENDPOINT: &str = "/resume";
const EMPLOYER_PROFILE_ENDPOINT: &str = "/employer/profile";

pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;
pub const UPLOAD_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

/// Documents a job seeker attaches to their profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Resume,
    CoverLetter,
}

impl DocumentKind {
    pub fn endpoint(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "/jobseeker/resume",
            DocumentKind::CoverLetter => "/jobseeker/cover-letter",
        }
    }

    /// Multipart field name the backend expects
    pub fn field_name(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume",
            DocumentKind::CoverLetter => "coverLetter",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume",
            DocumentKind::CoverLetter => "cover letter",
        }
    }
}

/// Result of `POST /resume/:id/generate-pdf`
#[derive(Debug, Clone, PartialEq)]
pub enum PdfOutput {
    File(Vec<u8>),
    Link(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PdfLink {
    #[serde(alias = "url", alias = "fileUrl")]
    pdf_url: String,
}

pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    session: Option<Session>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session: None,
        })
    }

    pub fn with_session(mut self, session: Option<Session>) -> Self {
        self.session = session;
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Full URL for an API path such as `/jobs/42`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    // ===== Auth =====

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        info!("Signing in as {}", request.email);
        let builder = self.client.post(self.endpoint(LOGIN_ENDPOINT)).json(request);
        self.fetch(builder, "account").await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        info!("Registering {} as {}", request.email, request.role);
        let builder = self
            .client
            .post(self.endpoint(REGISTER_ENDPOINT))
            .json(request);
        self.fetch(builder, "account").await
    }

    // ===== Jobs =====

    pub async fn list_jobs(&self, query: &JobQuery) -> Result<JobList, ApiError> {
        let builder = self.client.get(self.endpoint(JOBS_ENDPOINT)).query(query);
        self.fetch(self.maybe_authorized(builder), "jobs").await
    }

    pub async fn get_job(&self, job_id: &str) -> Result<Job, ApiError> {
        let builder = self
            .client
            .get(self.endpoint(&format!("{}/{}", JOBS_ENDPOINT, job_id)));
        self.fetch(self.maybe_authorized(builder), &format!("job {}", job_id))
            .await
    }

    pub async fn create_job(&self, job: &Value) -> Result<Job, ApiError> {
        let builder = self.client.post(self.endpoint(JOBS_ENDPOINT)).json(job);
        self.fetch(self.authorized(builder)?, "job").await
    }

    pub async fn update_job(&self, job_id: &str, changes: &Value) -> Result<Job, ApiError> {
        let builder = self
            .client
            .patch(self.endpoint(&format!("{}/{}", JOBS_ENDPOINT, job_id)))
            .json(changes);
        self.fetch(self.authorized(builder)?, &format!("job {}", job_id))
            .await
    }

    pub async fn apply_to_job(
        &self,
        job_id: &str,
        request: &ApplyRequest,
    ) -> Result<Application, ApiError> {
        let builder = self
            .client
            .post(self.endpoint(&format!("{}/{}/apply", JOBS_ENDPOINT, job_id)))
            .json(request);
        self.fetch(self.authorized(builder)?, &format!("job {}", job_id))
            .await
    }

    /// Applications received for one of the employer's postings
    pub async fn job_applications(&self, job_id: &str) -> Result<Vec<Application>, ApiError> {
        let builder = self
            .client
            .get(self.endpoint(&format!("{}/{}/applications", JOBS_ENDPOINT, job_id)));
        self.fetch(self.authorized(builder)?, &format!("job {}", job_id))
            .await
    }

    // ===== Applications =====

    pub async fn my_applications(&self) -> Result<Vec<Application>, ApiError> {
        let builder = self.client.get(self.endpoint(APPLICATIONS_ENDPOINT));
        self.fetch(self.authorized(builder)?, "applications").await
    }

    pub async fn get_application(&self, application_id: &str) -> Result<Application, ApiError> {
        let builder = self.client.get(
            self.endpoint(&format!("{}/{}", APPLICATIONS_ENDPOINT, application_id)),
        );
        self.fetch(
            self.authorized(builder)?,
            &format!("application {}", application_id),
        )
        .await
    }

    pub async fn update_application(
        &self,
        application_id: &str,
        update: &ApplicationUpdate,
    ) -> Result<Application, ApiError> {
        let builder = self
            .client
            .patch(self.endpoint(&format!("{}/{}", APPLICATIONS_ENDPOINT, application_id)))
            .json(update);
        self.fetch(
            self.authorized(builder)?,
            &format!("application {}", application_id),
        )
        .await
    }

    // ===== Saved jobs =====

    pub async fn saved_jobs(&self) -> Result<Vec<Job>, ApiError> {
        let builder = self.client.get(self.endpoint(SAVED_JOBS_ENDPOINT));
        self.fetch(self.authorized(builder)?, "saved jobs").await
    }

    pub async fn save_job(&self, job_id: &str) -> Result<(), ApiError> {
        let builder = self
            .client
            .post(self.endpoint(&format!("{}/{}", SAVED_JOBS_ENDPOINT, job_id)));
        self.fetch_empty(self.authorized(builder)?, &format!("job {}", job_id))
            .await
    }

    pub async fn unsave_job(&self, job_id: &str) -> Result<(), ApiError> {
        let builder = self
            .client
            .delete(self.endpoint(&format!("{}/{}", SAVED_JOBS_ENDPOINT, job_id)));
        self.fetch_empty(self.authorized(builder)?, &format!("saved job {}", job_id))
            .await
    }

    // ===== Job seeker profile =====

    pub async fn get_profile(&self) -> Result<Value, ApiError> {
        let builder = self.client.get(self.endpoint(JOBSEEKER_PROFILE_ENDPOINT));
        self.fetch(self.authorized(builder)?, "profile").await
    }

    pub async fn update_profile(&self, profile: &Value) -> Result<Value, ApiError> {
        let builder = self
            .client
            .put(self.endpoint(JOBSEEKER_PROFILE_ENDPOINT))
            .json(profile);
        self.fetch(self.authorized(builder)?, "profile").await
    }

    pub async fn upload_document(&self, kind: DocumentKind, path: &Path) -> Result<Value, ApiError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ApiError::InvalidUpload(format!("No file name in {}", path.display())))?
            .to_string();
        validate_file_extension(&file_name, UPLOAD_EXTENSIONS)
            .map_err(|e| ApiError::InvalidUpload(e.to_string()))?;
        let content_type = content_type_for(&file_name)
            .map_err(|e| ApiError::InvalidUpload(e.to_string()))?;

        let content = tokio::fs::read(path).await.map_err(|source| ApiError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        check_upload_size(content.len() as u64)?;

        let part = Part::bytes(content)
            .file_name(file_name.clone())
            .mime_str(content_type)
            .map_err(|e| ApiError::InvalidUpload(e.to_string()))?;
        let form = Form::new().part(kind.field_name(), part);

        info!("Uploading {} {}", kind.label(), file_name);
        let builder = self.client.post(self.endpoint(kind.endpoint())).multipart(form);
        self.fetch(self.authorized(builder)?, kind.label()).await
    }

    pub async fn delete_document(&self, kind: DocumentKind) -> Result<(), ApiError> {
        let builder = self.client.delete(self.endpoint(kind.endpoint()));
        self.fetch_empty(self.authorized(builder)?, kind.label()).await
    }

    // ===== Resume builder =====

    pub async fn get_resume(&self, resume_id: &str) -> Result<Value, ApiError> {
        let builder = self
            .client
            .get(self.endpoint(&format!("{}/{}", RESUME_BUILDER_ENDPOINT, resume_id)));
        self.fetch(self.authorized(builder)?, &format!("resume {}", resume_id))
            .await
    }

    pub async fn update_resume(&self, resume_id: &str, resume: &Value) -> Result<Value, ApiError> {
        let builder = self
            .client
            .put(self.endpoint(&format!("{}/{}", RESUME_BUILDER_ENDPOINT, resume_id)))
            .json(resume);
        self.fetch(self.authorized(builder)?, &format!("resume {}", resume_id))
            .await
    }

    pub async fn delete_resume(&self, resume_id: &str) -> Result<(), ApiError> {
        let builder = self
            .client
            .delete(self.endpoint(&format!("{}/{}", RESUME_BUILDER_ENDPOINT, resume_id)));
        self.fetch_empty(self.authorized(builder)?, &format!("resume {}", resume_id))
            .await
    }

    pub async fn generate_pdf(&self, resume_id: &str) -> Result<PdfOutput, ApiError> {
        let builder = self.client.post(
            self.endpoint(&format!("{}/{}/generate-pdf", RESUME_BUILDER_ENDPOINT, resume_id)),
        );
        let response = self
            .execute(self.authorized(builder)?, &format!("resume {}", resume_id))
            .await?;

        let is_pdf = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("application/pdf"))
            .unwrap_or(false);
        let bytes = response.bytes().await?;

        if is_pdf {
            Ok(PdfOutput::File(bytes.to_vec()))
        } else {
            let link: PdfLink = decode_payload(&bytes)?;
            Ok(PdfOutput::Link(link.pdf_url))
        }
    }

    // ===== Employer profile =====

    pub async fn get_employer_profile(&self) -> Result<Value, ApiError> {
        let builder = self.client.get(self.endpoint(EMPLOYER_PROFILE_ENDPOINT));
        self.fetch(self.authorized(builder)?, "employer profile").await
    }

    pub async fn save_employer_profile(&self, profile: &Value) -> Result<Value, ApiError> {
        let builder = self
            .client
            .post(self.endpoint(EMPLOYER_PROFILE_ENDPOINT))
            .json(profile);
        self.fetch(self.authorized(builder)?, "employer profile").await
    }

    // ===== Plumbing =====

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let session = self.session.as_ref().ok_or(ApiError::Unauthenticated)?;
        Ok(builder.header(AUTHORIZATION, session.bearer_header()))
    }

    fn maybe_authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.session {
            Some(session) => builder.header(AUTHORIZATION, session.bearer_header()),
            None => builder,
        }
    }

    async fn execute(&self, builder: RequestBuilder, resource: &str) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(|e| {
            error!("Request for {} failed: {}", resource, e);
            ApiError::Network(e)
        })?;

        let status = response.status();
        trace!("{} {} -> {}", resource, response.url(), status);

        if status.is_success() {
            Ok(response)
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("API error response for {}: {} {}", resource, status, body);
            Err(ApiError::from_status(status, &body, resource))
        }
    }

    async fn fetch<R>(&self, builder: RequestBuilder, resource: &str) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let response = self.execute(builder, resource).await?;
        let bytes = response.bytes().await?;
        decode_payload(&bytes)
    }

    async fn fetch_empty(&self, builder: RequestBuilder, resource: &str) -> Result<(), ApiError> {
        self.execute(builder, resource).await.map(|_| ())
    }
}

/// Decode a 2xx body, accepting both the `{ data }` envelope and the bare resource
pub fn decode_payload<R: DeserializeOwned>(bytes: &[u8]) -> Result<R, ApiError> {
    let payload: Payload<R> = serde_json::from_slice(bytes)?;
    if let Some(message) = payload.message() {
        debug!("API message: {}", message);
    }
    Ok(payload.into_inner())
}

fn check_upload_size(len: u64) -> Result<(), ApiError> {
    if len == 0 {
        return Err(ApiError::InvalidUpload("File is empty".to_string()));
    }
    if len > MAX_UPLOAD_BYTES {
        return Err(ApiError::InvalidUpload(format!(
            "File too large: {:.1}MB (max 5MB)",
            len as f64 / 1024.0 / 1024.0
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::User;
    use serde_json::json;

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: base_url.to_string(),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_api_prefix() {
        let api = client("http://localhost:5000/");
        assert_eq!(api.endpoint("/jobs/42/apply"), "http://localhost:5000/api/jobs/42/apply");
        assert_eq!(
            api.endpoint(DocumentKind::CoverLetter.endpoint()),
            "http://localhost:5000/api/jobseeker/cover-letter"
        );
    }

    #[tokio::test]
    async fn test_authenticated_call_without_session_fails_fast() {
        let api = client("http://127.0.0.1:9");
        let err = api.get_profile().await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated));
    }

    #[test]
    fn test_session_is_attached() {
        let api = client("http://localhost")
            .with_session(Some(Session::new("tok".to_string(), User::default())));
        let request = api
            .authorized(api.client.get(api.endpoint("/jobseeker/profile")))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer tok");
    }

    #[test]
    fn test_decode_payload_shapes() {
        let job: Job = decode_payload(br#"{"success":true,"job":{"_id":"j1","title":"Nurse"}}"#).unwrap();
        assert_eq!(job.id, "j1");

        let profile: Value = decode_payload(br#"{"bio":"hello"}"#).unwrap();
        assert_eq!(profile, json!({ "bio": "hello" }));

        let application: Application = decode_payload(
            br#"{"_id":"a1","job":{"_id":"j1","title":"ICU Nurse"},"status":"pending"}"#,
        )
        .unwrap();
        assert_eq!(application.id, "a1");
        assert_eq!(application.status, "pending");
        assert_eq!(application.job["title"], "ICU Nurse");

        let resume: Value =
            decode_payload(br#"{"_id":"r1","title":"My CV","profile":{"summary":"ICU nurse"}}"#)
                .unwrap();
        assert_eq!(resume["_id"], "r1");
        assert_eq!(resume["profile"], json!({ "summary": "ICU nurse" }));

        let wrapped: Application = decode_payload(
            br#"{"success":true,"application":{"_id":"a2","job":"j1","status":"hired"}}"#,
        )
        .unwrap();
        assert_eq!(wrapped.id, "a2");

        let err = decode_payload::<Job>(b"not json").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_upload_size_limits() {
        assert!(check_upload_size(1024).is_ok());
        assert!(matches!(check_upload_size(0), Err(ApiError::InvalidUpload(_))));
        assert!(matches!(
            check_upload_size(MAX_UPLOAD_BYTES + 1),
            Err(ApiError::InvalidUpload(_))
        ));
    }

    #[tokio::test]
    async fn test_upload_rejects_wrong_extension_before_sending() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        tokio::fs::write(&path, b"png").await.unwrap();

        let api = client("http://127.0.0.1:9")
            .with_session(Some(Session::new("tok".to_string(), User::default())));
        let err = api.upload_document(DocumentKind::Resume, &path).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidUpload(_)));
    }
}
