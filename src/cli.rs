// src/cli.rs
//! Command-line screens. Each command loads what it needs from the API,
//! keeps it as local state and prints it: empty lists, not-found resources
//! and failures each get their own message.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::auth::{session_from_oauth_callback, Session, SessionStore};
use crate::core::export::{write_applications_csv, write_jobs_csv};
use crate::core::{ApiClient, ApiError, ConfigManager, DocumentKind, FsOps, PdfOutput};
use crate::editor::DraftEditor;
use crate::form::FormDocument;
use crate::types::{
    Application, ApplicationStatus, ApplicationUpdate, ApplyRequest, Job, JobList, JobQuery,
    LoginRequest, RegisterRequest, Role,
};
use crate::utils::{parse_cli_value, to_pretty_json, truncate};
use crate::validation::{validate_login, validate_registration, FieldError};

#[derive(Parser)]
#[command(name = "careermade")]
#[command(about = "Browse and manage healthcare jobs on CareerMade")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// API base URL (overrides config.yaml and CAREERMADE_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Where the session token is kept
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sign in with email and password
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Register(RegisterArgs),
    /// Finish a Google/LinkedIn sign-in from the redirect URL
    OauthCallback { url: String },
    /// Forget the stored session
    Logout,
    /// Show who is signed in
    Whoami,
    /// Browse, post and apply to jobs
    #[command(subcommand)]
    Jobs(JobsCommand),
    /// Track applications
    #[command(subcommand)]
    Applications(ApplicationsCommand),
    /// Edit the job seeker profile
    #[command(subcommand)]
    Profile(DraftCommand),
    /// Upload or remove the profile resume file
    #[command(subcommand)]
    Resume(DocumentCommand),
    /// Upload or remove the profile cover letter
    #[command(subcommand)]
    CoverLetter(DocumentCommand),
    /// Edit resumes in the resume builder
    #[command(subcommand)]
    Builder(BuilderCommand),
    /// Edit the employer profile
    #[command(subcommand)]
    Employer(DraftCommand),
}

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub confirm_password: String,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long, value_enum, default_value_t = Role::Jobseeker)]
    pub role: Role,
    #[arg(long)]
    pub organization: Option<String>,
}

impl From<RegisterArgs> for RegisterRequest {
    fn from(args: RegisterArgs) -> Self {
        RegisterRequest {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            password: args.password,
            confirm_password: args.confirm_password,
            phone: args.phone,
            role: args.role,
            organization_name: args.organization,
        }
    }
}

#[derive(Args, Default)]
pub struct JobFilters {
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub specialization: Option<String>,
    #[arg(long)]
    pub job_type: Option<String>,
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub limit: Option<u32>,
}

impl From<JobFilters> for JobQuery {
    fn from(filters: JobFilters) -> Self {
        JobQuery {
            search: filters.search,
            location: filters.location,
            specialization: filters.specialization,
            job_type: filters.job_type,
            page: filters.page,
            limit: filters.limit,
        }
    }
}

#[derive(Subcommand)]
pub enum JobsCommand {
    /// List jobs matching the filters
    List(JobFilters),
    /// Show one job
    Show { id: String },
    /// Post a job: --field title="ICU Nurse" --field location.city=Pune
    Create {
        #[arg(long = "field", value_parser = parse_assignment, required = true)]
        fields: Vec<(String, Value)>,
    },
    /// Change fields of a posted job
    Update {
        id: String,
        #[arg(long = "field", value_parser = parse_assignment, required = true)]
        fields: Vec<(String, Value)>,
    },
    /// Apply to a job
    Apply {
        id: String,
        #[arg(long)]
        cover_letter: Option<String>,
    },
    /// Bookmark a job
    Save { id: String },
    /// Remove a bookmark
    Unsave { id: String },
    /// List bookmarked jobs
    Saved,
    /// Applications received for a job (employers)
    Applications { id: String },
    /// Write the listing to a CSV file
    Export {
        #[command(flatten)]
        filters: JobFilters,
        #[arg(long, default_value = "jobs.csv")]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum ApplicationsCommand {
    /// List your applications
    List {
        /// Also write them to this CSV file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show one application
    Show { id: String },
    /// Move an application to a new status (employers)
    Status {
        id: String,
        #[arg(value_enum)]
        status: ApplicationStatus,
        #[arg(long)]
        notes: Option<String>,
    },
}

/// Path-based edits of a remote form document
#[derive(Subcommand, Clone)]
pub enum DraftCommand {
    /// Print the document, or one field of it
    Show { path: Option<String> },
    /// Set a field: `experience.totalYears 5`, `education.0.degree MBBS`
    Set { path: String, value: String },
    /// Remove a field
    Clear { path: String },
    /// Add or remove a value in a multi-select field
    Toggle { path: String, value: String },
}

#[derive(Subcommand)]
pub enum DocumentCommand {
    /// Upload a PDF, DOC or DOCX file (max 5MB)
    Upload { file: PathBuf },
    /// Remove the uploaded file
    Delete,
}

#[derive(Subcommand)]
pub enum BuilderCommand {
    /// Edit one resume
    Edit {
        id: String,
        #[command(subcommand)]
        command: DraftCommand,
    },
    /// Delete a resume
    Delete { id: String },
    /// Render a resume to PDF
    Pdf {
        id: String,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// `path=value` from `--field`
pub fn parse_assignment(raw: &str) -> Result<(String, Value), String> {
    let (path, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected path=value, got '{}'", raw))?;
    if path.trim().is_empty() {
        return Err(format!("empty path in '{}'", raw));
    }
    Ok((path.trim().to_string(), parse_cli_value(value)))
}

/// Which remote document a draft command edits
#[derive(Debug, Clone, Copy)]
enum DraftTarget<'a> {
    Profile,
    Employer,
    Resume(&'a str),
}

impl DraftTarget<'_> {
    fn label(&self) -> String {
        match self {
            DraftTarget::Profile => "profile".to_string(),
            DraftTarget::Employer => "employer profile".to_string(),
            DraftTarget::Resume(id) => format!("resume {}", id),
        }
    }

    async fn fetch(&self, api: &ApiClient) -> Result<Value, ApiError> {
        match self {
            DraftTarget::Profile => api.get_profile().await,
            DraftTarget::Employer => api.get_employer_profile().await,
            DraftTarget::Resume(id) => api.get_resume(id).await,
        }
    }

    async fn store(&self, api: &ApiClient, draft: Value) -> Result<Value, ApiError> {
        match self {
            DraftTarget::Profile => api.update_profile(&draft).await,
            DraftTarget::Employer => api.save_employer_profile(&draft).await,
            DraftTarget::Resume(id) => api.update_resume(id, &draft).await,
        }
    }
}

pub async fn handle_command(cli: Cli, mut config: ConfigManager) -> Result<()> {
    if let Some(api_url) = cli.api_url {
        config.api.base_url = api_url.trim_end_matches('/').to_string();
    }
    if let Some(session_file) = cli.session_file {
        config.session_file = session_file;
    }

    let store = SessionStore::new(config.session_file.clone());
    let session = active_session(&store).await?;
    let api = ApiClient::new(&config.api)?.with_session(session);

    match cli.command {
        Command::Login { email, password } => {
            validate_login(&email, &password).map_err(field_errors)?;
            let response = api.login(&LoginRequest { email, password }).await?;
            start_session(&store, response.into()).await?;
        }

        Command::Register(args) => {
            let request = RegisterRequest::from(args);
            validate_registration(&request).map_err(field_errors)?;
            let response = api.register(&request).await?;
            start_session(&store, response.into()).await?;
        }

        Command::OauthCallback { url } => {
            let session = session_from_oauth_callback(&url)?;
            start_session(&store, session).await?;
        }

        Command::Logout => {
            store.clear().await?;
            println!("✓ Signed out");
        }

        Command::Whoami => match api.session() {
            Some(session) => {
                println!("{} <{}>", session.user.display_name(), session.user.email);
                println!("  Role: {}", session.role());
                if let Some(expires) = session.expires_at() {
                    println!("  Token expires: {}", expires.format("%Y-%m-%d %H:%M UTC"));
                }
            }
            None => println!("Not signed in"),
        },

        Command::Jobs(command) => handle_jobs(&api, command).await?,
        Command::Applications(command) => handle_applications(&api, command).await?,
        Command::Profile(command) => handle_draft(&api, DraftTarget::Profile, command).await?,
        Command::Employer(command) => handle_draft(&api, DraftTarget::Employer, command).await?,
        Command::Resume(command) => handle_document(&api, DocumentKind::Resume, command).await?,
        Command::CoverLetter(command) => {
            handle_document(&api, DocumentKind::CoverLetter, command).await?
        }
        Command::Builder(command) => handle_builder(&api, command).await?,
    }

    Ok(())
}

/// Stored session, unless its token has already expired
async fn active_session(store: &SessionStore) -> Result<Option<Session>> {
    let session = match store.load().await {
        Ok(session) => session,
        Err(e) => {
            warn!("Ignoring unreadable session file: {:#}", e);
            None
        }
    };

    Ok(session.filter(|session| {
        let expired = session.is_expired(Utc::now());
        if expired {
            warn!("Stored session has expired, please log in again");
        }
        !expired
    }))
}

async fn start_session(store: &SessionStore, session: Session) -> Result<()> {
    store.save(&session).await?;
    println!(
        "✓ Signed in as {} ({})",
        session.user.display_name(),
        session.role()
    );
    Ok(())
}

fn field_errors(errors: Vec<FieldError>) -> anyhow::Error {
    let lines: Vec<String> = errors.iter().map(|e| format!("  • {}", e)).collect();
    anyhow::anyhow!("Please fix the following:\n{}", lines.join("\n"))
}

fn document_from_fields(fields: Vec<(String, Value)>) -> Value {
    let mut document = FormDocument::new();
    for (path, value) in fields {
        document.set(&path, value);
    }
    document.into_inner()
}

async fn handle_jobs(api: &ApiClient, command: JobsCommand) -> Result<()> {
    match command {
        JobsCommand::List(filters) => {
            info!("Loading jobs");
            let list = api.list_jobs(&filters.into()).await?;
            print_job_list(&list);
        }

        JobsCommand::Show { id } => match api.get_job(&id).await {
            Ok(job) => print_job(&job),
            Err(e) if e.is_not_found() => println!("Job not found: {}", id),
            Err(e) => return Err(e.into()),
        },

        JobsCommand::Create { fields } => {
            let job = api.create_job(&document_from_fields(fields)).await?;
            println!("✓ Job posted: {} ({})", job.title, job.id);
        }

        JobsCommand::Update { id, fields } => {
            let job = api.update_job(&id, &document_from_fields(fields)).await?;
            println!("✓ Job updated: {} ({})", job.title, job.id);
        }

        JobsCommand::Apply { id, cover_letter } => {
            let application = api.apply_to_job(&id, &ApplyRequest { cover_letter }).await?;
            println!(
                "✓ Application submitted ({}), status: {}",
                application.id, application.status
            );
        }

        JobsCommand::Save { id } => {
            api.save_job(&id).await?;
            println!("✓ Job {} saved", id);
        }

        JobsCommand::Unsave { id } => {
            api.unsave_job(&id).await?;
            println!("✓ Job {} removed from saved jobs", id);
        }

        JobsCommand::Saved => {
            let jobs = api.saved_jobs().await?;
            print_job_list(&JobList {
                total: Some(jobs.len() as u64),
                jobs,
                ..Default::default()
            });
        }

        JobsCommand::Applications { id } => {
            let applications = api.job_applications(&id).await?;
            print_applications(&applications);
        }

        JobsCommand::Export { filters, output } => {
            let list = api.list_jobs(&filters.into()).await?;
            let file = std::fs::File::create(&output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            let count = write_jobs_csv(&list.jobs, file)?;
            println!("✓ Exported {} jobs to {}", count, output.display());
        }
    }
    Ok(())
}

async fn handle_applications(api: &ApiClient, command: ApplicationsCommand) -> Result<()> {
    match command {
        ApplicationsCommand::List { output } => {
            let applications = api.my_applications().await?;
            print_applications(&applications);
            if let Some(output) = output {
                let file = std::fs::File::create(&output)
                    .with_context(|| format!("Failed to create {}", output.display()))?;
                let count = write_applications_csv(&applications, file)?;
                println!("✓ Exported {} applications to {}", count, output.display());
            }
        }

        ApplicationsCommand::Show { id } => match api.get_application(&id).await {
            Ok(application) => println!("{}", to_pretty_json(&application)),
            Err(e) if e.is_not_found() => println!("Application not found: {}", id),
            Err(e) => return Err(e.into()),
        },

        ApplicationsCommand::Status { id, status, notes } => {
            let update = ApplicationUpdate {
                status: Some(status),
                notes,
            };
            let application = api.update_application(&id, &update).await?;
            println!("✓ Application {} is now {}", application.id, application.status);
        }
    }
    Ok(())
}

async fn handle_document(api: &ApiClient, kind: DocumentKind, command: DocumentCommand) -> Result<()> {
    match command {
        DocumentCommand::Upload { file } => {
            api.upload_document(kind, &file).await?;
            println!("✓ Uploaded {} {}", kind.label(), file.display());
        }
        DocumentCommand::Delete => {
            api.delete_document(kind).await?;
            println!("✓ Removed {}", kind.label());
        }
    }
    Ok(())
}

async fn handle_builder(api: &ApiClient, command: BuilderCommand) -> Result<()> {
    match command {
        BuilderCommand::Edit { id, command } => {
            handle_draft(api, DraftTarget::Resume(&id), command).await?
        }

        BuilderCommand::Delete { id } => {
            api.delete_resume(&id).await?;
            println!("✓ Resume {} deleted", id);
        }

        BuilderCommand::Pdf { id, output } => match api.generate_pdf(&id).await? {
            PdfOutput::File(bytes) => {
                let output = output.unwrap_or_else(|| PathBuf::from(format!("resume_{}.pdf", id)));
                FsOps::write_bytes(&output, &bytes).await?;
                println!("✓ PDF written to {}", output.display());
            }
            PdfOutput::Link(url) => println!("✓ PDF ready: {}", url),
        },
    }
    Ok(())
}

async fn handle_draft(api: &ApiClient, target: DraftTarget<'_>, command: DraftCommand) -> Result<()> {
    let label = target.label();
    let fetched = match target.fetch(api).await {
        // Only a missing document starts a fresh draft; anything else would
        // overwrite the stored one with an empty object on save
        Err(e) if !e.is_not_found() => return Err(e.into()),
        other => other,
    };
    let mut editor = DraftEditor::from_fetch(&label, fetched);

    match command {
        DraftCommand::Show { path } => {
            let document = editor.document();
            match path {
                Some(path) => match document.get(&path) {
                    Some(value) => println!("{}", to_pretty_json(value)),
                    None => println!("{} has no field {}", label, path),
                },
                None => println!("{}", to_pretty_json(document)),
            }
            return Ok(());
        }
        DraftCommand::Set { path, value } => editor.set(&path, parse_cli_value(&value)),
        DraftCommand::Clear { path } => editor.clear(&path),
        DraftCommand::Toggle { path, value } => editor.toggle(&path, parse_cli_value(&value)),
    }

    editor
        .save_with(|draft| async move { target.store(api, draft).await })
        .await?;
    println!("✓ {} saved", label);
    Ok(())
}

fn print_job_list(list: &JobList) {
    if list.jobs.is_empty() {
        println!("No jobs found.");
        return;
    }

    println!(
        "{:<26} {:<32} {:<20} {:<12} {:<20}",
        "ID", "Title", "Specialization", "Type", "Location"
    );
    println!("{}", "-".repeat(112));
    for job in &list.jobs {
        println!(
            "{:<26} {:<32} {:<20} {:<12} {:<20}",
            job.id,
            truncate(&job.title, 32),
            truncate(job.specialization.as_deref().unwrap_or("-"), 20),
            job.job_type.as_deref().unwrap_or("-"),
            truncate(&job.location_label(), 20)
        );
    }

    match (list.total, list.page, list.pages) {
        (Some(total), Some(page), Some(pages)) => {
            println!("\n{} jobs, page {} of {}", total, page, pages)
        }
        (Some(total), _, _) => println!("\n{} jobs", total),
        _ => {}
    }
}

fn print_job(job: &Job) {
    println!("{}", job.title);
    println!("  ID: {}", job.id);
    if let Some(specialization) = &job.specialization {
        println!("  Specialization: {}", specialization);
    }
    if let Some(job_type) = &job.job_type {
        println!("  Type: {}", job_type);
    }
    let location = job.location_label();
    if !location.is_empty() {
        println!("  Location: {}", location);
    }
    if let Some(status) = &job.status {
        println!("  Status: {}", status);
    }
    if let Some(description) = &job.description {
        println!("\n{}", description);
    }
}

fn print_applications(applications: &[Application]) {
    if applications.is_empty() {
        println!("No applications yet.");
        return;
    }

    println!("{:<26} {:<36} {:<12} {:<20}", "ID", "Job", "Status", "Applied");
    println!("{}", "-".repeat(96));
    for application in applications {
        println!(
            "{:<26} {:<36} {:<12} {:<20}",
            application.id,
            truncate(&application.job_title(), 36),
            application.status,
            application.applied_at.as_deref().unwrap_or("-")
        );
    }
}
