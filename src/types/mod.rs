// src/types/mod.rs
//! Wire types exchanged with the job-board REST API

pub mod application;
pub mod job;
pub mod response;
pub mod user;

pub use application::{Application, ApplicationStatus, ApplicationUpdate, ApplyRequest};
pub use job::{Job, JobList, JobQuery};
pub use response::{ErrorBody, Payload};
pub use user::{AuthResponse, LoginRequest, RegisterRequest, Role, User};
