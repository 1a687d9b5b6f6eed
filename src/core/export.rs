// src/core/export.rs
//! CSV export of job and application listings

use anyhow::{Context, Result};
use std::io::Write;

use crate::types::{Application, Job};

pub fn write_jobs_csv<W: Write>(jobs: &[Job], writer: W) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["id", "title", "specialization", "jobType", "location", "status"])
        .context("Failed to write CSV header")?;

    for job in jobs {
        csv.write_record([
            job.id.as_str(),
            job.title.as_str(),
            job.specialization.as_deref().unwrap_or(""),
            job.job_type.as_deref().unwrap_or(""),
            job.location_label().as_str(),
            job.status.as_deref().unwrap_or(""),
        ])
        .with_context(|| format!("Failed to write job {}", job.id))?;
    }

    csv.flush().context("Failed to flush CSV output")?;
    Ok(jobs.len())
}

pub fn write_applications_csv<W: Write>(applications: &[Application], writer: W) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["id", "job", "status", "appliedAt"])
        .context("Failed to write CSV header")?;

    for application in applications {
        csv.write_record([
            application.id.as_str(),
            application.job_title().as_str(),
            application.status.as_str(),
            application.applied_at.as_deref().unwrap_or(""),
        ])
        .with_context(|| format!("Failed to write application {}", application.id))?;
    }

    csv.flush().context("Failed to flush CSV output")?;
    Ok(applications.len())
}
