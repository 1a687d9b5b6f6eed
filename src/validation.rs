// src/validation.rs
//! Registration and login checks run before anything is sent to the backend.
//! They mirror the server's rules so the user sees every problem at once.

use std::fmt;

use crate::types::{RegisterRequest, Role};

const MAX_NAME_CHARS: usize = 50;
const MIN_PASSWORD_CHARS: usize = 8;
const MIN_PHONE_DIGITS: usize = 10;
const MAX_PHONE_DIGITS: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorType {
    Required,
    TooLong,
    InvalidEmail,
    WeakPassword,
    PasswordMismatch,
    InvalidPhone,
    OrganizationRequired,
}

impl FieldErrorType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Required => "FIELD_REQUIRED",
            Self::TooLong => "FIELD_TOO_LONG",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::WeakPassword => "WEAK_PASSWORD",
            Self::PasswordMismatch => "PASSWORD_MISMATCH",
            Self::InvalidPhone => "INVALID_PHONE",
            Self::OrganizationRequired => "ORGANIZATION_REQUIRED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub error_type: FieldErrorType,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, error_type: FieldErrorType, message: impl Into<String>) -> Self {
        Self {
            field,
            error_type,
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        self.error_type.code()
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a registration form, collecting every violation
pub fn validate_registration(request: &RegisterRequest) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    check_name("firstName", "First name", &request.first_name, &mut errors);
    check_name("lastName", "Last name", &request.last_name, &mut errors);
    check_email(&request.email, &mut errors);
    check_password(&request.password, &mut errors);

    if request.confirm_password != request.password {
        errors.push(FieldError::new(
            "confirmPassword",
            FieldErrorType::PasswordMismatch,
            "Passwords do not match",
        ));
    }

    if let Some(phone) = request.phone.as_deref().filter(|p| !p.trim().is_empty()) {
        if !is_valid_phone(phone) {
            errors.push(FieldError::new(
                "phone",
                FieldErrorType::InvalidPhone,
                format!(
                    "Phone number must have {}-{} digits",
                    MIN_PHONE_DIGITS, MAX_PHONE_DIGITS
                ),
            ));
        }
    }

    if request.role == Role::Employer
        && request
            .organization_name
            .as_deref()
            .map_or(true, |name| name.trim().is_empty())
    {
        errors.push(FieldError::new(
            "organizationName",
            FieldErrorType::OrganizationRequired,
            "Employers must provide an organization name",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_login(email: &str, password: &str) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    check_email(email, &mut errors);
    if password.is_empty() {
        errors.push(FieldError::new(
            "password",
            FieldErrorType::Required,
            "Password is required",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_name(field: &'static str, label: &str, value: &str, errors: &mut Vec<FieldError>) {
    let value = value.trim();
    if value.is_empty() {
        errors.push(FieldError::new(
            field,
            FieldErrorType::Required,
            format!("{} is required", label),
        ));
    } else if value.chars().count() > MAX_NAME_CHARS {
        errors.push(FieldError::new(
            field,
            FieldErrorType::TooLong,
            format!("{} must be at most {} characters", label, MAX_NAME_CHARS),
        ));
    }
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if email.trim().is_empty() {
        errors.push(FieldError::new(
            "email",
            FieldErrorType::Required,
            "Email is required",
        ));
    } else if !is_valid_email(email.trim()) {
        errors.push(FieldError::new(
            "email",
            FieldErrorType::InvalidEmail,
            "Please enter a valid email address",
        ));
    }
}

fn check_password(password: &str, errors: &mut Vec<FieldError>) {
    if password.is_empty() {
        errors.push(FieldError::new(
            "password",
            FieldErrorType::Required,
            "Password is required",
        ));
        return;
    }

    let long_enough = password.chars().count() >= MIN_PASSWORD_CHARS;
    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(long_enough && has_letter && has_digit) {
        errors.push(FieldError::new(
            "password",
            FieldErrorType::WeakPassword,
            format!(
                "Password must be at least {} characters and contain a letter and a number",
                MIN_PASSWORD_CHARS
            ),
        ));
    }
}

/// `local@domain.tld`: one `@`, no whitespace, a dot inside the domain
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

pub fn is_valid_phone(phone: &str) -> bool {
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'));
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    allowed && (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> RegisterRequest {
        RegisterRequest {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: "asha.rao@hospital.org".to_string(),
            password: "stetho5cope".to_string(),
            confirm_password: "stetho5cope".to_string(),
            phone: Some("+91 98765-43210".to_string()),
            role: Role::Jobseeker,
            organization_name: None,
        }
    }

    fn codes(errors: &[FieldError]) -> Vec<&'static str> {
        errors.iter().map(FieldError::code).collect()
    }

    #[test]
    fn test_valid_registration_passes() {
        assert!(validate_registration(&valid_request()).is_ok());
    }

    #[test]
    fn test_all_violations_are_reported() {
        let request = RegisterRequest {
            first_name: "  ".to_string(),
            last_name: "x".repeat(51),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            confirm_password: "other".to_string(),
            phone: Some("12345".to_string()),
            role: Role::Employer,
            organization_name: Some(" ".to_string()),
        };
        let errors = validate_registration(&request).unwrap_err();
        assert_eq!(
            codes(&errors),
            vec![
                "FIELD_REQUIRED",
                "FIELD_TOO_LONG",
                "INVALID_EMAIL",
                "WEAK_PASSWORD",
                "PASSWORD_MISMATCH",
                "INVALID_PHONE",
                "ORGANIZATION_REQUIRED",
            ]
        );
        assert_eq!(errors[0].to_string(), "firstName: First name is required");
    }

    #[test]
    fn test_employer_with_organization_passes() {
        let request = RegisterRequest {
            role: Role::Employer,
            organization_name: Some("City Hospital".to_string()),
            ..valid_request()
        };
        assert!(validate_registration(&request).is_ok());
    }

    #[test]
    fn test_blank_phone_is_optional() {
        let request = RegisterRequest {
            phone: Some("   ".to_string()),
            ..valid_request()
        };
        assert!(validate_registration(&request).is_ok());
    }

    #[test]
    fn test_password_needs_letter_and_digit() {
        for password in ["12345678", "abcdefgh"] {
            let request = RegisterRequest {
                password: password.to_string(),
                confirm_password: password.to_string(),
                ..valid_request()
            };
            let errors = validate_registration(&request).unwrap_err();
            assert_eq!(codes(&errors), vec!["WEAK_PASSWORD"]);
        }
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.io"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.io"));
        assert!(!is_valid_email("a@@b.io"));
        assert!(!is_valid_email("a@.b.io"));
        assert!(!is_valid_email("a@b.io."));
        assert!(!is_valid_email("a b@c.io"));
    }

    #[test]
    fn test_login_checks() {
        assert!(validate_login("a@b.io", "x").is_ok());
        let errors = validate_login("", "").unwrap_err();
        assert_eq!(codes(&errors), vec!["FIELD_REQUIRED", "FIELD_REQUIRED"]);
    }
}
