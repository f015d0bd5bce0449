//! Submission validation.
//!
//! Validation is an ordered list of independent checks. Each one inspects
//! the sanitized submission and either passes or names the reason it
//! failed; [`validate`] stops at the first failure.

use crate::payload::SanitizedSubmission;

/// Why a submission was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// A required field was empty after sanitization.
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    /// The email address is not `local@domain.tld`-shaped.
    #[error("Invalid email address")]
    InvalidEmail,
}

/// A single validation step.
pub type Check = fn(&SanitizedSubmission) -> Result<(), Rejection>;

/// Checks in evaluation order.
pub const CHECKS: &[Check] = &[
    require_name,
    require_email,
    require_inquiry_type,
    require_message,
    email_shape,
];

/// Run every check in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the [`Rejection`] from the first failing check.
pub fn validate(submission: &SanitizedSubmission) -> Result<(), Rejection> {
    CHECKS.iter().try_for_each(|check| check(submission))
}

fn require(value: &str, field: &'static str) -> Result<(), Rejection> {
    if value.is_empty() {
        Err(Rejection::MissingField { field })
    } else {
        Ok(())
    }
}

fn require_name(s: &SanitizedSubmission) -> Result<(), Rejection> {
    require(&s.name, "name")
}

fn require_email(s: &SanitizedSubmission) -> Result<(), Rejection> {
    require(&s.email, "email")
}

fn require_inquiry_type(s: &SanitizedSubmission) -> Result<(), Rejection> {
    require(&s.inquiry_type, "inquiryType")
}

fn require_message(s: &SanitizedSubmission) -> Result<(), Rejection> {
    require(&s.message, "message")
}

fn email_shape(s: &SanitizedSubmission) -> Result<(), Rejection> {
    if is_valid_email(&s.email) {
        Ok(())
    } else {
        Err(Rejection::InvalidEmail)
    }
}

/// Basic `local@domain.tld` shape check.
///
/// - exactly one `@`, with a non-empty local part
/// - no whitespace anywhere
/// - the domain contains a `.` with non-empty text on both sides of the last one
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SanitizedSubmission {
        SanitizedSubmission {
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            inquiry_type: "General".to_owned(),
            message: "Hi".to_owned(),
            ..SanitizedSubmission::default()
        }
    }

    #[test]
    fn complete_submission_passes() {
        assert_eq!(validate(&valid()), Ok(()));
    }

    #[test]
    fn first_missing_field_is_reported() {
        let sub = SanitizedSubmission {
            name: String::new(),
            message: String::new(),
            ..valid()
        };
        assert_eq!(
            validate(&sub),
            Err(Rejection::MissingField { field: "name" })
        );
    }

    #[test]
    fn missing_fields_win_over_email_shape() {
        let sub = SanitizedSubmission {
            email: "nope".to_owned(),
            message: String::new(),
            ..valid()
        };
        assert_eq!(
            validate(&sub),
            Err(Rejection::MissingField { field: "message" })
        );
    }

    #[test]
    fn bad_email_is_rejected() {
        let sub = SanitizedSubmission {
            email: "not-an-email".to_owned(),
            ..valid()
        };
        assert_eq!(validate(&sub), Err(Rejection::InvalidEmail));
    }

    #[test]
    fn email_shapes() {
        for ok in ["john@example.com", "a.b+tag@sub.example.co.uk", "x@y.z"] {
            assert!(is_valid_email(ok), "{ok} should pass");
        }
        for bad in [
            "not-an-email",
            "@example.com",
            "john@",
            "john@example",
            "john@example.",
            "john@.com",
            "jo hn@example.com",
            "a@b@c.com",
            "",
        ] {
            assert!(!is_valid_email(bad), "{bad} should fail");
        }
    }

    #[test]
    fn rejection_messages_are_user_facing() {
        assert_eq!(
            Rejection::MissingField { field: "email" }.to_string(),
            "Missing required field: email"
        );
        assert_eq!(Rejection::InvalidEmail.to_string(), "Invalid email address");
    }
}
