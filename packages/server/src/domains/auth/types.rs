//! Request and response types for the auth workflow
//!
//! Inputs are per-operation structs; absent fields deserialize to empty
//! strings and are rejected by the action's validation, so malformed
//! requests surface as `AuthError::Validation` rather than a framework
//! rejection.

use serde::{Deserialize, Serialize};

use crate::domains::auth::models::Student;

// =============================================================================
// Operation inputs
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ProbeEnrollmentInput {
    #[serde(default, rename = "enrollmentNumber")]
    pub enrollment_number: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendVerificationLinkInput {
    #[serde(default, rename = "enrollmentNumber")]
    pub enrollment_number: String,
    #[serde(default)]
    pub email: String,
}

/// Query parameters carried by the emailed verification link
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyEmailParams {
    #[serde(default)]
    pub eno: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompleteSignupInput {
    #[serde(default, rename = "enrollmentNumber")]
    pub enrollment_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

// =============================================================================
// Operation results
// =============================================================================

/// Outcome of probing an enrollment number: tells the client which flow to
/// take without guessing account state
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "message")]
pub enum ProbeResult {
    Login { email: String },
    Signup,
}

/// Public view of a student record; never carries the credential hash
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StudentProfile {
    #[serde(rename = "enrollmentNumber")]
    pub enrollment_number: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub credits: String,
    pub in_club_as_team: Option<String>,
    pub in_club_as_member: Option<String>,
}

impl From<Student> for StudentProfile {
    fn from(student: Student) -> Self {
        Self {
            enrollment_number: student.enrollment_number,
            email: student.cis_id.unwrap_or_default(),
            first_name: student.first_name,
            last_name: student.last_name,
            credits: student.credits,
            in_club_as_team: student.in_club_as_team,
            in_club_as_member: student.in_club_as_member,
        }
    }
}

/// A freshly authenticated student: session token plus public profile
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedStudent {
    pub token: String,
    pub student: StudentProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_result_login_shape() {
        let value = serde_json::to_value(ProbeResult::Login {
            email: "a@x.com".to_string(),
        })
        .unwrap();

        assert_eq!(value["message"], "Login");
        assert_eq!(value["email"], "a@x.com");
    }

    #[test]
    fn test_probe_result_signup_shape() {
        let value = serde_json::to_value(ProbeResult::Signup).unwrap();
        assert_eq!(value["message"], "Signup");
        assert!(value.get("email").is_none());
    }

    #[test]
    fn test_input_fields_default_to_empty() {
        let input: CompleteSignupInput = serde_json::from_str("{}").unwrap();
        assert!(input.enrollment_number.is_empty());
        assert!(input.email.is_empty());
        assert!(input.password.is_empty());
    }

    #[test]
    fn test_input_uses_camel_case_enrollment_number() {
        let input: ProbeEnrollmentInput =
            serde_json::from_str(r#"{"enrollmentNumber": "123456789"}"#).unwrap();
        assert_eq!(input.enrollment_number, "123456789");
    }

    #[test]
    fn test_profile_never_exposes_password() {
        let student = Student {
            enrollment_number: "123456789".to_string(),
            cis_id: Some("a@x.com".to_string()),
            password: Some("$argon2id$secret".to_string()),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            credits: "10".to_string(),
            in_club_as_team: None,
            in_club_as_member: Some("robotics".to_string()),
        };

        let value = serde_json::to_value(StudentProfile::from(student)).unwrap();
        assert_eq!(value["enrollmentNumber"], "123456789");
        assert_eq!(value["email"], "a@x.com");
        assert!(value.get("password").is_none());
    }
}
