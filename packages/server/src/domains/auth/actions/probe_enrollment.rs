//! Probe enrollment action

use tracing::debug;

use crate::domains::auth::errors::AuthError;
use crate::domains::auth::types::ProbeResult;
use crate::kernel::ServerDeps;

/// Enrollment numbers are institution-assigned, fixed length 9.
pub const ENROLLMENT_NUMBER_LENGTH: usize = 9;

/// Probe an enrollment number to learn which flow the client should take.
///
/// Returns `Login` with the verified email when the account already has one,
/// `Signup` otherwise. Read-only; no side effects.
pub async fn probe_enrollment(
    enrollment_number: &str,
    deps: &ServerDeps,
) -> Result<ProbeResult, AuthError> {
    if enrollment_number.len() != ENROLLMENT_NUMBER_LENGTH {
        return Err(AuthError::Validation(
            "Enrollment number should be of 9 characters".to_string(),
        ));
    }
    if enrollment_number.is_empty() {
        return Err(AuthError::Validation(
            "Enrollment number is required".to_string(),
        ));
    }

    let student = deps
        .directory
        .find_by_enrollment_number(enrollment_number)
        .await?;

    let Some(student) = student else {
        return Err(AuthError::NotFound("Student not found".to_string()));
    };

    match student.cis_id {
        Some(email) => {
            debug!(enrollment_number = %enrollment_number, "Account verified, login flow");
            Ok(ProbeResult::Login { email })
        }
        None => {
            debug!(enrollment_number = %enrollment_number, "Account unverified, signup flow");
            Ok(ProbeResult::Signup)
        }
    }
}
