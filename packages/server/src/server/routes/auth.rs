//! Authentication routes
//!
//! Thin HTTP wrappers over the auth domain actions: deserialize the input,
//! run the action, wrap the outcome in the success envelope. All error
//! mapping lives on `AuthError`.

use axum::extract::{Extension, Query};
use axum::Json;
use serde::Serialize;

use crate::common::ApiSuccess;
use crate::domains::auth::actions::{
    complete_signup, confirm_verification, login, probe_enrollment, send_verification_link,
};
use crate::domains::auth::errors::AuthError;
use crate::domains::auth::types::{
    CompleteSignupInput, LoginInput, ProbeEnrollmentInput, ProbeResult,
    SendVerificationLinkInput, StudentProfile, VerifyEmailParams,
};
use crate::server::app::AppState;
use crate::server::middleware::AuthStudent;

#[derive(Serialize)]
pub struct MessageResponse {
    message: &'static str,
}

#[derive(Serialize)]
pub struct SessionResponse {
    message: &'static str,
    token: String,
    student: StudentProfile,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    student: StudentProfile,
}

/// POST /auth/student - probe an enrollment number for signup/login branching
pub async fn probe_enrollment_handler(
    Extension(state): Extension<AppState>,
    Json(input): Json<ProbeEnrollmentInput>,
) -> Result<ApiSuccess<ProbeResult>, AuthError> {
    let result = probe_enrollment(&input.enrollment_number, &state.deps).await?;
    Ok(ApiSuccess(result))
}

/// POST /auth/student/sendVerificationMail - email a verification link
pub async fn send_verification_mail_handler(
    Extension(state): Extension<AppState>,
    Json(input): Json<SendVerificationLinkInput>,
) -> Result<ApiSuccess<MessageResponse>, AuthError> {
    send_verification_link(&input.enrollment_number, &input.email, &state.deps).await?;
    Ok(ApiSuccess(MessageResponse {
        message: "Email sent",
    }))
}

/// GET /auth/studentEmailVerify/ - target of the emailed link
pub async fn verify_email_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<VerifyEmailParams>,
) -> Result<ApiSuccess<MessageResponse>, AuthError> {
    confirm_verification(&params.eno, &params.email, &params.token, &state.deps).await?;
    Ok(ApiSuccess(MessageResponse {
        message: "Email verified",
    }))
}

/// POST /auth/student/signup - set a password on a verified account
pub async fn signup_handler(
    Extension(state): Extension<AppState>,
    Json(input): Json<CompleteSignupInput>,
) -> Result<ApiSuccess<SessionResponse>, AuthError> {
    let authenticated =
        complete_signup(&input.enrollment_number, &input.email, &input.password, &state.deps)
            .await?;
    Ok(ApiSuccess(SessionResponse {
        message: "Student signup successful",
        token: authenticated.token,
        student: authenticated.student,
    }))
}

/// POST /auth/student/login - authenticate a registered student
pub async fn login_handler(
    Extension(state): Extension<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<ApiSuccess<SessionResponse>, AuthError> {
    let authenticated = login(&input.email, &input.password, &state.deps).await?;
    Ok(ApiSuccess(SessionResponse {
        message: "Student login successful",
        token: authenticated.token,
        student: authenticated.student,
    }))
}

/// GET /auth/profile - public profile for the authenticated student
pub async fn profile_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthStudent>>,
) -> Result<ApiSuccess<ProfileResponse>, AuthError> {
    let Some(Extension(auth)) = auth else {
        return Err(AuthError::Unauthorized("Unauthorized".to_string()));
    };

    let student = state
        .deps
        .directory
        .find_by_enrollment_number(&auth.enrollment_number)
        .await?;

    let Some(student) = student else {
        return Err(AuthError::NotFound("Student not found".to_string()));
    };

    Ok(ApiSuccess(ProfileResponse {
        student: student.into(),
    }))
}
