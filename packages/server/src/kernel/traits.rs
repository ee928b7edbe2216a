// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like "complete signup") lives in domain actions that use
// these traits.
//
// Naming convention: Base* for trait names (e.g., BaseStudentDirectory)

use anyhow::Result;
use async_trait::async_trait;

use crate::domains::auth::models::Student;

// =============================================================================
// Student Directory Trait (Infrastructure - identity record storage)
// =============================================================================

/// Read/write access to student identity records.
///
/// The two writes are conditional: they re-check their precondition inside
/// the write itself and return `None` when it no longer holds, so concurrent
/// callers cannot both pass a check-then-write sequence.
#[async_trait]
pub trait BaseStudentDirectory: Send + Sync {
    /// Look up a student by enrollment number
    async fn find_by_enrollment_number(&self, enrollment_number: &str)
        -> Result<Option<Student>>;

    /// Look up a student by verified email
    async fn find_by_email(&self, email: &str) -> Result<Option<Student>>;

    /// Set the verified email. Succeeds only while `cis_id` is unset or
    /// already equals `email`; returns `None` otherwise.
    async fn set_email_verified(
        &self,
        enrollment_number: &str,
        email: &str,
    ) -> Result<Option<Student>>;

    /// Set the credential hash. Succeeds only while the email is verified
    /// and no credential exists yet; returns `None` otherwise.
    async fn set_credential(
        &self,
        enrollment_number: &str,
        password_hash: &str,
    ) -> Result<Option<Student>>;
}

// =============================================================================
// Mail Dispatcher Trait (Infrastructure - verification email delivery)
// =============================================================================

#[async_trait]
pub trait BaseMailDispatcher: Send + Sync {
    /// Send a verification link to an address. Failure is reported to the
    /// caller; the core never retries.
    async fn send_verification(&self, to: &str, verification_url: &str) -> Result<()>;
}
