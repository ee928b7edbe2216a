//! Server dependencies for domain actions (using traits for testability)
//!
//! This module provides the central dependency container used by all domain
//! actions. All external services use trait abstractions to enable testing.

use anyhow::Result;
use async_trait::async_trait;
use mailer::MailerService;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domains::auth::models::Student;
use crate::domains::auth::JwtService;
use crate::kernel::{BaseMailDispatcher, BaseStudentDirectory};

// =============================================================================
// PgStudentDirectory (implements BaseStudentDirectory trait)
// =============================================================================

/// Postgres-backed student directory. The SQL lives on the `Student` model;
/// this adapter only binds it to the trait.
pub struct PgStudentDirectory {
    pool: PgPool,
}

impl PgStudentDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseStudentDirectory for PgStudentDirectory {
    async fn find_by_enrollment_number(
        &self,
        enrollment_number: &str,
    ) -> Result<Option<Student>> {
        Student::find_by_enrollment_number(enrollment_number, &self.pool).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Student>> {
        Student::find_by_cis_id(email, &self.pool).await
    }

    async fn set_email_verified(
        &self,
        enrollment_number: &str,
        email: &str,
    ) -> Result<Option<Student>> {
        Student::set_email_verified(enrollment_number, email, &self.pool).await
    }

    async fn set_credential(
        &self,
        enrollment_number: &str,
        password_hash: &str,
    ) -> Result<Option<Student>> {
        Student::set_credential(enrollment_number, password_hash, &self.pool).await
    }
}

// =============================================================================
// MailerService Adapter (implements BaseMailDispatcher trait)
// =============================================================================

/// Wrapper around MailerService that implements BaseMailDispatcher trait
pub struct MailerAdapter(pub Arc<MailerService>);

impl MailerAdapter {
    pub fn new(service: Arc<MailerService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseMailDispatcher for MailerAdapter {
    async fn send_verification(&self, to: &str, verification_url: &str) -> Result<()> {
        self.0
            .send_verification_email(to, verification_url)
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("{}", e))
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to domain actions (using traits for
/// testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub directory: Arc<dyn BaseStudentDirectory>,
    pub mailer: Arc<dyn BaseMailDispatcher>,
    /// JWT service for session and verification tokens
    pub jwt_service: Arc<JwtService>,
    /// Base URL the emailed verification link points back to
    pub email_postback_url: String,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        directory: Arc<dyn BaseStudentDirectory>,
        mailer: Arc<dyn BaseMailDispatcher>,
        jwt_service: Arc<JwtService>,
        email_postback_url: String,
    ) -> Self {
        Self {
            directory,
            mailer,
            jwt_service,
            email_postback_url,
        }
    }
}
