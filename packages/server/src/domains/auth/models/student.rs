use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Student - institutional identity record for club membership
///
/// Rows are created by the institutional import, never by this service.
/// The auth workflow mutates exactly two columns, each once: `cis_id` when
/// email ownership is proven, then `password` when signup completes.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Student {
    pub enrollment_number: String,
    /// Verified email identity. NULL until the verification link is clicked.
    pub cis_id: Option<String>,
    /// Argon2 credential hash. NULL until signup completes.
    pub password: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub credits: String,
    pub in_club_as_team: Option<String>,
    pub in_club_as_member: Option<String>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Student {
    /// Find a student by enrollment number
    pub async fn find_by_enrollment_number(
        enrollment_number: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let student =
            sqlx::query_as::<_, Student>("SELECT * FROM students WHERE enrollment_number = $1")
                .bind(enrollment_number)
                .fetch_optional(pool)
                .await?;
        Ok(student)
    }

    /// Find a student by verified email
    pub async fn find_by_cis_id(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        let student = sqlx::query_as::<_, Student>("SELECT * FROM students WHERE cis_id = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?;
        Ok(student)
    }

    /// Record a verified email, conditionally.
    ///
    /// The predicate re-checks the precondition inside the UPDATE itself, so
    /// concurrent confirmations cannot race past the check: an unset column
    /// is claimed, a same-value write is an idempotent success, and any
    /// cross-email write matches zero rows and returns `None`.
    pub async fn set_email_verified(
        enrollment_number: &str,
        email: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            UPDATE students
            SET cis_id = $2
            WHERE enrollment_number = $1
              AND (cis_id IS NULL OR cis_id = $2)
            RETURNING *
            "#,
        )
        .bind(enrollment_number)
        .bind(email)
        .fetch_optional(pool)
        .await?;
        Ok(student)
    }

    /// Record a credential hash, conditionally.
    ///
    /// Only succeeds while the account is email-verified and not yet
    /// registered; a writer that lost the race matches zero rows and gets
    /// `None` back instead of overwriting.
    pub async fn set_credential(
        enrollment_number: &str,
        password_hash: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            UPDATE students
            SET password = $2
            WHERE enrollment_number = $1
              AND password IS NULL
              AND cis_id IS NOT NULL
            RETURNING *
            "#,
        )
        .bind(enrollment_number)
        .bind(password_hash)
        .fetch_optional(pool)
        .await?;
        Ok(student)
    }
}
