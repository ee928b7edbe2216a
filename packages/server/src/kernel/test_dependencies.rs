// TestDependencies - mock implementations for testing
//
// Provides mock collaborators that can be injected into ServerDeps for tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{BaseMailDispatcher, BaseStudentDirectory};
use crate::domains::auth::models::Student;

// =============================================================================
// Mock Student Directory
// =============================================================================

/// In-memory student directory. Clones share state, so a test can keep one
/// handle for assertions while the workflow owns another.
///
/// The conditional writes implement the same predicates as the SQL model:
/// `set_email_verified` only while unset-or-equal, `set_credential` only
/// while verified-and-unset.
#[derive(Clone)]
pub struct MockStudentDirectory {
    students: Arc<Mutex<HashMap<String, Student>>>,
}

impl MockStudentDirectory {
    pub fn new() -> Self {
        Self {
            students: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Seed a student record
    pub fn with_student(self, student: Student) -> Self {
        self.students
            .lock()
            .unwrap()
            .insert(student.enrollment_number.clone(), student);
        self
    }

    /// Snapshot a record for assertions
    pub fn get(&self, enrollment_number: &str) -> Option<Student> {
        self.students.lock().unwrap().get(enrollment_number).cloned()
    }
}

impl Default for MockStudentDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseStudentDirectory for MockStudentDirectory {
    async fn find_by_enrollment_number(
        &self,
        enrollment_number: &str,
    ) -> Result<Option<Student>> {
        Ok(self
            .students
            .lock()
            .unwrap()
            .get(enrollment_number)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Student>> {
        Ok(self
            .students
            .lock()
            .unwrap()
            .values()
            .find(|s| s.cis_id.as_deref() == Some(email))
            .cloned())
    }

    async fn set_email_verified(
        &self,
        enrollment_number: &str,
        email: &str,
    ) -> Result<Option<Student>> {
        let mut students = self.students.lock().unwrap();
        let Some(student) = students.get_mut(enrollment_number) else {
            return Ok(None);
        };

        match &student.cis_id {
            None => {
                student.cis_id = Some(email.to_string());
                Ok(Some(student.clone()))
            }
            Some(existing) if existing == email => Ok(Some(student.clone())),
            Some(_) => Ok(None),
        }
    }

    async fn set_credential(
        &self,
        enrollment_number: &str,
        password_hash: &str,
    ) -> Result<Option<Student>> {
        let mut students = self.students.lock().unwrap();
        let Some(student) = students.get_mut(enrollment_number) else {
            return Ok(None);
        };

        if student.password.is_some() || student.cis_id.is_none() {
            return Ok(None);
        }

        student.password = Some(password_hash.to_string());
        Ok(Some(student.clone()))
    }
}

// =============================================================================
// Mock Mail Dispatcher
// =============================================================================

/// Records every dispatched message; optionally scripted to fail.
#[derive(Clone)]
pub struct MockMailDispatcher {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    fail: Arc<Mutex<bool>>,
}

impl MockMailDispatcher {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: Arc::new(Mutex::new(false)),
        }
    }

    /// Make every subsequent send fail
    pub fn with_failure(self) -> Self {
        *self.fail.lock().unwrap() = true;
        self
    }

    /// Get all (recipient, url) pairs that were dispatched
    pub fn sent_calls(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Check if an address received a message
    pub fn was_sent_to(&self, to: &str) -> bool {
        self.sent.lock().unwrap().iter().any(|(t, _)| t == to)
    }
}

impl Default for MockMailDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseMailDispatcher for MockMailDispatcher {
    async fn send_verification(&self, to: &str, verification_url: &str) -> Result<()> {
        if *self.fail.lock().unwrap() {
            return Err(anyhow!("mail relay unavailable"));
        }

        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), verification_url.to_string()));
        Ok(())
    }
}
