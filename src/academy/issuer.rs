//! Certificate numbering and the at-most-once issuance flow.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::academy::{AcademyError, AcademyResult, eligibility::can_issue_certificate};
use crate::catalog::Course;
use crate::model::{
    ModelManager, SnapshotError,
    blob::CERT_COUNTER_NAMESPACE,
    entity::{Certificate, CertificateCreate, User},
};

/// `{prefix}-{year}-{seq}` with the sequence zero-padded to six digits.
pub fn format_cert_no(prefix: &str, year: i32, seq: u64) -> String {
    format!("{prefix}-{year}-{seq:06}")
}

/// Opaque 32 hex character token stored on the certificate. Random, not a
/// signature over the certificate contents.
pub fn generate_hash() -> String {
    Uuid::new_v4().simple().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issuance {
    Issued(Certificate),
    /// The user already held a certificate for the course; nothing was done.
    AlreadyIssued(Certificate),
    /// Eligibility check failed; nothing was done.
    Ineligible,
}

impl Issuance {
    pub fn certificate(&self) -> Option<&Certificate> {
        match self {
            Self::Issued(c) | Self::AlreadyIssued(c) => Some(c),
            Self::Ineligible => None,
        }
    }
}

type IssueKey = (String, String);

#[derive(Debug)]
pub struct CertificateIssuer {
    prefix: String,
    passing_score: u32,
    locks: std::sync::Mutex<HashMap<IssueKey, Arc<Mutex<()>>>>,
}

impl CertificateIssuer {
    pub fn new<S: Into<String>>(prefix: S, passing_score: u32) -> Self {
        Self {
            prefix: prefix.into(),
            passing_score,
            locks: std::sync::Mutex::new(HashMap::new()),
        }
    }

    pub fn passing_score(&self) -> u32 {
        self.passing_score
    }

    /// Takes the next number from the shared counter. Numbers are never reused
    /// and the sequence is not restarted when the year changes.
    pub async fn generate_cert_no(&self, mm: &ModelManager, now: DateTime<Utc>) -> AcademyResult<String> {
        let seq = mm.counter().increment(CERT_COUNTER_NAMESPACE).await?;
        Ok(format_cert_no(&self.prefix, now.year(), seq))
    }

    fn lock_for(&self, key: &IssueKey) -> Arc<Mutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        locks.entry(key.clone()).or_default().clone()
    }

    /// Drops the pair's lock once nobody else holds or waits on it, so the map
    /// only keeps pairs with issuance in flight.
    fn release(&self, key: &IssueKey, lock: Arc<Mutex<()>>) {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // one reference in the map, one here
        if Arc::strong_count(&lock) <= 2 {
            locks.remove(key);
        }
    }

    #[cfg(test)]
    fn pending_locks(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Issues a certificate for `user` on `course` if they are eligible and do
    /// not hold one yet. Concurrent calls for the same pair are serialized, and
    /// the snapshot commit refuses a second certificate for the pair.
    #[tracing::instrument(skip(self, mm, course), fields(course_id = course.id()))]
    pub async fn issue_if_eligible(
        &self,
        mm: &ModelManager,
        user: &User,
        course: &Course,
        now: DateTime<Utc>,
    ) -> AcademyResult<Issuance> {
        let key = (user.id().to_string(), course.id().to_string());
        let lock = self.lock_for(&key);

        let result = {
            let _guard = lock.lock().await;
            self.issue_locked(mm, user, course, now).await
        };

        self.release(&key, lock);
        result
    }

    async fn issue_locked(
        &self,
        mm: &ModelManager,
        user: &User,
        course: &Course,
        now: DateTime<Utc>,
    ) -> AcademyResult<Issuance> {
        let state = mm.progress().snapshot().await;
        if let Some(existing) = state.certificate_for(user.id(), course.id()) {
            tracing::debug!("certificate {} already issued", existing.cert_no());
            return Ok(Issuance::AlreadyIssued(existing.clone()));
        }

        if !can_issue_certificate(
            &state,
            user.id(),
            course.id(),
            course.lessons(),
            self.passing_score,
        ) {
            tracing::debug!("not eligible for a certificate");
            return Ok(Issuance::Ineligible);
        }

        let cert_no = self.generate_cert_no(mm, now).await?;
        let cert: Certificate = CertificateCreate {
            cert_no,
            user_id: user.id().to_string(),
            user_name: user.name().to_string(),
            user_email: user.email().to_string(),
            course_id: course.id().to_string(),
            course_title: course.title().to_string(),
            issued_at: now,
            hash: generate_hash(),
        }
        .into();

        let committed = cert.clone();
        let outcome = mm
            .progress()
            .commit(move |s| s.issue_certificate(committed).map_err(AcademyError::from))
            .await;

        match outcome {
            Ok(_) => {
                tracing::info!("issued certificate {}", cert.cert_no());
                Ok(Issuance::Issued(cert))
            }
            // another writer recorded the pair between our check and commit
            Err(AcademyError::Snapshot(SnapshotError::AlreadyCertified { .. })) => {
                let state = mm.progress().snapshot().await;
                match state.certificate_for(user.id(), course.id()) {
                    Some(existing) => {
                        tracing::warn!(
                            "certificate {} dropped, pair already holds {}",
                            cert.cert_no(),
                            existing.cert_no()
                        );
                        Ok(Issuance::AlreadyIssued(existing.clone()))
                    }
                    None => Err(AcademyError::invalid_state("certificate vanished during issuance")),
                }
            }
            Err(e) => {
                tracing::error!("certificate {} was not recorded: {e}", cert.cert_no());
                Err(e)
            }
        }
    }
}
