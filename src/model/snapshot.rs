//! The persisted progress aggregate and its state transitions.
//!
//! Every transition consumes the previous snapshot and returns the next one;
//! nothing here touches storage. [`crate::model::ProgressStore`] is
//! responsible for persisting a snapshot before it becomes visible.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::model::entity::{Certificate, Enrollment, LessonProgress, QuizAttempt, User};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("certificate number {0} is already taken")]
    DuplicateCertNo(String),
    #[error("user {user_id} already holds a certificate for course {course_id}")]
    AlreadyCertified { user_id: String, course_id: String },
}

/// Everything recorded for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProgress {
    user: Option<User>,
    enrollments: BTreeMap<String, Enrollment>,
    lesson_progress: BTreeMap<String, LessonProgress>,
    quiz_attempts: BTreeMap<String, Vec<QuizAttempt>>,
}

impl UserProgress {
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn enrollment(&self, course_id: &str) -> Option<&Enrollment> {
        self.enrollments.get(course_id)
    }

    pub fn enrollments(&self) -> &BTreeMap<String, Enrollment> {
        &self.enrollments
    }

    pub fn lesson_progress(&self, course_id: &str, lesson_id: &str) -> Option<&LessonProgress> {
        self.lesson_progress
            .get(&LessonProgress::key(course_id, lesson_id))
    }

    pub fn lesson_progress_count(&self) -> usize {
        self.lesson_progress.len()
    }

    pub fn quiz_attempts(&self, course_id: &str) -> &[QuizAttempt] {
        self.quiz_attempts
            .get(course_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// The whole persisted state: progress partitioned by user id plus the global
/// certificate registry keyed by certificate number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcademyState {
    users: BTreeMap<String, UserProgress>,
    certificates: BTreeMap<String, Certificate>,
}

impl AcademyState {
    pub fn progress(&self, user_id: &str) -> Option<&UserProgress> {
        self.users.get(user_id)
    }

    pub fn users(&self) -> impl ExactSizeIterator<Item = (&String, &UserProgress)> {
        self.users.iter()
    }

    pub fn certificates(&self) -> impl ExactSizeIterator<Item = &Certificate> {
        self.certificates.values()
    }

    pub fn certificate(&self, cert_no: &str) -> Option<&Certificate> {
        self.certificates.get(cert_no)
    }

    /// The certificate already issued to `user_id` for `course_id`, if any.
    pub fn certificate_for(&self, user_id: &str, course_id: &str) -> Option<&Certificate> {
        self.certificates
            .values()
            .find(|c| c.user_id() == user_id && c.course_id() == course_id)
    }

    pub fn is_enrolled(&self, user_id: &str, course_id: &str) -> bool {
        self.progress(user_id)
            .and_then(|p| p.enrollment(course_id))
            .is_some()
    }

    pub fn is_lesson_done(&self, user_id: &str, course_id: &str, lesson_id: &str) -> bool {
        self.progress(user_id)
            .and_then(|p| p.lesson_progress(course_id, lesson_id))
            .is_some_and(LessonProgress::is_done)
    }

    /// Every catalog course paired with the user's enrollment, if any.
    pub fn list_enrollments<'a>(
        &'a self,
        user_id: &str,
        catalog: &'a Catalog,
    ) -> Vec<(&'a str, Option<&'a Enrollment>)> {
        let progress = self.progress(user_id);
        catalog
            .courses()
            .iter()
            .map(|c| (c.id(), progress.and_then(|p| p.enrollment(c.id()))))
            .collect()
    }

    fn user_mut(&mut self, user_id: &str) -> &mut UserProgress {
        self.users.entry(user_id.to_string()).or_default()
    }

    /// Records (or refreshes) the profile of the acting user.
    pub fn set_user(mut self, user: User) -> Self {
        let entry = self.user_mut(user.id());
        entry.user = Some(user);
        self
    }

    /// Marks the user as enrolled. Re-enrolling keeps the original start time.
    pub fn enroll(mut self, user_id: &str, course_id: &str, now: DateTime<Utc>) -> Self {
        let progress = self.user_mut(user_id);
        let started_at = progress
            .enrollments
            .get(course_id)
            .map(Enrollment::started_at)
            .unwrap_or(now);
        progress
            .enrollments
            .insert(course_id.to_string(), Enrollment::new(started_at));
        self
    }

    /// Marks a lesson as done; repeating only refreshes the timestamp.
    pub fn mark_lesson_done(
        mut self,
        user_id: &str,
        course_id: &str,
        lesson_id: &str,
        now: DateTime<Utc>,
    ) -> Self {
        self.user_mut(user_id).lesson_progress.insert(
            LessonProgress::key(course_id, lesson_id),
            LessonProgress::done_at(now),
        );
        self
    }

    /// Appends an attempt; earlier attempts are never touched.
    pub fn save_quiz_attempt(mut self, user_id: &str, course_id: &str, attempt: QuizAttempt) -> Self {
        self.user_mut(user_id)
            .quiz_attempts
            .entry(course_id.to_string())
            .or_default()
            .push(attempt);
        self
    }

    /// Registers a certificate under its number. Fails instead of overwriting
    /// when the number is taken or the user already holds one for the course.
    pub fn issue_certificate(mut self, cert: Certificate) -> Result<Self, SnapshotError> {
        if self.certificates.contains_key(cert.cert_no()) {
            return Err(SnapshotError::DuplicateCertNo(cert.cert_no().to_string()));
        }
        if self.certificate_for(cert.user_id(), cert.course_id()).is_some() {
            return Err(SnapshotError::AlreadyCertified {
                user_id: cert.user_id().to_string(),
                course_id: cert.course_id().to_string(),
            });
        }

        self.certificates.insert(cert.cert_no().to_string(), cert);
        Ok(self)
    }
}

#[cfg(test)]
mod test {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::model::entity::CertificateCreate;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap()
    }

    fn cert(cert_no: &str, user_id: &str, course_id: &str) -> Certificate {
        CertificateCreate {
            cert_no: cert_no.to_string(),
            user_id: user_id.to_string(),
            user_name: String::from("Ann"),
            user_email: String::from("ann@example.com"),
            course_id: course_id.to_string(),
            course_title: String::from("Course"),
            issued_at: t0(),
            hash: String::from("0123456789abcdef0123456789abcdef"),
        }
        .into()
    }

    #[test]
    fn reenroll_keeps_start_time() {
        let state = AcademyState::default().enroll("u1", "c1", t0());
        let state = state.enroll("u1", "c1", t0() + Duration::days(3));

        let enrollment = state.progress("u1").unwrap().enrollment("c1").unwrap();
        assert_eq!(enrollment.started_at(), t0());
        assert!(state.is_enrolled("u1", "c1"));
        assert!(!state.is_enrolled("u2", "c1"));
    }

    #[test]
    fn mark_lesson_done_is_idempotent() {
        let later = t0() + Duration::hours(1);
        let state = AcademyState::default()
            .mark_lesson_done("u1", "c1", "l1", t0())
            .mark_lesson_done("u1", "c1", "l1", later);

        let progress = state.progress("u1").unwrap();
        assert_eq!(progress.lesson_progress_count(), 1);
        assert_eq!(
            progress.lesson_progress("c1", "l1").unwrap().completed_at(),
            later
        );
        assert!(state.is_lesson_done("u1", "c1", "l1"));
        assert!(!state.is_lesson_done("u1", "c1", "l2"));
    }

    #[test]
    fn progress_is_partitioned_by_user() {
        let state = AcademyState::default()
            .enroll("u1", "c1", t0())
            .mark_lesson_done("u1", "c1", "l1", t0());

        assert!(!state.is_lesson_done("u2", "c1", "l1"));
        assert!(state.progress("u2").is_none());
    }

    #[test]
    fn attempts_are_appended_in_order() {
        let first = QuizAttempt::new(t0(), 33, false, 3, 1);
        let second = QuizAttempt::new(t0() + Duration::minutes(5), 100, true, 3, 3);
        let state = AcademyState::default()
            .save_quiz_attempt("u1", "c1", first.clone())
            .save_quiz_attempt("u1", "c1", second.clone());

        let attempts = state.progress("u1").unwrap().quiz_attempts("c1");
        assert_eq!(attempts, &[first, second]);
    }

    #[test]
    fn issue_certificate_rejects_duplicates() {
        let state = AcademyState::default()
            .issue_certificate(cert("EMC-2026-000001", "u1", "c1"))
            .unwrap();

        assert_eq!(
            state.clone().issue_certificate(cert("EMC-2026-000001", "u2", "c2")),
            Err(SnapshotError::DuplicateCertNo(String::from("EMC-2026-000001")))
        );
        assert!(matches!(
            state.clone().issue_certificate(cert("EMC-2026-000002", "u1", "c1")),
            Err(SnapshotError::AlreadyCertified { .. })
        ));

        let state = state
            .issue_certificate(cert("EMC-2026-000002", "u1", "c2"))
            .unwrap();
        assert_eq!(state.certificates().len(), 2);
        assert_eq!(
            state.certificate_for("u1", "c2").unwrap().cert_no(),
            "EMC-2026-000002"
        );
    }

    #[test]
    fn list_enrollments_covers_whole_catalog() {
        let catalog = Catalog::builtin().unwrap();
        let state = AcademyState::default().enroll("u1", "emc-monthly-radiated", t0());

        let listed = state.list_enrollments("u1", &catalog);
        assert_eq!(listed.len(), catalog.courses().len());
        assert!(listed.iter().any(|(id, e)| *id == "emc-monthly-radiated" && e.is_some()));
        assert!(listed.iter().any(|(id, e)| *id == "emc-weekly-esd" && e.is_none()));
    }

    #[test]
    fn snapshot_survives_serialization() {
        let state = AcademyState::default()
            .set_user(User::new("u1", "Ann", "ann@example.com", false))
            .enroll("u1", "c1", t0())
            .mark_lesson_done("u1", "c1", "l1", t0())
            .save_quiz_attempt("u1", "c1", QuizAttempt::new(t0(), 100, true, 1, 1))
            .issue_certificate(cert("EMC-2026-000001", "u1", "c1"))
            .unwrap();

        let raw = serde_json::to_value(&state).unwrap();
        let back: AcademyState = serde_json::from_value(raw).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let back: AcademyState = serde_json::from_str(r#"{"users": {}}"#).unwrap();
        assert_eq!(back, AcademyState::default());
    }
}
