use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::Config;
use crate::academy::{
    AcademyError, AcademyResult, Answers, CertificateIssuer, Completion, DEFAULT_CERT_PREFIX,
    DEFAULT_PASSING_SCORE, Issuance, Verification,
    eligibility::{can_issue_certificate, get_course_completion, last_attempt},
    quiz::{score_answers, shuffled},
    verify::{find_certificate, list_certificates_for_user},
};
use crate::catalog::{Catalog, Course, Lesson, Question};
use crate::model::{
    AcademyState, ModelManager, Page, ResourceType, ResourceTyped,
    blob::CERT_COUNTER_NAMESPACE,
    entity::{Certificate, Enrollment, QuizAttempt, User},
};

#[derive(Debug, Clone)]
pub struct AcademySettings {
    passing_score: u32,
    cert_prefix: String,
    public_origin: String,
}

impl AcademySettings {
    pub fn new<S: Into<String>>(passing_score: u32, cert_prefix: S, public_origin: S) -> Self {
        Self {
            passing_score,
            cert_prefix: cert_prefix.into(),
            public_origin: public_origin.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.academy().passing_score(),
            config.academy().cert_prefix(),
            config.app().public_origin(),
        )
    }
}

impl Default for AcademySettings {
    fn default() -> Self {
        Self::new(DEFAULT_PASSING_SCORE, DEFAULT_CERT_PREFIX, "http://localhost")
    }
}

/// Where one user stands in one course.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct CourseProgress {
    pub course_id: String,
    pub enrolled: bool,
    pub completion: Completion,
    pub last_attempt: Option<QuizAttempt>,
    pub eligible: bool,
    pub certificate: Option<Certificate>,
}

/// Questions in presentation order. The web layer strips the answers.
#[derive(Debug, Clone)]
pub struct PresentedQuiz {
    pub course_id: String,
    pub locked: bool,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone)]
pub struct QuizOutcome {
    pub attempt: QuizAttempt,
    pub issuance: Issuance,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct AcademyStats {
    pub courses: usize,
    pub lessons: usize,
    pub questions: usize,
    pub users: usize,
    pub certificates: usize,
    /// Last number handed out by the certificate counter.
    pub last_cert_seq: u64,
}

#[derive(Debug)]
pub struct Academy {
    mm: ModelManager,
    catalog: Arc<Catalog>,
    public_origin: String,
    issuer: CertificateIssuer,
}

impl Academy {
    pub fn new(mm: ModelManager, catalog: Arc<Catalog>, settings: AcademySettings) -> Self {
        Self {
            mm,
            catalog,
            public_origin: settings.public_origin,
            issuer: CertificateIssuer::new(settings.cert_prefix, settings.passing_score),
        }
    }

    pub fn mm(&self) -> &ModelManager {
        &self.mm
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn public_origin(&self) -> &str {
        &self.public_origin
    }

    pub fn passing_score(&self) -> u32 {
        self.issuer.passing_score()
    }

    pub async fn snapshot(&self) -> Arc<AcademyState> {
        self.mm.progress().snapshot().await
    }

    pub fn course(&self, course_id: &str) -> AcademyResult<&Course> {
        self.catalog
            .course(course_id)
            .ok_or_else(|| AcademyError::not_found(ResourceType::Course, course_id))
    }

    pub fn lesson(&self, course_id: &str, lesson_id: &str) -> AcademyResult<(&Course, &Lesson)> {
        let course = self.course(course_id)?;
        let lesson = course
            .lesson(lesson_id)
            .ok_or_else(|| AcademyError::not_found(ResourceType::Lesson, lesson_id))?;
        Ok((course, lesson))
    }

    pub async fn completion(&self, user_id: &str, course_id: &str) -> AcademyResult<Completion> {
        let course = self.course(course_id)?;
        let state = self.snapshot().await;
        Ok(get_course_completion(&state, user_id, course_id, course.lessons()))
    }

    #[tracing::instrument(skip(self, user), fields(user_id = user.id()))]
    pub async fn enroll(
        &self,
        user: &User,
        course_id: &str,
        now: DateTime<Utc>,
    ) -> AcademyResult<Enrollment> {
        self.course(course_id)?;

        let user = user.clone();
        let uid = user.id().to_string();
        let state = self
            .mm
            .progress()
            .apply(|s| s.set_user(user).enroll(&uid, course_id, now))
            .await?;

        state
            .progress(&uid)
            .and_then(|p| p.enrollment(course_id))
            .cloned()
            .ok_or_else(|| AcademyError::not_found(Enrollment::get_resource_type(), course_id))
    }

    #[tracing::instrument(skip(self, user), fields(user_id = user.id()))]
    pub async fn mark_lesson_done(
        &self,
        user: &User,
        course_id: &str,
        lesson_id: &str,
        now: DateTime<Utc>,
    ) -> AcademyResult<Completion> {
        let (course, _) = self.lesson(course_id, lesson_id)?;

        let user = user.clone();
        let uid = user.id().to_string();
        let state = self
            .mm
            .progress()
            .apply(|s| {
                s.set_user(user)
                    .mark_lesson_done(&uid, course_id, lesson_id, now)
            })
            .await?;

        Ok(get_course_completion(&state, &uid, course_id, course.lessons()))
    }

    pub async fn course_progress(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> AcademyResult<CourseProgress> {
        let course = self.course(course_id)?;
        let state = self.snapshot().await;

        Ok(CourseProgress {
            course_id: course_id.to_string(),
            enrolled: state.is_enrolled(user_id, course_id),
            completion: get_course_completion(&state, user_id, course_id, course.lessons()),
            last_attempt: last_attempt(&state, user_id, course_id).cloned(),
            eligible: can_issue_certificate(
                &state,
                user_id,
                course_id,
                course.lessons(),
                self.passing_score(),
            ),
            certificate: state.certificate_for(user_id, course_id).cloned(),
        })
    }

    /// The course quiz in a fresh random order. `locked` stays set until every
    /// lesson of the course is done.
    pub async fn quiz(&self, user_id: &str, course_id: &str) -> AcademyResult<PresentedQuiz> {
        let course = self.course(course_id)?;
        let state = self.snapshot().await;
        let completion = get_course_completion(&state, user_id, course_id, course.lessons());

        let questions = shuffled(course.questions(), &mut rand::rng())
            .into_iter()
            .cloned()
            .collect();

        Ok(PresentedQuiz {
            course_id: course_id.to_string(),
            locked: !completion.is_complete(),
            questions,
        })
    }

    /// Scores a submission, records the attempt and issues a certificate when
    /// the user has become eligible.
    #[tracing::instrument(skip(self, user, answers), fields(user_id = user.id()))]
    pub async fn submit_quiz(
        &self,
        user: &User,
        course_id: &str,
        answers: &Answers,
        now: DateTime<Utc>,
    ) -> AcademyResult<QuizOutcome> {
        let course = self.course(course_id)?;
        if course.questions().is_empty() {
            return Err(AcademyError::invalid_state("quiz has no questions"));
        }

        let state = self.snapshot().await;
        if !get_course_completion(&state, user.id(), course_id, course.lessons()).is_complete() {
            return Err(AcademyError::invalid_state(
                "quiz is locked until every lesson is done",
            ));
        }

        let score = score_answers(course.questions(), answers, self.passing_score())?;
        let attempt = score.into_attempt(now);
        tracing::info!(
            "quiz attempt {}: {}/{} ({}%)",
            attempt.id(),
            score.correct,
            score.total,
            score.score
        );

        let profile = user.clone();
        let recorded = attempt.clone();
        self.mm
            .progress()
            .apply(|s| {
                let uid = profile.id().to_string();
                s.set_user(profile)
                    .save_quiz_attempt(&uid, course_id, recorded)
            })
            .await?;

        let issuance = self
            .issuer
            .issue_if_eligible(&self.mm, user, course, now)
            .await?;

        Ok(QuizOutcome { attempt, issuance })
    }

    pub async fn certificates_for(&self, user_id: &str) -> Vec<Certificate> {
        let state = self.snapshot().await;
        list_certificates_for_user(&state, user_id)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn certificate(&self, cert_no: &str) -> AcademyResult<Certificate> {
        let state = self.snapshot().await;
        find_certificate(&state, cert_no)
            .cloned()
            .ok_or_else(|| AcademyError::not_found(Certificate::get_resource_type(), cert_no))
    }

    pub async fn verify(&self, cert_no: &str) -> Verification {
        let state = self.snapshot().await;
        Verification::check(&state, cert_no)
    }

    pub async fn all_certificates(&self, limit: i64, offset: i64) -> Page<Certificate> {
        let state = self.snapshot().await;
        Page::slice(state.certificates().cloned(), limit, offset)
    }

    pub async fn stats(&self) -> AcademyResult<AcademyStats> {
        let state = self.snapshot().await;
        let last_cert_seq = self.mm.counter().current(CERT_COUNTER_NAMESPACE).await?;

        Ok(AcademyStats {
            courses: self.catalog.courses().len(),
            lessons: self.catalog.lesson_count(),
            questions: self.catalog.question_count(),
            users: state.users().len(),
            certificates: state.certificates().len(),
            last_cert_seq,
        })
    }

    /// Wipes all progress and certificates. Certificate numbers keep counting.
    #[tracing::instrument(skip(self))]
    pub async fn reset(&self) -> AcademyResult<()> {
        self.mm.progress().reset().await?;
        tracing::warn!("progress snapshot was reset");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;

    use super::*;
    use crate::model::blob::MemoryStore;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 20, 9, 30, 0).unwrap()
    }

    fn catalog() -> Arc<Catalog> {
        let options = || vec![String::from("yes"), String::from("no")];
        let course = Course::new(
            "c1",
            "ESD basics",
            vec![
                Lesson::new("l1", "One", "..."),
                Lesson::new("l2", "Two", "..."),
            ],
            vec![
                Question::new("q1", "First?", options(), 0),
                Question::new("q2", "Second?", options(), 1),
                Question::new("q3", "Third?", options(), 0),
            ],
        );
        let empty = Course::new("c2", "Empty", vec![Lesson::new("l1", "One", "")], vec![]);
        Arc::new(Catalog::new(vec![course, empty]).unwrap())
    }

    async fn academy() -> Academy {
        let mm = ModelManager::memory().await.unwrap();
        Academy::new(
            mm,
            catalog(),
            AcademySettings::new(70, "EMC", "https://academy.example"),
        )
    }

    fn ann() -> User {
        User::new("u1", "Ann Lee", "ann@example.com", false)
    }

    fn answers(pairs: &[(&str, usize)]) -> Answers {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    async fn finish_lessons(academy: &Academy) {
        academy.enroll(&ann(), "c1", now()).await.unwrap();
        for lesson in ["l1", "l2"] {
            academy
                .mark_lesson_done(&ann(), "c1", lesson, now())
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn unknown_course_and_lesson() {
        let academy = academy().await;
        assert!(matches!(
            academy.enroll(&ann(), "nope", now()).await,
            Err(AcademyError::NotFound { .. })
        ));
        assert!(matches!(
            academy.mark_lesson_done(&ann(), "c1", "l9", now()).await,
            Err(AcademyError::NotFound { .. })
        ));
        assert!(matches!(
            academy.submit_quiz(&ann(), "nope", &Answers::new(), now()).await,
            Err(AcademyError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn lesson_completion_is_idempotent() {
        let academy = academy().await;
        academy.enroll(&ann(), "c1", now()).await.unwrap();

        let first = academy.mark_lesson_done(&ann(), "c1", "l1", now()).await.unwrap();
        let again = academy.mark_lesson_done(&ann(), "c1", "l1", now()).await.unwrap();
        assert_eq!(first, again);
        assert_eq!(again.percent, 50);

        let state = academy.snapshot().await;
        assert_eq!(state.progress("u1").unwrap().lesson_progress_count(), 1);
        assert_eq!(state.progress("u1").unwrap().user(), Some(&ann()));
    }

    #[tokio::test]
    async fn quiz_is_locked_until_lessons_are_done() {
        let academy = academy().await;
        academy.enroll(&ann(), "c1", now()).await.unwrap();

        let quiz = academy.quiz("u1", "c1").await.unwrap();
        assert!(quiz.locked);
        assert_eq!(quiz.questions.len(), 3);

        let result = academy
            .submit_quiz(&ann(), "c1", &answers(&[("q1", 0)]), now())
            .await;
        assert!(matches!(result, Err(AcademyError::InvalidState(_))));
    }

    #[tokio::test]
    async fn empty_quiz_is_invalid() {
        let academy = academy().await;
        academy.enroll(&ann(), "c2", now()).await.unwrap();
        academy.mark_lesson_done(&ann(), "c2", "l1", now()).await.unwrap();

        let result = academy.submit_quiz(&ann(), "c2", &Answers::new(), now()).await;
        assert!(matches!(result, Err(AcademyError::InvalidState(_))));
    }

    #[tokio::test]
    async fn failed_attempt_then_pass_issues_certificate() {
        let academy = academy().await;
        finish_lessons(&academy).await;

        let failed = academy
            .submit_quiz(&ann(), "c1", &answers(&[("q1", 0), ("q2", 1), ("q3", 1)]), now())
            .await
            .unwrap();
        assert_eq!(failed.attempt.score(), 67);
        assert!(!failed.attempt.passed());
        assert_eq!(failed.issuance, Issuance::Ineligible);

        let passed = academy
            .submit_quiz(&ann(), "c1", &answers(&[("q1", 0), ("q2", 1), ("q3", 0)]), now())
            .await
            .unwrap();
        assert_eq!(passed.attempt.score(), 100);
        let Issuance::Issued(cert) = passed.issuance else {
            panic!("expected a certificate");
        };
        assert_eq!(cert.cert_no(), "EMC-2026-000001");
        assert_eq!(
            cert.verify_url(academy.public_origin()),
            "https://academy.example/verify/EMC-2026-000001"
        );

        let progress = academy.course_progress("u1", "c1").await.unwrap();
        assert!(progress.eligible);
        assert_eq!(progress.certificate.as_ref(), Some(&cert));
        assert_eq!(academy.certificates_for("u1").await, vec![cert.clone()]);
        assert!(academy.verify(cert.cert_no()).await.is_valid());

        // another pass keeps the existing certificate
        let again = academy
            .submit_quiz(&ann(), "c1", &answers(&[("q1", 0), ("q2", 1), ("q3", 0)]), now())
            .await
            .unwrap();
        assert_eq!(again.issuance, Issuance::AlreadyIssued(cert));
        assert_eq!(academy.snapshot().await.certificates().len(), 1);
    }

    #[tokio::test]
    async fn reset_keeps_counter_running() {
        let academy = academy().await;
        finish_lessons(&academy).await;
        academy
            .submit_quiz(&ann(), "c1", &answers(&[("q1", 0), ("q2", 1), ("q3", 0)]), now())
            .await
            .unwrap();

        academy.reset().await.unwrap();
        let stats = academy.stats().await.unwrap();
        assert_eq!(stats.certificates, 0);
        assert_eq!(stats.users, 0);
        assert_eq!(stats.last_cert_seq, 1);
        assert!(matches!(
            academy.certificate("EMC-2026-000001").await,
            Err(AcademyError::NotFound { .. })
        ));

        finish_lessons(&academy).await;
        let outcome = academy
            .submit_quiz(&ann(), "c1", &answers(&[("q1", 0), ("q2", 1), ("q3", 0)]), now())
            .await
            .unwrap();
        assert_eq!(
            outcome.issuance.certificate().map(Certificate::cert_no),
            Some("EMC-2026-000002")
        );
    }

    #[tokio::test]
    async fn state_survives_restart() {
        let store = Arc::new(MemoryStore::new());
        let mm = ModelManager::with_memory_store(store.clone()).await.unwrap();
        let academy = Academy::new(mm, catalog(), AcademySettings::default());
        finish_lessons(&academy).await;

        let mm = ModelManager::with_memory_store(store).await.unwrap();
        let reopened = Academy::new(mm, catalog(), AcademySettings::default());
        let completion = reopened.completion("u1", "c1").await.unwrap();
        assert!(completion.is_complete());
    }

    #[tokio::test]
    async fn admin_listing_pages() {
        let academy = academy().await;
        for uid in ["u1", "u2", "u3"] {
            let user = User::new(uid, "Someone", "someone@example.com", false);
            academy.enroll(&user, "c1", now()).await.unwrap();
            for lesson in ["l1", "l2"] {
                academy.mark_lesson_done(&user, "c1", lesson, now()).await.unwrap();
            }
            academy
                .submit_quiz(&user, "c1", &answers(&[("q1", 0), ("q2", 1), ("q3", 0)]), now())
                .await
                .unwrap();
        }

        let page = academy.all_certificates(2, 1).await;
        assert_eq!(page.total, 3);
        let numbers: Vec<&str> = page.items.iter().map(Certificate::cert_no).collect();
        assert_eq!(numbers, vec!["EMC-2026-000002", "EMC-2026-000003"]);
    }
}
