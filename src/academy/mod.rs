//! Course progress rules: completion, quiz scoring, certificate issuance and
//! verification, plus the [`Academy`] service that ties them to storage.

mod error;
pub use error::{AcademyError, AcademyResult};

pub mod eligibility;
pub use eligibility::Completion;

pub mod issuer;
pub use issuer::{CertificateIssuer, Issuance};

pub mod quiz;
pub use quiz::{Answers, QuizScore};

mod service;
pub use service::{
    Academy, AcademySettings, AcademyStats, CourseProgress, PresentedQuiz, QuizOutcome,
};

pub mod verify;
pub use verify::Verification;

pub const DEFAULT_PASSING_SCORE: u32 = 70;
pub const DEFAULT_CERT_PREFIX: &str = "EMC";
