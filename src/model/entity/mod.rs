mod user;
pub use user::User;

mod enrollment;
pub use enrollment::{Enrollment, EnrollmentStatus};

mod lesson_progress;
pub use lesson_progress::LessonProgress;

mod quiz_attempt;
pub use quiz_attempt::QuizAttempt;

mod certificate;
pub use certificate::{Certificate, CertificateCreate};
