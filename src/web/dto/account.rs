use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::entity::{Certificate, EnrollmentStatus};
use crate::web::AuthenticatedUser;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct EnrollmentResponse {
    pub course_id: String,
    pub course_title: String,
    pub status: EnrollmentStatus,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct AccountResponse {
    id: String,
    name: String,
    email: String,
    role: String,
    enrollments: Vec<EnrollmentResponse>,
    certificates: Vec<Certificate>,
}

impl AccountResponse {
    pub fn new(
        user: &AuthenticatedUser,
        enrollments: Vec<EnrollmentResponse>,
        certificates: Vec<Certificate>,
    ) -> Self {
        Self {
            id: user.user_id().to_string(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            role: user.user_role().to_string(),
            enrollments,
            certificates,
        }
    }
}
