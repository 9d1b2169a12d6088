use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::access::HasOwner;
use crate::model::repo::ResourceTyped;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Certificate {
    cert_no: String,
    user_id: String,
    user_name: String,
    user_email: String,
    course_id: String,
    course_title: String,
    issued_at: DateTime<Utc>,
    hash: String,
}

impl ResourceTyped for Certificate {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Certificate
    }
}

#[derive(Debug, Clone)]
pub struct CertificateCreate {
    pub cert_no: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub course_id: String,
    pub course_title: String,
    pub issued_at: DateTime<Utc>,
    pub hash: String,
}

impl From<CertificateCreate> for Certificate {
    fn from(data: CertificateCreate) -> Self {
        Self {
            cert_no: data.cert_no,
            user_id: data.user_id,
            user_name: data.user_name,
            user_email: data.user_email,
            course_id: data.course_id,
            course_title: data.course_title,
            issued_at: data.issued_at,
            hash: data.hash,
        }
    }
}

impl Certificate {
    pub fn cert_no(&self) -> &str {
        &self.cert_no
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn user_email(&self) -> &str {
        &self.user_email
    }

    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    pub fn course_title(&self) -> &str {
        &self.course_title
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Public link encoded in the QR code of the rendered certificate.
    pub fn verify_url(&self, origin: &str) -> String {
        format!("{}/verify/{}", origin.trim_end_matches('/'), self.cert_no)
    }
}

impl HasOwner for Certificate {
    fn owner_id(&self) -> &str {
        &self.user_id
    }
}
