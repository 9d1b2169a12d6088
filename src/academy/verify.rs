use serde::Serialize;

use crate::model::{AcademyState, entity::Certificate};

/// Exact, case-sensitive lookup by certificate number.
pub fn find_certificate<'a>(state: &'a AcademyState, cert_no: &str) -> Option<&'a Certificate> {
    state.certificate(cert_no)
}

/// Certificates held by `user_id`, ordered by certificate number.
pub fn list_certificates_for_user<'a>(state: &'a AcademyState, user_id: &str) -> Vec<&'a Certificate> {
    state
        .certificates()
        .filter(|c| c.user_id() == user_id)
        .collect()
}

/// Public verification outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(tag = "status", rename_all = "UPPERCASE")]
pub enum Verification {
    Valid { certificate: Certificate },
    Invalid,
}

impl Verification {
    pub fn check(state: &AcademyState, cert_no: &str) -> Self {
        match find_certificate(state, cert_no) {
            Some(cert) => Self::Valid {
                certificate: cert.clone(),
            },
            None => Self::Invalid,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

#[cfg(test)]
mod test {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use crate::model::entity::CertificateCreate;

    fn cert(no: &str, user_id: &str, course_id: &str) -> Certificate {
        CertificateCreate {
            cert_no: no.to_string(),
            user_id: user_id.to_string(),
            user_name: String::from("Ann Lee"),
            user_email: String::from("ann@example.com"),
            course_id: course_id.to_string(),
            course_title: String::from("ESD basics"),
            issued_at: Utc.with_ymd_and_hms(2026, 5, 20, 9, 30, 0).unwrap(),
            hash: String::from("0123456789abcdef0123456789abcdef"),
        }
        .into()
    }

    fn state() -> AcademyState {
        AcademyState::default()
            .issue_certificate(cert("EMC-2026-000002", "u1", "c2"))
            .and_then(|s| s.issue_certificate(cert("EMC-2026-000001", "u1", "c1")))
            .and_then(|s| s.issue_certificate(cert("EMC-2026-000003", "u2", "c1")))
            .unwrap()
    }

    #[test]
    fn issued_certificate_verifies() {
        let state = state();
        let found = find_certificate(&state, "EMC-2026-000001").unwrap();
        assert_eq!(found.user_id(), "u1");
        assert_eq!(found.course_id(), "c1");
        assert!(Verification::check(&state, "EMC-2026-000001").is_valid());
    }

    #[test]
    fn lookup_is_exact() {
        let state = state();
        assert!(find_certificate(&state, "emc-2026-000001").is_none());
        assert!(find_certificate(&state, " EMC-2026-000001").is_none());
        assert!(find_certificate(&state, "").is_none());
        assert_eq!(Verification::check(&state, "EMC-2026-999999"), Verification::Invalid);
    }

    #[test]
    fn user_listing_is_ordered_and_scoped() {
        let state = state();
        let numbers: Vec<&str> = list_certificates_for_user(&state, "u1")
            .into_iter()
            .map(Certificate::cert_no)
            .collect();
        assert_eq!(numbers, vec!["EMC-2026-000001", "EMC-2026-000002"]);
        assert!(list_certificates_for_user(&state, "nobody").is_empty());
    }

    #[test]
    fn verification_wire_shape() {
        let state = state();
        let valid = serde_json::to_value(Verification::check(&state, "EMC-2026-000003")).unwrap();
        assert_eq!(valid["status"], "VALID");
        assert_eq!(valid["certificate"]["cert_no"], "EMC-2026-000003");

        let invalid = serde_json::to_value(Verification::Invalid).unwrap();
        assert_eq!(invalid, json!({"status": "INVALID"}));
    }
}
