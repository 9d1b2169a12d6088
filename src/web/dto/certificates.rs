use serde::Serialize;

use crate::model::entity::Certificate;

/// Everything the external PDF renderer needs, including the link encoded
/// in the QR code.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct CertificateRenderResponse {
    #[serde(flatten)]
    certificate: Certificate,
    verify_url: String,
}

impl CertificateRenderResponse {
    pub fn new(certificate: Certificate, public_origin: &str) -> Self {
        let verify_url = certificate.verify_url(public_origin);
        Self {
            certificate,
            verify_url,
        }
    }
}
