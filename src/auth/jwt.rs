use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::CryptResult;

/// Claims carried by the identity token. `sub` is the opaque user id of the
/// identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub name: String,
    pub email: String,
    pub exp: i64,
}

impl UserClaims {
    pub fn new<S: Into<String>>(sub: S, name: S, email: S, ttl: Duration) -> Self {
        Self {
            sub: sub.into(),
            name: name.into(),
            email: email.into(),
            exp: (Utc::now() + ttl).timestamp(),
        }
    }
}

pub fn generate_token<K: AsRef<[u8]>>(claims: &UserClaims, key: K) -> CryptResult<String> {
    let header = Header::default();
    let key = EncodingKey::from_secret(key.as_ref());

    let token = jsonwebtoken::encode(&header, claims, &key)?;
    Ok(token)
}

pub fn process_token<K: AsRef<[u8]>>(token: &str, key: K) -> CryptResult<TokenData<UserClaims>> {
    let validation = Validation::default();
    let key = DecodingKey::from_secret(key.as_ref());

    let claims = jsonwebtoken::decode::<UserClaims>(token, &key, &validation)?;
    Ok(claims)
}
