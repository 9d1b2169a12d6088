use serde::{Deserialize, Serialize};

use crate::model::access::HasOwner;

/// Identity handed over by the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct User {
    id: String,
    name: String,
    email: String,
    is_admin: bool,
}

impl User {
    pub fn new<S: Into<String>>(id: S, name: S, email: S, is_admin: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            is_admin,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}

impl HasOwner for User {
    fn owner_id(&self) -> &str {
        &self.id // owners of users are themselves
    }
}
