use crate::{
    model::error::{DatabaseError, DatabaseResult},
    web::{AuthenticatedUser, UserRole},
};

pub trait HasOwner {
    fn owner_id(&self) -> &str;
}

pub fn check_access<T: HasOwner>(ctx: &AuthenticatedUser, resource: &T) -> DatabaseResult<()> {
    // admin can get all resources
    if ctx.user_role() == UserRole::Admin {
        return Ok(());
    }

    if resource.owner_id() == ctx.user_id() {
        Ok(())
    } else {
        Err(DatabaseError::Forbidden)
    }
}
