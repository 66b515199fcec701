//! [`ResourceEntity`] implementation for [`User`].

use crate::model::{Role, User, UserId, USER_ACTIVE};
use crate::user_actor::UserError;
use async_trait::async_trait;
use resource_framework::ResourceEntity;

#[async_trait]
impl ResourceEntity for User {
    type Id = UserId;
    type Context = ();
    type Error = UserError;

    fn id(&self) -> UserId {
        self.id
    }

    fn new_record(id: UserId) -> Self {
        Self {
            id,
            name: String::new(),
            email: String::new(),
            role: Role::Client,
            status: USER_ACTIVE,
            deleted: 0,
        }
    }

    /// Registration requires a name and something that looks like an email address.
    async fn on_create(&mut self, _ctx: &()) -> Result<(), UserError> {
        if self.name.trim().is_empty() {
            return Err(UserError::ValidationError("name is required".into()));
        }
        if !self.email.contains('@') {
            return Err(UserError::ValidationError(format!(
                "invalid email: {}",
                self.email
            )));
        }
        Ok(())
    }
}
