//! # Ownership Policy
//!
//! Decides whether a user may mutate a resource: administrators always may, roles listed as
//! overriding may, and everyone else only if the resource (or its parent) points back at them
//! through one of the conventional ownership attributes.

use crate::model::{Role, User, UserId};
use resource_framework::{Attributes, FieldValue};
use thiserror::Error;
use tracing::debug;

/// Field names that conventionally hold the owning user's id.
pub const OWNERSHIP_ATTRIBUTES: &[&str] = &[
    "author",
    "author_id",
    "created_by_user",
    "created_by_user_id",
    "creator",
    "creator_id",
    "crud",
    "crud_id",
    "crud_by_user",
    "crud_by_user_id",
    "maker",
    "maker_id",
    "operator",
    "operator_id",
    "originator",
    "originator_id",
    "owner",
    "owner_id",
    "producer",
    "producer_id",
    "user",
    "user_id",
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    #[error("User {0} is not allowed to modify this resource")]
    NotAllowed(UserId),
}

/// Per-call adjustments to the ownership check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyOptions {
    exceptions: Vec<String>,
    overriding_roles: Vec<Role>,
    parent_relation: Option<String>,
}

impl PolicyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes that must not count as ownership for this check.
    pub fn except<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exceptions.extend(attributes.into_iter().map(Into::into));
        self
    }

    /// Roles that pass without owning the resource.
    pub fn overriding_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.overriding_roles.extend(roles);
        self
    }

    /// Read ownership from this relation instead of the resource itself, when it is loaded.
    pub fn parent(mut self, relation: impl Into<String>) -> Self {
        self.parent_relation = Some(relation.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct OwnershipPolicy {
    attributes: Vec<&'static str>,
}

impl Default for OwnershipPolicy {
    fn default() -> Self {
        Self {
            attributes: OWNERSHIP_ATTRIBUTES.to_vec(),
        }
    }
}

impl OwnershipPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs ahead of every check. `Some(true)` settles it; `None` defers to the ownership test.
    pub fn before(&self, user: &User) -> Option<bool> {
        (user.role == Role::Administrator).then_some(true)
    }

    pub fn is_owner_or_privileged(
        &self,
        user: &User,
        resource: &dyn Attributes,
        options: &PolicyOptions,
    ) -> bool {
        if let Some(decision) = self.before(user) {
            return decision;
        }
        if options.overriding_roles.contains(&user.role) {
            return true;
        }

        let source = match options
            .parent_relation
            .as_deref()
            .and_then(|relation| resource.relation(relation))
        {
            Some(parent) => parent,
            None => resource,
        };

        let owned = self
            .attributes
            .iter()
            .filter(|attribute| !options.exceptions.iter().any(|e| e == *attribute))
            .find(|attribute| {
                source
                    .attribute(attribute)
                    .is_some_and(|value| points_at(&value, user.id))
            });

        debug!(user_id = %user.id, attribute = ?owned, "Ownership check");
        owned.is_some()
    }

    pub fn authorize(
        &self,
        user: &User,
        resource: &dyn Attributes,
        options: &PolicyOptions,
    ) -> Result<(), PolicyError> {
        if self.is_owner_or_privileged(user, resource, options) {
            Ok(())
        } else {
            Err(PolicyError::NotAllowed(user.id))
        }
    }
}

fn points_at(value: &FieldValue, user: UserId) -> bool {
    !value.is_empty() && value.as_int() == Some(i64::from(user.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Message, MessageId, Post, PostId};

    fn client(id: u32) -> User {
        User::new(UserId(id), "Client", "client@example.com")
    }

    fn post_by(owner: u32) -> Post {
        let mut post = Post::blank(PostId(1));
        post.user_id = UserId(owner);
        post
    }

    /// Resource whose ownership lives in an arbitrary text field.
    struct Tagged(&'static str, FieldValue);

    impl Attributes for Tagged {
        fn attribute(&self, name: &str) -> Option<FieldValue> {
            (name == self.0).then(|| self.1.clone())
        }

        fn set_attribute(
            &mut self,
            _name: &str,
            _value: FieldValue,
        ) -> Result<(), resource_framework::SchemaError> {
            Ok(())
        }
    }

    #[test]
    fn test_owner_is_allowed_and_stranger_is_not() {
        let policy = OwnershipPolicy::new();
        let post = post_by(7);
        assert!(policy.is_owner_or_privileged(&client(7), &post, &PolicyOptions::new()));
        assert!(!policy.is_owner_or_privileged(&client(8), &post, &PolicyOptions::new()));
    }

    #[test]
    fn test_administrator_always_passes() {
        let policy = OwnershipPolicy::new();
        let admin = client(99).with_role(Role::Administrator);
        assert_eq!(policy.before(&admin), Some(true));
        assert_eq!(policy.before(&client(1)), None);
        assert!(policy.is_owner_or_privileged(&admin, &post_by(7), &PolicyOptions::new()));
    }

    #[test]
    fn test_overriding_roles() {
        let policy = OwnershipPolicy::new();
        let editor = client(5).with_role(Role::Editor);
        let options = PolicyOptions::new().overriding_roles([Role::Editor]);
        assert!(policy.is_owner_or_privileged(&editor, &post_by(7), &options));
        assert!(!policy.is_owner_or_privileged(&editor, &post_by(7), &PolicyOptions::new()));
    }

    #[test]
    fn test_exceptions_apply_per_call_only() {
        let policy = OwnershipPolicy::new();
        let post = post_by(7);
        let options = PolicyOptions::new().except(["user_id"]);

        assert!(!policy.is_owner_or_privileged(&client(7), &post, &options));
        // the policy itself is untouched by the previous call
        assert!(policy.is_owner_or_privileged(&client(7), &post, &PolicyOptions::new()));
    }

    #[test]
    fn test_empty_values_never_match() {
        let policy = OwnershipPolicy::new();
        let options = PolicyOptions::new();
        assert!(!policy.is_owner_or_privileged(&client(0), &post_by(0), &options));
        assert!(!policy.is_owner_or_privileged(
            &client(0),
            &Tagged("owner", FieldValue::from("0")),
            &options
        ));
        assert!(policy.is_owner_or_privileged(
            &client(3),
            &Tagged("creator_id", FieldValue::from("3")),
            &options
        ));
        assert!(!policy.is_owner_or_privileged(
            &client(3),
            &Tagged("reviewer_id", FieldValue::Int(3)),
            &options
        ));
    }

    #[test]
    fn test_parent_relation() {
        let policy = OwnershipPolicy::new();
        let author = client(4);
        let mut message = Message::blank(MessageId(1));
        message.user_id = UserId(9);
        let options = PolicyOptions::new().parent("user").except(["user_id"]);

        // relation not loaded: falls back to the message itself
        assert!(!policy.is_owner_or_privileged(&author, &message, &options));

        // the loaded user's own id is not an ownership attribute
        let message = message.with_user(author.clone());
        assert!(!policy.is_owner_or_privileged(&author, &message, &options));

        let tagged_parent = Tagged("owner_id", FieldValue::Int(4));
        struct Child<'a>(&'a Tagged);
        impl Attributes for Child<'_> {
            fn attribute(&self, _name: &str) -> Option<FieldValue> {
                None
            }
            fn set_attribute(
                &mut self,
                _name: &str,
                _value: FieldValue,
            ) -> Result<(), resource_framework::SchemaError> {
                Ok(())
            }
            fn relation(&self, name: &str) -> Option<&dyn Attributes> {
                (name == "project").then_some(self.0 as &dyn Attributes)
            }
        }
        let child = Child(&tagged_parent);
        assert!(policy.is_owner_or_privileged(
            &author,
            &child,
            &PolicyOptions::new().parent("project")
        ));
    }

    #[test]
    fn test_authorize() {
        let policy = OwnershipPolicy::new();
        assert_eq!(
            policy.authorize(&client(2), &post_by(7), &PolicyOptions::new()),
            Err(PolicyError::NotAllowed(UserId(2)))
        );
        assert!(policy
            .authorize(&client(7), &post_by(7), &PolicyOptions::new())
            .is_ok());
    }
}
