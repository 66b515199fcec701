use super::{resource_id, unknown_field, DELETED, USER_ACTIVE};
use resource_framework::{
    Attributes, DeleteMarker, FieldDef, FieldKind, FieldValue, Schema, SchemaError,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

resource_id!(
    /// Type-safe identifier for Users.
    UserId
);

/// What a user may do. Administrators bypass every ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Administrator,
    Editor,
    Client,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "administrator",
            Role::Editor => "editor",
            Role::Client => "client",
        }
    }

    /// Route name of this role's landing page, e.g. `editor-dashboard`.
    pub fn dashboard_route(&self) -> String {
        format!("{}-dashboard", self.as_str())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "administrator" => Ok(Role::Administrator),
            "editor" => Ok(Role::Editor),
            "client" => Ok(Role::Client),
            _ => Err(SchemaError::TypeMismatch {
                field: "role".into(),
                expected: FieldKind::Text,
            }),
        }
    }
}

/// Represents a registered user in the system.
///
/// `name` and `email` are the only fields filled from input; `role` is assigned by the
/// application when the user is registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: i64,
    pub deleted: i64,
}

impl User {
    /// An active client. Handy for tests and mocks; real users are created through the actor.
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role: Role::Client,
            status: USER_ACTIVE,
            deleted: 0,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == USER_ACTIVE && self.deleted != DELETED
    }

    pub fn schema() -> Schema {
        Schema::new("User", DeleteMarker::Flag("deleted"))
            .field(FieldDef::text("name"))
            .field(FieldDef::text("email"))
            .field(FieldDef::text("role"))
            .field(FieldDef::int("status"))
            .field(FieldDef::int("deleted"))
            .fillable(&["name", "email"])
    }
}

impl Attributes for User {
    fn attribute(&self, name: &str) -> Option<FieldValue> {
        Some(match name {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "email" => self.email.as_str().into(),
            "role" => self.role.as_str().into(),
            "status" => self.status.into(),
            "deleted" => self.deleted.into(),
            _ => return None,
        })
    }

    fn set_attribute(&mut self, name: &str, value: FieldValue) -> Result<(), SchemaError> {
        match name {
            "name" => self.name = value.into_text(name)?.unwrap_or_default(),
            "email" => self.email = value.into_text(name)?.unwrap_or_default(),
            "role" => self.role = value.into_text(name)?.unwrap_or_default().parse()?,
            "status" => self.status = value.into_int(name)?,
            "deleted" => self.deleted = value.into_int(name)?,
            _ => return Err(unknown_field("User", name)),
        }
        Ok(())
    }
}
