//! Domain models: plain data plus the [`Schema`](resource_framework::Schema) that describes each
//! of them to the resource actor.

pub mod message;
pub mod post;
pub mod user;

pub use message::*;
pub use post::*;
pub use user::*;

use resource_framework::{FieldKind, FieldValue, SchemaError};

pub const STATUS_VISIBLE: i64 = 1;
pub const STATUS_HIDDEN: i64 = 0;
pub const DELETED: i64 = 1;
pub const USER_ACTIVE: i64 = 1;
pub const USER_BANNED: i64 = 0;

/// Declares a `u32` newtype id usable as `ResourceEntity::Id`.
macro_rules! resource_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for resource_framework::FieldValue {
            fn from(id: $name) -> Self {
                resource_framework::FieldValue::Int(i64::from(id.0))
            }
        }
    };
}

pub(crate) use resource_id;

/// Reads a user id out of an integer field.
pub(crate) fn user_id_from(value: FieldValue, field: &str) -> Result<UserId, SchemaError> {
    let raw = value.into_int(field)?;
    u32::try_from(raw)
        .map(UserId)
        .map_err(|_| SchemaError::TypeMismatch {
            field: field.to_string(),
            expected: FieldKind::Int,
        })
}

pub(crate) fn unknown_field(resource: &str, field: &str) -> SchemaError {
    SchemaError::UnknownField {
        resource: resource.to_string(),
        field: field.to_string(),
    }
}
