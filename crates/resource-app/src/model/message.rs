use super::{resource_id, unknown_field, user_id_from, User, UserId, STATUS_VISIBLE};
use chrono::{DateTime, Utc};
use resource_framework::{Attributes, DeleteMarker, FieldDef, FieldValue, Schema, SchemaError};
use serde::{Deserialize, Serialize};

resource_id!(
    /// Type-safe identifier for chat Messages.
    MessageId
);

/// A chat message. Soft-deleted through `deleted_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub user_id: UserId,
    pub message: String,
    pub status: i64,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// The author, when eagerly loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl Message {
    pub fn schema() -> Schema {
        Schema::new("Message", DeleteMarker::Timestamp("deleted_at"))
            .field(FieldDef::int("user_id"))
            .field(FieldDef::text("message"))
            .field(FieldDef::int("status"))
            .field(FieldDef::timestamp("deleted_at").nullable())
            .field(FieldDef::timestamp("created_at"))
            .fillable(&["message"])
    }

    pub(crate) fn blank(id: MessageId) -> Self {
        Self {
            id,
            user_id: UserId(0),
            message: String::new(),
            status: STATUS_VISIBLE,
            deleted_at: None,
            created_at: Utc::now(),
            user: None,
        }
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }
}

impl Attributes for Message {
    fn attribute(&self, name: &str) -> Option<FieldValue> {
        Some(match name {
            "id" => self.id.into(),
            "user_id" => self.user_id.into(),
            "message" => self.message.as_str().into(),
            "status" => self.status.into(),
            "deleted_at" => self.deleted_at.into(),
            "created_at" => self.created_at.into(),
            _ => return None,
        })
    }

    fn set_attribute(&mut self, name: &str, value: FieldValue) -> Result<(), SchemaError> {
        match name {
            "user_id" => self.user_id = user_id_from(value, name)?,
            "message" => self.message = value.into_text(name)?.unwrap_or_default(),
            "status" => self.status = value.into_int(name)?,
            "deleted_at" => self.deleted_at = value.into_timestamp(name)?,
            "created_at" => {
                if let Some(at) = value.into_timestamp(name)? {
                    self.created_at = at;
                }
            }
            _ => return Err(unknown_field("Message", name)),
        }
        Ok(())
    }

    fn relation(&self, name: &str) -> Option<&dyn Attributes> {
        match name {
            "user" => self.user.as_ref().map(|user| user as &dyn Attributes),
            _ => None,
        }
    }
}
