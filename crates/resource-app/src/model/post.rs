use super::{resource_id, unknown_field, user_id_from, UserId, STATUS_VISIBLE};
use resource_framework::{Attributes, DeleteMarker, FieldDef, FieldValue, Schema, SchemaError};
use serde::{Deserialize, Serialize};

resource_id!(
    /// Type-safe identifier for Posts.
    PostId
);

/// A user's post: the sample modifiable resource.
///
/// Soft-deleted through the `deleted` flag. `photo` and `icon` are image fields, so a
/// destroy clears them and leaves the text in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub user_id: UserId,
    pub title: String,
    pub body: String,
    pub photo: Option<String>,
    pub icon: Option<String>,
    pub status: i64,
    pub deleted: i64,
}

impl Post {
    pub fn schema() -> Schema {
        Schema::new("Post", DeleteMarker::Flag("deleted"))
            .field(FieldDef::int("user_id"))
            .field(FieldDef::text("title"))
            .field(FieldDef::text("body"))
            .field(FieldDef::text("photo").nullable())
            .field(FieldDef::text("icon").nullable())
            .field(FieldDef::int("status"))
            .field(FieldDef::int("deleted"))
            .fillable(&["title", "body", "photo", "icon"])
    }

    pub(crate) fn blank(id: PostId) -> Self {
        Self {
            id,
            user_id: UserId(0),
            title: String::new(),
            body: String::new(),
            photo: None,
            icon: None,
            status: STATUS_VISIBLE,
            deleted: 0,
        }
    }
}

impl Attributes for Post {
    fn attribute(&self, name: &str) -> Option<FieldValue> {
        Some(match name {
            "id" => self.id.into(),
            "user_id" => self.user_id.into(),
            "title" => self.title.as_str().into(),
            "body" => self.body.as_str().into(),
            "photo" => self.photo.clone().into(),
            "icon" => self.icon.clone().into(),
            "status" => self.status.into(),
            "deleted" => self.deleted.into(),
            _ => return None,
        })
    }

    fn set_attribute(&mut self, name: &str, value: FieldValue) -> Result<(), SchemaError> {
        match name {
            "user_id" => self.user_id = user_id_from(value, name)?,
            "title" => self.title = value.into_text(name)?.unwrap_or_default(),
            "body" => self.body = value.into_text(name)?.unwrap_or_default(),
            "photo" => self.photo = value.into_text(name)?,
            "icon" => self.icon = value.into_text(name)?,
            "status" => self.status = value.into_int(name)?,
            "deleted" => self.deleted = value.into_int(name)?,
            _ => return Err(unknown_field("Post", name)),
        }
        Ok(())
    }
}
