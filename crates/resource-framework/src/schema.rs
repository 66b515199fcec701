//! # Resource Schema
//!
//! Every resource type describes its shape once, as a [`Schema`]: an ordered list of named,
//! typed fields plus the three lists that drive the generic lifecycle.
//!
//! - **fillable** - the only fields that may be populated from untrusted input.
//! - **image fields** - references to stored images; nulled when a resource is destroyed.
//! - **modify fields** - the table mapping each [`ModifyAction`] to a [`Transition`].
//!
//! A schema is plain data. It is built by the resource module (e.g. `Post::schema()`) and handed
//! to the [`ResourceActor`](crate::ResourceActor) at construction, so two actors of the same type
//! can run with different tables and nothing is shared process-wide.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Field names that conventionally hold image references.
pub const IMAGE_FIELDS: &[&str] = &[
    "capture",
    "capture_id",
    "drawing",
    "drawing_id",
    "image",
    "image_id",
    "icon",
    "icon_id",
    "illustration",
    "illustration_id",
    "painting",
    "painting_id",
    "photo",
    "photo_id",
    "photograph",
    "photograph_id",
    "picture",
    "picture_id",
    "portrait",
    "portrait_id",
    "selfie",
    "selfie_id",
    "sketch",
    "sketch_id",
    "snapshot",
    "snapshot_id",
    "vignete",
    "vignete_id",
];

/// Schema violations and dispatch lookups that failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    #[error("Unknown field `{field}` on {resource}")]
    UnknownField { resource: String, field: String },
    #[error("Field `{field}` expects {expected:?}")]
    TypeMismatch { field: String, expected: FieldKind },
    #[error("Field `{0}` can not be null")]
    NotNullable(String),
}

// =============================================================================
// VALUES
// =============================================================================

/// A single attribute value as it travels between input, entities and storage.
///
/// Deserialization is untagged: `null`, integers and strings map to `Null`, `Int` and `Text`.
/// Timestamps arrive as text and are parsed when the schema coerces them. Anything else
/// (booleans, floats, arrays, objects) is kept as `Json` so a request carrying such keys still
/// reaches the fillable filter; no field kind accepts it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Int(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
    Json(serde_json::Value),
}

impl FieldValue {
    /// 0/1 representation used for status and delete flags.
    pub fn flag(on: bool) -> Self {
        FieldValue::Int(i64::from(on))
    }

    /// `null`, `0`, `""` and `"0"` count as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Int(n) => *n == 0,
            FieldValue::Text(s) => s.is_empty() || s == "0",
            FieldValue::Timestamp(_) => false,
            FieldValue::Json(v) => match v {
                serde_json::Value::Bool(b) => !b,
                serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
                serde_json::Value::Array(items) => items.is_empty(),
                _ => false,
            },
        }
    }

    /// Numeric reading of the value; numeric text is accepted.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_int(self, field: &str) -> Result<i64, SchemaError> {
        match self {
            FieldValue::Int(n) => Ok(n),
            FieldValue::Null => Err(SchemaError::NotNullable(field.to_string())),
            _ => Err(SchemaError::TypeMismatch {
                field: field.to_string(),
                expected: FieldKind::Int,
            }),
        }
    }

    pub fn into_text(self, field: &str) -> Result<Option<String>, SchemaError> {
        match self {
            FieldValue::Text(s) => Ok(Some(s)),
            FieldValue::Null => Ok(None),
            _ => Err(SchemaError::TypeMismatch {
                field: field.to_string(),
                expected: FieldKind::Text,
            }),
        }
    }

    pub fn into_timestamp(self, field: &str) -> Result<Option<DateTime<Utc>>, SchemaError> {
        match self {
            FieldValue::Timestamp(t) => Ok(Some(t)),
            FieldValue::Null => Ok(None),
            _ => Err(SchemaError::TypeMismatch {
                field: field.to_string(),
                expected: FieldKind::Timestamp,
            }),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Int(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(t: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(t)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// A bag of named values, typically the parameters of one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(BTreeMap<String, FieldValue>);

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, FieldValue)> for Payload {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// =============================================================================
// FIELDS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int,
    Text,
    Timestamp,
}

/// One named, typed column of a resource.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub nullable: bool,
}

impl FieldDef {
    pub fn int(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Int, nullable: false }
    }

    pub fn text(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Text, nullable: false }
    }

    pub fn timestamp(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Timestamp, nullable: false }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// How a resource type records that it was deleted. Exactly one mechanism per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMarker {
    /// An integer column set to 1.
    Flag(&'static str),
    /// A nullable timestamp column set to the deletion time.
    Timestamp(&'static str),
}

impl DeleteMarker {
    pub fn field(&self) -> &'static str {
        match self {
            DeleteMarker::Flag(field) | DeleteMarker::Timestamp(field) => field,
        }
    }

    /// The value written when the resource is deleted.
    pub fn deleted_value(&self) -> FieldValue {
        match self {
            DeleteMarker::Flag(_) => FieldValue::flag(true),
            DeleteMarker::Timestamp(_) => FieldValue::Timestamp(Utc::now()),
        }
    }
}

// =============================================================================
// MODIFY DISPATCH
// =============================================================================

/// The closed set of modification requests a controller can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModifyAction {
    Delete,
    Destroy,
    Hide,
    Show,
    Status,
}

impl ModifyAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModifyAction::Delete => "delete",
            ModifyAction::Destroy => "destroy",
            ModifyAction::Hide => "hide",
            ModifyAction::Show => "show",
            ModifyAction::Status => "status",
        }
    }
}

impl fmt::Display for ModifyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModifyAction {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "delete" => Ok(ModifyAction::Delete),
            "destroy" => Ok(ModifyAction::Destroy),
            "hide" => Ok(ModifyAction::Hide),
            "show" => Ok(ModifyAction::Show),
            "status" => Ok(ModifyAction::Status),
            other => Err(SchemaError::UnknownAction(other.to_string())),
        }
    }
}

/// What a modification does to the stored row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Set the delete marker. The row stays.
    Delete,
    /// Null every fillable image field. The row stays and is not marked deleted.
    Destroy,
    /// Flip a 0/1 field.
    Toggle(String),
}

/// Per-type table from action to transition.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifyFields(BTreeMap<ModifyAction, Transition>);

impl ModifyFields {
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn map(mut self, action: ModifyAction, transition: Transition) -> Self {
        self.0.insert(action, transition);
        self
    }

    pub fn get(&self, action: ModifyAction) -> Option<&Transition> {
        self.0.get(&action)
    }
}

impl Default for ModifyFields {
    fn default() -> Self {
        Self::empty()
            .map(ModifyAction::Delete, Transition::Delete)
            .map(ModifyAction::Hide, Transition::Toggle("status".into()))
            .map(ModifyAction::Show, Transition::Toggle("status".into()))
            .map(ModifyAction::Status, Transition::Toggle("status".into()))
    }
}

// =============================================================================
// SCHEMA
// =============================================================================

#[derive(Debug, Clone)]
pub struct Schema {
    name: &'static str,
    fields: Vec<FieldDef>,
    fillable: Vec<&'static str>,
    image_fields: Vec<&'static str>,
    delete_marker: DeleteMarker,
    modify_fields: ModifyFields,
}

impl Schema {
    /// Starts a schema with the default image-field list and modify table.
    pub fn new(name: &'static str, delete_marker: DeleteMarker) -> Self {
        Self {
            name,
            fields: Vec::new(),
            fillable: Vec::new(),
            image_fields: IMAGE_FIELDS.to_vec(),
            delete_marker,
            modify_fields: ModifyFields::default(),
        }
    }

    pub fn field(mut self, def: FieldDef) -> Self {
        self.fields.push(def);
        self
    }

    pub fn fillable(mut self, fields: &[&'static str]) -> Self {
        self.fillable = fields.to_vec();
        self
    }

    pub fn image_fields(mut self, fields: &[&'static str]) -> Self {
        self.image_fields = fields.to_vec();
        self
    }

    pub fn modify_fields(mut self, table: ModifyFields) -> Self {
        self.modify_fields = table;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn lookup(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|def| def.name == name)
    }

    pub fn fillable_fields(&self) -> &[&'static str] {
        &self.fillable
    }

    pub fn image_field_names(&self) -> &[&'static str] {
        &self.image_fields
    }

    pub fn delete_marker(&self) -> DeleteMarker {
        self.delete_marker
    }

    fn unknown_field(&self, field: &str) -> SchemaError {
        SchemaError::UnknownField {
            resource: self.name.to_string(),
            field: field.to_string(),
        }
    }

    /// Converts `value` to the declared kind of `field`.
    ///
    /// Numeric text becomes `Int`, integers become `Text`, RFC 3339 text becomes `Timestamp`.
    pub fn coerce(&self, field: &str, value: FieldValue) -> Result<FieldValue, SchemaError> {
        let def = self.lookup(field).ok_or_else(|| self.unknown_field(field))?;
        let mismatch = || SchemaError::TypeMismatch {
            field: field.to_string(),
            expected: def.kind,
        };

        match (def.kind, value) {
            (_, FieldValue::Null) if def.nullable => Ok(FieldValue::Null),
            (_, FieldValue::Null) => Err(SchemaError::NotNullable(field.to_string())),
            (FieldKind::Int, FieldValue::Int(n)) => Ok(FieldValue::Int(n)),
            (FieldKind::Int, FieldValue::Text(s)) => {
                s.trim().parse().map(FieldValue::Int).map_err(|_| mismatch())
            }
            (FieldKind::Text, FieldValue::Text(s)) => Ok(FieldValue::Text(s)),
            (FieldKind::Text, FieldValue::Int(n)) => Ok(FieldValue::Text(n.to_string())),
            (FieldKind::Timestamp, FieldValue::Timestamp(t)) => Ok(FieldValue::Timestamp(t)),
            (FieldKind::Timestamp, FieldValue::Text(s)) => DateTime::parse_from_rfc3339(s.trim())
                .map(|t| FieldValue::Timestamp(t.with_timezone(&Utc)))
                .map_err(|_| mismatch()),
            _ => Err(mismatch()),
        }
    }

    /// Picks the fillable fields present in `input`, in fillable order.
    ///
    /// Keys that are not fillable are dropped without error.
    pub fn fillable_from(
        &self,
        input: &Payload,
    ) -> Result<Vec<(&'static str, FieldValue)>, SchemaError> {
        self.fillable
            .iter()
            .filter_map(|field| input.get(field).map(|value| (*field, value.clone())))
            .map(|(field, value)| Ok((field, self.coerce(field, value)?)))
            .collect()
    }

    /// Fields nulled by [`Transition::Destroy`]: fillable and image fields at once.
    pub fn destroyable_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fillable
            .iter()
            .copied()
            .filter(|field| self.image_fields.contains(field))
    }

    /// Resolves the transition for `action`.
    ///
    /// Delete and destroy win whether they come from the action itself or from the table.
    /// Anything else is a toggle of `attribute`, or of the field the table maps the action to.
    pub fn transition(
        &self,
        action: ModifyAction,
        attribute: Option<&str>,
    ) -> Result<Transition, SchemaError> {
        let mapped = self.modify_fields.get(action);

        if action == ModifyAction::Delete || mapped == Some(&Transition::Delete) {
            return Ok(Transition::Delete);
        }
        if action == ModifyAction::Destroy || mapped == Some(&Transition::Destroy) {
            return Ok(Transition::Destroy);
        }

        let field = match (attribute, mapped) {
            (Some(field), _) => field.to_string(),
            (None, Some(Transition::Toggle(field))) => field.clone(),
            _ => return Err(SchemaError::UnknownAction(action.to_string())),
        };
        if self.lookup(&field).is_none() {
            return Err(self.unknown_field(&field));
        }
        Ok(Transition::Toggle(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::new("Post", DeleteMarker::Flag("deleted"))
            .field(FieldDef::text("title"))
            .field(FieldDef::text("photo").nullable())
            .field(FieldDef::text("banner").nullable())
            .field(FieldDef::int("status"))
            .field(FieldDef::int("deleted"))
            .field(FieldDef::timestamp("published_at").nullable())
            .fillable(&["title", "photo", "banner"])
    }

    #[test]
    fn test_fillable_from_drops_unknown_keys() {
        let input = Payload::new()
            .with("title", "Hello")
            .with("status", 1)
            .with("is_admin", 1);

        let fields = schema().fillable_from(&input).unwrap();
        assert_eq!(fields, vec![("title", FieldValue::from("Hello"))]);
    }

    #[test]
    fn test_payload_accepts_any_json_value() {
        let input: Payload = serde_json::from_str(
            r#"{"task":"create","title":"x","remember":true,"tags":["a"],"ratio":0.5}"#,
        )
        .unwrap();
        assert_eq!(input.len(), 5);
        assert_eq!(input.get("remember"), Some(&FieldValue::Json(serde_json::json!(true))));

        let fields = schema().fillable_from(&input).unwrap();
        assert_eq!(fields, vec![("title", FieldValue::from("x"))]);

        // a fillable field still has to carry its own kind
        let mistyped: Payload = serde_json::from_str(r#"{"title":["x"]}"#).unwrap();
        assert!(matches!(
            schema().fillable_from(&mistyped),
            Err(SchemaError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_coerce_converts_numeric_text() {
        let schema = schema();
        assert_eq!(schema.coerce("status", "1".into()).unwrap(), FieldValue::Int(1));
        assert!(matches!(
            schema.coerce("status", "yes".into()),
            Err(SchemaError::TypeMismatch { .. })
        ));
        assert!(matches!(
            schema.coerce("title", FieldValue::Null),
            Err(SchemaError::NotNullable(_))
        ));
        assert!(matches!(
            schema.coerce("published_at", "2024-05-01T10:00:00Z".into()).unwrap(),
            FieldValue::Timestamp(_)
        ));
    }

    #[test]
    fn test_destroyable_fields_are_fillable_images_only() {
        let fields: Vec<_> = schema().destroyable_fields().collect();
        // banner is fillable but not a known image field
        assert_eq!(fields, vec!["photo"]);
    }

    #[test]
    fn test_transition_resolution() {
        let schema = schema();
        assert_eq!(schema.transition(ModifyAction::Delete, None).unwrap(), Transition::Delete);
        assert_eq!(schema.transition(ModifyAction::Destroy, None).unwrap(), Transition::Destroy);
        assert_eq!(
            schema.transition(ModifyAction::Hide, None).unwrap(),
            Transition::Toggle("status".into())
        );
        assert_eq!(
            schema.transition(ModifyAction::Show, Some("deleted")).unwrap(),
            Transition::Toggle("deleted".into())
        );
    }

    #[test]
    fn test_transition_without_mapping_is_unknown_action() {
        let schema = schema().modify_fields(ModifyFields::empty());
        assert_eq!(
            schema.transition(ModifyAction::Hide, None),
            Err(SchemaError::UnknownAction("hide".into()))
        );
        // delete needs no table entry
        assert_eq!(schema.transition(ModifyAction::Delete, None).unwrap(), Transition::Delete);
    }

    #[test]
    fn test_table_can_route_an_action_to_delete() {
        let schema = schema().modify_fields(
            ModifyFields::empty().map(ModifyAction::Status, Transition::Delete),
        );
        assert_eq!(schema.transition(ModifyAction::Status, None).unwrap(), Transition::Delete);
    }

    #[test]
    fn test_parse_modify_action() {
        assert_eq!("hide".parse::<ModifyAction>().unwrap(), ModifyAction::Hide);
        assert_eq!(
            "publish".parse::<ModifyAction>(),
            Err(SchemaError::UnknownAction("publish".into()))
        );
    }

    #[test]
    fn test_empty_values() {
        assert!(FieldValue::Null.is_empty());
        assert!(FieldValue::Int(0).is_empty());
        assert!(FieldValue::from("0").is_empty());
        assert!(!FieldValue::Int(7).is_empty());
        assert_eq!(FieldValue::from("7").as_int(), Some(7));
    }

    #[test]
    fn test_payload_from_json() {
        let payload: Payload =
            serde_json::from_str(r#"{"title":"Hi","status":1,"photo":null}"#).unwrap();
        assert_eq!(payload.get("title"), Some(&FieldValue::from("Hi")));
        assert_eq!(payload.get("status"), Some(&FieldValue::Int(1)));
        assert_eq!(payload.get("photo"), Some(&FieldValue::Null));
    }
}
