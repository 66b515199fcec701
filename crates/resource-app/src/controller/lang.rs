//! User-facing strings, looked up by key with `:name` placeholders.

use std::collections::HashMap;
use std::sync::Arc;

pub const STATUS_DELETE: &str = "core.messages.status_delete";
pub const STATUS_DESTROY: &str = "core.messages.status_destroy";
pub const CHANGED_STATUS: &str = "core.messages.changed_status";
pub const STATUS_CREATE: &str = "core.messages.status_create";
pub const STATUS_UPDATE: &str = "core.messages.status_update";
pub const OOOPS: &str = "core.messages.ooops";
pub const NOT_ALLOWED: &str = "adminuser.messages.not_allowed";

#[derive(Debug, Clone)]
pub struct Translator {
    lines: Arc<HashMap<String, String>>,
}

impl Default for Translator {
    fn default() -> Self {
        Self::english()
    }
}

impl Translator {
    pub fn english() -> Self {
        Self::from_lines([
            (STATUS_DELETE, ":entity has been deleted."),
            (STATUS_DESTROY, ":entity images have been removed."),
            (CHANGED_STATUS, ":entity status has been changed."),
            (STATUS_CREATE, ":entity has been created."),
            (STATUS_UPDATE, ":entity has been updated."),
            (OOOPS, "Ooops, something went wrong. Please try again."),
            (NOT_ALLOWED, "You are not allowed to perform this action."),
        ])
    }

    pub fn from_lines<'a>(lines: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let lines = lines
            .into_iter()
            .map(|(key, line)| (key.to_string(), line.to_string()))
            .collect();
        Self {
            lines: Arc::new(lines),
        }
    }

    /// The line for `key` with placeholders filled in. Unknown keys come back unchanged.
    pub fn translate(&self, key: &str, replacements: &[(&str, &str)]) -> String {
        let Some(line) = self.lines.get(key) else {
            return key.to_string();
        };
        replacements
            .iter()
            .fold(line.clone(), |line, (name, value)| {
                line.replace(&format!(":{name}"), value)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_with_placeholder() {
        let lang = Translator::english();
        assert_eq!(
            lang.translate(STATUS_DELETE, &[("entity", "Post")]),
            "Post has been deleted."
        );
        assert_eq!(lang.translate("missing.key", &[]), "missing.key");
    }
}
