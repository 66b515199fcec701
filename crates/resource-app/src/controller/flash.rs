//! One-shot session notices shown to the user after a redirect.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
    Notice,
}

/// Every notice waiting in a session, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Flashes {
    pub success: Vec<String>,
    pub error: Vec<String>,
    pub notice: Vec<String>,
}

/// The flash bag of one session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    flash: BTreeMap<FlashKind, Vec<String>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the notices of `kind` with `message`.
    pub fn flash(&mut self, kind: FlashKind, message: impl Into<String>) {
        self.flash.insert(kind, vec![message.into()]);
    }

    pub fn peek(&self, kind: FlashKind) -> &[String] {
        self.flash.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns and clears the notices of `kind`.
    pub fn take(&mut self, kind: FlashKind) -> Vec<String> {
        self.flash.remove(&kind).unwrap_or_default()
    }

    pub fn take_all(&mut self) -> Flashes {
        Flashes {
            success: self.take(FlashKind::Success),
            error: self.take(FlashKind::Error),
            notice: self.take(FlashKind::Notice),
        }
    }
}
