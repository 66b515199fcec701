//! The parts of an HTTP request the controllers work with.

use resource_framework::{FieldValue, Payload};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A file received with the request, already stored on local disk.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    path: PathBuf,
    original_name: String,
}

impl UploadedFile {
    pub fn new(path: impl Into<PathBuf>, original_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            original_name: original_name.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Extension of the name the client sent, without the dot.
    pub fn extension(&self) -> &str {
        Path::new(&self.original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Default)]
pub struct Request {
    params: Payload,
    files: HashMap<String, UploadedFile>,
}

impl Request {
    pub fn new(params: Payload) -> Self {
        Self {
            params,
            files: HashMap::new(),
        }
    }

    pub fn with_file(mut self, field: impl Into<String>, file: UploadedFile) -> Self {
        self.files.insert(field.into(), file);
        self
    }

    pub fn param(&self, name: &str) -> Option<&FieldValue> {
        self.params.get(name)
    }

    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.params.insert(name, value);
    }

    pub fn file(&self, field: &str) -> Option<&UploadedFile> {
        self.files.get(field)
    }

    pub fn params(&self) -> &Payload {
        &self.params
    }

    pub fn into_params(self) -> Payload {
        self.params
    }
}
