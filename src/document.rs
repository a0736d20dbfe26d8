//! Structured-document source (JSON or TOML).
//!
//! The document is decoded into a tree and flattened into dotted keys (see
//! [`flatten`](crate::flatten)): `{"a": {"b": {"c": 5}}}` is stored under
//! `"a.b.c"`. Arrays are stored whole under their key. Full option names are
//! looked up against these dotted keys.
//!
//! # Short names
//!
//! After flattening, every key's last segment is indexed so that a short name
//! finds the full key: `"c"` resolves to `"a.b.c"`. When several keys share a
//! last segment, only the one flattened last is reachable by short name
//! (`{"a": {"x": 1}, "b": {"x": 2}}` indexes `"x"` → `"b.x"`). Use full names
//! for documents with repeated leaf names.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::OptfigError;
use crate::flatten::flatten;
use crate::source::Source;

/// Encoding of the raw document bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// Guess the format from a file extension (`.json`, `.toml`).
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(DocumentFormat::Json),
            "toml" => Some(DocumentFormat::Toml),
            _ => None,
        }
    }
}

/// Produces the raw document bytes on each `init`.
pub type DocumentReader = Box<dyn Fn() -> Result<Vec<u8>, OptfigError> + Send + Sync>;

enum Input {
    Reader {
        format: DocumentFormat,
        reader: DocumentReader,
    },
    Value(Value),
}

pub struct DocumentSource {
    origin: String,
    path: Option<PathBuf>,
    input: Input,
    parsed: HashMap<String, Value>,
    short_index: HashMap<String, String>,
}

impl DocumentSource {
    /// Read and decode the file at `path` on `init`.
    pub fn file(path: impl Into<PathBuf>, format: DocumentFormat) -> Self {
        let path = path.into();
        let read_path = path.clone();
        let reader: DocumentReader = Box::new(move || {
            std::fs::read(&read_path).map_err(|e| OptfigError::Io {
                path: read_path.clone(),
                source: e,
            })
        });
        Self {
            origin: path.display().to_string(),
            path: Some(path),
            input: Input::Reader { format, reader },
            parsed: HashMap::new(),
            short_index: HashMap::new(),
        }
    }

    pub fn json_file(path: impl Into<PathBuf>) -> Self {
        Self::file(path, DocumentFormat::Json)
    }

    pub fn toml_file(path: impl Into<PathBuf>) -> Self {
        Self::file(path, DocumentFormat::Toml)
    }

    /// Decode bytes produced by a custom reader (embedded config, network
    /// fetch, test fixture).
    pub fn with_reader<F>(format: DocumentFormat, reader: F) -> Self
    where
        F: Fn() -> Result<Vec<u8>, OptfigError> + Send + Sync + 'static,
    {
        Self {
            origin: "<reader>".into(),
            path: None,
            input: Input::Reader {
                format,
                reader: Box::new(reader),
            },
            parsed: HashMap::new(),
            short_index: HashMap::new(),
        }
    }

    /// Use any serializable value as the document. It must serialize to a
    /// map or struct.
    pub fn from_value<S: Serialize + ?Sized>(value: &S) -> Result<Self, OptfigError> {
        let value = serde_json::to_value(value).map_err(|e| OptfigError::Json {
            origin: "<value>".into(),
            source: e,
        })?;
        Ok(Self {
            origin: "<value>".into(),
            path: None,
            input: Input::Value(value),
            parsed: HashMap::new(),
            short_index: HashMap::new(),
        })
    }

    /// Locate the document file through other sources.
    ///
    /// Each source is initialized and asked for a string under `short`/`full`
    /// (e.g. `-c=path` or `--config=path`). Sources that fail to initialize are
    /// skipped; the last answer wins. Falls back to `default_path`.
    pub fn path_from_sources(
        short: &str,
        full: &str,
        default_path: impl Into<PathBuf>,
        format: DocumentFormat,
        sources: &mut [Box<dyn Source>],
    ) -> Self {
        let mut found: Option<String> = None;
        for source in sources.iter_mut() {
            if let Err(e) = source.init() {
                warn!(source = source.name(), error = %e, "skipping source while locating document");
                continue;
            }
            if let Some(path) = source.parse_string(short, full) {
                found = Some(path);
            }
        }

        match found.filter(|p| !p.is_empty()) {
            Some(path) => Self::file(path, format),
            None => Self::file(default_path, format),
        }
    }

    /// `{platform config dir}/{file_name}` for `app_name`, e.g.
    /// `~/.config/myapp/myapp.json` on Linux. `None` if no home directory.
    pub fn platform_file(app_name: &str, file_name: &str, format: DocumentFormat) -> Option<Self> {
        let dirs = directories::ProjectDirs::from("", "", app_name)?;
        Some(Self::file(dirs.config_dir().join(file_name), format))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Flattened keys currently loaded, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.parsed.keys().map(String::as_str)
    }

    fn load(&self) -> Result<Vec<(String, Option<Value>)>, OptfigError> {
        match &self.input {
            Input::Value(value) => flatten_object(value, &self.origin),
            Input::Reader { format, reader } => {
                let bytes = reader()?;
                decode(*format, &bytes, &self.origin)
            }
        }
    }

    fn index(&mut self, pairs: Vec<(String, Option<Value>)>) {
        self.parsed.clear();
        self.short_index.clear();
        for (key, value) in pairs {
            let Some(value) = value.filter(|v| !v.is_null()) else {
                continue;
            };
            let short = key.rsplit('.').next().unwrap_or(&key).to_string();
            self.short_index.insert(short, key.clone());
            self.parsed.insert(key, value);
        }
    }

    fn get(&self, short: &str, full: &str) -> Option<&Value> {
        self.parsed.get(full).or_else(|| {
            self.short_index
                .get(short)
                .and_then(|key| self.parsed.get(key))
        })
    }
}

fn flatten_object(value: &Value, origin: &str) -> Result<Vec<(String, Option<Value>)>, OptfigError> {
    if !value.is_object() {
        return Err(OptfigError::InvalidDocument {
            origin: origin.to_string(),
            reason: "root must be an object".into(),
        });
    }
    Ok(flatten(value)?)
}

fn decode(
    format: DocumentFormat,
    bytes: &[u8],
    origin: &str,
) -> Result<Vec<(String, Option<Value>)>, OptfigError> {
    match format {
        DocumentFormat::Json => {
            let value: Value = serde_json::from_slice(bytes).map_err(|e| OptfigError::Json {
                origin: origin.to_string(),
                source: e,
            })?;
            flatten_object(&value, origin)
        }
        DocumentFormat::Toml => {
            let text = std::str::from_utf8(bytes).map_err(|e| OptfigError::InvalidDocument {
                origin: origin.to_string(),
                reason: e.to_string(),
            })?;
            let table: toml::Table = toml::from_str(text).map_err(|e| OptfigError::Toml {
                origin: origin.to_string(),
                source: e,
            })?;
            Ok(flatten(&table)?)
        }
    }
}

impl Source for DocumentSource {
    fn name(&self) -> &str {
        "document"
    }

    fn init(&mut self) -> Result<(), OptfigError> {
        let pairs = self.load()?;
        self.index(pairs);
        debug!(origin = %self.origin, keys = self.parsed.len(), "loaded document");
        Ok(())
    }

    /// Integers as-is, floats truncated toward zero.
    fn parse_int(&self, short: &str, full: &str) -> Option<i64> {
        match self.get(short, full)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            _ => None,
        }
    }

    fn parse_string(&self, short: &str, full: &str) -> Option<String> {
        self.get(short, full)?.as_str().map(str::to_string)
    }

    fn parse_bool(&self, short: &str, full: &str) -> Option<bool> {
        self.get(short, full)?.as_bool()
    }

    /// Presence of the full key, or of the short name in the index.
    fn parse_existence(&self, short: &str, full: &str) -> Option<bool> {
        Some(self.parsed.contains_key(full) || self.short_index.contains_key(short))
    }

    fn parse_slice(&self, short: &str, full: &str) -> Option<Vec<Value>> {
        self.get(short, full)?.as_array().cloned()
    }
}
