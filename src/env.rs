use serde_json::Value;
use tracing::debug;

use crate::error::OptfigError;
use crate::keys::FlatStore;
use crate::source::Source;

pub const DEFAULT_ENV_PREFIX: &str = "ENV_";

/// Environment variable source.
///
/// Only variables starting with the prefix are considered; the prefix is
/// stripped and the remainder is the key, matched case-sensitively.
/// `PREFIX_tags[]` and `PREFIX_tags[N]` accumulate into a list under `tags`.
///
/// | Env var          | Key    |
/// |------------------|--------|
/// | `ENV_port`       | `port` |
/// | `ENV_tags[0]`    | `tags` |
/// | `ENV_tags[]`     | `tags` |
///
/// Array entries are accumulated in the order the variables are enumerated,
/// which for the live process environment is platform-defined. Use
/// [`with_vars`](Self::with_vars) when the order matters.
pub struct EnvSource {
    prefix: String,
    vars: Option<Vec<(String, String)>>,
    parsed: FlatStore,
}

impl EnvSource {
    /// Source over the process environment with the `ENV_` prefix.
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_ENV_PREFIX)
    }

    /// Source over the process environment with a custom prefix. The
    /// environment is read at `init` time.
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            vars: None,
            parsed: FlatStore::default(),
        }
    }

    /// Source over a fixed set of variables instead of `std::env::vars()`.
    pub fn with_vars(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            prefix: prefix.to_string(),
            vars: Some(vars.into_iter().collect()),
            parsed: FlatStore::default(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn scan(&mut self, vars: impl IntoIterator<Item = (String, String)>) {
        for (key, value) in vars {
            let Some(rest) = key.strip_prefix(&self.prefix) else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }
            self.parsed.insert(rest, value);
        }
    }
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of the process environment, skipping variables that are not
/// valid UTF-8.
fn process_vars() -> Vec<(String, String)> {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

impl Source for EnvSource {
    fn name(&self) -> &str {
        "env"
    }

    fn init(&mut self) -> Result<(), OptfigError> {
        self.parsed.clear();
        let vars = match &self.vars {
            Some(vars) => vars.clone(),
            None => process_vars(),
        };
        self.scan(vars);
        debug!(prefix = %self.prefix, "scanned environment variables");
        Ok(())
    }

    fn parse_int(&self, short: &str, full: &str) -> Option<i64> {
        self.parsed.int(short, full)
    }

    fn parse_string(&self, short: &str, full: &str) -> Option<String> {
        self.parsed.string(short, full)
    }

    fn parse_bool(&self, short: &str, full: &str) -> Option<bool> {
        self.parsed.bool(short, full)
    }

    fn parse_existence(&self, short: &str, full: &str) -> Option<bool> {
        self.parsed.existence(short, full)
    }

    fn parse_slice(&self, short: &str, full: &str) -> Option<Vec<Value>> {
        self.parsed.slice(short, full)
    }
}
