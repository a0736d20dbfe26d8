//! Command-line argument source.
//!
//! Each token is run through a parser that extracts `(key, raw_value)`. The
//! default parser understands:
//!
//! | Token              | Key     | Value       |
//! |--------------------|---------|-------------|
//! | `--name=value`     | `name`  | `value`     |
//! | `-n=value`         | `n`     | `value`     |
//! | `--flag`           | `flag`  | `"true"`    |
//! | `-tags[]=a`        | `tags[]`| `a`         |
//! | `positional`       | dropped |             |
//!
//! Keys with array syntax are accumulated into lists (see [`FlatStore`]).

use serde_json::Value;
use tracing::debug;

use crate::error::OptfigError;
use crate::keys::FlatStore;
use crate::source::Source;

/// Token parser: `None` drops the token.
pub type ArgParser = Box<dyn Fn(&str) -> Option<(String, String)> + Send + Sync>;

/// Default token parser.
///
/// Strips a leading `--` or `-`, then splits on the first `delimiter`. A token
/// without a delimiter is a bare flag and gets the value `"true"`. Tokens that
/// do not start with a dash, or that have nothing after the dashes, yield `None`.
pub fn default_arg_parser(token: &str, delimiter: &str) -> Option<(String, String)> {
    let rest = token
        .strip_prefix("--")
        .or_else(|| token.strip_prefix('-'))?;

    let (key, value) = match rest.split_once(delimiter) {
        Some((k, v)) if !delimiter.is_empty() => (k, v),
        _ => (rest, "true"),
    };

    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.to_string()))
}

pub struct ArgsSource {
    args: Vec<String>,
    parser: ArgParser,
    parsed: FlatStore,
}

impl ArgsSource {
    /// Source over `args` using `=` as the assignment delimiter.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_delimiter(args, "=")
    }

    /// Source over `args` with a custom assignment delimiter (e.g. `" "` for
    /// tokens like `"--name value"` passed as a single argument).
    pub fn with_delimiter<I, S>(args: I, delimiter: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let delimiter = delimiter.to_string();
        Self::with_parser(args, move |token| default_arg_parser(token, &delimiter))
    }

    /// Source over `args` with a fully custom token parser.
    pub fn with_parser<I, S, F>(args: I, parser: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&str) -> Option<(String, String)> + Send + Sync + 'static,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            parser: Box::new(parser),
            parsed: FlatStore::default(),
        }
    }

    /// Source over the current process arguments.
    pub fn from_env() -> Self {
        Self::new(std::env::args())
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Source for ArgsSource {
    fn name(&self) -> &str {
        "args"
    }

    fn init(&mut self) -> Result<(), OptfigError> {
        self.parsed.clear();
        for token in &self.args {
            if let Some((key, value)) = (self.parser)(token) {
                self.parsed.insert(&key, value);
            }
        }
        debug!(tokens = self.args.len(), "parsed command-line arguments");
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn init(args: &[&str], delimiter: &str) -> ArgsSource {
        let mut src = ArgsSource::with_delimiter(args.iter().copied(), delimiter);
        src.init().unwrap();
        src
    }

    #[test]
    fn parser_full_format() {
        assert_eq!(
            default_arg_parser("--test=Koddi", "="),
            Some(("test".into(), "Koddi".into()))
        );
    }

    #[test]
    fn parser_short_format() {
        assert_eq!(
            default_arg_parser("-t=Koddi", "="),
            Some(("t".into(), "Koddi".into()))
        );
    }

    #[test]
    fn parser_space_delimiter_keeps_rest_of_token() {
        assert_eq!(
            default_arg_parser("-t drewoko loves Koddi", " "),
            Some(("t".into(), "drewoko loves Koddi".into()))
        );
    }

    #[test]
    fn parser_splits_on_first_delimiter_only() {
        assert_eq!(
            default_arg_parser("--url=a=b", "="),
            Some(("url".into(), "a=b".into()))
        );
    }

    #[test]
    fn parser_bare_flag_is_true() {
        assert_eq!(
            default_arg_parser("--verbose", "="),
            Some(("verbose".into(), "true".into()))
        );
    }

    #[test]
    fn parser_drops_positional_and_empty_keys() {
        assert_eq!(default_arg_parser("positional", "="), None);
        assert_eq!(default_arg_parser("-", "="), None);
        assert_eq!(default_arg_parser("--=x", "="), None);
    }

    #[test]
    fn init_collects_scalars() {
        let src = init(&["-t=Panzer"], "=");
        assert_eq!(src.parse_string("t", "test").as_deref(), Some("Panzer"));
    }

    #[test]
    fn lookup_by_either_name() {
        let src = init(&["--test=ArtifexHomicida", "-t2=drewoko"], "=");
        assert_eq!(
            src.parse_string("t", "test").as_deref(),
            Some("ArtifexHomicida")
        );
        assert_eq!(src.parse_string("t2", "test2").as_deref(), Some("drewoko"));
        assert_eq!(src.parse_string("t3", "test3"), None);
    }

    #[test]
    fn parse_int_converts_or_misses() {
        let src = init(&["--test 1"], " ");
        assert_eq!(src.parse_int("t", "test"), Some(1));

        let src = init(&["-t=The_Guy"], "=");
        assert_eq!(src.parse_int("t", "test"), None);
    }

    #[test]
    fn parse_bool_requires_key() {
        let src = init(&["-t=true"], "=");
        assert_eq!(src.parse_bool("t", "test"), Some(true));

        let src = init(&["-t2=false"], "=");
        assert_eq!(src.parse_bool("t", "test"), None);
        assert_eq!(src.parse_bool("t2", "test2"), Some(false));
    }

    #[test]
    fn existence_from_bare_flag() {
        let src = init(&["-t"], "=");
        assert_eq!(src.parse_existence("t", "test"), Some(true));
        assert_eq!(src.parse_existence("t2", "test2"), Some(false));
    }

    #[test]
    fn slices_accumulate_in_token_order() {
        let src = init(&["-t[]=false", "-t[]=2", "-t[1]=3", "--test1"], "=");
        let items = src.parse_slice("t", "test").unwrap();
        assert_eq!(items, vec![json!("false"), json!("2"), json!("3")]);
        assert_eq!(src.parse_slice("x", "xs"), None);
    }

    #[test]
    fn reinit_does_not_duplicate_slices() {
        let mut src = init(&["-t[]=1", "-t[]=2"], "=");
        src.init().unwrap();
        assert_eq!(src.parse_slice("t", "test").unwrap().len(), 2);
    }

    #[test]
    fn custom_parser() {
        let mut src = ArgsSource::with_parser(["name:value"], |token| {
            token
                .split_once(':')
                .map(|(k, v)| (k.to_string(), v.to_string()))
        });
        src.init().unwrap();
        assert_eq!(src.parse_string("n", "name").as_deref(), Some("value"));
    }

    #[test]
    fn program_name_is_ignored() {
        let src = init(&["/usr/bin/app", "--port=80"], "=");
        assert_eq!(src.parse_int("p", "port"), Some(80));
        assert_eq!(src.args().len(), 2);
    }
}
