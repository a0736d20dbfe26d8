//! Option registry and resolution engine.
//!
//! Options are declared once with a name pair, a default, and a description.
//! Declaring writes the default into the option's [`Binding`] right away, so
//! every option holds a valid value whether or not [`Conf::parse`] ever runs.
//!
//! [`Conf::parse`] then:
//!
//! 1. initializes every source in attachment order, stopping at the first
//!    failure (no option is touched in that case);
//! 2. for every option, asks every source for a value of the option's kind,
//!    in attachment order, writing each answer as it arrives.
//!
//! Every source is consulted for every option. A later source takes
//! precedence only by answering after an earlier one and overwriting it.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::bind::{self, Bind};
use crate::binding::Binding;
use crate::error::OptfigError;
use crate::option::{OptionEntry, Slot};
use crate::source::Source;
use crate::types::{OptionKey, OptionKind, OptionValue};

/// Declared options keyed by name pair. Iteration follows key order.
pub type Registry = BTreeMap<OptionKey, OptionEntry>;

#[derive(Default)]
pub struct Conf {
    options: Registry,
    sources: Vec<Box<dyn Source>>,
}

impl Conf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry over `sources`, consulted in the given order (last wins).
    pub fn with_sources(sources: Vec<Box<dyn Source>>) -> Self {
        Self {
            options: Registry::new(),
            sources,
        }
    }

    /// Append a source. Builder-style counterpart of [`add_source`](Self::add_source).
    pub fn source<S: Source + 'static>(mut self, source: S) -> Self {
        self.add_source(source);
        self
    }

    /// Append a source after the ones already attached.
    pub fn add_source<S: Source + 'static>(&mut self, source: S) -> &mut Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    // --- declarations ---

    /// Declare an integer option and return a handle to its value.
    pub fn int(&mut self, short: &str, full: &str, default: i64, description: &str) -> Binding<i64> {
        let binding = Binding::new();
        self.int_var(short, full, default, &binding, description);
        binding
    }

    /// Declare an integer option bound to a caller-owned handle.
    pub fn int_var(
        &mut self,
        short: &str,
        full: &str,
        default: i64,
        binding: &Binding<i64>,
        description: &str,
    ) {
        binding.set(default);
        self.declare(
            short,
            full,
            OptionKind::Int,
            OptionValue::Int(default),
            Slot::Int(binding.clone()),
            description,
        );
    }

    pub fn string(
        &mut self,
        short: &str,
        full: &str,
        default: &str,
        description: &str,
    ) -> Binding<String> {
        let binding = Binding::new();
        self.string_var(short, full, default, &binding, description);
        binding
    }

    pub fn string_var(
        &mut self,
        short: &str,
        full: &str,
        default: &str,
        binding: &Binding<String>,
        description: &str,
    ) {
        binding.set(default.to_string());
        self.declare(
            short,
            full,
            OptionKind::String,
            OptionValue::String(default.to_string()),
            Slot::String(binding.clone()),
            description,
        );
    }

    pub fn bool(&mut self, short: &str, full: &str, default: bool, description: &str) -> Binding<bool> {
        let binding = Binding::new();
        self.bool_var(short, full, default, &binding, description);
        binding
    }

    pub fn bool_var(
        &mut self,
        short: &str,
        full: &str,
        default: bool,
        binding: &Binding<bool>,
        description: &str,
    ) {
        binding.set(default);
        self.declare(
            short,
            full,
            OptionKind::Bool,
            OptionValue::Bool(default),
            Slot::Bool(binding.clone()),
            description,
        );
    }

    /// Declare an existence flag. It starts `false` and becomes `true` when a
    /// source reports the flag as set.
    pub fn exist(&mut self, short: &str, full: &str, description: &str) -> Binding<bool> {
        let binding = Binding::new();
        self.exist_var(short, full, &binding, description);
        binding
    }

    pub fn exist_var(&mut self, short: &str, full: &str, binding: &Binding<bool>, description: &str) {
        binding.set(false);
        self.declare(
            short,
            full,
            OptionKind::Existence,
            OptionValue::Bool(false),
            Slot::Bool(binding.clone()),
            description,
        );
    }

    pub fn slice(
        &mut self,
        short: &str,
        full: &str,
        default: Vec<Value>,
        description: &str,
    ) -> Binding<Vec<Value>> {
        let binding = Binding::new();
        self.slice_var(short, full, default, &binding, description);
        binding
    }

    pub fn slice_var(
        &mut self,
        short: &str,
        full: &str,
        default: Vec<Value>,
        binding: &Binding<Vec<Value>>,
        description: &str,
    ) {
        binding.set(default.clone());
        self.declare(
            short,
            full,
            OptionKind::Slice,
            OptionValue::Slice(default),
            Slot::Slice(binding.clone()),
            description,
        );
    }

    /// Store an option. An existing entry with the same name pair is replaced.
    fn declare(
        &mut self,
        short: &str,
        full: &str,
        kind: OptionKind,
        default: OptionValue,
        slot: Slot,
        description: &str,
    ) {
        let key = OptionKey::new(short, full);
        let entry = OptionEntry::new(default, slot, kind, description);
        if self.options.insert(key, entry).is_some() {
            debug!(short, full, "option redeclared, replacing earlier entry");
        }
    }

    // --- resolution ---

    /// Initialize all sources, then resolve every option against every source.
    ///
    /// Fails with [`OptfigError::Init`] if any source fails to initialize; no
    /// option is written in that case.
    pub fn parse(&mut self) -> Result<(), OptfigError> {
        self.init_sources()?;

        for (key, entry) in &self.options {
            for source in &self.sources {
                match query(source.as_ref(), key, entry.kind()) {
                    Some(value) => {
                        debug!(
                            option = key.full(),
                            source = source.name(),
                            value = %value,
                            "resolved option"
                        );
                        entry.put(value);
                    }
                    None => trace!(option = key.full(), source = source.name(), "no value"),
                }
            }
        }
        Ok(())
    }

    fn init_sources(&mut self) -> Result<(), OptfigError> {
        for source in &mut self.sources {
            if let Err(e) = source.init() {
                let source_name = source.name().to_string();
                warn!(source = %source_name, error = %e, "source failed to initialize");
                return Err(OptfigError::Init {
                    source_name,
                    source: Box::new(e),
                });
            }
            debug!(source = source.name(), "initialized source");
        }
        Ok(())
    }

    // --- inspection ---

    /// Read-only view of all declared options.
    pub fn options(&self) -> &Registry {
        &self.options
    }

    pub fn get(&self, short: &str, full: &str) -> Option<&OptionEntry> {
        self.options.get(&OptionKey::new(short, full))
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Hand the registry to a help printer, e.g. [`print_help`](crate::help::print_help).
    pub fn print_help<F: FnOnce(&Registry)>(&self, printer: F) {
        printer(&self.options);
    }

    /// Copy resolved values into the tagged fields of `target`.
    /// See [`bind`](crate::bind) for the matching rules.
    pub fn to_struct<B: Bind + ?Sized>(&self, target: &mut B) {
        bind::bind_struct(&self.options, target);
    }
}

/// Ask `source` for a value of `kind` under `key`.
fn query(source: &dyn Source, key: &OptionKey, kind: OptionKind) -> Option<OptionValue> {
    let (short, full) = (key.short(), key.full());
    match kind {
        OptionKind::Int => source.parse_int(short, full).map(OptionValue::Int),
        OptionKind::String => source.parse_string(short, full).map(OptionValue::String),
        OptionKind::Bool => source.parse_bool(short, full).map(OptionValue::Bool),
        OptionKind::Existence => source.parse_existence(short, full).map(OptionValue::Bool),
        OptionKind::Slice => source.parse_slice(short, full).map(OptionValue::Slice),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::ArgsSource;
    use crate::document::{DocumentFormat, DocumentSource};
    use crate::env::EnvSource;
    use crate::fixtures::test::SAMPLE_JSON;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    fn conf(args: &[&str], delimiter: &str) -> Conf {
        Conf::new().source(ArgsSource::with_delimiter(args.iter().copied(), delimiter))
    }

    /// Source with a fixed answer for every lookup, counting queries.
    struct Fixed {
        label: &'static str,
        value: Option<&'static str>,
        fail_init: bool,
        queries: Rc<Cell<usize>>,
    }

    impl Fixed {
        fn new(label: &'static str, value: Option<&'static str>) -> Self {
            Self {
                label,
                value,
                fail_init: false,
                queries: Rc::new(Cell::new(0)),
            }
        }
    }

    impl Source for Fixed {
        fn name(&self) -> &str {
            self.label
        }

        fn init(&mut self) -> Result<(), OptfigError> {
            if self.fail_init {
                return Err(OptfigError::SourceInit {
                    source_name: self.label.into(),
                    reason: "unreachable".into(),
                });
            }
            Ok(())
        }

        fn parse_int(&self, _: &str, _: &str) -> Option<i64> {
            self.queries.set(self.queries.get() + 1);
            self.value?.parse().ok()
        }

        fn parse_string(&self, _: &str, _: &str) -> Option<String> {
            self.queries.set(self.queries.get() + 1);
            self.value.map(str::to_string)
        }

        fn parse_bool(&self, _: &str, _: &str) -> Option<bool> {
            self.queries.set(self.queries.get() + 1);
            self.value?.parse().ok()
        }

        fn parse_existence(&self, _: &str, _: &str) -> Option<bool> {
            self.queries.set(self.queries.get() + 1);
            Some(self.value.is_some())
        }

        fn parse_slice(&self, _: &str, _: &str) -> Option<Vec<Value>> {
            self.queries.set(self.queries.get() + 1);
            self.value.map(|v| vec![json!(v)])
        }
    }

    #[test]
    fn add_source_appends() {
        let mut c = conf(&[], " ");
        c.add_source(EnvSource::with_vars("ENV_", Vec::<(String, String)>::new()));
        assert_eq!(c.source_names(), vec!["args", "env"]);
    }

    #[test]
    fn parse_without_options_succeeds() {
        let mut c = conf(&[], " ");
        assert!(c.parse().is_ok());
    }

    #[test]
    fn default_applied_without_parse() {
        let mut c = conf(&["-t=Nixel"], "=");
        let t1 = c.string("test", "t", "Ультвэ", "Basic description");
        assert_eq!(t1.get(), "Ультвэ");
    }

    #[test]
    fn string_round_trip() {
        let mut c = conf(&["-t=value1"], "=");
        let t = c.string("t", "test", "default", "d");
        c.parse().unwrap();
        assert_eq!(t.get(), "value1");

        let mut c = conf(&["-x=value1"], "=");
        let t = c.string("t", "test", "default", "d");
        c.parse().unwrap();
        assert_eq!(t.get(), "default");
    }

    #[test]
    fn string_with_equals_delimiter() {
        let mut c = conf(&["-t=mofa"], "=");
        let t1 = c.string("test", "t", "ews", "Basic description");
        let t2 = c.string("test2", "t2", "c0deum", "Basic description 2");
        c.parse().unwrap();
        assert_eq!(t1.get(), "mofa");
        assert_eq!(t2.get(), "c0deum");
    }

    #[test]
    fn string_with_space_delimiter() {
        let mut c = conf(&["-t Jare", "--test2 Hi, My name is FRAG"], " ");
        let t1 = c.string("test", "t", "Hi, There", "Basic description");
        let t2 = c.string("test2", "t2", "Hi, There 2", "Basic description 2");
        c.parse().unwrap();
        assert_eq!(t1.get(), "Jare");
        assert_eq!(t2.get(), "Hi, My name is FRAG");
    }

    #[test]
    fn bools() {
        let mut c = conf(&["-t=true", "--test2=false"], "=");
        let t1 = c.bool("test", "t", false, "Basic description");
        let t2 = c.bool("test2", "t2", true, "Basic description 2");
        let t3 = c.bool("test3", "t3", true, "Basic description 3");
        c.parse().unwrap();
        assert!(t1.get());
        assert!(!t2.get());
        assert!(t3.get());
    }

    #[test]
    fn ints_and_malformed_ints() {
        let mut c = conf(&["--port=8080", "--workers=many"], "=");
        let port = c.int("p", "port", 80, "");
        let workers = c.int("w", "workers", 4, "");
        c.parse().unwrap();
        assert_eq!(port.get(), 8080);
        assert_eq!(workers.get(), 4);
    }

    #[test]
    fn existence_flags() {
        let mut c = conf(&["-t", "--test", "-t2"], "=");
        let t1 = c.exist("test", "t", "Basic description");
        let t2 = c.exist("test2", "t2", "Basic description 2");
        let t3 = c.exist("test3", "t3", "Basic description 3");
        c.parse().unwrap();
        assert!(t1.get());
        assert!(t2.get());
        assert!(!t3.get());
    }

    #[test]
    fn slice_replaces_default() {
        let mut c = conf(&["-t[]=1", "-t[]=2", "-t2"], "=");
        let t1 = c.slice("test", "t", vec![json!(null), json!("3")], "Basic description");
        assert_eq!(t1.get().len(), 2);
        c.parse().unwrap();
        assert_eq!(t1.get(), vec![json!("1"), json!("2")]);
    }

    #[test]
    fn var_forms_write_through_caller_handles() {
        let port = Binding::new();
        let name = Binding::new();
        let mut c = conf(&["--port=9", "--name=x"], "=");
        c.int_var("p", "port", 1, &port, "");
        c.string_var("n", "name", "a", &name, "");
        assert_eq!(port.get(), 1);
        c.parse().unwrap();
        assert_eq!(port.get(), 9);
        assert_eq!(name.get(), "x");
    }

    #[test]
    fn redeclaring_replaces_earlier_entry() {
        let mut c = Conf::new();
        let first = c.string("t", "test", "one", "first");
        let second = c.string("t", "test", "two", "second");
        assert_eq!(c.len(), 1);
        assert_eq!(c.get("t", "test").unwrap().description(), "second");

        c.add_source(ArgsSource::new(["-t=new"]));
        c.parse().unwrap();
        assert_eq!(second.get(), "new");
        assert_eq!(first.get(), "one");
    }

    #[test]
    fn later_source_wins() {
        let mut c = Conf::new()
            .source(ArgsSource::new(["--port=1"]))
            .source(EnvSource::with_vars(
                "ENV_",
                vec![("ENV_port".to_string(), "2".to_string())],
            ));
        let port = c.int("p", "port", 0, "");
        c.parse().unwrap();
        assert_eq!(port.get(), 2);
    }

    #[test]
    fn earlier_answer_survives_later_miss() {
        let mut c = Conf::new()
            .source(Fixed::new("first", Some("7")))
            .source(Fixed::new("second", None));
        let n = c.int("n", "num", 0, "");
        c.parse().unwrap();
        assert_eq!(n.get(), 7);
    }

    #[test]
    fn every_source_consulted_for_every_option() {
        let a = Fixed::new("a", Some("1"));
        let b = Fixed::new("b", Some("2"));
        let (qa, qb) = (a.queries.clone(), b.queries.clone());
        let mut c = Conf::new().source(a).source(b);
        c.int("x", "xs", 0, "");
        c.string("y", "ys", "", "");
        c.exist("z", "zs", "");
        c.parse().unwrap();
        assert_eq!(qa.get(), 3);
        assert_eq!(qb.get(), 3);
    }

    #[test]
    fn init_failure_aborts_before_any_write() {
        let mut broken = Fixed::new("broken", Some("5"));
        broken.fail_init = true;
        let mut c = Conf::new()
            .source(Fixed::new("ok", Some("9")))
            .source(broken);
        let n = c.int("n", "num", 1, "");

        let err = c.parse().unwrap_err();
        assert!(matches!(err, OptfigError::Init { ref source_name, .. } if source_name == "broken"));
        assert_eq!(n.get(), 1);
    }

    #[test]
    fn args_override_document() {
        let doc = DocumentSource::with_reader(DocumentFormat::Json, || {
            Ok(SAMPLE_JSON.as_bytes().to_vec())
        });
        let mut c = Conf::new()
            .source(doc)
            .source(ArgsSource::new(["--Dunkon.Bushwacker=3"]));
        let bush = c.int("Bushwacker", "Dunkon.Bushwacker", 0, "");
        let name = c.string("c0deum", "c0deum", "", "");
        let files = c.slice("ichursin", "Dunkon.mofa.ichursin", vec![], "");
        c.parse().unwrap();
        assert_eq!(bush.get(), 3);
        assert_eq!(name.get(), "NSobolew");
        assert_eq!(files.get(), vec![json!("Villian.zip")]);
    }

    #[test]
    fn print_help_exposes_registry() {
        let mut c = conf(&["--Ayangar=FireGM"], "=");
        c.string("test", "t", "Ayangar", "Basic description");
        c.print_help(|options| {
            let opt = &options[&OptionKey::new("test", "t")];
            assert_eq!(opt.description(), "Basic description");
            assert_eq!(opt.default_value(), &OptionValue::String("Ayangar".into()));
            assert_eq!(opt.kind(), OptionKind::String);
        });
    }
}
