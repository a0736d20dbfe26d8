//! Projecting resolved options onto caller structs.
//!
//! A struct opts in by implementing [`Bind`], listing the fields that should
//! receive option values. Each leaf field carries a tag naming an option by its
//! short or full name; nested structs are listed with [`Field::nested`] and are
//! walked recursively, with their tags matched against the same registry.
//!
//! ```ignore
//! struct Server { port: i64, tls: bool }
//! struct App { name: String, server: Server }
//!
//! impl Bind for Server {
//!     fn fields(&mut self) -> Vec<Field<'_>> {
//!         vec![Field::tagged("port", &mut self.port), Field::tagged("tls", &mut self.tls)]
//!     }
//! }
//!
//! impl Bind for App {
//!     fn fields(&mut self) -> Vec<Field<'_>> {
//!         vec![Field::tagged("name", &mut self.name), Field::nested(&mut self.server)]
//!     }
//! }
//!
//! conf.to_struct(&mut app);
//! ```
//!
//! # Matching
//!
//! For each tagged field the registry is scanned in key order and the first
//! option whose short or full name equals the tag is taken. Then:
//!
//! | Option kind          | Plain field      | Handle field                    |
//! |----------------------|------------------|---------------------------------|
//! | `Int`                | `i64`            | `Option<Binding<i64>>`          |
//! | `String`             | `String`         | `Option<Binding<String>>`       |
//! | `Bool`, `Existence`  | `bool`           | `Option<Binding<bool>>`         |
//! | `Slice`              | `Vec<Value>`     | `Option<Binding<Vec<Value>>>`   |
//!
//! Plain fields receive a copy of the current value. Handle fields receive a
//! clone of the option's [`Binding`], a read-only view that keeps tracking
//! the option. Fields whose type does not match the matched option, and
//! fields whose tag matches no option, are left untouched.

use serde_json::Value;
use tracing::trace;

use crate::binding::Binding;
use crate::conf::Registry;
use crate::option::{OptionEntry, Slot};

/// A struct whose fields can receive option values.
pub trait Bind {
    fn fields(&mut self) -> Vec<Field<'_>>;
}

pub enum Field<'a> {
    Leaf { tag: &'a str, target: Target<'a> },
    Nested(&'a mut dyn Bind),
}

impl<'a> Field<'a> {
    /// A field filled from the option named `tag`.
    pub fn tagged(tag: &'a str, target: impl Into<Target<'a>>) -> Self {
        Field::Leaf {
            tag,
            target: target.into(),
        }
    }

    /// A nested struct, walked recursively.
    pub fn nested<B: Bind>(inner: &'a mut B) -> Self {
        Field::Nested(inner)
    }
}

/// Writable location of a leaf field.
pub enum Target<'a> {
    Int(&'a mut i64),
    String(&'a mut String),
    Bool(&'a mut bool),
    Slice(&'a mut Vec<Value>),
    IntRef(&'a mut Option<Binding<i64>>),
    StringRef(&'a mut Option<Binding<String>>),
    BoolRef(&'a mut Option<Binding<bool>>),
    SliceRef(&'a mut Option<Binding<Vec<Value>>>),
}

macro_rules! target_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'a> From<&'a mut $ty> for Target<'a> {
                fn from(field: &'a mut $ty) -> Self {
                    Target::$variant(field)
                }
            }
        )*
    };
}

target_from! {
    i64 => Int,
    String => String,
    bool => Bool,
    Vec<Value> => Slice,
    Option<Binding<i64>> => IntRef,
    Option<Binding<String>> => StringRef,
    Option<Binding<bool>> => BoolRef,
    Option<Binding<Vec<Value>>> => SliceRef,
}

/// Fill the tagged fields of `target` (and of its nested structs) from `registry`.
pub fn bind_struct<B: Bind + ?Sized>(registry: &Registry, target: &mut B) {
    for field in target.fields() {
        match field {
            Field::Nested(inner) => bind_struct(registry, inner),
            Field::Leaf { tag, target } => {
                let Some((_, entry)) = registry.iter().find(|(key, _)| key.matches(tag)) else {
                    trace!(tag, "no option for field");
                    continue;
                };
                if !assign(entry, target) {
                    trace!(tag, kind = %entry.kind(), "field type does not match option");
                }
            }
        }
    }
}

fn assign(entry: &OptionEntry, target: Target<'_>) -> bool {
    match (entry.slot(), target) {
        (Slot::Int(b), Target::Int(field)) => *field = b.get(),
        (Slot::String(b), Target::String(field)) => *field = b.get(),
        (Slot::Bool(b), Target::Bool(field)) => *field = b.get(),
        (Slot::Slice(b), Target::Slice(field)) => *field = b.get(),
        (Slot::Int(b), Target::IntRef(field)) => *field = Some(b.clone()),
        (Slot::String(b), Target::StringRef(field)) => *field = Some(b.clone()),
        (Slot::Bool(b), Target::BoolRef(field)) => *field = Some(b.clone()),
        (Slot::Slice(b), Target::SliceRef(field)) => *field = Some(b.clone()),
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::ArgsSource;
    use crate::conf::Conf;
    use crate::fixtures::test::SampleConfig;
    use serde_json::json;

    fn sample_conf(args: &[&str]) -> Conf {
        let mut conf = Conf::new().source(ArgsSource::new(args.iter().copied()));
        conf.slice("test", "t", vec![json!(null), json!("3")], "Basic description");
        conf.exist("test2", "t2", "Basic description 2");
        conf.string("test3", "t3", "c0deum", "Basic description 3");
        conf.string("test4", "t4", "JAre", "Basic description 4");
        conf.string("test5", "t5", "drewoko", "Basic description 5");
        conf
    }

    #[test]
    fn fills_fields_at_every_depth() {
        let mut conf = sample_conf(&["-t[]=1", "-t[]=2", "-t2", "--test3=Pepsioner"]);
        conf.parse().unwrap();

        let mut cfg = SampleConfig::default();
        conf.to_struct(&mut cfg);

        assert_eq!(cfg.items, vec![json!("1"), json!("2")]);
        assert!(cfg.present);
        assert_eq!(cfg.label.as_ref().unwrap().get(), "Pepsioner");
        assert_eq!(cfg.inner.name, "JAre");
        assert!(cfg.untagged.is_empty());
    }

    #[test]
    fn unmatched_tag_leaves_field_untouched() {
        let conf = sample_conf(&[]);
        let mut cfg = SampleConfig::default();
        cfg.inner.retries = 7;
        conf.to_struct(&mut cfg);
        assert_eq!(cfg.inner.retries, 7);
    }

    #[test]
    fn type_mismatch_leaves_field_untouched() {
        struct Mismatch {
            count: i64,
        }
        impl Bind for Mismatch {
            fn fields(&mut self) -> Vec<Field<'_>> {
                vec![Field::tagged("test3", &mut self.count)]
            }
        }

        let conf = sample_conf(&[]);
        let mut m = Mismatch { count: 0 };
        conf.to_struct(&mut m);
        assert_eq!(m.count, 0);
    }

    #[test]
    fn handle_fields_track_later_resolution() {
        let mut conf = sample_conf(&["--test3=after"]);
        let mut cfg = SampleConfig::default();
        conf.to_struct(&mut cfg);

        let label = cfg.label.clone().unwrap();
        assert_eq!(label.get(), "c0deum");
        conf.parse().unwrap();
        assert_eq!(label.get(), "after");
    }

    #[test]
    fn matches_full_name_too() {
        struct ByFull {
            value: String,
        }
        impl Bind for ByFull {
            fn fields(&mut self) -> Vec<Field<'_>> {
                vec![Field::tagged("t5", &mut self.value)]
            }
        }

        let conf = sample_conf(&[]);
        let mut b = ByFull {
            value: String::new(),
        };
        conf.to_struct(&mut b);
        assert_eq!(b.value, "drewoko");
    }

    #[test]
    fn first_match_in_key_order_wins() {
        struct Shared {
            value: String,
        }
        impl Bind for Shared {
            fn fields(&mut self) -> Vec<Field<'_>> {
                vec![Field::tagged("name", &mut self.value)]
            }
        }

        let mut conf = Conf::new();
        conf.string("b", "name", "from-b", "");
        conf.string("a", "name", "from-a", "");
        let mut s = Shared {
            value: String::new(),
        };
        conf.to_struct(&mut s);
        assert_eq!(s.value, "from-a");
    }

    #[test]
    fn int_and_bool_handles() {
        struct Handles {
            port: Option<Binding<i64>>,
            debug: Option<Binding<bool>>,
            tags: Option<Binding<Vec<Value>>>,
        }
        impl Bind for Handles {
            fn fields(&mut self) -> Vec<Field<'_>> {
                vec![
                    Field::tagged("port", &mut self.port),
                    Field::tagged("debug", &mut self.debug),
                    Field::tagged("tags", &mut self.tags),
                ]
            }
        }

        let mut conf = Conf::new();
        let port = conf.int("p", "port", 80, "");
        conf.bool("d", "debug", true, "");
        conf.string("t", "tags", "not a list", "");

        let mut h = Handles {
            port: None,
            debug: None,
            tags: None,
        };
        conf.to_struct(&mut h);
        assert!(h.port.as_ref().unwrap().same_slot(&port));
        assert!(h.debug.unwrap().get());
        assert!(h.tags.is_none());
    }
}
