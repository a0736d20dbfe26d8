//! Typed options resolved from layered sources. Declare the options, attach
//! the sources, and parse.
//!
//! Optfig keeps a registry of named options (integers, strings, booleans,
//! existence flags, and lists) and fills them from any number of sources:
//! command-line arguments, environment variables, JSON or TOML documents, or
//! anything else that implements [`Source`].
//!
//! ```ignore
//! let mut conf = Conf::new()
//!     .source(DocumentSource::toml_file("/etc/myapp.toml"))
//!     .source(EnvSource::new())
//!     .source(ArgsSource::from_env());
//!
//! let port = conf.int("p", "port", 8080, "Listen port");
//! let verbose = conf.exist("v", "verbose", "Chatty output");
//! conf.parse()?;
//!
//! println!("listening on {} (verbose: {})", port.get(), verbose.get());
//! ```
//!
//! # Options and handles
//!
//! Every option has a short name, a full name, a default, and a description.
//! Declaring an option returns a [`Binding`], a shared handle through which
//! the resolved value is read. The default is written into the handle at
//! declaration time, so a handle is always valid, parsed or not. The `_var`
//! forms ([`Conf::int_var`] and friends) bind a handle the caller already
//! owns.
//!
//! Declaring the same name pair twice replaces the earlier entry.
//!
//! # Layer precedence
//!
//! Sources are consulted in attachment order, and every source is asked
//! about every option:
//!
//! ```text
//! Declared default
//!        ↑ overwritten by
//! first attached source
//!        ↑ overwritten by
//! ...
//!        ↑ overwritten by
//! last attached source
//! ```
//!
//! A source that has nothing to say about an option leaves the current value
//! alone. Put the most specific layer (usually arguments) last.
//!
//! # Sources
//!
//! All built-in sources look an option up by both of its names. When both
//! names yield a value the full name wins.
//!
//! - **[`ArgsSource`]** reads `-name=value` / `--name=value` tokens. The
//!   delimiter is configurable and the token parser can be swapped. A bare
//!   `-name` means `true`. Repeated `-name[]=value` tokens build a list.
//! - **[`EnvSource`]** reads variables with a prefix (`ENV_` by default),
//!   with the same list syntax: `ENV_tags[0]=a`.
//! - **[`DocumentSource`]** reads a JSON or TOML document, flattened to
//!   dotted keys (`server.port`). The last segment of a key also works as a
//!   short name. Arrays feed list options whole.
//!
//! Empty values count as absent. Values that do not parse as the option's
//! kind are ignored.
//!
//! # Structs
//!
//! [`Conf::to_struct`] copies resolved values into structs that implement
//! [`Bind`]. See the [`bind`] module for the matching rules.
//!
//! # Help
//!
//! [`Conf::print_help`] hands the registry to a printer. [`print_help`]
//! renders plain usage text; with the `clap` feature (on by default),
//! [`clap_command`] builds a [`clap::Command`] for clap-styled help.
//!
//! # Error handling
//!
//! Fallible operations return [`OptfigError`]. Resolution only fails when a
//! source fails to initialize; malformed individual values are skipped.
//!
//! # Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events and installs
//! no subscriber. Initialization and resolution are logged at `debug`,
//! per-source misses at `trace`.

pub mod bind;
pub mod error;
pub mod types;

mod args;
mod binding;
#[cfg(feature = "clap")]
mod cli;
mod conf;
mod document;
mod env;
mod flatten;
mod help;
mod keys;
mod option;
mod source;

#[cfg(test)]
mod fixtures;

pub use args::{ArgParser, ArgsSource, default_arg_parser};
pub use bind::{Bind, Field, Target};
pub use binding::Binding;
#[cfg(feature = "clap")]
pub use cli::clap_command;
pub use conf::{Conf, Registry};
pub use document::{DocumentFormat, DocumentReader, DocumentSource};
pub use env::{DEFAULT_ENV_PREFIX, EnvSource};
pub use error::OptfigError;
pub use flatten::FlattenError;
pub use help::{help_printer, print_help, render_help};
pub use option::{OptionEntry, Slot};
pub use source::Source;
pub use types::{OptionKey, OptionKind, OptionValue};
