//! Clap adapter for optfig.
//!
//! Compiled only with the `clap` Cargo feature (on by default). It turns a
//! registry into a [`clap::Command`] so an application can reuse clap's help
//! layout instead of the plain [`render_help`](crate::help::render_help):
//!
//! ```ignore
//! conf.print_help(|registry| {
//!     let mut cmd = optfig::clap_command("myapp", registry);
//!     println!("{}", cmd.render_help());
//! });
//! ```
//!
//! The command only describes options. Values are still resolved by
//! [`Conf::parse`](crate::Conf::parse) through the attached sources, so the
//! argument flags are declared optional and free-form.

use std::collections::HashSet;

use clap::{Arg, ArgAction, Command};
use tracing::trace;

use crate::conf::Registry;
use crate::types::{OptionKind, OptionValue};

/// Build a clap command describing every option in `registry`.
///
/// Single-character short names become clap short flags; longer ones are
/// registered as a visible alias of the long flag. clap's own `-h/--help` is
/// not added, since `help` is an ordinary option here.
///
/// clap requires unique names. Options are visited in key order and the first
/// one to claim a name keeps it: a later option with the same full name is
/// left out, and a clashing short flag or alias is dropped from the later
/// option only.
pub fn clap_command(name: &str, registry: &Registry) -> Command {
    let longs: HashSet<&str> = registry.keys().map(|key| long_name(key.short(), key.full())).collect();
    let mut ids: HashSet<&str> = HashSet::new();
    let mut shorts: HashSet<char> = HashSet::new();
    let mut aliases: HashSet<&str> = HashSet::new();

    let mut cmd = Command::new(name.to_string()).disable_help_flag(true);
    for (key, entry) in registry {
        let long = long_name(key.short(), key.full());
        if long.is_empty() || !ids.insert(long) {
            trace!(short = key.short(), full = key.full(), "name already in use, option left out");
            continue;
        }

        let mut arg = Arg::new(long.to_string())
            .long(long.to_string())
            .help(entry.description().to_string());

        let short = key.short();
        let mut chars = short.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if long != short => {
                if shorts.insert(c) {
                    arg = arg.short(c);
                } else {
                    trace!(short, full = key.full(), "short flag already in use");
                }
            }
            (Some(_), Some(_)) if long != short => {
                if !longs.contains(short) && aliases.insert(short) {
                    arg = arg.visible_alias(short.to_string());
                } else {
                    trace!(short, full = key.full(), "alias already in use");
                }
            }
            _ => {}
        }

        arg = match entry.kind() {
            OptionKind::Existence => arg.action(ArgAction::SetTrue),
            OptionKind::Slice => arg
                .action(ArgAction::Append)
                .value_name("ITEM")
                .help(format!("{} [default: {}]", entry.description(), entry.default_value())),
            kind => arg
                .action(ArgAction::Set)
                .value_name(kind.to_string().to_uppercase())
                .default_value(default_text(entry.default_value())),
        };
        cmd = cmd.arg(arg);
    }
    cmd
}

/// Long flag for an option: the full name, or the short name when the full
/// name is empty.
fn long_name<'a>(short: &'a str, full: &'a str) -> &'a str {
    if full.is_empty() { short } else { full }
}

fn default_text(value: &OptionValue) -> String {
    match value {
        OptionValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
