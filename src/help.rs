//! Plain-text usage rendering for a registry.
//!
//! ```text
//! Usage: app [options]
//!   Options:
//!     -p, --port   Listen port [int, default: 8080]
//!     -v, --verbose   Chatty output [flag]
//! ```

use std::fmt::Write;

use crate::conf::Registry;
use crate::types::OptionKind;

const DEFAULT_APP_NAME: &str = "app";

/// Usage text for `app`, one line per option in key order.
pub fn render_help(app: &str, registry: &Registry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Usage: {app} [options]");
    let _ = writeln!(out, "  Options:");

    for (key, entry) in registry {
        let _ = write!(out, "    -{}, --{}   {}", key.short(), key.full(), entry.description());
        match entry.kind() {
            OptionKind::Existence => {
                let _ = writeln!(out, " [{}]", entry.kind());
            }
            kind => {
                let _ = writeln!(out, " [{}, default: {}]", kind, entry.default_value());
            }
        }
    }
    out
}

/// Default printer for [`Conf::print_help`](crate::Conf::print_help).
pub fn print_help(registry: &Registry) {
    println!("{}", render_help(DEFAULT_APP_NAME, registry));
}

/// Printer that names the application in the usage line.
pub fn help_printer(app: &str) -> impl FnOnce(&Registry) + '_ {
    move |registry: &Registry| println!("{}", render_help(app, registry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::Conf;
    use serde_json::json;

    #[test]
    fn empty_registry_renders_header_only() {
        let text = render_help("app", &Registry::new());
        assert_eq!(text, "Usage: app [options]\n  Options:\n");
    }

    #[test]
    fn lines_follow_key_order() {
        let mut conf = Conf::new();
        conf.int("w", "workers", 4, "Worker count");
        conf.string("h", "host", "localhost", "Bind address");
        conf.exist("v", "verbose", "Chatty output");
        conf.slice("t", "tags", vec![json!("a")], "Tags");

        let text = render_help("srv", conf.options());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Usage: srv [options]");
        assert_eq!(lines[1], "  Options:");
        assert_eq!(lines[2], "    -h, --host   Bind address [string, default: \"localhost\"]");
        assert_eq!(lines[3], "    -t, --tags   Tags [list, default: [\"a\"]]");
        assert_eq!(lines[4], "    -v, --verbose   Chatty output [flag]");
        assert_eq!(lines[5], "    -w, --workers   Worker count [int, default: 4]");
    }

    #[test]
    fn usable_as_conf_printer() {
        let mut conf = Conf::new();
        conf.bool("d", "debug", false, "Debug mode");
        conf.print_help(print_help);
        conf.print_help(help_printer("demo"));
    }
}
