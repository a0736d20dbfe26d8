//! # optfig demo application
//!
//! A sample program that resolves a handful of options from a TOML file,
//! environment variables, and command-line arguments, in that order of
//! increasing precedence. It exists to demonstrate and manually verify
//! optfig's behavior.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example optfig_demo
//! cargo run --example optfig_demo -- --port=9000 -v
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature            | How to exercise it                                                   |
//! |--------------------|----------------------------------------------------------------------|
//! | Defaults           | `cargo run --example optfig_demo`                                    |
//! | Document file      | Create `optfig-demo.toml` in cwd with `[server] port = 7000`         |
//! | Custom file path   | `cargo run --example optfig_demo -- --config=other.toml`             |
//! | Env var override   | `OPTFIG_DEMO_port=9999 cargo run --example optfig_demo`              |
//! | Env list           | `OPTFIG_DEMO_tags[0]=a OPTFIG_DEMO_tags[1]=b cargo run --example optfig_demo` |
//! | Arg override       | `cargo run --example optfig_demo -- --host=0.0.0.0`                  |
//! | Arg list           | `cargo run --example optfig_demo -- -t[]=x -t[]=y`                   |
//! | Existence flag     | `cargo run --example optfig_demo -- -v`                              |
//! | Plain help         | `cargo run --example optfig_demo -- --help`                          |
//! | Clap-styled help   | `cargo run --example optfig_demo -- --help --clap`                   |
//! | Logging            | `RUST_LOG=optfig=debug cargo run --example optfig_demo`              |

mod config;

use std::process::ExitCode;

use optfig::{
    ArgsSource, Conf, DocumentFormat, DocumentSource, EnvSource, OptfigError, Source, clap_command,
    help_printer,
};
use tracing_subscriber::EnvFilter;

use config::DemoConfig;

const APP_NAME: &str = "optfig-demo";
const ENV_PREFIX: &str = "OPTFIG_DEMO_";
const DEFAULT_FILE: &str = "optfig-demo.toml";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), OptfigError> {
    // `--config` may come from the environment or the arguments.
    let mut locators: Vec<Box<dyn Source>> = vec![
        Box::new(EnvSource::with_prefix(ENV_PREFIX)),
        Box::new(ArgsSource::from_env()),
    ];
    let document = DocumentSource::path_from_sources(
        "c",
        "config",
        DEFAULT_FILE,
        DocumentFormat::Toml,
        &mut locators,
    );
    let have_document = document.path().is_some_and(|p| p.exists());

    let mut conf = Conf::new();
    if have_document {
        conf.add_source(document);
    }
    conf.add_source(EnvSource::with_prefix(ENV_PREFIX))
        .add_source(ArgsSource::from_env());

    conf.string("c", "config", DEFAULT_FILE, "Path to the TOML document");
    conf.string("host", "server.host", "127.0.0.1", "Server bind address");
    conf.int("port", "server.port", 3000, "Server port");
    conf.slice("t", "tags", vec![], "Free-form tags");
    conf.exist("v", "verbose", "Print every resolved option");
    let help = conf.exist("h", "help", "Show this help");
    let clap_help = conf.exist("clap", "clap", "Use clap-styled help with --help");

    conf.parse()?;

    if help.get() {
        if clap_help.get() {
            conf.print_help(|registry| {
                let mut cmd = clap_command(APP_NAME, registry);
                println!("{}", cmd.render_help());
            });
        } else {
            conf.print_help(help_printer(APP_NAME));
        }
        return Ok(());
    }

    let mut cfg = DemoConfig::default();
    conf.to_struct(&mut cfg);

    println!("server: {}:{}", cfg.server.host, cfg.server.port);
    println!("tags:   {:?}", cfg.tags);

    if cfg.verbose.as_ref().is_some_and(|v| v.get()) {
        println!("document: {}", if have_document { "loaded" } else { "none" });
        for (key, entry) in conf.options() {
            println!("  {:<8} {:<12} = {}", key.short(), key.full(), entry.value());
        }
    }
    Ok(())
}
