use std::error::Error as _;
use std::path::PathBuf;

use clap::{arg, value_parser, Arg, ArgAction, Command};
use tracing_subscriber::EnvFilter;

// update-env-file <env_file> [KEY=VALUE]...
//
// Rewrites env_file in place with every KEY=VALUE set or replaced.
fn cli() -> Command {
    Command::new("update-env-file")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Sets or replaces KEY=VALUE entries in an env file, in place")
        .arg(
            arg!(<env_file> "Path to the env file to rewrite")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("overrides")
                .value_name("KEY=VALUE")
                .help("Variables to set or replace, applied in order")
                .num_args(0..)
                .action(ArgAction::Append)
                .trailing_var_arg(true)
                .allow_hyphen_values(true),
        )
        .arg(arg!(-v --verbose "Log more, repeat for debug output").action(ArgAction::Count))
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // Ignore a subscriber that is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let matches = cli().get_matches();
    init_tracing(matches.get_count("verbose"));

    let env_file = matches
        .get_one::<PathBuf>("env_file")
        .expect("env_file is required");
    let overrides = matches
        .get_many::<String>("overrides")
        .unwrap_or_default()
        .map(|v| v.as_str())
        .collect::<Vec<_>>();

    if let Err(err) = libenvfile::update_env_file(env_file, overrides) {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(&format!(": {cause}"));
            source = cause.source();
        }
        eprintln!("{message}");
        std::process::exit(-1);
    }
}

#[cfg(test)]
mod tests {
    use super::cli;

    #[test]
    fn it_verifies_cli() {
        cli().debug_assert();
    }

    #[test]
    fn it_accepts_hyphen_leading_values() {
        let m = cli().get_matches_from(["update-env-file", ".env", "A=1", "FLAGS=-x"]);
        let overrides: Vec<&String> = m.get_many::<String>("overrides").unwrap().collect();
        assert_eq!(overrides, ["A=1", "FLAGS=-x"]);
    }
}
