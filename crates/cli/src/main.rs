//! CLI for invocate.
//!
//! Pipeline: parse words -> bind against the builtin registry -> invoke ->
//! print the value, or the invocation report on failure.

mod catalog;
mod parse;

use catalog::Catalog;
use clap::{Parser, Subcommand};
use invocate_core::{ErrorFactory, InvocationReport};
use invocate_runtime::{builtins, Invoker, Param};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "invocate",
    version,
    about = "Invoke functions and inspect structured invocation errors"
)]
struct Cli {
    /// JSON object mapping error messages to their translations.
    #[arg(long, global = true, env = "INVOCATE_CATALOG")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Invoke a registered function.
    Call {
        name: String,

        /// `value` or `key=value`; values are parsed as JSON when possible.
        /// Negative numbers are accepted as-is; other words starting with `-`
        /// go after `--`.
        #[arg(allow_negative_numbers = true)]
        args: Vec<String>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List registered functions and their signatures.
    List {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Serialize)]
struct Listing<'a> {
    name: &'a str,
    params: &'a [Param],
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let catalog = match &cli.catalog {
        Some(path) => {
            let catalog = Catalog::load(path)?;
            tracing::info!(path = %path.display(), entries = catalog.len(), "loaded catalog");
            catalog
        }
        None => Catalog::default(),
    };

    let invoker = Invoker::with_factory(
        builtins::standard()?,
        ErrorFactory::with_translator(catalog),
    );

    match cli.command {
        Commands::Call { name, args, json } => {
            let args = parse::parse_args(&args);
            tracing::info!(name = %name, args = args.len(), "calling");

            match invoker.invoke(&name, args) {
                Ok(value) if json => println!("{}", serde_json::to_string_pretty(&value)?),
                Ok(value) => println!("{value}"),
                Err(err) => {
                    let report = InvocationReport::from_error(&err);
                    if json {
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    } else {
                        print!("{}", report.render());
                    }
                    std::process::exit(1);
                }
            }
        }
        Commands::List { json } => {
            if json {
                let listing: Vec<Listing<'_>> = invoker
                    .registry()
                    .iter()
                    .map(|f| Listing {
                        name: f.name(),
                        params: &f.signature().params,
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                for function in invoker.registry().iter() {
                    println!("{function}");
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(argv: &[&str]) -> (String, Vec<String>, bool) {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Call { name, args, json } => (name, args, json),
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn json_flag_after_arguments() {
        let (name, args, json) = call(&["invocate", "call", "add", "1", "2", "--json"]);
        assert_eq!(name, "add");
        assert_eq!(args, ["1", "2"]);
        assert!(json);
    }

    #[test]
    fn json_flag_before_name() {
        let (name, args, json) = call(&["invocate", "call", "--json", "add", "1", "2"]);
        assert_eq!(name, "add");
        assert_eq!(args, ["1", "2"]);
        assert!(json);
    }

    #[test]
    fn catalog_after_arguments() {
        let cli = Cli::try_parse_from([
            "invocate", "call", "upper", "abc", "--catalog", "fr.json",
        ])
        .unwrap();
        assert_eq!(cli.catalog, Some(PathBuf::from("fr.json")));
    }

    #[test]
    fn negative_numbers_and_escaped_words_are_arguments() {
        let (_, args, json) = call(&["invocate", "call", "add", "-3", "4"]);
        assert_eq!(args, ["-3", "4"]);
        assert!(!json);

        let (_, args, json) = call(&["invocate", "call", "upper", "--", "--json"]);
        assert_eq!(args, ["--json"]);
        assert!(!json);
    }

    #[test]
    fn list_accepts_json() {
        let cli = Cli::try_parse_from(["invocate", "list", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::List { json: true }));
    }
}
