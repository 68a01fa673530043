use anyhow::{anyhow, Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use quill::config::Config;
use quill::date::SystemClock;
use quill::index::generate_year_index;
use quill::listing::{load_moments, load_posts};
use quill::validate::Validator;
use serde::Serialize;
use std::path::{Path, PathBuf};

fn main() {
    let matches = app().get_matches();
    init_logging(matches.occurrences_of("verbose"));

    match run(&matches) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn app() -> App<'static, 'static> {
    let output = Arg::with_name("output")
        .short("o")
        .long("output")
        .takes_value(true)
        .value_name("FILE")
        .help("Write the listing to FILE instead of stdout");

    App::new("quill")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Builds content listings, the year index and validation reports for a markdown blog")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("project")
                .short("p")
                .long("project")
                .takes_value(true)
                .value_name("DIR")
                .global(true)
                .help("The project directory (default: the current directory)"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .global(true)
                .help("Log more (repeat for even more)"),
        )
        .subcommand(SubCommand::with_name("index").about("Regenerates the year index page"))
        .subcommand(
            SubCommand::with_name("validate")
                .about("Checks front-matter and image references")
                .arg(
                    Arg::with_name("json")
                        .long("json")
                        .help("Print the report as JSON"),
                ),
        )
        .subcommand(
            SubCommand::with_name("posts")
                .about("Prints the post listing as JSON")
                .arg(output.clone()),
        )
        .subcommand(
            SubCommand::with_name("moments")
                .about("Prints the moment listing as JSON")
                .arg(output),
        )
}

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Runs the selected subcommand and returns the process exit code.
fn run(matches: &ArgMatches) -> Result<i32> {
    let project = match matches.value_of("project") {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir().context("Resolving the current directory")?,
    };
    let config = Config::from_directory(&project)?;
    let clock = SystemClock;

    match matches.subcommand() {
        ("index", Some(_)) => {
            let index = generate_year_index(&config, &clock)?;
            let years: Vec<String> = index.years().iter().map(i32::to_string).collect();
            println!(
                "✓ wrote {} with {} years",
                config.index_file.display(),
                years.len()
            );
            println!("  years: {}", years.join(", "));
            Ok(0)
        }
        ("validate", Some(sub)) => {
            let report = Validator::new(&config).validate()?;
            if sub.is_present("json") {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for error in &report.errors {
                    println!("✗ {}", error);
                }
                for warning in &report.warnings {
                    println!("⚠ {}", warning);
                }
                println!(
                    "{} errors, {} warnings",
                    report.errors.len(),
                    report.warnings.len()
                );
            }
            Ok(if report.valid { 0 } else { 1 })
        }
        ("posts", Some(sub)) => {
            emit(&load_posts(&config, &clock)?, sub.value_of("output").map(Path::new))?;
            Ok(0)
        }
        ("moments", Some(sub)) => {
            emit(&load_moments(&config, &clock)?, sub.value_of("output").map(Path::new))?;
            Ok(0)
        }
        (name, _) => Err(anyhow!("unknown subcommand `{}`", name)),
    }
}

/// Writes `value` as pretty JSON to `output`, or to stdout.
fn emit<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Writing `{}`", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
