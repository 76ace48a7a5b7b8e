use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::{Arg, ArgAction, ArgMatches, Command};
use owo_colors::OwoColorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use hilite::grammar::{self, LoadingError};
use hilite::highlighting::{Highlighted, Highlighter};
use hilite::output;
use hilite::registry::Registry;
use hilite::rendering::{render, Html, Identity, Terminal};

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    let grammar_arg = Arg::new("grammar")
        .short('g')
        .long("grammar")
        .action(ArgAction::Append)
        .value_parser(clap::value_parser!(PathBuf))
        .help("A JSON grammar definition, or a directory of them. May be given more than once.");

    let filename_arg = Arg::new("filename")
        .default_value("-")
        .help("The file containing the source text, or '-' to read standard input.");

    let matches = Command::new("hilite")
        .version(VERSION)
        .propagate_version(true)
        .about("Syntax highlighting by nested lexical modes.")
        .disable_help_subcommand(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log what the highlighter is doing to standard error."),
        )
        .subcommand(
            Command::new("highlight")
                .about("Highlight the given source text")
                .arg(grammar_arg.clone())
                .arg(
                    Arg::new("language")
                        .short('l')
                        .long("language")
                        .help("The language of the source text. If not given it will be guessed."),
                )
                .arg(
                    Arg::new("html")
                        .long("html")
                        .action(ArgAction::SetTrue)
                        .help("Emit HTML spans rather than ANSI escape codes."),
                )
                .arg(
                    Arg::new("standalone")
                        .long("standalone")
                        .action(ArgAction::SetTrue)
                        .requires("html")
                        .help("Wrap the HTML in a complete document with a stylesheet."),
                )
                .arg(
                    Arg::new("raw-control-chars")
                        .short('R')
                        .long("raw-control-chars")
                        .action(ArgAction::SetTrue)
                        .help("Emit ANSI escape codes for syntax highlighting even if output is redirected to a pipe or file."),
                )
                .arg(filename_arg.clone()),
        )
        .subcommand(
            Command::new("detect")
                .about("Guess the language of the given source text")
                .arg(grammar_arg)
                .arg(
                    Arg::new("among")
                        .long("among")
                        .value_delimiter(',')
                        .action(ArgAction::Append)
                        .help("Only consider these languages, given as a comma separated list."),
                )
                .arg(filename_arg),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") {
        "debug"
    } else {
        "warn"
    };

    // RUST_LOG takes precedence when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hilite={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!("Hilite {} starting", VERSION);

    match matches.subcommand() {
        Some(("highlight", submatches)) => highlight(submatches),
        Some(("detect", submatches)) => detect(submatches),
        Some(_) => {
            println!("No valid subcommand was used")
        }
        None => {
            println!("usage: hilite [COMMAND] ...");
            println!("Try '--help' for more information.");
        }
    }
}

fn highlight(submatches: &ArgMatches) {
    let registry = load_registry(submatches);
    let (filename, content) = load_source(submatches);
    let highlighter = Highlighter::new(&registry);

    let result = match submatches.get_one::<String>("language") {
        Some(language) => highlighter.highlight(language, &content),
        None => highlighter.highlight_auto(&content),
    };

    let result = match result {
        Ok(result) => result,
        Err(error) => fail(&format!("{}", error)),
    };
    debug!(language = ?result.language, relevance = result.relevance);

    if submatches.get_flag("html") {
        let markup = render(&Html::new(), &result.tokens);

        if submatches.get_flag("standalone") {
            let title = filename
                .file_name()
                .map(|name| {
                    name.to_string_lossy()
                        .to_string()
                })
                .unwrap_or_else(|| "-".to_string());

            match output::standalone(&markup, &title, result.language.as_deref()) {
                Ok(document) => print!("{}", document),
                Err(error) => fail(&format!("Unable to build HTML document: {}", error)),
            }
        } else {
            print!("{}", markup);
        }
    } else if submatches.get_flag("raw-control-chars") || std::io::stdout().is_terminal() {
        print!("{}", render(&Terminal, &result.tokens));
    } else {
        print!("{}", render(&Identity, &result.tokens));
    }
}

fn detect(submatches: &ArgMatches) {
    let registry = load_registry(submatches);
    let (_, content) = load_source(submatches);
    let highlighter = Highlighter::new(&registry);

    let among: Vec<String> = submatches
        .get_many::<String>("among")
        .map(|values| {
            values
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    match highlighter.highlight_among(&content, &among) {
        Ok(result) => {
            report(&result);
            if let Some(second) = &result.second_best {
                report(second);
            }
        }
        Err(error) => fail(&format!("{}", error)),
    }
}

fn report(result: &Highlighted) {
    match &result.language {
        Some(language) => println!("{}\t{}", language, result.relevance),
        None => println!("unknown\t{}", result.relevance),
    }
}

/// Load every grammar named on the command line. Directories contribute each
/// `.json` file inside them.
fn load_registry(submatches: &ArgMatches) -> Registry {
    let mut registry = Registry::new();

    let paths: Vec<&PathBuf> = submatches
        .get_many::<PathBuf>("grammar")
        .map(|values| values.collect())
        .unwrap_or_default();

    for path in paths {
        let files = if path.is_dir() {
            match definition_files(path) {
                Ok(files) => files,
                Err(error) => fail_loading(&error),
            }
        } else {
            vec![path.clone()]
        };

        for file in files {
            match grammar::load(&file) {
                Ok(language) => registry.register(language),
                Err(error) => fail_loading(&error),
            }
        }
    }

    if registry.is_empty() {
        fail("No grammars loaded; supply at least one with --grammar");
    }

    registry
}

fn definition_files(directory: &Path) -> Result<Vec<PathBuf>, LoadingError> {
    let entries = std::fs::read_dir(directory).map_err(|error| LoadingError {
        problem: "Failed reading directory".to_string(),
        details: error
            .kind()
            .to_string(),
        filename: directory.to_path_buf(),
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|s| s.to_str())
                == Some("json")
        })
        .collect();
    files.sort();

    Ok(files)
}

fn load_source(submatches: &ArgMatches) -> (PathBuf, String) {
    let filename = match submatches.get_one::<String>("filename") {
        Some(filename) => PathBuf::from(filename),
        None => PathBuf::from("-"),
    };

    if filename.to_str() == Some("-") {
        let mut content = String::new();
        if let Err(error) = std::io::stdin().read_to_string(&mut content) {
            fail(&format!("Unable to read standard input: {}", error));
        }
        return (filename, content);
    }

    match std::fs::read_to_string(&filename) {
        Ok(content) => (filename, content),
        Err(error) => {
            debug!(?error);
            let error = match error.kind() {
                std::io::ErrorKind::NotFound => LoadingError {
                    problem: "File not found".to_string(),
                    details: String::new(),
                    filename,
                },
                kind => LoadingError {
                    problem: "Failed reading".to_string(),
                    details: kind.to_string(),
                    filename,
                },
            };
            fail_loading(&error)
        }
    }
}

fn fail_loading(error: &LoadingError) -> ! {
    eprintln!(
        "{}: {}: {}",
        "error".bright_red(),
        error
            .filename
            .display(),
        error
            .problem
            .bold()
    );
    if !error
        .details
        .is_empty()
    {
        eprintln!("{}", error.details);
    }
    std::process::exit(1);
}

fn fail(message: &str) -> ! {
    eprintln!("{}: {}", "error".bright_red(), message);
    std::process::exit(1);
}
