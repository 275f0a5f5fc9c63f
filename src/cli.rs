//! Command-line argument parsing.

use anyhow::{anyhow, Result};
use std::path::PathBuf;

use nuxt_lens::{DocumentKind, OutputFormat};

pub fn print_usage() {
    eprintln!("nuxt-lens - Reference-count lenses for Nuxt projects");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  nuxt-lens <command> [arguments]");
    eprintln!("  nuxt-lens --help");
    eprintln!("  nuxt-lens --version");
    eprintln!();
    eprintln!("  nuxt-lens root --file <PATH>");
    eprintln!("  nuxt-lens symbols --root <DIR> [--kind <KIND>] [--output <FORMAT>]");
    eprintln!("  nuxt-lens lenses --file <PATH> [--output <FORMAT>]");
    eprintln!("  nuxt-lens refs --file <PATH> --kind <KIND> --name <NAME> [--output <FORMAT>]");
    eprintln!("  nuxt-lens watch --file <PATH> [--debounce-ms <N>] [--no-gitignore]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  root      Print the project root discovered above a file");
    eprintln!("  symbols   List catalogued symbols");
    eprintln!("  lenses    Print the lenses of a file");
    eprintln!("  refs      Print every reference to a symbol");
    eprintln!("  watch     Re-print the lenses of a file after each change");
    eprintln!();
    eprintln!("Global arguments:");
    eprintln!("  --output <FORMAT>   Output format: human (default) or json");
    eprintln!("  --verbose           Enable debug logging (otherwise RUST_LOG applies)");
    eprintln!();
    eprintln!("Kinds: component, composable, plugin, middleware, layout, store, utility");
}

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Root {
        file: PathBuf,
        output_format: OutputFormat,
    },
    Symbols {
        root: PathBuf,
        kind: Option<DocumentKind>,
        output_format: OutputFormat,
    },
    Lenses {
        file: PathBuf,
        output_format: OutputFormat,
    },
    Refs {
        file: PathBuf,
        kind: DocumentKind,
        name: String,
        output_format: OutputFormat,
    },
    Watch {
        file: PathBuf,
        debounce_ms: Option<u64>,
        gitignore_aware: bool,
    },
    Help,
    Version,
}

/// Command plus global flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    pub verbose: bool,
}

/// Flag values for one subcommand.
#[derive(Default)]
struct Flags {
    file: Option<PathBuf>,
    root: Option<PathBuf>,
    kind: Option<DocumentKind>,
    name: Option<String>,
    debounce_ms: Option<u64>,
    no_gitignore: bool,
    output_format: Option<OutputFormat>,
    verbose: bool,
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{} requires an argument", flag))
}

fn parse_flags(args: &[String]) -> Result<Flags> {
    let mut flags = Flags::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--file" => {
                flags.file = Some(PathBuf::from(value(args, i, "--file")?));
                i += 2;
            }
            "--root" => {
                flags.root = Some(PathBuf::from(value(args, i, "--root")?));
                i += 2;
            }
            "--kind" => {
                flags.kind = Some(value(args, i, "--kind")?.parse()?);
                i += 2;
            }
            "--name" => {
                flags.name = Some(value(args, i, "--name")?.to_string());
                i += 2;
            }
            "--debounce-ms" => {
                flags.debounce_ms = Some(value(args, i, "--debounce-ms")?.parse()?);
                i += 2;
            }
            "--no-gitignore" => {
                flags.no_gitignore = true;
                i += 1;
            }
            "--output" => {
                let raw = value(args, i, "--output")?;
                flags.output_format = Some(OutputFormat::parse(raw).ok_or_else(|| {
                    anyhow!("Invalid output format: {}. Must be human or json", raw)
                })?);
                i += 2;
            }
            "--verbose" | "-v" => {
                flags.verbose = true;
                i += 1;
            }
            other => return Err(anyhow!("Unknown argument: {}", other)),
        }
    }
    Ok(flags)
}

/// Parse `args` (without the program name).
pub fn parse_args_from(args: &[String]) -> Result<Invocation> {
    let Some(command) = args.first() else {
        return Err(anyhow!("Missing command"));
    };

    match command.as_str() {
        "--version" | "-V" => {
            return Ok(Invocation {
                command: Command::Version,
                verbose: false,
            })
        }
        "--help" | "-h" | "help" => {
            return Ok(Invocation {
                command: Command::Help,
                verbose: false,
            })
        }
        _ => {}
    }

    let flags = parse_flags(&args[1..])?;
    let output_format = flags.output_format.unwrap_or(OutputFormat::Human);
    let file = flags.file.clone();
    let require_file = || file.clone().ok_or_else(|| anyhow!("--file is required"));

    let command = match command.as_str() {
        "root" => Command::Root {
            file: require_file()?,
            output_format,
        },
        "symbols" => Command::Symbols {
            root: flags.root.ok_or_else(|| anyhow!("--root is required"))?,
            kind: flags.kind,
            output_format,
        },
        "lenses" => Command::Lenses {
            file: require_file()?,
            output_format,
        },
        "refs" => Command::Refs {
            file: require_file()?,
            kind: flags.kind.ok_or_else(|| anyhow!("--kind is required"))?,
            name: flags.name.ok_or_else(|| anyhow!("--name is required"))?,
            output_format,
        },
        "watch" => Command::Watch {
            file: require_file()?,
            debounce_ms: flags.debounce_ms,
            gitignore_aware: !flags.no_gitignore,
        },
        other => return Err(anyhow!("Unknown command: {}", other)),
    };

    Ok(Invocation {
        command,
        verbose: flags.verbose,
    })
}

/// Parse the process arguments.
pub fn parse_args() -> Result<Invocation> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    parse_args_from(&args)
}
