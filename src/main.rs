//! nuxt-lens CLI - reference-count lenses for Nuxt projects
//!
//! Usage: nuxt-lens <command> [arguments]

mod cli;
mod lenses_cmd;
mod refs_cmd;
mod symbols_cmd;
mod watch_cmd;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use cli::{parse_args, print_usage, Command};
use nuxt_lens::output::{output_json, ErrorResponse, JsonResponse, RootResponse};
use nuxt_lens::{generate_execution_id, LensProvider, OutputFormat};

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

/// Absolute form of a user-supplied path.
fn absolute(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
}

fn run_root(file: &Path, output_format: OutputFormat) -> Result<()> {
    let provider = LensProvider::open(file)?;
    let root = provider
        .root()
        .map(|r| r.to_string_lossy().into_owned())
        .unwrap_or_default();
    match output_format {
        OutputFormat::Human => println!("{}", root),
        OutputFormat::Json => {
            let response = RootResponse {
                file_path: file.to_string_lossy().into_owned(),
                root,
            };
            output_json(&JsonResponse::new(response, &generate_execution_id()))?;
        }
    }
    Ok(())
}

fn run(command: Command) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match command {
        Command::Root {
            file,
            output_format,
        } => run_root(&absolute(&file)?, output_format),
        Command::Symbols {
            root,
            kind,
            output_format,
        } => runtime.block_on(symbols_cmd::run_symbols(&absolute(&root)?, kind, output_format)),
        Command::Lenses {
            file,
            output_format,
        } => runtime.block_on(lenses_cmd::run_lenses(&absolute(&file)?, output_format)),
        Command::Refs {
            file,
            kind,
            name,
            output_format,
        } => runtime.block_on(refs_cmd::run_refs(&absolute(&file)?, kind, &name, output_format)),
        Command::Watch {
            file,
            debounce_ms,
            gitignore_aware,
        } => watch_cmd::run_watch(&runtime, absolute(&file)?, debounce_ms, gitignore_aware),
        Command::Help => {
            print_usage();
            Ok(())
        }
        Command::Version => {
            println!("{}", nuxt_lens::version::version());
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let invocation = match parse_args() {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            return ExitCode::from(1);
        }
    };
    init_logging(invocation.verbose);

    let json_errors = matches!(
        invocation.command,
        Command::Root { output_format: OutputFormat::Json, .. }
            | Command::Symbols { output_format: OutputFormat::Json, .. }
            | Command::Lenses { output_format: OutputFormat::Json, .. }
            | Command::Refs { output_format: OutputFormat::Json, .. }
    );

    match run(invocation.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json_errors {
                let response = ErrorResponse {
                    error: "command_failed".to_string(),
                    message: format!("{:#}", e),
                };
                let _ = output_json(&JsonResponse::new(response, &generate_execution_id()));
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::from(1)
        }
    }
}
