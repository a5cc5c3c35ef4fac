//! tabedit CLI
//!
//! Loads a table from a CSV, JSON or pickle file, applies cell edits and saves
//! the result, possibly in a different encoding.

use clap::Parser;
use std::path::{Path, PathBuf};
use tabedit_core::{create_placeholder, list_sibling_files, Error, Pipeline, Role, Table};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tabedit")]
#[command(about = "Apply cell edits to a CSV, JSON or pickle table", long_about = None)]
#[command(version)]
#[command(after_help = "Each EDIT has the form \"<column>,<row>,<value>\"; up to four per run \
    is the usual convention.\nSupported file types: .csv, .json, .pickle")]
struct Cli {
    /// Table to read
    source: PathBuf,

    /// Where to save the edited table
    destination: PathBuf,

    /// Cell edits as "<column>,<row>,<value>"
    #[arg(required = true, value_name = "EDIT", allow_hyphen_values = true)]
    edits: Vec<String>,

    /// Create an empty placeholder when the source file is missing
    #[arg(long)]
    create_missing: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = parse_args();
    init_logging(cli.verbose);

    let result = run(&cli);
    if let Err(e) = &result {
        report(e, cli.create_missing);
    }
    std::process::exit(exit_code(&result));
}

/// Parse arguments, exiting with [`usage_exit_code`] when they are rejected
fn parse_args() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(usage_exit_code(&e));
        }
    }
}

/// 1 for usage errors, 0 for --help/--version
fn usage_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

/// 0 only when the run got as far as writing the destination
fn exit_code(result: &tabedit_core::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

fn report(error: &Error, create_missing: bool) {
    eprintln!("Error: {}", error);
    if let Error::SourceNotFound { path } = error {
        diagnose_missing_source(path, create_missing);
    }
    if failed_before_edit(error) {
        eprintln!("Error: {}", Error::NoTable);
    }
}

/// Whether the error came from the load stage, leaving the editor no table
fn failed_before_edit(error: &Error) -> bool {
    matches!(
        error,
        Error::SourceNotFound { .. }
            | Error::SourceEmpty { .. }
            | Error::FileRead { .. }
            | Error::Decode { .. }
            | Error::UnsupportedEncoding {
                role: Role::Source,
                ..
            }
    )
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("tabedit=debug,tabedit_core=debug")
        } else {
            EnvFilter::new("tabedit=warn,tabedit_core=warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: &Cli) -> tabedit_core::Result<()> {
    let mut pipeline = Pipeline::new(&cli.source, &cli.destination, cli.edits.clone());
    let source_label = pipeline.source_encoding().map_or("table", |e| e.label());
    let destination_label = pipeline.destination_encoding().map_or("table", |e| e.label());

    debug!(
        source = %pipeline.source().display(),
        destination = %pipeline.destination().display(),
        edits = cli.edits.len(),
        "starting run"
    );

    let table = pipeline.load()?;
    print_table(&format!("Original {} content:", source_label), table);

    pipeline.edit()?;

    let table = pipeline.write()?;
    print_table(
        &format!("Modified {} content saved successfully.", destination_label),
        table,
    );
    println!();

    Ok(())
}

fn print_table(heading: &str, table: &Table) {
    println!();
    println!("{}", heading);
    println!();

    if table.is_empty() {
        println!("(no rows)");
    } else {
        println!("{}", table);
    }
}

fn diagnose_missing_source(path: &Path, create_missing: bool) {
    if create_missing {
        match create_placeholder(path) {
            Ok(()) => println!("\nCreated empty placeholder: {}", path.display()),
            Err(e) => eprintln!("Warning: could not create placeholder: {}", e),
        }
    }

    match list_sibling_files(path) {
        Ok(files) => {
            println!("\nFiles in the directory:\n");
            for name in files {
                println!("{}", name);
            }
        }
        Err(_) => println!("\nDirectory not found."),
    }
}
