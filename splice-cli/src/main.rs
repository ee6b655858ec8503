//! splice CLI
//!
//! Transforms one stylesheet, expanding `@require` and `@extend`, and writes
//! the result to stdout or a file.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use owo_colors::OwoColorize;
use splice_common::warning::set_warnings_enabled;
use splice_css::{Transformed, transform_file};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// splice — CSS macro-preprocessor with `@require` and `@extend`
#[derive(Parser, Debug)]
#[command(name = "splice")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Transform to stdout
    splice styles/main.css

    # Transform into a file
    splice styles/main.css -o dist/main.css

    # See which files get required
    splice -vv styles/main.css > /dev/null

    # Inspect what @extend can see
    splice --dump-rules styles/main.css > /dev/null
"#)]
struct Cli {
    /// Stylesheet to transform
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Write output to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Don't warn about unresolved @extend targets (the inline markers stay)
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Print the local and required rule stores as JSON to stderr
    #[arg(long)]
    dump_rules: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    set_warnings_enabled(!cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let result = transform_file(&cli.input, &mut *out);
    // Output written before a failure is kept, so flush either way.
    let flushed = out.flush();
    let transformed = result?;
    flushed.context("failed to flush output")?;

    debug!(
        local = transformed.local.len(),
        required = transformed.required.len(),
        "transform finished"
    );

    if cli.dump_rules {
        dump_rules(&transformed)?;
    }
    Ok(())
}

fn dump_rules(transformed: &Transformed) -> Result<()> {
    let dump = serde_json::json!({
        "local": &transformed.local,
        "required": &transformed.required,
    });
    let json = serde_json::to_string_pretty(&dump).context("failed to serialize rule stores")?;
    eprintln!("{json}");
    Ok(())
}

/// Logs go to stderr; stdout carries the stylesheet.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
