use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use psi_notation::{driver, Options, OutputFormat};

#[derive(Parser)]
#[command(
    name = "psi-compiler",
    version,
    about = "Compile |Ψ notation documents to JSON, summaries or a knowledge index"
)]
struct Cli {
    /// Documents or directories to compile
    #[arg(value_name = "INPUT")]
    inputs: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, overrides_with = "no_pretty")]
    pretty: bool,

    /// Disable pretty printing
    #[arg(long, overrides_with = "pretty")]
    no_pretty: bool,

    /// Write output to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Keep only statements whose head matches this symbol
    #[arg(long, value_name = "QUERY")]
    symbol: Option<String>,

    /// Enable verbose debug output
    #[arg(long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

/// Write `contents` to a temp file beside `path` and rename it into place,
/// so a failed write never leaves a truncated output file.
fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create a temp file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version go to stdout and succeed; every usage error exits 1.
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };
    init_tracing(cli.verbose);

    let options = Options {
        format: cli.format,
        pretty: cli.pretty && !cli.no_pretty,
        symbol: cli.symbol,
    };
    let output = driver::run(&cli.inputs, &options).map_err(|err| {
        if err.is_empty_result() {
            anyhow::Error::new(err).context("nothing to output")
        } else {
            anyhow::Error::new(err)
        }
    })?;

    match &cli.out {
        Some(path) => {
            write_atomically(path, &output)?;
            tracing::info!(path = %path.display(), bytes = output.len(), "wrote output");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .context("failed to write to stdout")?;
            stdout.flush().context("failed to flush stdout")?;
        }
    }
    Ok(())
}
