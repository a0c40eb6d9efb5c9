//! dataclean - Clean, trim and convert tabular data

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use dataclean::config::{Config, ExportFormat, OutputFormat};
use dataclean::model::ExportArtifact;
use dataclean::output::render_to_stdout;
use dataclean::pipeline::{process_batch, FileSession};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Terminal,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Terminal => OutputFormat::Terminal,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Clean, trim and convert tabular data (CSV, TSV, Excel, ODS)
#[derive(Parser, Debug)]
#[command(name = "dataclean")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Files to process, each one independently
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Fill missing numeric values with the column mean
    #[arg(long)]
    fill_missing: bool,

    /// Column(s) to keep (comma-separated, default: all)
    #[arg(short, long, value_delimiter = ',')]
    columns: Option<Vec<String>>,

    /// Chart the first two numeric columns
    #[arg(long)]
    chart: bool,

    /// Export format (CSV or Excel)
    #[arg(short = 't', long = "to", value_parser = parse_export_format)]
    to: Option<ExportFormat>,

    /// Directory for exported files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Number of rows in each preview
    #[arg(long, default_value_t = 5)]
    preview_rows: usize,

    /// For spreadsheets: which sheet to read
    #[arg(long)]
    sheet: Option<String>,

    /// Override the CSV delimiter
    #[arg(long)]
    delimiter: Option<char>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: CliOutputFormat,

    /// Log pipeline stages to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_export_format(s: &str) -> std::result::Result<ExportFormat, String> {
    s.parse()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1), // At least one file failed
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "dataclean=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::new()
        .with_preview_rows(cli.preview_rows)
        .with_fill_missing(cli.fill_missing)
        .with_show_chart(cli.chart)
        .with_output_format(cli.format.into());

    if let Some(columns) = &cli.columns {
        config = config.with_keep_columns(columns.clone());
    }
    if let Some(format) = cli.to {
        config = config.with_export_format(format);
    }
    if let Some(sheet) = &cli.sheet {
        config = config.with_sheet_name(sheet.clone());
    }
    if let Some(c) = cli.delimiter {
        match u8::try_from(c) {
            Ok(b) if b.is_ascii() => config = config.with_delimiter(b),
            _ => bail!("Delimiter must be a single ASCII character, got {:?}", c),
        }
    }

    Ok(config)
}

/// Returns `true` when every file succeeded
fn run(cli: Cli) -> Result<bool> {
    let config = build_config(&cli)?;
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let mut all_ok = true;

    let mut inputs = Vec::new();
    let mut sessions = Vec::new();
    for path in &cli.files {
        match read_session(path, &config) {
            Ok(session) => {
                inputs.push(path.as_path());
                sessions.push(session);
            }
            Err(e) => {
                all_ok = false;
                status(&mut stderr, Color::Red, "error", &format!("{:#}", e))?;
            }
        }
    }

    let outcomes = process_batch(&sessions);
    render_to_stdout(&outcomes, config.preview_rows, config.output_format)?;

    for (input, outcome) in inputs.iter().zip(&outcomes) {
        let report = match &outcome.result {
            Ok(report) => report,
            Err(e) => {
                all_ok = false;
                status(&mut stderr, Color::Red, "failed", &format!("{}: {}", outcome.file_name, e))?;
                continue;
            }
        };

        if let Some(artifact) = &report.artifact {
            match write_artifact(artifact, input, &cli.output_dir) {
                Ok(target) => {
                    status(&mut stderr, Color::Green, "wrote", &target.display().to_string())?
                }
                Err(e) => {
                    all_ok = false;
                    status(&mut stderr, Color::Red, "error", &format!("{:#}", e))?;
                }
            }
        }
    }

    Ok(all_ok)
}

fn read_session(path: &Path, config: &Config) -> Result<FileSession> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("Not a file: {}", path.display()))?;
    debug!(file = %file_name, bytes = bytes.len(), "read upload");
    Ok(FileSession::new(file_name, bytes, config.clone()))
}

fn write_artifact(artifact: &ExportArtifact, input: &Path, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    let target = output_dir.join(artifact.filename());

    if same_file(&target, input) {
        bail!(
            "Refusing to overwrite input {} (choose another --output-dir)",
            input.display()
        );
    }

    fs::write(&target, artifact.bytes())
        .with_context(|| format!("Failed to write {}", target.display()))?;
    Ok(target)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn status(stream: &mut StandardStream, color: Color, label: &str, message: &str) -> Result<()> {
    stream.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(stream, "{:>8}", label)?;
    stream.reset()?;
    writeln!(stream, " {}", message)?;
    Ok(())
}
