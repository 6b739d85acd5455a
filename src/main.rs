use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use invoice_cleaner::config::{CleanerConfig, default_output_path, with_xlsx_extension};
use invoice_cleaner::{Result, ToolError, run};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging(cli.log_file.as_deref()) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
    let logs_to_file = cli.log_file.is_some();
    if let Err(err) = execute(cli) {
        if logs_to_file {
            error!(category = %err.category(), "{err}");
        }
        eprintln!("error ({}): {err}", err.category());
        std::process::exit(1);
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match log_file {
        Some(path) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(File::create(path)?))
            .try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    result.map_err(|err| ToolError::Logging(err.to_string()))
}

fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Clean(args) => execute_clean(args),
        Command::Synonyms(args) => execute_synonyms(args),
    }
}

fn execute_clean(args: CleanArgs) -> Result<()> {
    let config = args.common.load_config()?;
    let input = config.resolve(&with_xlsx_extension(&args.input));
    if !input.exists() {
        return Err(ToolError::MissingInput(input));
    }
    let output = match &args.output {
        Some(path) => config.resolve(path),
        None => default_output_path(&input),
    };

    let config = CleanerConfig {
        header_row: args.header_row.unwrap_or(config.header_row),
        copy_source_sheets: config.copy_source_sheets && !args.no_source_copy,
        ..config
    };

    let summary = run::clean_file(&input, &output, &config)?;
    info!(output = %summary.output.display(), "output written");

    if let Some(report) = &args.report {
        std::fs::write(report, serde_json::to_string_pretty(&summary)?)?;
    }
    Ok(())
}

fn execute_synonyms(args: CommonArgs) -> Result<()> {
    let config = args.load_config()?;
    let synonyms = run::load_synonyms(&config)?;
    println!("{}", serde_json::to_string_pretty(&synonyms)?);
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Reconcile invoice workbook headers and split purchase orders."
)]
struct Cli {
    /// Write logs to this file instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Clean every sheet of a workbook.
    Clean(CleanArgs),
    /// Print the synonym table built from the template as JSON.
    Synonyms(CommonArgs),
}

#[derive(clap::Args)]
struct CommonArgs {
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory relative paths are resolved against.
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Synonym template workbook.
    #[arg(long)]
    template: Option<PathBuf>,
}

impl CommonArgs {
    fn load_config(&self) -> Result<CleanerConfig> {
        let mut config = match &self.config {
            Some(path) => CleanerConfig::load(path)?,
            None => CleanerConfig::default(),
        };
        if let Some(dir) = &self.dir {
            config.directory = dir.clone();
        }
        if let Some(template) = &self.template {
            config.template = template.clone();
        }
        Ok(config)
    }
}

#[derive(clap::Args)]
struct CleanArgs {
    /// Source workbook; `.xlsx` is appended when no extension is given.
    input: PathBuf,

    #[command(flatten)]
    common: CommonArgs,

    /// Output workbook. Defaults to "<input> output.xlsx".
    #[arg(long)]
    output: Option<PathBuf>,

    /// Rows to skip above the header row in every sheet.
    #[arg(long)]
    header_row: Option<usize>,

    /// Do not copy the source sheets into the output workbook.
    #[arg(long)]
    no_source_copy: bool,

    /// Write a JSON summary of the run to this file.
    #[arg(long)]
    report: Option<PathBuf>,
}
