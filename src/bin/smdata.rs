use std::process::ExitCode;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use statemod_dataset::app::{
    self, DataSet, LoadOptions, ReadResult, SaveOptions, VisibilityResult,
};
use statemod_dataset::config::{ConfigLoader, ResolvedConfig};
use statemod_dataset::control::{ControlSettings, read_control_file};
use statemod_dataset::error::DatasetError;
use statemod_dataset::format::ManifestFormat;
use statemod_dataset::manifest::EntryStatus;
use statemod_dataset::output::{JsonOutput, OutputMode, progress_sink};

#[derive(Parser)]
#[command(name = "smdata")]
#[command(about = "Inspect and rewrite StateMod dataset response files")]
#[command(version, author)]
struct Cli {
    /// Print JSON results instead of a summary.
    #[arg(long, global = true)]
    non_interactive: bool,

    /// Path to smdata.json.
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Report whether a response file is legacy or free-form")]
    Detect(DetectArgs),
    #[command(about = "Read a dataset and report every component's status")]
    Read(ReadArgs),
    #[command(about = "Show which components a control file activates")]
    Visibility(VisibilityArgs),
    #[command(about = "Read a dataset and write its response file")]
    Write(WriteArgs),
}

#[derive(Args)]
struct DetectArgs {
    response: Option<Utf8PathBuf>,
}

#[derive(Args)]
struct ReadArgs {
    response: Option<Utf8PathBuf>,

    /// Control file to use instead of the one the response file names.
    #[arg(long)]
    control: Option<Utf8PathBuf>,

    /// Skip detection and read with this syntax.
    #[arg(long)]
    format: Option<ManifestFormat>,
}

#[derive(Args)]
struct VisibilityArgs {
    /// Control file (.ctl).
    control: Utf8PathBuf,
}

#[derive(Args)]
struct WriteArgs {
    #[command(flatten)]
    read: ReadArgs,

    /// Destination response file.
    #[arg(long, short)]
    output: Utf8PathBuf,

    /// Syntax of the written file; defaults to the syntax read.
    #[arg(long = "output-format")]
    output_format: Option<ManifestFormat>,

    /// Do not carry the comment header of the source file.
    #[arg(long)]
    no_header: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<DatasetError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &DatasetError) -> u8 {
    match error {
        DatasetError::MissingConfig
        | DatasetError::ConfigRead(_)
        | DatasetError::ConfigParse(_) => 2,
        DatasetError::ManifestRead { .. } => 3,
        DatasetError::MalformedControlFile { .. } => 4,
        DatasetError::ManifestWrite { .. } | DatasetError::Filesystem(_) => 5,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.non_interactive {
        OutputMode::NonInteractive
    } else {
        OutputMode::Interactive
    };
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Detect(args) => {
            let response = response_path(args.response, &config)?;
            let result = app::detect(&response)?;
            match output_mode {
                OutputMode::NonInteractive => JsonOutput::print_detect(&result).into_diagnostic()?,
                OutputMode::Interactive => println!("{}: {}", result.path, result.format),
            }
            Ok(())
        }
        Commands::Read(args) => {
            let dataset = load_dataset(args, &config, output_mode)?;
            let result = dataset.read_result();
            match output_mode {
                OutputMode::NonInteractive => JsonOutput::print_read(&result).into_diagnostic()?,
                OutputMode::Interactive => print_read_summary(&result),
            }
            Ok(())
        }
        Commands::Visibility(args) => {
            let settings: ControlSettings = read_control_file(&args.control)?;
            let result = app::visibility_report(&settings);
            match output_mode {
                OutputMode::NonInteractive => {
                    JsonOutput::print_visibility(&result).into_diagnostic()?
                }
                OutputMode::Interactive => print_visibility_summary(&result),
            }
            Ok(())
        }
        Commands::Write(args) => {
            let mut dataset = load_dataset(args.read, &config, output_mode)?;
            let options = SaveOptions {
                format: args.output_format.or(config.output_format),
                carry_header: config.carry_header && !args.no_header,
            };
            let result = dataset.save(&args.output, &options, progress_sink(output_mode))?;
            match output_mode {
                OutputMode::NonInteractive => JsonOutput::print_write(&result).into_diagnostic()?,
                OutputMode::Interactive => println!("wrote {} ({})", result.path, result.format),
            }
            Ok(())
        }
    }
}

/// An explicit `--config` must load; the default lookup may find nothing.
fn load_config(path: Option<&str>) -> Result<ResolvedConfig, DatasetError> {
    match ConfigLoader::resolve(path) {
        Ok(config) => Ok(config),
        Err(DatasetError::MissingConfig) if path.is_none() => Ok(ResolvedConfig::default()),
        Err(err) => Err(err),
    }
}

fn response_path(
    argument: Option<Utf8PathBuf>,
    config: &ResolvedConfig,
) -> miette::Result<Utf8PathBuf> {
    argument
        .or_else(|| config.response_file.clone())
        .ok_or_else(|| miette::Report::msg("response file required (argument or smdata.json)"))
}

fn load_dataset(
    args: ReadArgs,
    config: &ResolvedConfig,
    output_mode: OutputMode,
) -> miette::Result<DataSet> {
    let response = response_path(args.response, config)?;
    let options = LoadOptions {
        control_override: args.control.or_else(|| config.control_file.clone()),
        format_override: args.format,
    };
    let dataset = DataSet::load(Utf8Path::new(&response), &options, progress_sink(output_mode))?;
    Ok(dataset)
}

fn print_read_summary(result: &ReadResult) {
    let count = |status: EntryStatus| {
        result
            .entries
            .iter()
            .filter(|entry| entry.status == status)
            .count()
    };
    println!("{} ({})", result.manifest, result.format);
    println!("  loaded:   {}", count(EntryStatus::Loaded));
    println!("  empty:    {}", count(EntryStatus::AbsentEmptyFile));
    println!("  unlisted: {}", count(EntryStatus::AbsentByFormat));
    println!("  inactive: {}", count(EntryStatus::SkippedInactive));
    println!("  errors:   {}", count(EntryStatus::Error));
    for diagnostic in &result.diagnostics {
        let name = diagnostic.component.descriptor().display_name;
        println!("  {:?} {name}: {}", diagnostic.severity, diagnostic.message);
    }
}

fn print_visibility_summary(result: &VisibilityResult) {
    for entry in result.components.iter().filter(|entry| entry.visible) {
        let marker = if entry.required { "*" } else { " " };
        println!("{marker} {:>3} {:<45} {}", entry.id, entry.name, entry.group);
    }
}
