//! Calmou CLI - Command-line interface for Calmou core
//!
//! Commands:
//! - score: Score a completed self-assessment
//! - chart: Turn mood history into chart geometry
//! - instruments: List the available instruments
//! - validate: Validate an instrument definition file

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use calmou_core::adapters::{EntryListAdapter, MoodReportAdapter, WeeklyReportAdapter};
use calmou_core::chart::ChartRender;
use calmou_core::pipeline::{parse_answers, render_report};
use calmou_core::scoring::ScoringEngine;
use calmou_core::{CalmouConfig, ComputeError, InstrumentCatalog, LevelPolicy, CALMOU_VERSION};

/// Calmou - Self-assessment scoring and mood trend charts
#[derive(Parser)]
#[command(name = "calmou")]
#[command(version = CALMOU_VERSION)]
#[command(about = "Score self-assessments and chart mood trends", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a completed self-assessment
    Score {
        /// Instrument id (e.g. stress, burnout, anxiety)
        #[arg(short, long)]
        instrument: String,

        /// Answers JSON object mapping question ids to values (use - for stdin)
        #[arg(short, long)]
        answers: PathBuf,

        /// Output format
        #[arg(long, default_value = "json")]
        output_format: OutputFormat,
    },

    /// Turn mood history into chart geometry
    Chart {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "weekly")]
        input_format: InputFormat,

        /// Surface width, overrides the configured layout
        #[arg(long)]
        width: Option<f64>,

        /// Surface height, overrides the configured layout
        #[arg(long)]
        height: Option<f64>,

        /// Clamp out-of-range mood levels instead of failing
        #[arg(long)]
        clamp: bool,

        /// Output format
        #[arg(long, default_value = "json")]
        output_format: ChartOutputFormat,
    },

    /// List the available instruments
    Instruments {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate an instrument definition file (JSON array or TOML)
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Parse the input as TOML even without a .toml extension
        #[arg(long)]
        toml: bool,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Weekly report `{labels, datasets: [{data}]}`
    Weekly,
    /// JSON array of `{label, level}` entries
    Entries,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum ChartOutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// SVG path data for the smoothed curve only
    SvgPath,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CalmouCliError> {
    let config = CalmouConfig::load(cli.config.as_deref())?;
    debug!(?config, "loaded configuration");

    match cli.command {
        Commands::Score {
            instrument,
            answers,
            output_format,
        } => cmd_score(&config, &instrument, &answers, output_format),

        Commands::Chart {
            input,
            input_format,
            width,
            height,
            clamp,
            output_format,
        } => cmd_chart(
            &config,
            &input,
            input_format,
            width,
            height,
            clamp,
            output_format,
        ),

        Commands::Instruments { json } => cmd_instruments(&config, json),

        Commands::Validate { input, toml, json } => cmd_validate(&input, toml, json),
    }
}

fn cmd_score(
    config: &CalmouConfig,
    instrument_id: &str,
    answers_path: &Path,
    output_format: OutputFormat,
) -> Result<(), CalmouCliError> {
    let catalog = config.catalog()?;
    let instrument = catalog.require(instrument_id)?;
    let answers = parse_answers(instrument, &read_input(answers_path)?)?;
    let result = ScoringEngine::score(instrument, &answers)?;

    let output = match output_format {
        OutputFormat::Json => serde_json::to_string(&result)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(&result)?,
    };
    println!("{}", output);
    Ok(())
}

fn cmd_chart(
    config: &CalmouConfig,
    input: &Path,
    input_format: InputFormat,
    width: Option<f64>,
    height: Option<f64>,
    clamp: bool,
    output_format: ChartOutputFormat,
) -> Result<(), CalmouCliError> {
    let input_data = read_input(input)?;

    let layout = config.chart.resized(
        width.unwrap_or(config.chart.width),
        height.unwrap_or(config.chart.height),
    )?;
    let policy = if clamp {
        LevelPolicy::Clamp
    } else {
        config.level_policy
    };

    let adapter: &dyn MoodReportAdapter = match input_format {
        InputFormat::Weekly => &WeeklyReportAdapter,
        InputFormat::Entries => &EntryListAdapter,
    };
    let response = render_report(adapter, &input_data, &layout, policy)?;

    match output_format {
        ChartOutputFormat::Json => println!("{}", serde_json::to_string(&response)?),
        ChartOutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(&response)?),
        ChartOutputFormat::SvgPath => match &response.render {
            ChartRender::Plotted(geometry) => println!("{}", geometry.path.to_svg()),
            ChartRender::Empty { message } => return Err(CalmouCliError::NoData(message.clone())),
        },
    }
    Ok(())
}

fn cmd_instruments(config: &CalmouConfig, json: bool) -> Result<(), CalmouCliError> {
    let catalog = config.catalog()?;

    if json {
        println!("{}", serde_json::to_string_pretty(catalog.instruments())?);
    } else {
        println!("Instruments");
        println!("===========");
        for instrument in catalog.instruments() {
            println!(
                "  {:<10} {} ({} questions, max score {})",
                instrument.id,
                instrument.title,
                instrument.questions.len(),
                instrument.max_possible_score()
            );
        }
    }
    Ok(())
}

fn cmd_validate(input: &Path, force_toml: bool, json: bool) -> Result<(), CalmouCliError> {
    let input_data = read_input(input)?;
    let is_toml = force_toml || input.extension().and_then(|e| e.to_str()) == Some("toml");

    let parsed = if is_toml {
        InstrumentCatalog::from_toml(&input_data)
    } else {
        InstrumentCatalog::from_json(&input_data)
    };

    let report = match &parsed {
        Ok(catalog) => ValidationReport {
            valid: true,
            instruments: catalog.instruments().iter().map(|i| i.id.clone()).collect(),
            error: None,
        },
        Err(e) => ValidationReport {
            valid: false,
            instruments: Vec::new(),
            error: Some(e.to_string()),
        },
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        if report.valid {
            println!("Valid: {} instrument(s)", report.instruments.len());
            for id in &report.instruments {
                println!("  - {}", id);
            }
        } else {
            println!("Invalid: {}", report.error.as_deref().unwrap_or("unknown error"));
        }
    }

    match parsed {
        Ok(_) => Ok(()),
        Err(e) => Err(CalmouCliError::ValidationFailed(e.to_string())),
    }
}

// Helper functions

fn read_input(path: &Path) -> Result<String, CalmouCliError> {
    if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

// Error types

#[derive(Debug)]
enum CalmouCliError {
    Io(io::Error),
    Compute(ComputeError),
    Json(serde_json::Error),
    NoData(String),
    ValidationFailed(String),
}

impl From<io::Error> for CalmouCliError {
    fn from(e: io::Error) -> Self {
        CalmouCliError::Io(e)
    }
}

impl From<ComputeError> for CalmouCliError {
    fn from(e: ComputeError) -> Self {
        CalmouCliError::Compute(e)
    }
}

impl From<serde_json::Error> for CalmouCliError {
    fn from(e: serde_json::Error) -> Self {
        CalmouCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<CalmouCliError> for CliError {
    fn from(e: CalmouCliError) -> Self {
        match e {
            CalmouCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            CalmouCliError::Compute(e) => compute_error(e),
            CalmouCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            CalmouCliError::NoData(message) => CliError {
                code: "NO_DATA".to_string(),
                message,
                hint: Some("Use --output-format json to get the empty-state payload".to_string()),
            },
            CalmouCliError::ValidationFailed(message) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message,
                hint: Some("Fix the instrument definition and retry".to_string()),
            },
        }
    }
}

fn compute_error(e: ComputeError) -> CliError {
    let (code, hint) = match &e {
        ComputeError::IncompleteAnswers { .. } => {
            ("INCOMPLETE_ANSWERS", "Answer every question before scoring")
        }
        ComputeError::UnknownInstrument(_) => {
            ("UNKNOWN_INSTRUMENT", "Run 'calmou instruments' to list instrument ids")
        }
        ComputeError::UnknownQuestion { .. } | ComputeError::InvalidAnswerValue { .. } => {
            ("INVALID_ANSWER", "Run 'calmou instruments --json' to see questions and options")
        }
        ComputeError::InvalidInstrument { .. } => {
            ("INVALID_INSTRUMENT", "Run 'calmou validate' on the instrument file")
        }
        ComputeError::InvalidMoodLevel(_) => {
            ("INVALID_MOOD_LEVEL", "Pass --clamp to pull levels into 1..=5")
        }
        ComputeError::InvalidLayout(_) => {
            ("INVALID_LAYOUT", "Pass finite --width and --height values")
        }
        ComputeError::MissingMoodLevel => ("MISSING_MOOD_LEVEL", "Select a mood level first"),
        ComputeError::ParseError(_) | ComputeError::JsonError(_) => {
            ("PARSE_ERROR", "Check input format")
        }
        ComputeError::ConfigError(_) => ("CONFIG_ERROR", "Check the --config file"),
    };

    CliError {
        code: code.to_string(),
        message: e.to_string(),
        hint: Some(hint.to_string()),
    }
}

#[derive(serde::Serialize)]
struct ValidationReport {
    valid: bool,
    instruments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}
