//! Mindpulse CLI - Command-line interface for Mindpulse
//!
//! Commands:
//! - score: Score raw readings into wellness scores (batch mode)
//! - run: Feed streaming readings from stdin through a monitor (streaming mode)
//! - validate: Range-check raw readings
//! - doctor: Diagnose configuration and history health
//! - schema: Print input/output schema information

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use mindpulse::config::MonitorConfig;
use mindpulse::encoder::SNAPSHOT_VERSION;
use mindpulse::history::ReadingHistory;
use mindpulse::pipeline::WellnessMonitor;
use mindpulse::schema::{RawReading, ReadingAdapter, SCHEMA_VERSION};
use mindpulse::types::WellnessScore;
use mindpulse::{ComputeError, MINDPULSE_VERSION, PRODUCER_NAME};

/// Mindpulse - On-device wellness scoring from biofeedback readings
#[derive(Parser)]
#[command(name = "mindpulse")]
#[command(version = MINDPULSE_VERSION)]
#[command(about = "Turn biofeedback sensor readings into wellness scores", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score raw readings into wellness scores (batch mode)
    Score {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,
    },

    /// Feed streaming readings from stdin through a monitor (streaming mode)
    Run {
        /// Monitor configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the history capacity from the configuration
        #[arg(long)]
        history_capacity: Option<usize>,

        /// Load history from file
        #[arg(long)]
        load_history: Option<PathBuf>,

        /// Save history to file on exit
        #[arg(long)]
        save_history: Option<PathBuf>,

        /// Flush output after each record
        #[arg(long, default_value = "true")]
        flush: bool,
    },

    /// Range-check raw readings
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration and history health
    Doctor {
        /// Check monitor configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Check history file
        #[arg(long)]
        history: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print (input or output)
        #[arg(value_enum)]
        schema_type: SchemaType,

        /// Output as JSON schema
        #[arg(long)]
        json_schema: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one reading per line)
    Ndjson,
    /// JSON array of readings
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one score per line)
    Ndjson,
    /// JSON array of scores
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Input schema (biofeedback.reading.v1)
    Input,
    /// Output schema (wellness snapshot)
    Output,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), MindpulseCliError> {
    match cli.command {
        Commands::Score {
            input,
            output,
            input_format,
            output_format,
        } => cmd_score(&input, &output, input_format, output_format),

        Commands::Run {
            config,
            history_capacity,
            load_history,
            save_history,
            flush,
        } => cmd_run(
            config.as_deref(),
            history_capacity,
            load_history.as_deref(),
            save_history.as_deref(),
            flush,
        ),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Doctor {
            config,
            history,
            json,
        } => cmd_doctor(config.as_deref(), history.as_deref(), json),

        Commands::Schema {
            schema_type,
            json_schema,
        } => cmd_schema(schema_type, json_schema),
    }
}

fn read_input(input: &Path) -> Result<String, MindpulseCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn parse_readings(
    input_data: &str,
    input_format: InputFormat,
) -> Result<Vec<RawReading>, MindpulseCliError> {
    let readings = match input_format {
        InputFormat::Ndjson => ReadingAdapter::parse_ndjson(input_data)?,
        InputFormat::Json => ReadingAdapter::parse_array(input_data)?,
    };
    Ok(readings)
}

fn cmd_score(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
) -> Result<(), MindpulseCliError> {
    let input_data = read_input(input)?;
    let readings = parse_readings(&input_data, input_format)?;

    if readings.is_empty() {
        return Err(MindpulseCliError::NoReadings);
    }

    let scores: Vec<WellnessScore> = readings
        .iter()
        .map(|raw| mindpulse::score(&raw.to_reading()))
        .collect();
    log::info!("scored {} reading(s)", scores.len());

    let output_data = format_output(&scores, &output_format)?;

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_run(
    config_path: Option<&Path>,
    history_capacity: Option<usize>,
    load_history: Option<&Path>,
    save_history: Option<&Path>,
    flush: bool,
) -> Result<(), MindpulseCliError> {
    let mut config = match config_path {
        Some(path) => MonitorConfig::from_file(path)?,
        None => MonitorConfig::default(),
    };
    if let Some(capacity) = history_capacity {
        config.history_capacity = capacity;
    }

    let mut monitor = WellnessMonitor::with_config(config)?;

    if let Some(history_path) = load_history {
        let history_json = fs::read_to_string(history_path)?;
        monitor.load_history(&history_json)?;
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        let snapshot = monitor.ingest_json(trimmed, Utc::now())?;
        writeln!(stdout, "{}", serde_json::to_string(&snapshot)?)?;
        if flush {
            stdout.flush()?;
        }
    }
    stdout.flush()?;

    if let Some(history_path) = save_history {
        let history_json = monitor.save_history()?;
        fs::write(history_path, history_json)?;
    }

    Ok(())
}

fn cmd_validate(
    input: &Path,
    input_format: InputFormat,
    json: bool,
) -> Result<(), MindpulseCliError> {
    let input_data = read_input(input)?;
    let readings = parse_readings(&input_data, input_format)?;

    let results = ReadingAdapter::validate_readings(&readings);

    let report = ValidationReport {
        schema_version: SCHEMA_VERSION.to_string(),
        total_readings: readings.len(),
        valid_readings: readings.len() - results.len(),
        invalid_readings: results.len(),
        errors: results
            .iter()
            .map(|r| ValidationErrorDetail {
                index: r.index,
                device_id: r.device_id.clone(),
                issues: r.issues.iter().map(|issue| issue.to_string()).collect(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total readings:   {}", report.total_readings);
        println!("Valid readings:   {}", report.valid_readings);
        println!("Invalid readings: {}", report.invalid_readings);

        if !report.errors.is_empty() {
            println!("\nIssues:");
            for err in &report.errors {
                println!(
                    "  - Reading {} (device {}): {}",
                    err.index,
                    err.device_id.as_deref().unwrap_or("unknown"),
                    err.issues.join("; ")
                );
            }
        }
    }

    if report.invalid_readings > 0 {
        Err(MindpulseCliError::ValidationFailed(report.invalid_readings))
    } else {
        Ok(())
    }
}

fn check_config(path: &Path) -> DoctorCheck {
    if !path.exists() {
        return DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Warning,
            message: "Config file does not exist, defaults apply".to_string(),
        };
    }
    match MonitorConfig::from_file(path) {
        Ok(config) => DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Ok,
            message: format!(
                "Config valid (capacity {}, fresh {}s, stale {}s)",
                config.history_capacity, config.fresh_within_secs, config.stale_within_secs
            ),
        },
        Err(e) => DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Error,
            message: format!("Invalid config: {}", e),
        },
    }
}

fn check_history(path: &Path) -> DoctorCheck {
    if !path.exists() {
        return DoctorCheck {
            name: "history".to_string(),
            status: CheckStatus::Warning,
            message: "History file does not exist".to_string(),
        };
    }
    let loaded = fs::read_to_string(path)
        .map_err(ComputeError::from)
        .and_then(|content| ReadingHistory::from_json(&content).map_err(ComputeError::from));
    match loaded {
        Ok(history) => DoctorCheck {
            name: "history".to_string(),
            status: CheckStatus::Ok,
            message: format!(
                "History file valid ({} of {} readings)",
                history.len(),
                history.capacity()
            ),
        },
        Err(e) => DoctorCheck {
            name: "history".to_string(),
            status: CheckStatus::Error,
            message: format!("Invalid history file: {}", e),
        },
    }
}

fn cmd_doctor(
    config: Option<&Path>,
    history: Option<&Path>,
    json: bool,
) -> Result<(), MindpulseCliError> {
    let mut checks: Vec<DoctorCheck> = vec![
        DoctorCheck {
            name: "mindpulse_version".to_string(),
            status: CheckStatus::Ok,
            message: format!("Mindpulse version {}", MINDPULSE_VERSION),
        },
        DoctorCheck {
            name: "schema_version".to_string(),
            status: CheckStatus::Ok,
            message: format!(
                "Input schema: {}, snapshot version: {}",
                SCHEMA_VERSION, SNAPSHOT_VERSION
            ),
        },
    ];

    if let Some(config_path) = config {
        checks.push(check_config(config_path));
    }

    if let Some(history_path) = history {
        checks.push(check_history(history_path));
    }

    // Check stdin is available (for streaming mode)
    let stdin_message = if atty::is(atty::Stream::Stdin) {
        "stdin is a TTY (interactive mode)"
    } else {
        "stdin is a pipe (streaming mode ready)"
    };
    checks.push(DoctorCheck {
        name: "stdin".to_string(),
        status: CheckStatus::Ok,
        message: stdin_message.to_string(),
    });

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: MINDPULSE_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Mindpulse Doctor Report");
        println!("=======================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(MindpulseCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn cmd_schema(schema_type: SchemaType, json_schema: bool) -> Result<(), MindpulseCliError> {
    match schema_type {
        SchemaType::Input => {
            if json_schema {
                println!("{}", get_input_json_schema());
            } else {
                println!("Input Schema: {}", SCHEMA_VERSION);
                println!();
                println!("One JSON object per sensor tick. All fields are optional;");
                println!("missing numeric fields read as 0.");
                println!();
                println!("- heart_rate_bpm (aliases: heartRate, bpm): beats per minute");
                println!("- skin_temp_c (aliases: temperature, temp): skin temperature in celsius");
                println!("- spo2: blood oxygen percentage");
                println!("- gsr_raw (alias: gsr): galvanic skin response ADC value, 0-1023");
                println!("- timestamp: RFC 3339 time the device took the reading");
                println!("- device_id (alias: deviceId): device identifier");
            }
        }
        SchemaType::Output => {
            if json_schema {
                println!("{}", get_output_json_schema());
            } else {
                println!("Output Schema: wellness snapshot {}", SNAPSHOT_VERSION);
                println!();
                println!("- snapshot_version: Schema version");
                println!("- producer: {{ name, version, instance_id }}");
                println!("- computed_at_utc, received_at_utc, measured_at_utc, age_sec");
                println!("- freshness: fresh | stale | outdated");
                println!("- trusted: true only for fresh readings");
                println!("- reading: {{ heart_rate_bpm, skin_temp_c, spo2, gsr_raw }}");
                println!("- score (omitted when outdated):");
                println!("  - mood, stress, energy, focus, anxiety: 1-10");
                println!("  - categories: {{ mood, stress, energy, focus, anxiety, skin_response }}");
                println!("  - overall: good | fair | needs_attention");
                println!("  - insights, recommendations");
                println!("- history: {{ count, capacity, average, oldest_utc, newest_utc }}");
            }
        }
    }

    Ok(())
}

// Helper functions

fn format_output(
    scores: &[WellnessScore],
    format: &OutputFormat,
) -> Result<String, MindpulseCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for score in scores {
                lines.push(serde_json::to_string(score)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(scores)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(scores)?),
    }
}

fn get_input_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": SCHEMA_VERSION,
        "description": "Biofeedback sensor reading",
        "type": "object",
        "properties": {
            "heart_rate_bpm": { "type": "number" },
            "skin_temp_c": { "type": "number" },
            "spo2": { "type": "number" },
            "gsr_raw": { "type": "number", "minimum": 0, "maximum": 1023 },
            "timestamp": { "type": "string", "format": "date-time" },
            "device_id": { "type": "string" }
        }
    })
    .to_string()
}

fn get_output_json_schema() -> String {
    let axis = serde_json::json!({ "type": "number", "minimum": 1, "maximum": 10 });
    let risk = serde_json::json!({ "type": "string", "enum": ["Normal", "Sedang", "Tinggi"] });
    let capacity = serde_json::json!({ "type": "string", "enum": ["Rendah", "Sedang", "Tinggi"] });

    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "wellness.snapshot",
        "description": "Mindpulse wellness snapshot",
        "type": "object",
        "required": ["snapshot_version", "producer", "computed_at_utc", "freshness", "trusted", "history"],
        "properties": {
            "snapshot_version": { "type": "string" },
            "producer": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "version": { "type": "string" },
                    "instance_id": { "type": "string" }
                }
            },
            "computed_at_utc": { "type": "string" },
            "received_at_utc": { "type": "string" },
            "measured_at_utc": { "type": "string" },
            "age_sec": { "type": "integer", "minimum": 0 },
            "freshness": { "type": "string", "enum": ["fresh", "stale", "outdated"] },
            "trusted": { "type": "boolean" },
            "reading": { "type": "object" },
            "score": {
                "type": "object",
                "properties": {
                    "mood": axis,
                    "stress": axis,
                    "energy": axis,
                    "focus": axis,
                    "anxiety": axis,
                    "categories": {
                        "type": "object",
                        "properties": {
                            "mood": capacity,
                            "stress": risk,
                            "energy": capacity,
                            "focus": capacity,
                            "anxiety": risk,
                            "skin_response": { "type": "string", "enum": ["Stabil", "Reaktif"] }
                        }
                    },
                    "overall": { "type": "string", "enum": ["good", "fair", "needs_attention"] },
                    "insights": { "type": "array", "items": { "type": "string" } },
                    "recommendations": { "type": "array", "items": { "type": "string" } }
                }
            },
            "history": { "type": "object" }
        }
    })
    .to_string()
}

// Error types

#[derive(Debug)]
enum MindpulseCliError {
    Io(io::Error),
    Compute(ComputeError),
    Json(serde_json::Error),
    NoReadings,
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for MindpulseCliError {
    fn from(e: io::Error) -> Self {
        MindpulseCliError::Io(e)
    }
}

impl From<ComputeError> for MindpulseCliError {
    fn from(e: ComputeError) -> Self {
        MindpulseCliError::Compute(e)
    }
}

impl From<serde_json::Error> for MindpulseCliError {
    fn from(e: serde_json::Error) -> Self {
        MindpulseCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<MindpulseCliError> for CliError {
    fn from(e: MindpulseCliError) -> Self {
        match e {
            MindpulseCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            MindpulseCliError::Compute(ComputeError::InvalidConfig(msg)) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: msg,
                hint: Some("Run 'mindpulse doctor --config <file>' for details".to_string()),
            },
            MindpulseCliError::Compute(e) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some(format!("Ensure input matches {} schema", SCHEMA_VERSION)),
            },
            MindpulseCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            MindpulseCliError::NoReadings => CliError {
                code: "NO_READINGS".to_string(),
                message: "No readings found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            MindpulseCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} readings failed validation", count),
                hint: Some("Fix validation issues and retry".to_string()),
            },
            MindpulseCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    schema_version: String,
    total_readings: usize,
    valid_readings: usize,
    invalid_readings: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    device_id: Option<String>,
    issues: Vec<String>,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
