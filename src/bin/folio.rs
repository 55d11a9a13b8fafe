//! Folio CLI - Command-line interface for Folio Interact
//!
//! Commands:
//! - replay: Drive a page through a scripted visit and print tracked events
//! - validate: Check a contact submission against the form rules
//! - doctor: Check a page description against the elements the runtime expects
//! - schema: Print input/output formats

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use tracing_subscriber::EnvFilter;

use folio_interact::analytics::SOCIAL_CLASS;
use folio_interact::form::{ERROR_ALERT_ID, ERROR_MESSAGE_ID, FORM_ID, SUBMIT_ID, SUCCESS_ALERT_ID};
use folio_interact::nav::{DRAWER_CLASS, NAVBAR_ID, NAV_LINK_CLASS};
use folio_interact::reveal::{PARALLAX_CLASSES, REVEAL_CLASS};
use folio_interact::typing::TYPING_CLASS;
use folio_interact::{
    parse_script, ContactSubmission, FanoutSink, InteractConfig, InteractError, JsonLinesSink,
    LogSink, Page, PortfolioRuntime, FOLIO_VERSION, PRODUCER_NAME,
};

/// Folio - Headless interaction engine for a static portfolio page
#[derive(Parser)]
#[command(name = "folio")]
#[command(version = FOLIO_VERSION)]
#[command(about = "Replay portfolio page visits and inspect their analytics", long_about = None)]
struct Cli {
    /// Log runtime activity to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay an event script against a page and emit tracked events as NDJSON
    Replay {
        /// Page description (JSON)
        #[arg(short, long)]
        page: PathBuf,

        /// Event script (NDJSON, use - for stdin)
        #[arg(short, long)]
        script: PathBuf,

        /// Configuration overrides (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Keep the clock running until this many ms after load
        #[arg(long)]
        until: Option<u64>,

        /// Wall-clock time of page load (RFC 3339); defaults to now
        #[arg(long)]
        epoch: Option<String>,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,
    },

    /// Validate a contact submission
    Validate {
        /// Submission JSON (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Configuration overrides (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a page description for the elements the runtime drives
    Doctor {
        /// Page description (JSON)
        #[arg(short, long)]
        page: Option<PathBuf>,

        /// Configuration file to check
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print format information
    Schema {
        #[arg(value_enum)]
        schema_type: SchemaType,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemaType {
    /// Page description accepted by replay and doctor
    Page,
    /// Script lines accepted by replay
    Event,
    /// Tracked events emitted by replay
    Tracked,
    /// Default configuration
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string()));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "folio_interact=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), FolioCliError> {
    match cli.command {
        Commands::Replay {
            page,
            script,
            config,
            until,
            epoch,
            output,
        } => cmd_replay(
            &page,
            &script,
            config.as_deref(),
            until,
            epoch.as_deref(),
            &output,
            cli.verbose,
        ),

        Commands::Validate { input, config, json } => cmd_validate(&input, config.as_deref(), json),

        Commands::Doctor { page, config, json } => cmd_doctor(page.as_deref(), config.as_deref(), json),

        Commands::Schema { schema_type } => cmd_schema(schema_type),
    }
}

fn read_input(path: &Path) -> Result<String, FolioCliError> {
    if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn load_config(path: Option<&Path>) -> Result<InteractConfig, FolioCliError> {
    match path {
        Some(path) => Ok(InteractConfig::from_json(&read_input(path)?)?),
        None => Ok(InteractConfig::default()),
    }
}

fn cmd_replay(
    page: &Path,
    script: &Path,
    config: Option<&Path>,
    until: Option<u64>,
    epoch: Option<&str>,
    output: &Path,
    verbose: bool,
) -> Result<(), FolioCliError> {
    let config = load_config(config)?;
    let page = Page::from_json(&fs::read_to_string(page)?)?;
    let steps = parse_script(&read_input(script)?)?;
    if steps.is_empty() {
        return Err(FolioCliError::EmptyScript);
    }

    let writer: Box<dyn Write> = if output.to_string_lossy() == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(fs::File::create(output)?)
    };

    // Verbose runs also echo each tracked event to the log.
    let mut sink = FanoutSink::new().with(JsonLinesSink::new(writer));
    if verbose {
        sink = sink.with(LogSink);
    }

    let mut builder = PortfolioRuntime::builder().config(config).sink(sink);
    if let Some(epoch) = epoch {
        let epoch = DateTime::parse_from_rfc3339(epoch)
            .map_err(|e| FolioCliError::BadEpoch(e.to_string()))?
            .with_timezone(&Utc);
        builder = builder.epoch(epoch);
    }

    let mut runtime = builder.build(page);
    runtime.replay(&steps)?;
    if let Some(until) = until {
        if until > runtime.now() {
            runtime.advance_to(until);
        }
    }

    let state = runtime.scroll_state();
    tracing::info!(
        visit = %runtime.visit_id(),
        steps = steps.len(),
        elapsed_ms = runtime.now(),
        max_depth = state.max_scroll_depth_percent,
        pending_timers = runtime.pending_timers(),
        "Replay finished"
    );
    Ok(())
}

fn cmd_validate(input: &Path, config: Option<&Path>, json: bool) -> Result<(), FolioCliError> {
    let config = load_config(config)?;
    let submission: ContactSubmission = serde_json::from_str(&read_input(input)?)?;
    let report = submission.validate(&config.form);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Valid: {}", if report.is_valid { "yes" } else { "no" });

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - {}", err);
            }
        }
    }

    if report.is_valid {
        Ok(())
    } else {
        Err(FolioCliError::ValidationFailed(report.errors.len()))
    }
}

fn cmd_doctor(page: Option<&Path>, config: Option<&Path>, json: bool) -> Result<(), FolioCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck::ok("folio_version", format!("Folio version {}", FOLIO_VERSION)));

    if let Some(path) = config {
        checks.push(match fs::read_to_string(path).map_err(FolioCliError::from).and_then(|c| {
            InteractConfig::from_json(&c).map_err(FolioCliError::from)
        }) {
            Ok(_) => DoctorCheck::ok("config", "Configuration file valid".to_string()),
            Err(e) => DoctorCheck::error("config", CliError::from(e).message),
        });
    }

    if let Some(path) = page {
        match fs::read_to_string(path).map_err(FolioCliError::from).and_then(|c| {
            Page::from_json(&c).map_err(FolioCliError::from)
        }) {
            Ok(page) => {
                checks.push(DoctorCheck::ok("page", format!("Page parsed ({} elements)", page.len())));
                checks.extend(page_checks(&page));
            }
            Err(e) => checks.push(DoctorCheck::error("page", CliError::from(e).message)),
        }
    }

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: FOLIO_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Folio Doctor Report");
        println!("===================");
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

    let has_errors = report.checks.iter().any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(FolioCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

/// Missing optional features are warnings; a form without its submit
/// button can never be sent, so that one is an error.
fn page_checks(page: &Page) -> Vec<DoctorCheck> {
    let mut checks = Vec::new();

    let presence = |name: &str, found: usize, what: &str| {
        if found > 0 {
            DoctorCheck::ok(name, format!("{} {} found", found, what))
        } else {
            DoctorCheck::warning(name, format!("No {} found; feature disabled", what))
        }
    };

    checks.push(presence("navbar", page.get_by_id(NAVBAR_ID).into_iter().count(), "#navbar"));
    checks.push(presence("nav_links", page.query_class(NAV_LINK_CLASS).len(), "nav links"));
    checks.push(presence("nav_drawer", page.query_class(DRAWER_CLASS).len(), "mobile drawers"));
    checks.push(presence("sections", page.sections_with_id().len(), "sections with id"));
    checks.push(presence("typing", page.query_class(TYPING_CLASS).len(), "typing elements"));
    checks.push(presence("reveal", page.query_class(REVEAL_CLASS).len(), "reveal elements"));
    checks.push(presence("parallax", page.query_any_class(&PARALLAX_CLASSES).len(), "parallax layers"));
    checks.push(presence("social", page.query_class(SOCIAL_CLASS).len(), "social links"));

    let Some(form) = page.get_by_id(FORM_ID) else {
        checks.push(DoctorCheck::warning("contact_form", "No #contactForm found; form disabled".to_string()));
        return checks;
    };

    match page.get_by_id(SUBMIT_ID) {
        Some(button) if page.is_descendant_of(button, form) => {
            checks.push(DoctorCheck::ok("contact_form", "#contactForm with #submitBtn found".to_string()));
        }
        _ => checks.push(DoctorCheck::error(
            "contact_form",
            "#contactForm has no #submitBtn inside it".to_string(),
        )),
    }

    for id in [SUCCESS_ALERT_ID, ERROR_ALERT_ID, ERROR_MESSAGE_ID] {
        if page.get_by_id(id).is_none() {
            checks.push(DoctorCheck::warning(id, format!("No #{} found; notice will not show", id)));
        }
    }

    checks
}

fn cmd_schema(schema_type: SchemaType) -> Result<(), FolioCliError> {
    match schema_type {
        SchemaType::Page => {
            println!("Page description (JSON)");
            println!();
            println!("  pathname   string, default \"/\"");
            println!("  viewport   {{ scroll_y, inner_height, scroll_height? }}");
            println!("  body       array of elements, in document order");
            println!();
            println!("Element fields: tag, id, classes, attrs, text, value, disabled,");
            println!("style, top, height, children.");
        }
        SchemaType::Event => {
            println!("Script line (NDJSON): {{\"at_ms\": <u64>, \"type\": <event>, ...}}");
            println!();
            println!("  scroll               y");
            println!("  click                target");
            println!("  input                target, value");
            println!("  blur                 target");
            println!("  submit");
            println!("  mouse_enter          target");
            println!("  mouse_leave          target");
            println!("  unload");
            println!("  error                message");
            println!("  worker_registration  ok, reason?");
            println!("  navigation_timing    load_event_start, load_event_end");
            println!();
            println!("Targets: {{\"id\"}}, {{\"name\"}}, {{\"class\", \"nth\"?}}, {{\"element\"}}");
        }
        SchemaType::Tracked => {
            println!("Tracked event (NDJSON)");
            println!();
            println!("  action     string");
            println!("  category   string");
            println!("  label      string or integer");
            println!("  timestamp  RFC 3339, millisecond precision, UTC");
        }
        SchemaType::Config => {
            println!("{}", InteractConfig::default().to_json()?);
        }
    }
    Ok(())
}

// Error types

#[derive(Debug)]
enum FolioCliError {
    Io(io::Error),
    Interact(InteractError),
    Json(serde_json::Error),
    EmptyScript,
    BadEpoch(String),
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for FolioCliError {
    fn from(e: io::Error) -> Self {
        FolioCliError::Io(e)
    }
}

impl From<InteractError> for FolioCliError {
    fn from(e: InteractError) -> Self {
        FolioCliError::Interact(e)
    }
}

impl From<serde_json::Error> for FolioCliError {
    fn from(e: serde_json::Error) -> Self {
        FolioCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<FolioCliError> for CliError {
    fn from(e: FolioCliError) -> Self {
        match e {
            FolioCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            FolioCliError::Interact(e) => {
                let hint = match &e {
                    InteractError::ScriptError(_) | InteractError::TimeTravel { .. } => {
                        "Run 'folio schema event' for the script format"
                    }
                    InteractError::ConfigError(_) => "Run 'folio schema config' for defaults",
                    _ => "Run 'folio doctor --page <file>' for details",
                };
                CliError {
                    code: "INPUT_ERROR".to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            FolioCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            FolioCliError::EmptyScript => CliError {
                code: "NO_EVENTS".to_string(),
                message: "No events found in script".to_string(),
                hint: Some("Ensure the script file is not empty".to_string()),
            },
            FolioCliError::BadEpoch(msg) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: msg,
                hint: Some("Use RFC 3339, e.g. 2024-01-01T00:00:00Z".to_string()),
            },
            FolioCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} fields failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            FolioCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

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

impl DoctorCheck {
    fn ok(name: &str, message: String) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message,
        }
    }

    fn warning(name: &str, message: String) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message,
        }
    }

    fn error(name: &str, message: String) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message,
        }
    }
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
