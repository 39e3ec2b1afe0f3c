// EMR Log Analyser - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading
// 3. Logging initialisation (debug mode, environment format)
// 4. Dispatch to the analysis run and report rendering

use emr_log_analyser::app::analyse::{self, AnalyseRequest};
use emr_log_analyser::core::filter::{FilterCriteria, FilterField};
use emr_log_analyser::platform::config::{self, AppConfig, PlatformPaths};
use emr_log_analyser::ui::report::{self, DisplayOptions};
use emr_log_analyser::ui::theme::Palette;
use emr_log_analyser::util::{constants, error, logging};

use clap::{Args, Parser, Subcommand};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

/// EMR Log Analyser - parse, filter and summarise Apache access logs and
/// Tomcat/Catalina application logs.
#[derive(Parser, Debug)]
#[command(name = constants::APP_NAME, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Path to config.toml (defaults to the platform config directory).
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    /// Disable coloured output.
    #[arg(long = "no-color", global = true)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyse a log file.
    Analyse(AnalyseArgs),
    /// Print the version number.
    Version,
}

#[derive(Args, Debug)]
struct AnalyseArgs {
    /// Path to the log file.
    #[arg(short = 'f', long = "logfile")]
    logfile: PathBuf,

    /// Export the filtered entries to this file (.csv or .json).
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Log type: apache or catalina.
    #[arg(short = 't', long = "type", default_value = "catalina")]
    log_type: String,

    /// Filter by client IP address (apache).
    #[arg(long = "ip", default_value = "")]
    ip: String,

    /// Filter by request path (apache).
    #[arg(long = "path", default_value = "")]
    path: String,

    /// Filter by HTTP status code (apache).
    #[arg(long = "status", default_value = "")]
    status: String,

    /// Filter by log level (catalina).
    #[arg(long = "level", default_value = "")]
    level: String,

    /// Filter by thread name (catalina).
    #[arg(long = "thread", default_value = "")]
    thread: String,

    /// Filter by class name (catalina).
    #[arg(long = "class", default_value = "")]
    class: String,

    /// Print a statistics summary.
    #[arg(long = "stats")]
    stats: bool,
}

impl AnalyseArgs {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new()
            .with(FilterField::ClientAddress, self.ip.as_str())
            .with(FilterField::RequestPath, self.path.as_str())
            .with(FilterField::StatusCode, self.status.as_str())
            .with(FilterField::Level, self.level.as_str())
            .with(FilterField::Thread, self.thread.as_str())
            .with(FilterField::Class, self.class.as_str())
    }
}

fn run_analyse(args: AnalyseArgs, app_config: &AppConfig, no_color: bool) -> error::Result<()> {
    let criteria = args.criteria();
    let request = AnalyseRequest::new(
        args.logfile,
        &args.log_type,
        criteria,
        args.stats,
        args.output,
    )?;

    println!("Performing {} log analysis...", request.family);

    let outcome = analyse::run(&request)?;

    let stdout = io::stdout();
    let palette = Palette::new(app_config.color && !no_color && stdout.is_terminal());
    let options = DisplayOptions {
        message_width: app_config.message_width,
        stats_threshold: app_config.stats_threshold,
    };

    let mut out = stdout.lock();
    report::render_outcome(&mut out, &outcome, &palette, &options)
        .and_then(|()| out.flush())
        .map_err(|e| error::AnalyserError::Io {
            path: PathBuf::from("<stdout>"),
            operation: "write report",
            source: e,
        })?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PlatformPaths::resolve().config_file());
    let (app_config, config_warnings) = config::load_config(&config_path);

    // Initialise logging subsystem
    logging::init(
        cli.debug,
        app_config.log_level.as_deref(),
        logging::LogFormat::for_environment(&app_config.environment),
    );

    for warning in &config_warnings {
        tracing::warn!(error = %warning, "Configuration warning");
    }

    tracing::debug!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        config = %config_path.display(),
        environment = %app_config.environment,
        "Analyser starting"
    );

    let result = match cli.command {
        Command::Version => {
            println!("{} version {}", constants::APP_NAME, constants::APP_VERSION);
            Ok(())
        }
        Command::Analyse(args) => run_analyse(args, &app_config, cli.no_color),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Analysis failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
