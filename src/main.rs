use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use handpad::{HandpadConfig, HandpadController, ProfileKind};

#[derive(Parser, Debug)]
#[command(name = "handpad")]
#[command(about = "Turn webcam hand gestures into arrow-key presses")]
#[command(version)]
#[command(long_about = "Reads hand landmarks from a detector, classifies finger states into \
game actions and holds or taps arrow keys on a virtual keyboard. Two profiles are built in: \
a single-hand driving layout and a two-hand endless runner layout.")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "handpad.toml", help = "Path to TOML configuration file")]
    config: String,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging")]
    debug: bool,

    /// Enable verbose logging (info level)
    #[arg(short, long, help = "Enable verbose info level logging")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration file and exit without starting")]
    validate_config: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in TOML format and exit")]
    print_config: bool,

    /// Log key events instead of injecting them
    #[arg(long, help = "Log key presses and releases instead of sending them to the OS")]
    dry_run: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,

    /// Override the configured gesture profile
    #[arg(long, value_name = "PROFILE", help = "Gesture profile: driving or runner")]
    profile: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        println!("# Handpad Configuration File");
        println!("# This is the default configuration with all available options");
        println!();
        println!("{}", HandpadConfig::default_toml()?);
        return Ok(());
    }

    init_logging(&args)?;

    info!("Starting Handpad v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", args.config);

    let mut config = match HandpadConfig::load_from_file(&args.config) {
        Ok(config) => {
            info!("Configuration loaded successfully from: {}", args.config);
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Some(name) = args.profile.as_deref() {
        match ProfileKind::from_name(name) {
            Some(kind) => config.profile.kind = kind,
            None => {
                eprintln!("✗ Unknown profile '{}', expected driving or runner", name);
                std::process::exit(2);
            }
        }
    }

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        eprintln!("✗ Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    if args.validate_config {
        info!("Configuration validation successful");
        println!("✓ Configuration is valid");
        return Ok(());
    }

    let mut controller = HandpadController::from_config(config, args.dry_run)
        .await
        .map_err(|e| {
            error!("Failed to start handpad: {}", e);
            e
        })?;

    let exit_code = controller.run().await.map_err(|e| {
        error!("Handpad error during execution: {}", e);
        e
    })?;

    info!("Handpad exited with code: {}", exit_code);
    std::process::exit(exit_code);
}

fn init_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("handpad={}", log_level)));

    let fmt_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("compact") => fmt::layer()
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        Some("pretty") | None => fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(args.debug)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer()
                .with_target(true)
                .with_thread_ids(args.debug)
                .with_file(args.debug)
                .with_line_number(args.debug)
                .boxed()
        }
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .init();

    Ok(())
}
