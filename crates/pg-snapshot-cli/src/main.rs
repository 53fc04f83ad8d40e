//! pg-snapshot CLI - back up a PostgreSQL database to a timestamped JSON file.

use clap::Parser;
use pg_snapshot::error::EXIT_CONFIG_ERROR;
use pg_snapshot::{run_backup, Config, SnapshotError, SslMode};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "pg-snapshot")]
#[command(about = "Back up every table of a PostgreSQL database to a JSON snapshot")]
#[command(version)]
struct Cli {
    /// Path to the KEY=VALUE env file holding DATABASE_URL
    #[arg(short, long, default_value = ".env")]
    env_file: PathBuf,

    /// Directory the snapshot is written to (created if missing)
    #[arg(short, long, default_value = "backups")]
    output_dir: PathBuf,

    /// File name prefix [default: database name from DATABASE_URL]
    #[arg(long)]
    label: Option<String>,

    /// Schema to back up
    #[arg(long, default_value = "public")]
    schema: String,

    /// TLS verification: require, verify-ca, verify-full
    #[arg(long, default_value = "require")]
    ssl_mode: SslMode,

    /// Also back up views. By default only base tables are backed up;
    /// foreign tables are never included
    #[arg(long)]
    include_views: bool,

    /// Output JSON run summary to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version also arrive here and are not failures.
            return if e.use_stderr() {
                ExitCode::from(EXIT_CONFIG_ERROR)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), SnapshotError> {
    setup_logging(&cli.verbosity, &cli.log_format);

    println!("Backing up database...");

    let mut config = Config::from_env_file(&cli.env_file, cli.output_dir)?
        .with_schema(cli.schema)
        .with_ssl_mode(cli.ssl_mode)
        .with_include_views(cli.include_views);
    if let Some(label) = cli.label {
        config = config.with_label(label);
    }
    info!("Loaded configuration from {:?}", cli.env_file);

    let summary = run_backup(&config).await?;

    println!("Database has been backed up to {}", summary.path.display());
    if cli.output_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
