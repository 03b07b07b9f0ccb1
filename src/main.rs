use anyhow::Result;
use azinv::azure::client::AzureClient;
use azinv::azure::resource_groups::{self, ResourceGroup};
use azinv::azure::storage;
use azinv::config::Config;
use azinv::{aggregate, pool, render, spinner};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// CLI inventory of Azure resource groups and storage accounts
/// with their creation times.
#[derive(Parser, Debug)]
#[command(name = "azinv", version, about, long_about = None)]
struct Args {
    /// Azure subscription ID (or AZURE_SUBSCRIPTION_ID)
    #[arg(long, global = true)]
    subscription_id: Option<String>,

    /// Azure access token (or AZURE_ACCESS_TOKEN)
    #[arg(long, global = true)]
    access_token: Option<String>,

    /// Maximum number of concurrent API calls (minimum: 1)
    #[arg(long, global = true, default_value_t = 10)]
    max_concurrency: i64,

    /// Output results to a CSV file at the given path
    #[arg(long, global = true)]
    output_csv: Option<PathBuf>,

    /// Machine-readable output (tab-separated values, no spinner)
    #[arg(long, global = true)]
    porcelain: bool,

    /// Log level for debugging
    #[arg(long, global = true, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all resource groups with their creation times (default)
    Groups {
        /// List every resource in each group with its creation time
        #[arg(long)]
        list_resources: bool,
    },
    /// List all storage accounts and identify location-based limits
    StorageAccounts,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .expect("Failed to open log file");

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("azinv started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("azinv").join("azinv.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".azinv").join("azinv.log");
    }
    PathBuf::from("azinv.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let list_resources = matches!(
        &args.command,
        Some(Command::Groups { list_resources: true })
    );

    let config = Config::resolve(
        args.subscription_id,
        args.access_token,
        args.max_concurrency,
        args.output_csv,
        args.porcelain,
        list_resources,
    )?;

    let client = AzureClient::new(&config)?;

    match args.command {
        None | Some(Command::Groups { .. }) => run_groups(&client, &config).await,
        Some(Command::StorageAccounts) => run_storage_accounts(&client, &config).await,
    }
}

/// Fetch every resource group, fan out the per-group detail fetches through
/// the bounded pool, then render the aggregated report.
async fn run_groups(client: &AzureClient, config: &Config) -> Result<()> {
    let start = Instant::now();

    if !config.porcelain {
        println!("Fetching resource groups...");
    }

    // The only fatal fetch: no per-entity recovery exists before the
    // listing is known.
    let groups: Vec<ResourceGroup> = resource_groups::list_resource_groups(client).await?;

    if !config.porcelain {
        println!("Found {} resource groups:\n", groups.len());
    }

    let spinner = spinner::maybe_start("Processing resource groups...", config.porcelain);

    let names: Vec<String> = groups.iter().map(|g| g.name.clone()).collect();
    let fetch_client = client.clone();
    let results = pool::run_bounded(names, config.max_concurrency, move |name| {
        let client = fetch_client.clone();
        async move { resource_groups::fetch_resources_in_group(&client, &name).await }
    })
    .await;

    if let Some(spinner) = spinner {
        spinner.stop().await;
    }

    let report = aggregate::build_group_report(groups, results);

    if config.porcelain {
        render::console::print_group_report_porcelain(&report);
    } else {
        render::console::print_group_report(&report, config.list_resources);
    }

    if let Some(path) = &config.output_csv {
        render::csv::write_group_csv(&report, config.list_resources, path)?;
        if !config.porcelain {
            println!("CSV output written to: {}", path.display());
        }
    }

    tracing::info!("operation completed in {:?}", start.elapsed());
    Ok(())
}

/// Fetch every storage account (creation times come expanded on the listing
/// itself) and render the tallies and limit analysis.
async fn run_storage_accounts(client: &AzureClient, config: &Config) -> Result<()> {
    let start = Instant::now();

    if !config.porcelain {
        println!("Fetching storage accounts...");
    }

    let accounts = storage::list_storage_accounts(client).await?;

    if accounts.is_empty() {
        println!("No storage accounts found in this subscription.");
        return Ok(());
    }

    if !config.porcelain {
        println!("Found {} storage accounts:\n", accounts.len());
    }

    let report = aggregate::build_storage_report(accounts, config.thresholds);

    if config.porcelain {
        render::console::print_storage_report_porcelain(&report);
    } else {
        render::console::print_storage_report(&report);
    }

    if let Some(path) = &config.output_csv {
        render::csv::write_storage_csv(&report, path)?;
        if !config.porcelain {
            println!("CSV output written to: {}", path.display());
        }
    }

    tracing::info!("operation completed in {:?}", start.elapsed());
    Ok(())
}
