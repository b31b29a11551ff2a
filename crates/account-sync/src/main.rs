// # account-sync
//
// Thin runner around account-core. It holds no account logic of its own.
//
// The runner is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Building the HTTP client and the sync controller
// 4. Checking the connection, loading accounts and optionally importing
//    accounts from a JSON file
//
// ## Configuration
//
// - `ACCOUNT_SYNC_HOST`: Server IP address (default 127.0.0.1)
// - `ACCOUNT_SYNC_PORT`: Server port (default 8080)
// - `ACCOUNT_SYNC_LOG_LEVEL`: trace, debug, info, warn or error (default info)
// - `ACCOUNT_SYNC_IMPORT_FILE`: JSON file with an account or a list of
//   accounts to create after the initial load (optional)
//
// ## Example
//
// ```bash
// export ACCOUNT_SYNC_HOST=10.0.0.5
// export ACCOUNT_SYNC_PORT=8080
// export ACCOUNT_SYNC_IMPORT_FILE=./accounts.json
//
// account-sync
// ```

use account_core::config::{ClientConfig, DEFAULT_HOST, DEFAULT_PORT};
use account_core::{Disposition, SyncController, load_records};
use account_http::HttpAccountClient;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum SyncExitCode {
    /// Every step succeeded
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// An operation did not succeed
    RuntimeError = 2,
}

impl From<SyncExitCode> for ExitCode {
    fn from(code: SyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Runner configuration
struct Config {
    client: ClientConfig,
    log_level: String,
    import_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let host = env::var("ACCOUNT_SYNC_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match env::var("ACCOUNT_SYNC_PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("ACCOUNT_SYNC_PORT '{}' is not a number", raw))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            client: ClientConfig::new(host, port),
            log_level: env::var("ACCOUNT_SYNC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            import_file: env::var("ACCOUNT_SYNC_IMPORT_FILE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.client
            .validate()
            .context("ACCOUNT_SYNC_HOST must be an IP address and ACCOUNT_SYNC_PORT in 1..=65535")?;

        self.level()?;

        if let Some(ref path) = self.import_file
            && !path.is_file()
        {
            anyhow::bail!("ACCOUNT_SYNC_IMPORT_FILE does not exist: {}", path.display());
        }

        Ok(())
    }

    fn level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "ACCOUNT_SYNC_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return SyncExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return SyncExitCode::ConfigError.into();
    }

    let log_level = config.level().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return SyncExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return SyncExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run(config).await {
            Ok(true) => SyncExitCode::Success,
            Ok(false) => SyncExitCode::RuntimeError,
            Err(e) => {
                error!("Could not launch: {:#}", e);
                SyncExitCode::ConfigError
            }
        }
    })
    .into()
}

/// Run the sync; `Ok(false)` when any operation did not succeed
async fn run(config: Config) -> Result<bool> {
    let client = HttpAccountClient::new(&config.client)?;
    info!("Using account service at {}", client.base_url());

    let mut controller = SyncController::new(Box::new(client));
    let mut all_ok = true;

    let test = controller.check_connection().await;
    report("Connection test", &test);
    if !test.is_success() {
        return Ok(false);
    }

    let load = controller.initial_load().await;
    report("Initial load", &load);
    all_ok &= load.is_success();

    if let Some(path) = config.import_file {
        let records = load_records(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        info!("Importing {} account(s) from {}", records.len(), path.display());

        for record in &records {
            let created = controller.submit_create(record).await;
            report("Import", &created);
            all_ok &= created.is_success();
        }
    }

    for entry in controller.store().accounts() {
        info!(
            "{:>12}  {}  ({}, {} {})",
            entry.account.orgno,
            entry.account.name,
            entry.account.account_type,
            entry.account.leader_title,
            entry.account.leader_name
        );
    }
    info!("{} account(s) held", controller.store().len());

    Ok(all_ok)
}

fn report(step: &str, disposition: &Disposition) {
    match disposition {
        Disposition::Success { message, events } => {
            info!("{}: success ({} change(s)) {}", step, events.len(), message)
        }
        Disposition::Rejected { message } => warn!("{}: rejected: {}", step, message),
        Disposition::ConnectionFailure { message } => error!("{}: {}", step, message),
        Disposition::Unknown { message } => error!("{}: {}", step, message),
    }
}
