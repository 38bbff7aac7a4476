use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use models::Session;
use service::api::PortalApi;
use service::auth::domain::LoginInput;
use service::auth::AuthService;
use service::file::kv_store::FileKvStore;
use service::http::ApiClient;
use service::session::{SessionSynchronizer, StorageKeys};

#[derive(Parser, Debug)]
#[command(name = "portal")]
#[command(about = "Job portal session client", long_about = None)]
struct Cli {
    /// Defaults to `status`
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Print the stored session
    Status,
    /// Log in and load the role profile
    Login { email: String, password: String },
    /// Clear the session
    Logout,
    /// Reload the profile for the current identity
    Refresh,
}

/// Session as JSON with the bearer token masked.
fn masked_session(session: &Session) -> serde_json::Result<Value> {
    let mut value = serde_json::to_value(session)?;
    if let Some(token) = value.get_mut("authToken").filter(|t| !t.is_null()) {
        *token = Value::String("***".into());
    }
    Ok(value)
}

async fn run(cfg: configs::AppConfig, cmd: Command) -> anyhow::Result<()> {
    service::runtime::ensure_env(&cfg.storage.path).await?;
    let store = FileKvStore::new(&cfg.storage.path).await?;
    let (sync, boot) = SessionSynchronizer::boot(store, StorageKeys::from_config(&cfg.storage)).await;
    if !boot.is_clean() {
        warn!(event = "boot_recovered", warnings = boot.warnings.len(), migrated_legacy = boot.migrated_legacy, "session restored with warnings");
    }
    let sync = Arc::new(sync);
    let api = Arc::new(PortalApi::new(ApiClient::from_config(&cfg.backend, sync.clone())?));
    let auth = AuthService::new(api, sync.clone());

    match cmd {
        Command::Status => {}
        Command::Login { email, password } => {
            let outcome = auth.login(LoginInput { email, password }).await?;
            info!(event = "login", user_id = outcome.identity.user_id, profile = ?outcome.profile, "logged in");
        }
        Command::Logout => {
            let report = auth.logout().await;
            info!(event = "logout", mirrored = report.is_clean(), "logged out");
        }
        Command::Refresh => {
            let (load, _) = auth.refresh_profile().await?;
            info!(event = "refresh", profile = ?load, "profile refreshed");
        }
    }

    println!("{}", serde_json::to_string_pretty(&masked_session(&sync.session())?)?);
    Ok(())
}

fn main() -> ExitCode {
    let cmd = match Cli::try_parse() {
        Ok(cli) => cli.command.unwrap_or(Command::Status),
        Err(e) => {
            // help and version land here too
            let code = e.exit_code();
            let _ = e.print();
            return ExitCode::from(u8::try_from(code).unwrap_or(2));
        }
    };

    dotenv().ok();
    let cfg = configs::AppConfig::load_and_validate();
    let format = cfg.as_ref().map(|c| c.logging.format.clone()).unwrap_or_default();
    common::utils::logging::init_logging_from_format(&format);

    let run_id = Uuid::new_v4();
    std::panic::set_hook(Box::new(move |info| {
        error!(service = "portal", event = "panic", %run_id, message = %info, "unhandled panic occurred");
    }));

    let cfg = match cfg {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "portal", event = "config_invalid", error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "portal", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(service = "portal", event = "start", %run_id, version = env!("CARGO_PKG_VERSION"), base_url = %cfg.backend.base_url, "portal starting");
    match rt.block_on(run(cfg, cmd)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(service = "portal", event = "run_failed", %run_id, error = %e, "command failed");
            ExitCode::FAILURE
        }
    }
}
