use anyhow::Context;
use refcheck::bot::{BotShell, Menu, TelegramClient};
use refcheck::core::config::{AppConfig, ConfigError};
use refcheck::exchanges::{bitget, bitunix};
use refcheck::verification::{FallbackPolicy, Orchestrator, ReplySettings};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config().context("failed to load configuration")?;

    let bitget =
        bitget::build_connector(config.bitget.clone(), config.bitget_referral_code.clone())
            .context("failed to build Bitget connector")?;
    let bitunix = bitunix::build_connector(config.bitunix.clone())
        .context("failed to build Bitunix connector")?;

    let orchestrator = Orchestrator::new()
        .register(Arc::new(bitget), FallbackPolicy::Surface)
        .register(Arc::new(bitunix), FallbackPolicy::Degrade);

    let transport = TelegramClient::new(config.telegram_token.clone())
        .context("failed to build Telegram client")?;

    let shell = Arc::new(BotShell::new(
        Arc::new(transport),
        Arc::new(orchestrator),
        ReplySettings::from_config(&config),
        Menu::new(config.menu.clone()),
    ));

    info!("🤖 bot running, press Ctrl-C to stop");
    shell.run(shutdown_signal()).await;
    Ok(())
}

/// `REFCHECK_ENV_FILE` names an explicit .env file; otherwise the usual
/// candidates are tried.
#[cfg(feature = "env-file")]
fn load_config() -> Result<AppConfig, ConfigError> {
    match std::env::var("REFCHECK_ENV_FILE") {
        Ok(path) if !path.trim().is_empty() => AppConfig::from_env_file(path.trim()),
        _ => AppConfig::from_env_auto(),
    }
}

#[cfg(not(feature = "env-file"))]
fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

/// Resolves on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl-C"),
        () = terminate => info!("received SIGTERM"),
    }
}
