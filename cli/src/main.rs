//! CLI entrypoint for Arbiter Quorum
//!
//! This is the main binary that wires together all layers using
//! dependency injection, then serves HTTP until Ctrl-C.

use anyhow::{Context, Result, anyhow, bail};
use arbiter_application::{
    BuildQueryUseCase, CommitmentManager, CommitmentStore, EvaluateUseCase, ListModelsUseCase,
    RunArbitrationUseCase,
};
use arbiter_infrastructure::config::FILE_BACKEND;
use arbiter_infrastructure::{
    ArchiveEvidenceStore, ConfigLoader, FileCommitmentStore, FileConfig, FileContentPublisher,
    InMemoryCommitmentStore, JsonManifestResolver, JsonlConversationLogger, build_gateway,
};
use arbiter_presentation::{AppState, Cli, router};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const LOG_FILE_PREFIX: &str = "arbiter-quorum.log";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli);

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
    }
    .map_err(|e| anyhow!("failed to load configuration: {}", e))?;

    check_config(&config)?;

    info!("Starting Arbiter Quorum");

    // === Dependency Injection ===
    let arbiter_config = config
        .to_arbiter_config()
        .context("invalid justifier model")?;
    let gateway = Arc::new(build_gateway(&config.providers).context("invalid provider settings")?);

    let mut arbitration = RunArbitrationUseCase::new(Arc::clone(&gateway), arbiter_config.clone());
    if let Some(path) = &config.logging.transcript_path {
        match JsonlConversationLogger::new(path) {
            Some(logger) => {
                info!("Writing arbitration transcript to {}", logger.path().display());
                arbitration = arbitration.with_conversation_logger(Arc::new(logger));
            }
            None => warn!("Transcript disabled: {} is not writable", path.display()),
        }
    }
    let arbitration = Arc::new(arbitration);

    let store: Arc<dyn CommitmentStore> = if config.commitments.backend == FILE_BACKEND {
        let store = FileCommitmentStore::open(&config.commitments.dir)
            .await
            .with_context(|| {
                format!(
                    "cannot open commitment dir {}",
                    config.commitments.dir.display()
                )
            })?;
        Arc::new(store)
    } else {
        Arc::new(InMemoryCommitmentStore::new())
    };
    let commitments = CommitmentManager::new(store, arbiter_config.commitment_max_age);

    let mut evidence = ArchiveEvidenceStore::new(&config.evidence.root);
    if let Some(work_dir) = &config.evidence.work_dir {
        evidence = evidence.with_work_dir(work_dir);
    }
    let build_query = BuildQueryUseCase::new(Arc::new(evidence), Arc::new(JsonManifestResolver::new()));

    let evaluate = EvaluateUseCase::new(
        Arc::clone(&arbitration),
        build_query,
        commitments.clone(),
        Arc::new(FileContentPublisher::new(&config.publisher.dir)),
    );

    let state = AppState::new(
        arbitration,
        Arc::new(ListModelsUseCase::new(gateway)),
        Arc::new(evaluate),
    );

    // === Serve ===
    let shutdown = CancellationToken::new();
    let purge = spawn_purge_loop(
        commitments,
        Duration::from_secs(config.commitments.purge_interval_secs),
        shutdown.clone(),
    );

    let addr = cli.bind_address(&config.server.bind);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await
        .context("server error")?;

    shutdown.cancel();
    if let Err(e) = purge.await {
        warn!("Purge task ended abnormally: {}", e);
    }
    info!("Stopped");
    Ok(())
}

/// Console logging plus, with `--log-dir`, a daily-rotated log file.
///
/// `-v` flags take precedence over `RUST_LOG`.
fn init_logging(cli: &Cli) -> Option<WorkerGuard> {
    let filter = if cli.verbose > 0 {
        EnvFilter::new(cli.log_level())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()))
    };

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false));

    match &cli.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    }
}

/// Log every configuration issue; refuse to start on errors
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in &issues {
        if issue.is_error() {
            error!("{}", issue);
        } else {
            warn!("{}", issue);
        }
    }

    let errors = issues.iter().filter(|i| i.is_error()).count();
    if errors > 0 {
        bail!("configuration has {} error(s)", errors);
    }
    Ok(())
}

fn spawn_purge_loop(
    commitments: CommitmentManager,
    every: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => match commitments.purge().await {
                    Ok(0) => debug!("No stale commitments"),
                    Ok(purged) => info!("Purged {} stale commitment(s)", purged),
                    Err(e) => warn!("Commitment purge failed: {}", e),
                },
            }
        }
    })
}

async fn shutdown_signal(shutdown: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!("Cannot listen for Ctrl-C: {}", e);
                // Keep serving; stop only on explicit cancellation
                shutdown.cancelled().await;
            }
        }
        _ = shutdown.cancelled() => {}
    }
    info!("Shutting down");
    shutdown.cancel();
}
