//! DataGrid Kubernetes Operator
//!
//! ## Usage
//!
//! ```bash
//! # Run the operator (requires kubeconfig)
//! datagrid-operator
//!
//! # Watch a single namespace with debug logging
//! RUST_LOG=debug datagrid-operator --namespace grids
//! ```

use clap::Parser;
use datagrid_operator::{ControllerConfig, DataGridController};
use kube::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// DataGrid Kubernetes Operator
#[derive(Parser, Debug)]
#[command(name = "datagrid-operator")]
#[command(version, about = "Kubernetes Operator for data grid clusters")]
struct Args {
    /// Namespace to watch (empty for all namespaces)
    #[arg(long, env = "WATCH_NAMESPACE", default_value = "")]
    namespace: String,

    /// Seconds between checks of a stable cluster
    #[arg(long, env = "REQUEUE_SECONDS", default_value = "60")]
    requeue_seconds: u64,

    /// Seconds between checks of a cluster that is not formed or is upgrading
    #[arg(long, env = "UNSTABLE_REQUEUE_SECONDS", default_value = "10")]
    unstable_requeue_seconds: u64,
}

impl Args {
    fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            namespace: (!self.namespace.is_empty()).then(|| self.namespace.clone()),
            requeue: Duration::from_secs(self.requeue_seconds),
            unstable_requeue: Duration::from_secs(self.unstable_requeue_seconds),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let args = Args::parse();
    let config = args.controller_config();

    info!("Starting DataGrid Kubernetes Operator");
    info!(
        "Watching namespace: {}",
        config.namespace.as_deref().unwrap_or("all")
    );

    let client = Client::try_default().await?;
    info!("Connected to Kubernetes API server");

    let controller = Arc::new(DataGridController::new(client, config));
    let handle = tokio::spawn(async move {
        if let Err(e) = controller.run().await {
            error!("DataGrid controller error: {}", e);
        }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
        result = handle => {
            if let Err(e) = result {
                error!("DataGrid controller task failed: {}", e);
            }
        }
    }

    info!("DataGrid Operator shutting down");
    Ok(())
}
