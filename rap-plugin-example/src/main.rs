use anyhow::{Context, Result};
use rap_plugin::config::LoadedConfig;
use rap_plugin::diagnostics;
use rap_plugin::messaging::{register_plugin, serve_requests, NatsClient, NotificationPublisher};
use rap_plugin::wait::wait_for_services;
use rap_plugin::RapPlugin;
use rap_plugin_example::register_listeners;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rap_plugin=info,rap_plugin_example=info".into()),
        )
        .init();

    info!("RAP plugin example starting...");

    let loaded = LoadedConfig::from_env().context("Failed to load configuration")?;
    let config = &loaded.config;

    // Dependent services (broker, RAP) must be up before anything connects
    wait_for_services(
        &config.startup.wait_for_services,
        config.startup.wait_timeout(),
        config.startup.retry_interval(),
    )
    .await
    .context("Dependent services not reachable")?;

    diagnostics::log_config(&loaded);

    let nats = NatsClient::connect(&config.broker).await?;
    let publisher = NotificationPublisher::new(
        nats.client().clone(),
        nats.subject_prefix().to_string(),
    );

    let mut plugin = RapPlugin::new(Arc::new(publisher));
    let subscriptions = register_listeners(&mut plugin, config);
    diagnostics::log_components(&plugin);
    let plugin = Arc::new(plugin);

    register_plugin(nats.client(), &config.broker, &config.plugin).await?;

    let server = serve_requests(
        nats.client().clone(),
        Arc::clone(&plugin),
        &config.broker,
        &config.plugin.id,
    );

    tokio::select! {
        result = server => {
            result?;
            warn!("Request server stopped");
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for ctrl_c signal")?;
            info!("Shutdown signal received");
        }
    }

    // Graceful shutdown
    if let Some(subscriptions) = subscriptions {
        subscriptions.shutdown().await;
    }
    if let Err(e) = nats.flush().await {
        warn!(error = %e, "Failed to flush pending notifications");
    }

    info!("RAP plugin example stopped");
    Ok(())
}
