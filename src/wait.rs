//! Startup gate: block until dependent services accept TCP connections.

use anyhow::{anyhow, bail, Context, Result};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout_at, Instant};
use tracing::{debug, info};

/// A `host:port` the plugin depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAddress {
    pub host: String,
    pub port: u16,
}

impl ServiceAddress {
    /// Parse `host:port`; the port is taken after the last colon.
    pub fn parse(entry: &str) -> Result<Self> {
        let entry = entry.trim();
        let (host, port) = entry
            .rsplit_once(':')
            .ok_or_else(|| anyhow!("Service '{}' must have the form host:port", entry))?;

        if host.is_empty() {
            bail!("Service '{}' has an empty host", entry);
        }

        let port = port
            .parse::<u16>()
            .with_context(|| format!("Service '{}' has an invalid port", entry))?;

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Wait until every service accepts a connection.
///
/// Services are checked one after another against a shared deadline.
/// Malformed entries fail before any connection attempt.
pub async fn wait_for_services(
    services: &[String],
    timeout: Duration,
    retry_interval: Duration,
) -> Result<()> {
    if services.is_empty() {
        return Ok(());
    }

    let addresses = services
        .iter()
        .map(|s| ServiceAddress::parse(s))
        .collect::<Result<Vec<_>>>()?;

    let deadline = Instant::now() + timeout;
    info!(count = addresses.len(), timeout_secs = timeout.as_secs(), "Waiting for services");

    for address in &addresses {
        wait_for_service(address, deadline, retry_interval).await?;
    }

    info!("All services reachable");
    Ok(())
}

async fn wait_for_service(
    address: &ServiceAddress,
    deadline: Instant,
    retry_interval: Duration,
) -> Result<()> {
    let authority = address.authority();
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;

        match timeout_at(deadline, TcpStream::connect(&authority)).await {
            Ok(Ok(_stream)) => {
                info!(service = %authority, attempts = attempts, "Service reachable");
                return Ok(());
            }
            Ok(Err(e)) => {
                debug!(service = %authority, attempt = attempts, error = %e, "Service not reachable yet");
            }
            Err(_) => {
                debug!(service = %authority, attempt = attempts, "Connection attempt hit the deadline");
            }
        }

        if Instant::now() + retry_interval >= deadline {
            bail!(
                "Timed out waiting for service '{}' after {} attempts",
                authority,
                attempts
            );
        }

        sleep(retry_interval).await;
    }
}
