use mongodb::Client;
use mongodb::bson::doc;
use std::time::{Duration, Instant};

/// Outcome of a MongoDB health probe
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub healthy: bool,
    /// Driver error text when unhealthy
    pub message: Option<String>,
    /// Round-trip time of the probe
    pub latency: Duration,
}

/// `true` when the deployment answers a `ping`.
pub async fn check_health(client: &Client) -> bool {
    check_health_detailed(client).await.healthy
}

/// Ping the deployment and report latency plus any error.
pub async fn check_health_detailed(client: &Client) -> HealthStatus {
    let start = Instant::now();
    let result = client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await;
    let latency = start.elapsed();

    match result {
        Ok(_) => HealthStatus {
            healthy: true,
            message: None,
            latency,
        },
        Err(e) => {
            tracing::warn!(error = %e, "MongoDB health check failed");
            HealthStatus {
                healthy: false,
                message: Some(e.to_string()),
                latency,
            }
        }
    }
}
