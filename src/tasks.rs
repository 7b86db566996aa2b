//! Background tasks. Currently just the live-score poll loop.

use crate::apis::cricbuzz::CricbuzzClient;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Polls the live-score API on a fixed interval and broadcasts each update
/// as a JSON string. Subscribers that lag simply miss updates; the loop
/// itself never fails.
pub async fn poll_live_scores(
    client: CricbuzzClient,
    tx: broadcast::Sender<String>,
    interval_secs: u64,
) {
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    info!(interval_secs, "Starting live-score poll loop");

    loop {
        ticker.tick().await;
        let update = client.live_score().await;
        let payload = update.to_string();
        match tx.send(payload) {
            Ok(receivers) => debug!(receivers, "Broadcast live-score update"),
            Err(_) => debug!("No live-score subscribers connected"),
        }
    }
}
