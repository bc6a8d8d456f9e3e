//! Consent Gate Bot
//!
//! Event loop that:
//! - Pulls inbound events from the gateway (long polling)
//! - Hands each event to the coordinator on its own task, so one member's
//!   slow platform calls never hold up another's
//! - Stops on shutdown, dropping all pending state with it

use crate::consent::{ConsentCoordinator, TimerService, TokioTimerService};
use crate::gateway::traits::Gateway;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Minimum spacing between event fetches
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Pause after a failed fetch
const ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Consent gate bot
pub struct ConsentBot<G: Gateway, T: TimerService = TokioTimerService> {
    gateway: G,
    coordinator: Arc<ConsentCoordinator<G, T>>,
}

impl<G: Gateway, T: TimerService> ConsentBot<G, T> {
    pub fn new(gateway: G, coordinator: Arc<ConsentCoordinator<G, T>>) -> Self {
        Self {
            gateway,
            coordinator,
        }
    }

    pub fn coordinator(&self) -> &Arc<ConsentCoordinator<G, T>> {
        &self.coordinator
    }

    /// Run until Ctrl-C
    pub async fn run(&self) {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl-C, running until killed: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run until `shutdown` completes
    pub async fn run_until<S: Future<Output = ()>>(&self, shutdown: S) {
        tokio::pin!(shutdown);
        let mut interval = tokio::time::interval(POLL_INTERVAL);
        let mut failed = false;

        info!("Consent gate running (no persistence, no decision logs)");

        loop {
            // Backoff happens inside the select so shutdown is never delayed
            let pause = if std::mem::take(&mut failed) {
                ERROR_BACKOFF
            } else {
                Duration::ZERO
            };

            tokio::select! {
                _ = &mut shutdown => {
                    info!(
                        pending = self.coordinator.registry().len(),
                        "Shutting down, pending consent state is discarded"
                    );
                    return;
                }
                received = async {
                    tokio::time::sleep(pause).await;
                    interval.tick().await;
                    self.gateway.next_events().await
                } => {
                    let events = match received {
                        Ok(events) => events,
                        Err(e) => {
                            warn!("Error receiving events, will retry: {}", e);
                            failed = true;
                            continue;
                        }
                    };

                    for event in events {
                        let coordinator = Arc::clone(&self.coordinator);
                        tokio::spawn(async move {
                            coordinator.handle_event(event).await;
                        });
                    }
                }
            }
        }
    }
}
