use crate::api::FactoryApi;
use crate::model::{LineMap, ProductionStatus};
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

/// Requests from the UI to the poller task.
#[derive(Debug, Clone, PartialEq)]
pub enum PollerCommand {
    /// Start or stop one line via `POST /api/line_control`.
    ToggleLine {
        material: String,
        coordinate: String,
        enabled: bool,
    },
    /// Push a new daily target via `POST /api/set_target`.
    SetTarget { material: String, target_amount: u64 },
    /// Evaluate a calculator expression via `POST /api/calculate`.
    Calculate { expression: String },
    /// Out-of-cycle line refresh via `GET /api/manufact`.
    RefreshLines,
}

/// Results flowing back to the UI.
#[derive(Debug, Clone)]
pub enum AppEvent {
    Status(ProductionStatus),
    Lines(LineMap),
    LineToggled {
        material: String,
        coordinate: String,
        enabled: bool,
    },
    TargetSet {
        material: String,
        target_amount: u64,
    },
    CalcResult(Result<String, String>),
    /// An action the backend rejected or that failed in transit, with a
    /// message naming the action. The UI decides presentation.
    ActionFailed(String),
}

/// Polls the status endpoint on a fixed interval and executes UI commands
/// between ticks. A failed poll is logged and skipped; nothing is sent, so
/// the UI keeps showing the last good payload. No retry, no backoff, no
/// guard against a slow response overlapping the next tick.
pub async fn run_poller(
    api: FactoryApi,
    poll_interval: Duration,
    mut rx_cmd: UnboundedReceiver<PollerCommand>,
    tx_evt: UnboundedSender<AppEvent>,
) {
    let mut ticker = tokio::time::interval(poll_interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match api.production_status().await {
                    Ok(status) => {
                        let _ = tx_evt.send(AppEvent::Status(status));
                    }
                    Err(e) => {
                        warn!("status poll failed, skipping cycle: {e}");
                    }
                }
            }
            cmd = rx_cmd.recv() => {
                let Some(cmd) = cmd else { break };
                execute_command(&api, cmd, &tx_evt).await;
            }
        }
    }
}

async fn execute_command(api: &FactoryApi, cmd: PollerCommand, tx_evt: &UnboundedSender<AppEvent>) {
    match cmd {
        PollerCommand::ToggleLine {
            material,
            coordinate,
            enabled,
        } => match api.set_line_status(&material, &coordinate, enabled).await {
            Ok(()) => {
                info!("line {material} {coordinate} set to {enabled}");
                let _ = tx_evt.send(AppEvent::LineToggled {
                    material,
                    coordinate,
                    enabled,
                });
            }
            Err(e) => {
                warn!("line control failed for {material} {coordinate}: {e}");
                let _ = tx_evt.send(AppEvent::ActionFailed(format!(
                    "Failed to update line {material} {coordinate}: {e}"
                )));
            }
        },
        PollerCommand::SetTarget {
            material,
            target_amount,
        } => match api.set_target(&material, target_amount).await {
            Ok(()) => {
                info!("target for {material} set to {target_amount}");
                let _ = tx_evt.send(AppEvent::TargetSet {
                    material,
                    target_amount,
                });
            }
            Err(e) => {
                warn!("set_target failed for {material}: {e}");
                let _ = tx_evt.send(AppEvent::ActionFailed(format!(
                    "Failed to set target for {material}: {e}"
                )));
            }
        },
        PollerCommand::Calculate { expression } => {
            let outcome = api
                .calculate(&expression)
                .await
                .map_err(|e| e.to_string());
            if let Err(e) = &outcome {
                warn!("calculate failed for '{expression}': {e}");
            }
            let _ = tx_evt.send(AppEvent::CalcResult(outcome));
        }
        PollerCommand::RefreshLines => match api.manufact_status().await {
            Ok(lines) => {
                let _ = tx_evt.send(AppEvent::Lines(lines));
            }
            Err(e) => {
                warn!("line refresh failed: {e}");
            }
        },
    }
}
