use std::sync::Arc;
use std::time::Duration;

use habitual_service::HabitService;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::app::AppEvent;

/// Background task that re-probes the backend every `interval` and reports
/// the result as [`AppEvent::Health`]. It only reports status; it never
/// triggers data loads.
///
/// Stops when `shutdown` flips to `true` (or its sender is dropped) or when
/// the event receiver is gone.
pub fn spawn_health_monitor(
    service: Arc<dyn HabitService>,
    interval: Duration,
    events: mpsc::UnboundedSender<AppEvent>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Boot already probed; the first tick fires immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let online = service.check_health().await;
                    debug!("periodic health check: online={online}");
                    if events.send(AppEvent::Health(online)).is_err() {
                        break;
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
    })
}
