//! Chart render loop: republishes the chart frame while the chart scene is
//! up.

use std::sync::Arc;
use std::time::Duration;

use harmony_core::chart::ChartFrame;
use harmony_core::session::SessionState;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

/// Spawns the frame loop.
///
/// Each tick renders the chart from the shared session state and publishes
/// it when it differs from the last published frame.
pub fn spawn_frame_loop(
    state: Arc<Mutex<SessionState>>,
    frames: watch::Sender<Option<ChartFrame>>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::debug!("[Chart] Frame loop started ({}ms)", period.as_millis());

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let frame = {
                let state = state.lock().await;
                state.chart().render(state.layout())
            };
            frames.send_if_modified(|current| {
                if current.as_ref() == Some(&frame) {
                    false
                } else {
                    *current = Some(frame);
                    true
                }
            });
        }
        tracing::debug!("[Chart] Frame loop stopped");
    })
}
