//! Background loop that turns overlap intensity into ambient tones.

use std::sync::Arc;
use std::time::Duration;

use harmony_core::audio::{AudioSink, Tone, plan_tones};
use harmony_core::session::Scene;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval, sleep};
use tokio_util::sync::CancellationToken;

/// Spawns the ambient loop.
///
/// Every `period` it reads the latest intensity and scene and plays whatever
/// [`plan_tones`] returns. Without a sink the tones are only logged.
pub fn spawn_ambient_loop(
    intensity: watch::Receiver<f64>,
    scene: watch::Receiver<Scene>,
    sink: Option<Arc<dyn AudioSink>>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut rng = StdRng::from_entropy();
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick fires immediately; the loop waits one period first.
        ticker.tick().await;
        tracing::info!("[Ambient] Loop started ({}ms interval)", period.as_millis());

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let level = *intensity.borrow();
            let active = *scene.borrow() == Scene::Blobs;
            let tones = plan_tones(level, active, &mut rng);

            for tone in tones {
                if tone.delay_ms > 0 {
                    tokio::select! {
                        _ = cancel.cancelled() => return,
                        _ = sleep(Duration::from_millis(tone.delay_ms)) => {}
                    }
                }
                play(sink.as_deref(), &tone);
            }
        }
        tracing::info!("[Ambient] Loop stopped");
    })
}

fn play(sink: Option<&dyn AudioSink>, tone: &Tone) {
    tracing::debug!(
        "[Ambient] Tone {:.2}Hz vol={:.3} dur={:.2}s",
        tone.frequency,
        tone.volume,
        tone.duration
    );
    if let Some(sink) = sink {
        sink.play(tone);
    }
}
