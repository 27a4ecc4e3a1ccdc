//! Ambient tone planning for the blob scene.
//!
//! The planner only decides which tones to play; an [`AudioSink`] (if any)
//! turns them into sound.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Pentatonic-ish note pool, in Hz.
pub const NOTES: [f64; 6] = [174.61, 196.00, 220.00, 261.63, 293.66, 329.63];

/// Default tick of the ambient loop.
pub const DEFAULT_INTERVAL_MS: u64 = 2000;

const SILENCE_THRESHOLD: f64 = 0.01;
const ALWAYS_PLAY_THRESHOLD: f64 = 0.1;
const CHORD_THRESHOLD: f64 = 0.6;
const CHORD_DELAY_MS: u64 = 100;
const ATTACK_SHARE: f64 = 0.4;
const RELEASE_FLOOR: f64 = 0.001;
const STOP_TAIL_SECS: f64 = 1.0;

/// One sine tone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub frequency: f64,
    /// Peak gain.
    pub volume: f64,
    /// Seconds from start to the end of the decay.
    pub duration: f64,
    /// Milliseconds to wait before starting.
    pub delay_ms: u64,
}

impl Tone {
    pub fn attack(&self) -> f64 {
        self.duration * ATTACK_SHARE
    }

    /// When the oscillator is stopped, in seconds from start.
    pub fn stop_at(&self) -> f64 {
        self.duration + STOP_TAIL_SECS
    }

    /// Gain `t` seconds after start: linear ramp up to `volume`, then down to
    /// the release floor.
    pub fn gain_at(&self, t: f64) -> f64 {
        let attack = self.attack();
        if t <= 0.0 {
            0.0
        } else if t < attack {
            self.volume * t / attack
        } else if t < self.duration {
            let progress = (t - attack) / (self.duration - attack);
            self.volume + (RELEASE_FLOOR - self.volume) * progress
        } else {
            RELEASE_FLOOR
        }
    }
}

/// Where planned tones go.
pub trait AudioSink: Send + Sync {
    fn play(&self, tone: &Tone);
}

/// Plans the tones for one tick of the ambient loop.
///
/// Returns nothing when the blob scene is inactive or the shapes barely touch.
pub fn plan_tones<R: Rng + ?Sized>(intensity: f64, scene_active: bool, rng: &mut R) -> Vec<Tone> {
    if !scene_active || intensity <= SILENCE_THRESHOLD {
        return Vec::new();
    }

    let volume = 0.02 + intensity * 0.08;
    let duration = 3.0 + intensity * 2.0;

    let draw: f64 = rng.gen_range(0.0..1.0);
    if draw <= ALWAYS_PLAY_THRESHOLD && intensity <= ALWAYS_PLAY_THRESHOLD {
        return Vec::new();
    }

    let mut tones = vec![Tone {
        frequency: pick_note(rng),
        volume,
        duration,
        delay_ms: 0,
    }];
    if intensity > CHORD_THRESHOLD {
        tones.push(Tone {
            frequency: pick_note(rng),
            volume,
            duration,
            delay_ms: CHORD_DELAY_MS,
        });
    }
    tones
}

fn pick_note<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    NOTES[rng.gen_range(0..NOTES.len())]
}
