//! Speech output - speaks resolved answers through espeak-ng.

use std::process::Command;
use tracing::warn;

/// Fire-and-forget text-to-speech. Playback runs detached and failures are
/// logged without blocking the HTTP response.
#[derive(Debug, Clone)]
pub struct SpeechEngine {
    enabled: bool,
    voice: String,
    rate: u32,
}

impl SpeechEngine {
    pub fn new(enabled: bool, voice: &str, rate: u32) -> Self {
        Self {
            enabled,
            voice: voice.to_string(),
            rate,
        }
    }

    /// Engine that never speaks. Used in tests.
    pub fn disabled() -> Self {
        Self::new(false, "es", 170)
    }

    pub fn speak(&self, text: &str) {
        if !self.enabled {
            return;
        }

        match Command::new("espeak-ng")
            .args(["-v", &self.voice, "-s", &self.rate.to_string()])
            .arg(text)
            .spawn()
        {
            Ok(mut child) => {
                // Reap the child off the request path so finished playback
                // processes don't accumulate as zombies
                std::thread::spawn(move || {
                    let _ = child.wait();
                });
            }
            Err(e) => warn!("Speech playback failed: {}", e),
        }
    }
}
