//! Text-to-speech via the `espeak` command-line synthesizer.

use std::process::{Child, Command, Stdio};
use std::sync::Mutex;

use tracing::debug;

use crate::error::SynthesisError;
use crate::output::SynthesisEngine;

/// Normal speaking rate in words per minute.
const NORMAL_RATE_WPM: u32 = 175;

/// [`SynthesisEngine`] that shells out to `espeak` (or `espeak-ng`).
///
/// One utterance plays at a time: starting a new one first kills the child
/// process of the previous one, so `cancel` is always effective even while
/// audio is still playing.
pub struct EspeakSynthesis {
    command: &'static str,
    playing: Mutex<Option<Child>>,
}

impl EspeakSynthesis {
    /// Probes `$PATH` for an espeak binary; `None` when neither variant runs.
    #[must_use]
    pub fn detect() -> Option<Self> {
        ["espeak", "espeak-ng"]
            .into_iter()
            .find(|command| {
                Command::new(command)
                    .arg("--version")
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .status()
                    .is_ok()
            })
            .map(|command| {
                debug!(command, "espeak synthesizer detected");
                Self {
                    command,
                    playing: Mutex::new(None),
                }
            })
    }

    fn reap(child: &mut Child) {
        // Kill is best-effort; the child may have exited on its own.
        let _ = child.kill();
        let _ = child.wait();
    }
}

impl SynthesisEngine for EspeakSynthesis {
    fn speak(&self, text: &str) -> Result<(), SynthesisError> {
        let child = Command::new(self.command)
            .arg("-s")
            .arg(NORMAL_RATE_WPM.to_string())
            .arg(text)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let mut playing = self.playing.lock().unwrap_or_else(|err| err.into_inner());
        if let Some(mut previous) = playing.replace(child) {
            Self::reap(&mut previous);
        }
        Ok(())
    }

    fn cancel(&self) {
        let mut playing = self.playing.lock().unwrap_or_else(|err| err.into_inner());
        if let Some(mut child) = playing.take() {
            Self::reap(&mut child);
        }
    }
}

impl Drop for EspeakSynthesis {
    fn drop(&mut self) {
        self.cancel();
    }
}
