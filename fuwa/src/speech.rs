//! Transcript panel
//!
//! Speech recognition itself is an external capability behind the
//! [`SpeechBackend`] seam; the visual pipeline never depends on it.  The
//! panel consumes the backend's incremental events: finals accumulate,
//! interim text is replaced in place, and stopping clears the interim tail.

use std::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub struct RecognizerConfig {
    pub lang: String,
    pub interim_results: bool,
    pub continuous: bool,
}

impl Default for RecognizerConfig {
    fn default() -> RecognizerConfig {
        RecognizerConfig {
            lang: "ja-JP".into(),
            interim_results: true,
            continuous: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptEvent {
    Interim(String),
    Final(String),
    Ended,
    Error(String),
}

#[derive(Debug, thiserror::Error)]
#[error("speech recognition unavailable: {0}")]
pub struct SpeechError(pub String);

/// The host-provided recognizer, start/stop plus an event stream
pub trait SpeechBackend {
    fn start(
        &mut self,
        config: &RecognizerConfig,
        events: mpsc::Sender<TranscriptEvent>,
    ) -> Result<(), SpeechError>;

    fn stop(&mut self);
}

#[derive(Debug, Default)]
pub struct TranscriptPanel {
    transcript: String,
    interim: String,
    listening: bool,
}

impl TranscriptPanel {
    pub fn new() -> TranscriptPanel {
        Default::default()
    }

    pub fn listening(&self) -> bool {
        self.listening
    }

    pub fn set_listening(&mut self) {
        self.listening = true;
    }

    pub fn apply(&mut self, event: TranscriptEvent) {
        match event {
            TranscriptEvent::Final(text) => self.transcript.push_str(&text),
            TranscriptEvent::Interim(text) => self.interim = text,
            TranscriptEvent::Ended => self.listening = false,
            TranscriptEvent::Error(code) => {
                self.listening = false;
                log::error!("speech recognition error: {}", code);
            }
        }
    }

    /// Stop listening and drop the interim tail
    pub fn stop(&mut self) {
        self.listening = false;
        self.interim.clear();
    }

    /// Text to display: accumulated finals plus the live interim segment
    pub fn text(&self) -> String {
        if self.transcript.is_empty() && self.interim.is_empty() {
            "...".into()
        } else {
            format!("{}{}", self.transcript, self.interim)
        }
    }
}
