//! Pronunciation output.
//!
//! The platform synthesizer sits behind the `Speaker` trait. `SpeechOutput`
//! adds the enabled flag, voice preference and the cancel-then-speak rule that
//! keeps at most one utterance audible (the most recent request wins).

use crate::config::SpeechConfig;

/// What the adapter needs to know about one platform voice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Voice {
    pub lang: String,
    pub name: String,
}

impl Voice {
    pub fn new(lang: &str, name: &str) -> Self {
        Self { lang: lang.to_string(), name: name.to_string() }
    }

    fn matches_any(&self, tags: &[String]) -> bool {
        let hay = format!("{} {}", self.lang, self.name).to_lowercase();
        tags.iter().any(|t| hay.contains(&t.to_lowercase()))
    }
}

/// A fully resolved request for the synthesizer.
#[derive(Clone, Debug, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub voice: Option<usize>, // index into `Speaker::voices()`
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
}

pub trait Speaker {
    /// Voices currently offered by the platform (may be empty, may change).
    fn voices(&self) -> Vec<Voice>;
    /// Stop whatever is being spoken.
    fn cancel(&self);
    fn speak(&self, utterance: &Utterance);
}

/// Preferred-language voice, else a related-language voice, else the first one.
pub fn select_voice(voices: &[Voice], config: &SpeechConfig) -> Option<usize> {
    voices
        .iter()
        .position(|v| v.matches_any(&config.preferred_tags))
        .or_else(|| voices.iter().position(|v| v.matches_any(&config.fallback_tags)))
        .or(if voices.is_empty() { None } else { Some(0) })
}

pub struct SpeechOutput<S: Speaker> {
    speaker: Option<S>, // None when the platform has no synthesizer
    enabled: bool,
    config: SpeechConfig,
}

impl<S: Speaker> SpeechOutput<S> {
    pub fn new(speaker: Option<S>, config: SpeechConfig) -> Self {
        Self { speaker, enabled: true, config }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            if let Some(s) = &self.speaker {
                s.cancel();
            }
        }
    }

    pub fn speaker(&self) -> Option<&S> {
        self.speaker.as_ref()
    }

    /// Fire and forget. Silently does nothing when disabled or unsupported.
    pub fn speak(&self, text: &str) {
        if !self.enabled {
            return;
        }
        let Some(speaker) = &self.speaker else {
            return;
        };
        let voices = speaker.voices();
        let voice = select_voice(&voices, &self.config);
        let lang = voice
            .map(|i| voices[i].lang.clone())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| self.config.default_lang.clone());
        let utterance = Utterance {
            text: text.to_string(),
            voice,
            lang,
            rate: self.config.rate,
            pitch: self.config.pitch,
        };
        speaker.cancel();
        speaker.speak(&utterance);
    }
}
