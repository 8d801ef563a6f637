//! Tunables. Everything has a default matching the shipped game; the host page
//! may pass a JSON object overriding any subset of fields to `start_app`.

use serde::Deserialize;

/// Arcade timing and board size.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid: u8,           // square board edge, toroidal
    pub base_tick_ms: u32,  // interval at score 0
    pub min_tick_ms: u32,   // speed floor
    pub tick_step_ms: u32,  // shaved off per speed-up
    pub speedup_every: u32, // points between speed-ups
}

impl Default for GameConfig {
    fn default() -> Self {
        Self { grid: 18, base_tick_ms: 140, min_tick_ms: 70, tick_step_ms: 8, speedup_every: 5 }
    }
}

impl GameConfig {
    /// Smallest board that still fits the 3-cell starting mouse at x = 2..=4.
    pub const MIN_GRID: u8 = 5;

    /// Tick interval for a given score: speeds up every `speedup_every` points
    /// until `min_tick_ms`.
    pub fn tick_interval_ms(&self, score: u32) -> u32 {
        let steps = score / self.speedup_every.max(1);
        self.base_tick_ms
            .saturating_sub(self.tick_step_ms.saturating_mul(steps))
            .max(self.min_tick_ms)
    }

    fn sanitized(mut self) -> Self {
        self.grid = self.grid.max(Self::MIN_GRID);
        self.min_tick_ms = self.min_tick_ms.max(1);
        self.base_tick_ms = self.base_tick_ms.max(self.min_tick_ms);
        self.speedup_every = self.speedup_every.max(1);
        self
    }
}

/// Voice preferences for the speech adapter. Tags are matched
/// case-insensitively against "<lang> <name>" of each platform voice.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub preferred_tags: Vec<String>,
    pub fallback_tags: Vec<String>,
    pub default_lang: String,
    pub rate: f32,
    pub pitch: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            preferred_tags: vec!["ms-".into(), "malay".into(), "bahasa".into()],
            fallback_tags: vec!["id-".into(), "indones".into()],
            default_lang: "ms-MY".into(),
            rate: 0.95,
            pitch: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub session_size: usize,
    pub distractors: usize,
    pub quiz_advance_ms: u32,
    pub affirmation: String, // spoken after a correct quiz answer
    pub game: GameConfig,
    pub speech: SpeechConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            session_size: crate::session::DEFAULT_SESSION_SIZE,
            distractors: 3,
            quiz_advance_ms: 600,
            affirmation: "Bagus!".into(),
            game: GameConfig::default(),
            speech: SpeechConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse an override document. Bad JSON is logged and ignored.
    pub fn from_json(raw: Option<&str>) -> Self {
        let parsed = match raw.map(str::trim) {
            None | Some("") => Self::default(),
            Some(text) => serde_json::from_str(text).unwrap_or_else(|e| {
                log::warn!("config: ignoring invalid override ({e})");
                Self::default()
            }),
        };
        parsed.sanitized()
    }

    fn sanitized(mut self) -> Self {
        self.session_size = self.session_size.max(1);
        self.game = self.game.sanitized();
        self
    }
}
