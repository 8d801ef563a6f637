//! Application state: word bank, session, progress and theme.
//!
//! `AppState` is the only owner of these four documents. Every mutating method
//! writes the affected document back to the store before returning, so a
//! reload always resumes from the last completed action.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::config::AppConfig;
use crate::progress::{Progress, Stats, compute_stats};
use crate::session::draw_session;
use crate::store::{self, BANK_KEY, KeyValueStore, PROGRESS_KEY, SESSION_KEY, THEME_KEY};
use crate::words::{WordBank, WordPair};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Cheese,
    Ocean,
    Candy,
}

impl Theme {
    pub fn parse(name: &str) -> Option<Theme> {
        match name.trim().to_ascii_lowercase().as_str() {
            "cheese" => Some(Theme::Cheese),
            "ocean" => Some(Theme::Ocean),
            "candy" => Some(Theme::Candy),
            _ => None,
        }
    }
}

pub struct AppState<S: KeyValueStore> {
    store: S,
    config: AppConfig,
    bank: WordBank,
    session: Vec<WordPair>,
    progress: Progress,
    theme: Theme,
}

impl<S: KeyValueStore> AppState<S> {
    /// Read every document, substituting defaults for anything missing or
    /// unreadable, and write the result back.
    pub fn load<R: Rng + ?Sized>(store: S, config: AppConfig, rng: &mut R) -> Self {
        let bank: WordBank = store::load_or(&store, BANK_KEY, WordBank::starter);
        let session: Vec<WordPair> =
            store::load_or(&store, SESSION_KEY, || draw_session(bank.as_slice(), config.session_size, rng));
        let progress: Progress = store::load_or(&store, PROGRESS_KEY, Progress::new);
        let theme: Theme = store::load_or(&store, THEME_KEY, Theme::default);
        log::info!(
            "app: loaded {} words, session of {}, progress on {} words",
            bank.len(),
            session.len(),
            progress.len()
        );
        let mut app = Self { store, config, bank, session, progress, theme };
        app.persist_all();
        app
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
    pub fn bank(&self) -> &WordBank {
        &self.bank
    }
    pub fn session(&self) -> &[WordPair] {
        &self.session
    }
    pub fn progress(&self) -> &Progress {
        &self.progress
    }
    pub fn theme(&self) -> Theme {
        self.theme
    }
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn stats(&self) -> Stats {
        compute_stats(&self.progress)
    }

    pub fn add_word(&mut self, native: &str, gloss: &str) -> bool {
        let added = self.bank.add(native, gloss);
        if added {
            log::debug!("app: added '{}' / '{}'", native.trim(), gloss.trim());
            store::save(&mut self.store, BANK_KEY, &self.bank);
        }
        added
    }

    /// Removing a word leaves the current session alone; sessions may refer to
    /// words that have since left the bank.
    pub fn remove_word(&mut self, id: &str) -> bool {
        let removed = self.bank.remove(id);
        if removed {
            log::debug!("app: removed '{id}'");
            store::save(&mut self.store, BANK_KEY, &self.bank);
        }
        removed
    }

    /// "New 20": replace the whole session with a fresh draw.
    pub fn new_session<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &[WordPair] {
        self.session = draw_session(self.bank.as_slice(), self.config.session_size, rng);
        log::info!("app: new session of {} words", self.session.len());
        store::save(&mut self.store, SESSION_KEY, &self.session);
        &self.session
    }

    pub fn reset_progress(&mut self) {
        self.progress.reset_all();
        log::info!("app: progress reset");
        store::save(&mut self.store, PROGRESS_KEY, &self.progress);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        store::save(&mut self.store, THEME_KEY, &self.theme);
    }

    /// Apply the progress commands in `commands` (stamped with `now`, epoch
    /// ms) and return the ones meant for the driver.
    pub fn apply(&mut self, commands: Vec<Command>, now: u64) -> Vec<Command> {
        let mut touched = false;
        let mut rest = Vec::new();
        for cmd in commands {
            match cmd {
                Command::RecordSeen(id) => {
                    self.progress.record_seen(&id, now);
                    touched = true;
                }
                Command::RecordCorrect(id) => {
                    self.progress.record_correct(&id, now);
                    touched = true;
                }
                other => rest.push(other),
            }
        }
        if touched {
            store::save(&mut self.store, PROGRESS_KEY, &self.progress);
        }
        rest
    }

    fn persist_all(&mut self) {
        store::save(&mut self.store, BANK_KEY, &self.bank);
        store::save(&mut self.store, SESSION_KEY, &self.session);
        store::save(&mut self.store, PROGRESS_KEY, &self.progress);
        store::save(&mut self.store, THEME_KEY, &self.theme);
    }
}
