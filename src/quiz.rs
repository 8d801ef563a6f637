//! Multiple-choice quiz over the session: "What is <native> in English?"
//!
//! A question is identified by its generation number. A correct answer asks
//! the driver to advance after a short delay, and the driver hands the
//! generation back; anything that moved the quiz in the meantime (a session
//! change, another advance) bumps the generation so the stale callback does
//! nothing.

use rand::Rng;
use serde::Serialize;

use crate::command::Command;
use crate::config::AppConfig;
use crate::session::{pick_random, shuffled};
use crate::words::WordPair;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    #[default]
    Unanswered,
    Correct,
    Incorrect,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub id: String,
    pub label: String, // gloss shown on the button
}

#[derive(Clone, Debug, Default)]
pub struct Quiz {
    index: usize,
    generation: u64,
    choices: Vec<Choice>,
    verdict: Verdict,
    distractors: usize,
    advance_ms: u32,
    affirmation: String,
}

impl Quiz {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            distractors: config.distractors,
            advance_ms: config.quiz_advance_ms,
            affirmation: config.affirmation.clone(),
            ..Self::default()
        }
    }

    /// A quiz whose generations continue after `last_generation`, so advances
    /// still queued by a previous quiz are stale for this one.
    pub fn resuming(config: &AppConfig, last_generation: u64) -> Self {
        Self { generation: last_generation, ..Self::new(config) }
    }

    pub fn index(&self) -> usize {
        self.index
    }
    pub fn generation(&self) -> u64 {
        self.generation
    }
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// The word being asked, or `None` for an empty session.
    pub fn current<'a>(&self, session: &'a [WordPair]) -> Option<&'a WordPair> {
        session.get(self.index)
    }

    /// Start over at the first word, e.g. after "New 20". Any pending advance
    /// becomes stale.
    pub fn reset<R: Rng + ?Sized>(&mut self, session: &[WordPair], bank: &[WordPair], rng: &mut R) {
        self.index = 0;
        self.enter(session, bank, rng);
    }

    /// (Re)build choices for the current index.
    pub fn enter<R: Rng + ?Sized>(&mut self, session: &[WordPair], bank: &[WordPair], rng: &mut R) {
        self.generation += 1;
        self.verdict = Verdict::Unanswered;
        self.build_choices(session, bank, rng);
    }

    /// Rebuild the current question's choices after the bank changed. The
    /// generation is kept; an answered question waiting for its advance is
    /// left as it is.
    pub fn refresh_choices<R: Rng + ?Sized>(&mut self, session: &[WordPair], bank: &[WordPair], rng: &mut R) {
        if self.verdict == Verdict::Correct {
            return;
        }
        self.verdict = Verdict::Unanswered;
        self.build_choices(session, bank, rng);
    }

    fn build_choices<R: Rng + ?Sized>(&mut self, session: &[WordPair], bank: &[WordPair], rng: &mut R) {
        self.choices.clear();
        if session.is_empty() {
            self.index = 0;
            return;
        }
        self.index %= session.len();
        let target = &session[self.index];
        let pool: Vec<WordPair> = bank.iter().filter(|w| w.id != target.id).cloned().collect();
        let mut options = pick_random(&pool, self.distractors, rng);
        options.push(target.clone());
        self.choices = shuffled(&options, rng)
            .into_iter()
            .map(|w| Choice { id: w.id, label: w.gloss })
            .collect();
    }

    /// Score a pick. Wrong picks leave the question open for another try.
    pub fn submit(&mut self, choice_id: &str, session: &[WordPair]) -> Vec<Command> {
        let Some(target) = self.current(session) else {
            return Vec::new();
        };
        if self.verdict == Verdict::Correct {
            // already answered, advance pending
            return Vec::new();
        }
        if choice_id == target.id {
            self.verdict = Verdict::Correct;
            vec![
                Command::RecordCorrect(target.id.clone()),
                Command::Speak(format!("{}. {}", target.spoken(), self.affirmation)),
                Command::ScheduleAdvance { generation: self.generation, delay_ms: self.advance_ms },
            ]
        } else {
            self.verdict = Verdict::Incorrect;
            vec![Command::RecordSeen(target.id.clone())]
        }
    }

    /// Deferred advance. Returns false when `generation` is stale.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        generation: u64,
        session: &[WordPair],
        bank: &[WordPair],
        rng: &mut R,
    ) -> bool {
        if generation != self.generation || session.is_empty() {
            return false;
        }
        self.index = (self.index + 1) % session.len();
        self.enter(session, bank, rng);
        true
    }
}
