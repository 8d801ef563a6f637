//! Browser driver.
//!
//! Owns the single `Runtime` (application state, the three activities, speech
//! and the rng) in a thread-local, and exports the functions the page calls.
//! All mutation happens on the main thread, in these exports or in timer and
//! keyboard callbacks.
//!
//! The arcade is driven by one self-rescheduling `setTimeout` callback: every
//! tick re-arms the timer with the interval for the current score, and nothing
//! re-arms it once the game stops running. Pausing, restarting and leaving the
//! game view clear the pending timeout.
use std::cell::RefCell;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{KeyboardEvent, SpeechSynthesis, SpeechSynthesisUtterance, SpeechSynthesisVoice, Storage, window};

use crate::app::{AppState, Theme};
use crate::command::Command;
use crate::config::AppConfig;
use crate::flashcards::Flashcards;
use crate::game::{Arcade, Direction, GameState, TickEvent};
use crate::progress::Stats;
use crate::quiz::{Choice, Quiz, Verdict};
use crate::speech::{Speaker, SpeechOutput, Utterance, Voice};
use crate::store::{KeyValueStore, StoreError};
use crate::words::{ID_SEPARATOR, WordPair};

fn js_reason(e: &JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

// --- localStorage ------------------------------------------------------------

/// `window.localStorage`, or nothing (private mode, sandboxed iframe).
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    pub fn open() -> Self {
        let storage = window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("localStorage unavailable; progress will not survive a reload");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, StoreError> {
        self.storage.as_ref().ok_or_else(|| StoreError::Unavailable("localStorage".into()))
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StoreError::Rejected { key: key.into(), reason: js_reason(&e) })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StoreError::Rejected { key: key.into(), reason: js_reason(&e) })
    }
}

// --- speechSynthesis ---------------------------------------------------------

pub struct WebSpeaker {
    synth: SpeechSynthesis,
}

impl WebSpeaker {
    pub fn open() -> Option<Self> {
        let synth = window()?.speech_synthesis().ok()?;
        Some(Self { synth })
    }

    fn platform_voices(&self) -> Vec<SpeechSynthesisVoice> {
        self.synth.get_voices().iter().filter_map(|v| v.dyn_into().ok()).collect()
    }

    fn try_speak(&self, u: &Utterance) -> Result<(), JsValue> {
        let utterance = SpeechSynthesisUtterance::new_with_text(&u.text)?;
        let voices = self.platform_voices();
        if let Some(voice) = u.voice.and_then(|i| voices.get(i)) {
            utterance.set_voice(Some(voice));
        }
        utterance.set_lang(&u.lang);
        utterance.set_rate(u.rate);
        utterance.set_pitch(u.pitch);
        self.synth.speak(&utterance);
        Ok(())
    }
}

impl Speaker for WebSpeaker {
    fn voices(&self) -> Vec<Voice> {
        self.platform_voices().iter().map(|v| Voice::new(&v.lang(), &v.name())).collect()
    }

    fn cancel(&self) {
        self.synth.cancel();
    }

    fn speak(&self, utterance: &Utterance) {
        if let Err(e) = self.try_speak(utterance) {
            log::warn!("speech: {}", js_reason(&e));
        }
    }
}

// --- Runtime -----------------------------------------------------------------

struct Runtime {
    app: AppState<LocalStore>,
    arcade: Arcade,
    quiz: Quiz,
    cards: Flashcards,
    speech: SpeechOutput<WebSpeaker>,
    rng: StdRng,
    tick_handle: Option<i32>, // pending arcade timeout
    game_active: bool,        // game view on screen; keyboard steers only then
}

impl Runtime {
    /// Let the app record progress, then carry out speech and timers.
    fn execute(&mut self, commands: Vec<Command>) {
        let now = js_sys::Date::now() as u64;
        for cmd in self.app.apply(commands, now) {
            match cmd {
                Command::Speak(text) => self.speech.speak(&text),
                Command::ScheduleAdvance { generation, delay_ms } => {
                    if let Err(e) = schedule_quiz_advance(generation, delay_ms) {
                        log::warn!("quiz: could not schedule advance: {}", js_reason(&e));
                    }
                }
                Command::RecordSeen(_) | Command::RecordCorrect(_) => {}
            }
        }
    }

    /// One arcade tick. Returns the delay for the next one while running.
    fn on_tick(&mut self) -> Option<u32> {
        let (event, commands) = self.arcade.tick(self.app.session(), &mut self.rng);
        if let TickEvent::Ate(Some(word)) = &event {
            log::debug!("arcade: ate cheese, word '{}'", word.id);
        }
        self.execute(commands);
        self.arcade.state().running().then(|| self.arcade.interval_ms())
    }

    fn advance_quiz(&mut self, generation: u64) {
        let advanced = self.quiz.advance(generation, self.app.session(), self.app.bank().as_slice(), &mut self.rng);
        if !advanced {
            log::debug!("quiz: stale advance {generation} ignored");
        }
    }

    fn bank_changed(&mut self) {
        self.quiz.refresh_choices(self.app.session(), self.app.bank().as_slice(), &mut self.rng);
    }

    fn session_changed(&mut self) {
        self.quiz.reset(self.app.session(), self.app.bank().as_slice(), &mut self.rng);
        self.cards.reset();
    }
}

thread_local! {
    static RUNTIME: RefCell<Option<Runtime>> = const { RefCell::new(None) };
    static TICK_CALLBACK: RefCell<Option<Closure<dyn FnMut()>>> = const { RefCell::new(None) };
    static KEY_LISTENER: RefCell<Option<Closure<dyn FnMut(KeyboardEvent)>>> = const { RefCell::new(None) };
}

fn with_runtime<R>(f: impl FnOnce(&mut Runtime) -> R) -> Option<R> {
    RUNTIME.with(|cell| cell.borrow_mut().as_mut().map(f))
}

// --- Timers ------------------------------------------------------------------

/// `setTimeout` takes a signed delay; saturate instead of wrapping negative.
fn timeout_ms(delay_ms: u32) -> i32 {
    i32::try_from(delay_ms).unwrap_or(i32::MAX)
}

fn arm_tick(delay_ms: u32) {
    disarm_tick();
    let handle = TICK_CALLBACK.with(|cb| {
        let cb = cb.borrow();
        let closure = cb.as_ref()?;
        window()?
            .set_timeout_with_callback_and_timeout_and_arguments_0(closure.as_ref().unchecked_ref(), timeout_ms(delay_ms))
            .ok()
    });
    with_runtime(|rt| rt.tick_handle = handle);
}

fn disarm_tick() {
    if let Some(Some(handle)) = with_runtime(|rt| rt.tick_handle.take()) {
        if let Some(w) = window() {
            w.clear_timeout_with_handle(handle);
        }
    }
}

fn install_tick_callback() {
    TICK_CALLBACK.with(|cell| {
        if cell.borrow().is_some() {
            return;
        }
        let closure = Closure::wrap(Box::new(move || {
            let next = with_runtime(|rt| {
                rt.tick_handle = None;
                rt.on_tick()
            })
            .flatten();
            if let Some(ms) = next {
                arm_tick(ms);
            }
        }) as Box<dyn FnMut()>);
        *cell.borrow_mut() = Some(closure);
    });
}

fn schedule_quiz_advance(generation: u64, delay_ms: u32) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let cb = Closure::once_into_js(move || {
        with_runtime(|rt| rt.advance_quiz(generation));
    });
    win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), timeout_ms(delay_ms))?;
    Ok(())
}

// --- Keyboard ----------------------------------------------------------------

fn on_key(evt: &KeyboardEvent) {
    if !with_runtime(|rt| rt.game_active).unwrap_or(false) {
        return;
    }
    let key = evt.key();
    match key.as_str() {
        " " | "Spacebar" => {
            evt.prevent_default();
            game_toggle();
        }
        k => {
            if let Some(dir) = Direction::from_key(k) {
                if k.starts_with("Arrow") {
                    evt.prevent_default(); // keep the page from scrolling
                }
                steer(dir);
            }
        }
    }
}

fn install_keyboard() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    KEY_LISTENER.with(|cell| {
        if cell.borrow().is_some() {
            return Ok(());
        }
        let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| on_key(&evt)) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        *cell.borrow_mut() = Some(closure);
        Ok(())
    })
}

// --- Entry -------------------------------------------------------------------

/// Load persisted state and get ready. `config_json` may override any subset
/// of `AppConfig`. Calling it again restarts from storage.
#[wasm_bindgen]
pub fn start_app(config_json: Option<String>) -> Result<(), JsValue> {
    disarm_tick();
    // advances queued by an earlier start must stay stale
    let last_generation = with_runtime(|rt| rt.quiz.generation()).unwrap_or(0);
    let config = AppConfig::from_json(config_json.as_deref());
    let mut rng = StdRng::from_entropy();
    let app = AppState::load(LocalStore::open(), config.clone(), &mut rng);
    let arcade = Arcade::new(config.game.clone(), &mut rng);
    let mut quiz = Quiz::resuming(&config, last_generation);
    quiz.reset(app.session(), app.bank().as_slice(), &mut rng);
    let speaker = WebSpeaker::open();
    if speaker.is_none() {
        log::warn!("speechSynthesis unavailable; words will not be spoken");
    }
    let runtime = Runtime {
        app,
        arcade,
        quiz,
        cards: Flashcards::new(),
        speech: SpeechOutput::new(speaker, config.speech.clone()),
        rng,
        tick_handle: None,
        game_active: false,
    };
    RUNTIME.with(|cell| cell.replace(Some(runtime)));
    install_tick_callback();
    install_keyboard()?;
    log::info!("malay-mouse: started");
    Ok(())
}

// --- Arcade ------------------------------------------------------------------

/// The game view is on screen: keyboard steering is live.
#[wasm_bindgen]
pub fn game_enter() {
    with_runtime(|rt| rt.game_active = true);
}

/// The game view is going away: pause and drop the pending tick.
#[wasm_bindgen]
pub fn game_stop() {
    with_runtime(|rt| {
        rt.game_active = false;
        rt.arcade.pause();
    });
    disarm_tick();
}

/// Start/pause. Returns whether the game is now running.
#[wasm_bindgen]
pub fn game_toggle() -> bool {
    let Some((running, ms)) = with_runtime(|rt| (rt.arcade.toggle_running(), rt.arcade.interval_ms())) else {
        return false;
    };
    if running { arm_tick(ms) } else { disarm_tick() }
    running
}

#[wasm_bindgen]
pub fn game_restart() {
    disarm_tick();
    with_runtime(|rt| {
        let Runtime { arcade, rng, .. } = rt;
        arcade.restart(rng);
        log::info!("arcade: restart");
    });
}

fn steer(dir: Direction) -> bool {
    with_runtime(|rt| rt.arcade.steer(dir)).unwrap_or(false)
}

/// Steer by key or button name ("ArrowUp", "left", ...). Unknown names are
/// ignored.
#[wasm_bindgen]
pub fn game_steer(key: &str) -> bool {
    Direction::from_key(key).map(steer).unwrap_or(false)
}

#[wasm_bindgen]
pub fn replay_last_word() {
    with_runtime(|rt| {
        if let Some(text) = rt.arcade.last_word().map(WordPair::spoken) {
            rt.speech.speak(&text);
        }
    });
}

// --- Quiz --------------------------------------------------------------------

#[wasm_bindgen]
pub fn quiz_submit(choice_id: &str) -> bool {
    with_runtime(|rt| {
        let commands = rt.quiz.submit(choice_id, rt.app.session());
        rt.execute(commands);
        rt.quiz.verdict() == Verdict::Correct
    })
    .unwrap_or(false)
}

// --- Flashcards --------------------------------------------------------------

#[wasm_bindgen]
pub fn flash_next() {
    with_runtime(|rt| rt.cards.next(rt.app.session()));
}

#[wasm_bindgen]
pub fn flash_prev() {
    with_runtime(|rt| rt.cards.prev(rt.app.session()));
}

#[wasm_bindgen]
pub fn flash_flip() {
    with_runtime(|rt| rt.cards.flip());
}

#[wasm_bindgen]
pub fn flash_know() {
    with_runtime(|rt| {
        let commands = rt.cards.know(rt.app.session());
        rt.execute(commands);
    });
}

#[wasm_bindgen]
pub fn flash_dont_know() {
    with_runtime(|rt| {
        let commands = rt.cards.dont_know(rt.app.session());
        rt.execute(commands);
    });
}

#[wasm_bindgen]
pub fn flash_hear() {
    with_runtime(|rt| {
        let commands = rt.cards.hear(rt.app.session());
        rt.execute(commands);
    });
}

// --- Word bank, session, settings --------------------------------------------

/// "New 20".
#[wasm_bindgen]
pub fn new_session() {
    with_runtime(|rt| {
        let Runtime { app, rng, .. } = &mut *rt;
        app.new_session(rng);
        rt.session_changed();
    });
}

#[wasm_bindgen]
pub fn add_word(native: &str, gloss: &str) -> bool {
    with_runtime(|rt| {
        let added = rt.app.add_word(native, gloss);
        if added {
            rt.bank_changed();
        }
        added
    })
    .unwrap_or(false)
}

#[wasm_bindgen]
pub fn remove_word(id: &str) -> bool {
    with_runtime(|rt| {
        let removed = rt.app.remove_word(id);
        if removed {
            rt.bank_changed();
        }
        removed
    })
    .unwrap_or(false)
}

/// Bank entries matching `query`, as a JSON array of word pairs.
#[wasm_bindgen]
pub fn search_words(query: &str) -> Result<String, JsValue> {
    with_runtime(|rt| {
        let hits: Vec<&WordPair> = rt.app.bank().search(query).collect();
        serde_json::to_string(&hits).map_err(|e| JsValue::from_str(&e.to_string()))
    })
    .unwrap_or_else(|| Err(JsValue::from_str("app not started")))
}

#[wasm_bindgen]
pub fn reset_progress() {
    with_runtime(|rt| rt.app.reset_progress());
}

/// Unknown theme names are ignored.
#[wasm_bindgen]
pub fn set_theme(name: &str) -> bool {
    let Some(theme) = Theme::parse(name) else {
        return false;
    };
    with_runtime(|rt| rt.app.set_theme(theme)).is_some()
}

#[wasm_bindgen]
pub fn set_speech_enabled(enabled: bool) {
    with_runtime(|rt| rt.speech.set_enabled(enabled));
}

// --- Snapshot for the rendering layer ----------------------------------------

#[derive(Serialize)]
struct SessionRow<'a> {
    word: &'a WordPair,
    seen: u32,
    correct: u32,
}

#[derive(Serialize)]
struct PracticedRow<'a> {
    id: &'a str,
    native: &'a str,
    seen: u32,
    correct: u32,
}

#[derive(Serialize)]
struct GameView<'a> {
    state: &'a GameState,
    interval_ms: u32,
    last_word: Option<&'a WordPair>,
}

#[derive(Serialize)]
struct QuizView<'a> {
    index: usize,
    total: usize,
    word: &'a WordPair,
    choices: &'a [Choice],
    verdict: Verdict,
}

#[derive(Serialize)]
struct CardView<'a> {
    index: usize,
    total: usize,
    word: &'a WordPair,
    flipped: bool,
}

#[derive(Serialize)]
struct Snapshot<'a> {
    theme: Theme,
    speech_enabled: bool,
    stats: Stats,
    bank_size: usize,
    session: Vec<SessionRow<'a>>,
    most_practiced: Vec<PracticedRow<'a>>,
    game: GameView<'a>,
    quiz: Option<QuizView<'a>>,
    card: Option<CardView<'a>>,
}

fn build_snapshot(rt: &Runtime) -> Snapshot<'_> {
    let session = rt.app.session();
    let progress = rt.app.progress();
    Snapshot {
        theme: rt.app.theme(),
        speech_enabled: rt.speech.enabled(),
        stats: rt.app.stats(),
        bank_size: rt.app.bank().len(),
        session: session
            .iter()
            .map(|w| {
                let e = progress.entry(&w.id).copied().unwrap_or_default();
                SessionRow { word: w, seen: e.seen, correct: e.correct }
            })
            .collect(),
        most_practiced: progress
            .most_practiced(5)
            .into_iter()
            .map(|(id, e)| PracticedRow {
                id,
                native: id.split(ID_SEPARATOR).next().unwrap_or(id),
                seen: e.seen,
                correct: e.correct,
            })
            .collect(),
        game: GameView {
            state: rt.arcade.state(),
            interval_ms: rt.arcade.interval_ms(),
            last_word: rt.arcade.last_word(),
        },
        quiz: rt.quiz.current(session).map(|word| QuizView {
            index: rt.quiz.index(),
            total: session.len(),
            word,
            choices: rt.quiz.choices(),
            verdict: rt.quiz.verdict(),
        }),
        card: rt.cards.current(session).map(|word| CardView {
            index: rt.cards.index(),
            total: session.len(),
            word,
            flipped: rt.cards.flipped(),
        }),
    }
}

/// Everything the page draws, as JSON.
#[wasm_bindgen]
pub fn snapshot() -> Result<String, JsValue> {
    with_runtime(|rt| serde_json::to_string(&build_snapshot(rt)).map_err(|e| JsValue::from_str(&e.to_string())))
        .unwrap_or_else(|| Err(JsValue::from_str("app not started")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_ms_saturates() {
        assert_eq!(timeout_ms(600), 600);
        assert_eq!(timeout_ms(i32::MAX as u32), i32::MAX);
        assert_eq!(timeout_ms(u32::MAX), i32::MAX);
    }
}
