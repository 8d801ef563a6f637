//! Side effects requested by the activity engines.
//!
//! Engines never touch progress, speech or timers themselves. They return
//! commands; `AppState::apply` handles the progress ones and hands the rest
//! back to the browser driver.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    RecordSeen(String),
    RecordCorrect(String),
    Speak(String),
    /// Advance the quiz after `delay_ms`, but only if question `generation`
    /// is still the one on screen.
    ScheduleAdvance { generation: u64, delay_ms: u32 },
}
