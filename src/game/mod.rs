//! Mouse & cheese: a snake-style arcade game on a toroidal grid.
//!
//! The mouse moves one cell per tick. Eating the cheese grows it by one cell,
//! scores a point and pronounces the next session word; running into its own
//! body ends the run and puts the mouse back at the start (score and word
//! position are kept).
//!
//! `advance_tick` is a pure transition from one `GameState` to the next. It
//! does not talk to speech or progress; it returns `Command`s instead, which
//! the driver executes after committing the new state. `Arcade` owns a state
//! plus the single pending steering intent and is what the browser timer
//! drives.

use rand::Rng;
use serde::Serialize;

use crate::command::Command;
use crate::config::GameConfig;
use crate::words::WordPair;

mod grid;

pub use grid::{Cell, Direction};

// --- State -------------------------------------------------------------------

/// Starting mouse: three cells facing right on the middle row.
pub fn default_snake(grid: u8) -> Vec<Cell> {
    let y = grid / 2;
    vec![Cell::new(4, y), Cell::new(3, y), Cell::new(2, y)]
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameState {
    grid: u8,
    snake: Vec<Cell>, // head first, contiguous, no repeats
    direction: Direction,
    item: Cell, // never under the snake
    score: u32,
    word_cursor: usize,
    running: bool,
}

impl GameState {
    /// Fresh paused game with the cheese on a random free cell.
    pub fn new<R: Rng + ?Sized>(grid: u8, rng: &mut R) -> Self {
        let grid = grid.max(GameConfig::MIN_GRID);
        let snake = default_snake(grid);
        let item = random_free_cell(grid, &snake, rng).unwrap_or(Cell::new(0, 0));
        Self { grid, snake, direction: Direction::Right, item, score: 0, word_cursor: 0, running: false }
    }

    /// Build an arbitrary position (paused, score 0). Used to set up puzzles
    /// and tests; the caller is responsible for a contiguous body.
    ///
    /// `None` for an empty body, a grid below the minimum, or any cell off
    /// the board.
    pub fn with_body(grid: u8, snake: Vec<Cell>, direction: Direction, item: Cell) -> Option<Self> {
        let on_board = |c: &Cell| c.x < grid && c.y < grid;
        if grid < GameConfig::MIN_GRID || snake.is_empty() || !snake.iter().all(on_board) || !on_board(&item) {
            return None;
        }
        Some(Self { grid, snake, direction, item, score: 0, word_cursor: 0, running: false })
    }

    pub fn grid(&self) -> u8 {
        self.grid
    }
    pub fn snake(&self) -> &[Cell] {
        &self.snake
    }
    pub fn head(&self) -> Cell {
        self.snake[0]
    }
    pub fn direction(&self) -> Direction {
        self.direction
    }
    pub fn item(&self) -> Cell {
        self.item
    }
    pub fn score(&self) -> u32 {
        self.score
    }
    pub fn word_cursor(&self) -> usize {
        self.word_cursor
    }
    pub fn running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.snake.contains(&cell)
    }

    /// True when `intent` may replace the current heading.
    pub fn accepts(&self, intent: Direction) -> bool {
        intent != self.direction.opposite()
    }
}

/// Uniformly random cell not in `occupied`, by rejection sampling. `None` when
/// the board is full.
pub fn random_free_cell<R: Rng + ?Sized>(grid: u8, occupied: &[Cell], rng: &mut R) -> Option<Cell> {
    let total = grid as usize * grid as usize;
    if occupied.len() >= total {
        let any_free = (0..grid).any(|y| (0..grid).any(|x| !occupied.contains(&Cell::new(x, y))));
        if !any_free {
            return None;
        }
    }
    loop {
        let spot = Cell::new(rng.gen_range(0..grid), rng.gen_range(0..grid));
        if !occupied.contains(&spot) {
            return Some(spot);
        }
    }
}

// --- Transition --------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickEvent {
    /// Game paused; nothing changed.
    Idle,
    Moved,
    /// Cheese eaten. Carries the word that was pronounced, if the session had one.
    Ate(Option<WordPair>),
    /// Ran into itself; the mouse is back at the start and the game is paused.
    Collided,
}

#[derive(Clone, Debug)]
pub struct Tick {
    pub state: GameState,
    pub event: TickEvent,
    pub commands: Vec<Command>,
}

/// Compute the state one tick after `state`.
///
/// `intent` is applied first unless it reverses the current heading. The rng
/// is only drawn from when the cheese has to move.
pub fn advance_tick<R: Rng + ?Sized>(
    state: &GameState,
    intent: Option<Direction>,
    session: &[WordPair],
    rng: &mut R,
) -> Tick {
    let mut next = state.clone();
    if !state.running {
        return Tick { state: next, event: TickEvent::Idle, commands: Vec::new() };
    }
    if let Some(dir) = intent.filter(|d| state.accepts(*d)) {
        next.direction = dir;
    }

    let head = state.head().step(next.direction, state.grid);
    let ate = head == state.item;

    let mut body = Vec::with_capacity(state.snake.len() + 1);
    body.push(head);
    body.extend_from_slice(&state.snake);
    if !ate {
        body.pop();
    }

    if body[1..].contains(&head) {
        next.running = false;
        next.snake = default_snake(state.grid);
        next.direction = Direction::Right;
        if next.occupies(next.item) {
            if let Some(cell) = random_free_cell(next.grid, &next.snake, rng) {
                next.item = cell;
            }
        }
        return Tick { state: next, event: TickEvent::Collided, commands: Vec::new() };
    }
    next.snake = body;

    if !ate {
        return Tick { state: next, event: TickEvent::Moved, commands: Vec::new() };
    }

    next.score += 1;
    if let Some(cell) = random_free_cell(next.grid, &next.snake, rng) {
        next.item = cell;
    }
    let mut commands = Vec::new();
    let word = if session.is_empty() {
        None
    } else {
        let word = &session[next.word_cursor % session.len()];
        commands.push(Command::RecordSeen(word.id.clone()));
        commands.push(Command::Speak(word.spoken()));
        next.word_cursor = (next.word_cursor + 1) % session.len();
        Some(word.clone())
    };
    Tick { state: next, event: TickEvent::Ate(word), commands }
}

// --- Owned game --------------------------------------------------------------

/// A game plus the steering intent queued since the last tick.
#[derive(Clone, Debug)]
pub struct Arcade {
    config: GameConfig,
    state: GameState,
    pending: Option<Direction>,
    last_word: Option<WordPair>, // shown as "just ate" and replayable
}

impl Arcade {
    pub fn new<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> Self {
        let state = GameState::new(config.grid, rng);
        Self { config, state, pending: None, last_word: None }
    }

    pub fn from_state(config: GameConfig, state: GameState) -> Self {
        Self { config, state, pending: None, last_word: None }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn pending(&self) -> Option<Direction> {
        self.pending
    }

    pub fn last_word(&self) -> Option<&WordPair> {
        self.last_word.as_ref()
    }

    pub fn interval_ms(&self) -> u32 {
        self.config.tick_interval_ms(self.state.score)
    }

    /// Queue a heading for the next tick. Reversals are ignored; a later valid
    /// intent before the tick replaces an earlier one.
    pub fn steer(&mut self, intent: Direction) -> bool {
        if !self.state.accepts(intent) {
            log::debug!("arcade: ignoring reversal to {intent:?}");
            return false;
        }
        self.pending = Some(intent);
        true
    }

    pub fn toggle_running(&mut self) -> bool {
        let running = !self.state.running;
        self.state.set_running(running);
        running
    }

    pub fn pause(&mut self) {
        self.state.set_running(false);
    }

    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.state = GameState::new(self.config.grid, rng);
        self.pending = None;
        self.last_word = None;
    }

    /// Advance one tick and commit the result.
    pub fn tick<R: Rng + ?Sized>(&mut self, session: &[WordPair], rng: &mut R) -> (TickEvent, Vec<Command>) {
        if !self.state.running {
            return (TickEvent::Idle, Vec::new());
        }
        let Tick { state, event, commands } = advance_tick(&self.state, self.pending.take(), session, rng);
        self.state = state;
        match &event {
            TickEvent::Ate(Some(word)) => self.last_word = Some(word.clone()),
            TickEvent::Collided => log::info!("arcade: collision at score {}", self.state.score),
            _ => {}
        }
        (event, commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn cells(v: &[(u8, u8)]) -> Vec<Cell> {
        v.iter().map(|&c| Cell::from(c)).collect()
    }

    fn running(mut s: GameState) -> GameState {
        s.set_running(true);
        s
    }

    fn words(n: usize) -> Vec<WordPair> {
        crate::DEFAULT_WORDS[..n].iter().map(|(a, b)| WordPair::new(a, b)).collect()
    }

    fn contiguous(s: &GameState) -> bool {
        s.snake().windows(2).all(|w| {
            [Direction::Right, Direction::Left, Direction::Down, Direction::Up]
                .iter()
                .any(|d| w[0].step(*d, s.grid()) == w[1])
        })
    }

    #[test]
    fn test_moves_right_keeping_length() {
        let s = running(GameState::with_body(18, default_snake(18), Direction::Right, Cell::new(0, 0)).unwrap());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let t = advance_tick(&s, None, &[], &mut rng);
        assert_eq!(t.event, TickEvent::Moved);
        assert_eq!(t.state.snake(), &cells(&[(5, 9), (4, 9), (3, 9)])[..]);
        assert!(t.commands.is_empty());
    }

    #[test]
    fn test_wraps_at_right_edge() {
        let body = cells(&[(17, 9), (16, 9), (15, 9)]);
        let s = running(GameState::with_body(18, body, Direction::Right, Cell::new(0, 0)).unwrap());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let t = advance_tick(&s, None, &[], &mut rng);
        assert_eq!(t.state.head(), Cell::new(0, 9));
        assert_eq!(t.state.snake().len(), 3);
    }

    #[test]
    fn test_paused_tick_is_noop() {
        let s = GameState::with_body(18, default_snake(18), Direction::Right, Cell::new(5, 9)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let t = advance_tick(&s, Some(Direction::Up), &words(2), &mut rng);
        assert_eq!(t.event, TickEvent::Idle);
        assert_eq!(t.state, s);
    }

    #[test]
    fn test_eating_grows_scores_and_speaks() {
        let session = words(2);
        let s = running(GameState::with_body(18, default_snake(18), Direction::Right, Cell::new(5, 9)).unwrap());
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let t = advance_tick(&s, None, &session, &mut rng);
        assert_eq!(t.event, TickEvent::Ate(Some(session[0].clone())));
        assert_eq!(t.state.snake(), &cells(&[(5, 9), (4, 9), (3, 9), (2, 9)])[..]);
        assert_eq!(t.state.score(), 1);
        assert_eq!(t.state.word_cursor(), 1);
        assert!(!t.state.occupies(t.state.item()));
        assert_eq!(
            t.commands,
            vec![Command::RecordSeen(session[0].id.clone()), Command::Speak(session[0].spoken())]
        );
    }

    #[test]
    fn test_word_cursor_wraps() {
        let session = words(1);
        let s = running(GameState::with_body(18, default_snake(18), Direction::Right, Cell::new(5, 9)).unwrap());
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let t = advance_tick(&s, None, &session, &mut rng);
        assert_eq!(t.state.word_cursor(), 0);
    }

    #[test]
    fn test_eating_with_empty_session_only_scores() {
        let s = running(GameState::with_body(18, default_snake(18), Direction::Right, Cell::new(5, 9)).unwrap());
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let t = advance_tick(&s, None, &[], &mut rng);
        assert_eq!(t.event, TickEvent::Ate(None));
        assert_eq!(t.state.score(), 1);
        assert_eq!(t.state.word_cursor(), 0);
        assert!(t.commands.is_empty());
    }

    #[test]
    fn test_self_collision_resets_body_keeps_score() {
        // head (5,5) came up from (5,6); turning left runs into (4,5)
        let body = cells(&[(5, 5), (5, 6), (4, 6), (4, 5), (3, 5)]);
        let mut s = running(GameState::with_body(18, body, Direction::Up, Cell::new(10, 10)).unwrap());
        s.score = 7;
        s.word_cursor = 3;
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let t = advance_tick(&s, Some(Direction::Left), &words(5), &mut rng);
        assert_eq!(t.event, TickEvent::Collided);
        assert_eq!(t.state.snake(), &default_snake(18)[..]);
        assert_eq!(t.state.direction(), Direction::Right);
        assert!(!t.state.running());
        assert_eq!(t.state.score(), 7);
        assert_eq!(t.state.word_cursor(), 3);
        assert_eq!(t.state.item(), Cell::new(10, 10));
    }

    #[test]
    fn test_collision_moves_item_off_reset_body() {
        let body = cells(&[(5, 5), (5, 6), (4, 6), (4, 5), (3, 5)]);
        let s = running(GameState::with_body(18, body, Direction::Up, Cell::new(3, 9)).unwrap());
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let t = advance_tick(&s, Some(Direction::Left), &[], &mut rng);
        assert_eq!(t.event, TickEvent::Collided);
        assert!(!t.state.occupies(t.state.item()));
    }

    #[test]
    fn test_chasing_own_tail_is_allowed() {
        // the tail cell is vacated on the same tick the head enters it
        let body = cells(&[(1, 1), (2, 1), (2, 2), (1, 2)]);
        let s = running(GameState::with_body(18, body, Direction::Left, Cell::new(9, 9)).unwrap());
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let t = advance_tick(&s, Some(Direction::Down), &[], &mut rng);
        assert_eq!(t.event, TickEvent::Moved);
        assert_eq!(t.state.snake(), &cells(&[(1, 2), (1, 1), (2, 1), (2, 2)])[..]);
    }

    #[test]
    fn test_reverse_intent_rejected() {
        let s = running(GameState::with_body(18, default_snake(18), Direction::Right, Cell::new(0, 0)).unwrap());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let t = advance_tick(&s, Some(Direction::Left), &[], &mut rng);
        assert_eq!(t.state.direction(), Direction::Right);
        assert_eq!(t.state.head(), Cell::new(5, 9));
    }

    #[test]
    fn test_arcade_steer_guards_reversal() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut a = Arcade::new(GameConfig::default(), &mut rng);
        assert!(!a.steer(Direction::Left));
        assert_eq!(a.pending(), None);
        assert!(a.steer(Direction::Up));
        // still validated against the committed heading, not the queued one
        assert!(a.steer(Direction::Down));
        assert_eq!(a.pending(), Some(Direction::Down));
    }

    #[test]
    fn test_arcade_one_intent_per_tick() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let state = GameState::with_body(18, default_snake(18), Direction::Right, Cell::new(0, 0)).unwrap();
        let mut a = Arcade::from_state(GameConfig::default(), state);
        a.toggle_running();
        a.steer(Direction::Up);
        a.tick(&[], &mut rng);
        assert_eq!(a.state().head(), Cell::new(4, 8));
        assert_eq!(a.pending(), None);
        a.tick(&[], &mut rng);
        assert_eq!(a.state().head(), Cell::new(4, 7));
    }

    #[test]
    fn test_toggle_and_restart() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let state = GameState::with_body(18, default_snake(18), Direction::Right, Cell::new(5, 9)).unwrap();
        let mut a = Arcade::from_state(GameConfig::default(), state);
        assert!(a.toggle_running());
        let session = words(3);
        let (event, _) = a.tick(&session, &mut rng);
        assert!(matches!(event, TickEvent::Ate(Some(_))));
        assert_eq!(a.last_word(), Some(&session[0]));
        let before = a.state().snake().to_vec();
        assert!(!a.toggle_running());
        assert_eq!(a.state().snake(), &before[..]);
        assert_eq!(a.tick(&session, &mut rng).0, TickEvent::Idle);

        a.steer(Direction::Up);
        a.restart(&mut rng);
        let s = a.state();
        assert_eq!((s.score(), s.word_cursor(), s.running()), (0, 0, false));
        assert_eq!(s.snake(), &default_snake(18)[..]);
        assert_eq!(s.direction(), Direction::Right);
        assert!(!s.occupies(s.item()));
        assert_eq!(a.pending(), None);
        assert!(a.last_word().is_none());
    }

    #[test]
    fn test_interval_follows_score() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut s = GameState::with_body(18, default_snake(18), Direction::Right, Cell::new(0, 0)).unwrap();
        s.score = 10;
        let a = Arcade::from_state(GameConfig::default(), s);
        assert_eq!(a.interval_ms(), 124);
        assert_eq!(Arcade::new(GameConfig::default(), &mut rng).interval_ms(), 140);
    }

    #[test]
    fn test_random_free_cell_full_board() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let all: Vec<Cell> = (0..5).flat_map(|y| (0..5).map(move |x| Cell::new(x, y))).collect();
        assert_eq!(random_free_cell(5, &all, &mut rng), None);
        let one_free = &all[1..];
        assert_eq!(random_free_cell(5, one_free, &mut rng), Some(Cell::new(0, 0)));
    }

    #[test]
    fn test_with_body_rejects_unplayable_positions() {
        let item = Cell::new(5, 9);
        assert!(GameState::with_body(18, Vec::new(), Direction::Right, item).is_none());
        assert!(GameState::with_body(18, cells(&[(18, 0)]), Direction::Right, item).is_none());
        assert!(GameState::with_body(18, default_snake(18), Direction::Right, Cell::new(0, 30)).is_none());
        assert!(GameState::with_body(4, cells(&[(1, 1)]), Direction::Right, Cell::new(0, 0)).is_none());
        let s = GameState::with_body(18, cells(&[(0, 0)]), Direction::Up, item).unwrap();
        assert_eq!(s.head(), Cell::new(0, 0));
    }

    #[test]
    fn test_invariants_hold_over_long_run() {
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let session = words(20);
        let mut a = Arcade::new(GameConfig::default(), &mut rng);
        let dirs = [Direction::Right, Direction::Left, Direction::Down, Direction::Up];
        for step in 0..5_000 {
            if !a.state().running() {
                a.toggle_running();
            }
            if step % 3 == 0 {
                a.steer(dirs[rng.gen_range(0..4)]);
            }
            let score_before = a.state().score();
            let (event, _) = a.tick(&session, &mut rng);
            let s = a.state();
            assert!(contiguous(s), "body broken at step {step}: {:?}", s.snake());
            let mut seen = s.snake().to_vec();
            seen.sort_by_key(|c| (c.x, c.y));
            seen.dedup();
            assert_eq!(seen.len(), s.snake().len(), "self-intersection at step {step}");
            assert!(!s.occupies(s.item()), "item under mouse at step {step}");
            assert!(s.word_cursor() < session.len());
            match event {
                TickEvent::Ate(_) => assert_eq!(s.score(), score_before + 1),
                _ => assert_eq!(s.score(), score_before),
            }
        }
    }
}
