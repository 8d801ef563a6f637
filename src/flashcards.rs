// Flashcards: one card per session word, Malay on the front, English on the
// back. Grading a card records progress and moves on.
use serde::Serialize;

use crate::command::Command;
use crate::words::WordPair;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Flashcards {
    index: usize,
    flipped: bool,
}

impl Flashcards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn flipped(&self) -> bool {
        self.flipped
    }

    pub fn current<'a>(&self, session: &'a [WordPair]) -> Option<&'a WordPair> {
        session.get(self.index)
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.flipped = false;
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    pub fn next(&mut self, session: &[WordPair]) {
        if session.is_empty() {
            return self.reset();
        }
        self.index = (self.index + 1) % session.len();
        self.flipped = false;
    }

    pub fn prev(&mut self, session: &[WordPair]) {
        if session.is_empty() {
            return self.reset();
        }
        let len = session.len();
        self.index = (self.index % len + len - 1) % len;
        self.flipped = false;
    }

    /// "I knew it"
    pub fn know(&mut self, session: &[WordPair]) -> Vec<Command> {
        let Some(w) = self.current(session) else { return Vec::new() };
        let cmd = Command::RecordCorrect(w.id.clone());
        self.next(session);
        vec![cmd]
    }

    /// "Need practice"
    pub fn dont_know(&mut self, session: &[WordPair]) -> Vec<Command> {
        let Some(w) = self.current(session) else { return Vec::new() };
        let cmd = Command::RecordSeen(w.id.clone());
        self.next(session);
        vec![cmd]
    }

    pub fn hear(&self, session: &[WordPair]) -> Vec<Command> {
        self.current(session).map(|w| vec![Command::Speak(w.spoken())]).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Vec<WordPair> {
        vec![WordPair::new("kucing", "cat"), WordPair::new("anjing", "dog"), WordPair::new("ikan", "fish")]
    }

    #[test]
    fn test_navigation_wraps_and_unflips() {
        let s = session();
        let mut f = Flashcards::new();
        f.prev(&s);
        assert_eq!(f.index(), 2);
        f.flip();
        assert!(f.flipped());
        f.next(&s);
        assert_eq!(f.index(), 0);
        assert!(!f.flipped());
    }

    #[test]
    fn test_grading_records_and_advances() {
        let s = session();
        let mut f = Flashcards::new();
        assert_eq!(f.know(&s), vec![Command::RecordCorrect("kucing__cat".into())]);
        assert_eq!(f.dont_know(&s), vec![Command::RecordSeen("anjing__dog".into())]);
        assert_eq!(f.current(&s).map(|w| w.native.as_str()), Some("ikan"));
        assert_eq!(f.hear(&s), vec![Command::Speak("ikan. fish".into())]);
    }

    #[test]
    fn test_empty_session_has_no_card() {
        let mut f = Flashcards::new();
        assert!(f.current(&[]).is_none());
        assert!(f.know(&[]).is_empty());
        assert!(f.hear(&[]).is_empty());
        f.next(&[]);
        assert_eq!(f.index(), 0);
    }
}
