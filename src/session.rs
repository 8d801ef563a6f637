//! Session drawing: the working subset of the bank every activity uses until
//! the player asks for a new one.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::words::WordPair;

pub const DEFAULT_SESSION_SIZE: usize = 20;

/// `min(n, items.len())` distinct items in uniformly random order.
///
/// `partial_shuffle` runs Fisher-Yates only as far as needed, so every
/// ordered selection is equally likely.
pub fn pick_random<T: Clone, R: Rng + ?Sized>(items: &[T], n: usize, rng: &mut R) -> Vec<T> {
    let mut copy = items.to_vec();
    let take = n.min(copy.len());
    let (picked, _) = copy.partial_shuffle(rng, take);
    picked.to_vec()
}

/// Full fair shuffle of `items`.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    pick_random(items, items.len(), rng)
}

/// Draw a fresh session from the bank. The caller replaces (never merges) the
/// stored session with the result.
pub fn draw_session<R: Rng + ?Sized>(bank: &[WordPair], size: usize, rng: &mut R) -> Vec<WordPair> {
    pick_random(bank, size, rng)
}
