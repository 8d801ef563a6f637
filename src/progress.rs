//! Per-word progress counters and the dashboard statistics derived from them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Counters for one word id. `correct <= seen` holds because the only way to
/// bump `correct` also bumps `seen`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    #[serde(default)]
    pub seen: u32,
    #[serde(default)]
    pub correct: u32,
    #[serde(default)]
    pub last_ts: u64, // epoch milliseconds
}

/// word id -> counters. Entries appear on first interaction and only vanish on
/// `reset_all`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress {
    entries: BTreeMap<String, ProgressEntry>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_seen(&mut self, id: &str, now: u64) {
        let e = self.entries.entry(id.to_string()).or_default();
        e.seen += 1;
        e.last_ts = now;
    }

    pub fn record_correct(&mut self, id: &str, now: u64) {
        let e = self.entries.entry(id.to_string()).or_default();
        e.seen += 1;
        e.correct += 1;
        e.last_ts = now;
    }

    pub fn reset_all(&mut self) {
        self.entries.clear();
    }

    pub fn entry(&self, id: &str) -> Option<&ProgressEntry> {
        self.entries.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProgressEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `n` most seen words, highest first. Ties keep id order.
    pub fn most_practiced(&self, n: usize) -> Vec<(&str, ProgressEntry)> {
        let mut all: Vec<_> = self.entries.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        all.sort_by(|a, b| b.1.seen.cmp(&a.1.seen));
        all.truncate(n);
        all
    }
}

/// Aggregate numbers shown on the dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub words: usize,
    pub seen: u64,
    pub correct: u64,
    pub accuracy: u32, // percent, 0..=100
}

pub fn compute_stats(progress: &Progress) -> Stats {
    let (seen, correct) = progress
        .entries
        .values()
        .fold((0u64, 0u64), |(s, c), e| (s + e.seen as u64, c + e.correct as u64));
    // round half up without going through floats
    let accuracy = if seen == 0 { 0 } else { ((200 * correct + seen) / (2 * seen)) as u32 };
    Stats { words: progress.len(), seen, correct, accuracy }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_seen_creates_entry() {
        let mut p = Progress::new();
        p.record_seen("makan__eat", 10);
        assert_eq!(p.entry("makan__eat"), Some(&ProgressEntry { seen: 1, correct: 0, last_ts: 10 }));
    }

    #[test]
    fn test_record_correct_bumps_both() {
        let mut p = Progress::new();
        p.record_seen("a", 1);
        p.record_correct("a", 2);
        let e = p.entry("a").unwrap();
        assert_eq!((e.seen, e.correct, e.last_ts), (2, 1, 2));
    }

    #[test]
    fn test_correct_never_exceeds_seen() {
        let mut p = Progress::new();
        for i in 0..50u64 {
            let id = if i % 3 == 0 { "x" } else { "y" };
            if i % 2 == 0 { p.record_correct(id, i) } else { p.record_seen(id, i) }
        }
        assert!(p.iter().all(|(_, e)| e.correct <= e.seen));
    }

    #[test]
    fn test_stats_zero_when_nothing_seen() {
        let s = compute_stats(&Progress::new());
        assert_eq!(s, Stats { words: 0, seen: 0, correct: 0, accuracy: 0 });
    }

    #[test]
    fn test_stats_accuracy_rounds() {
        let mut p = Progress::new();
        p.record_correct("a", 0);
        p.record_seen("b", 0);
        p.record_seen("c", 0);
        // 1/3 -> 33
        assert_eq!(compute_stats(&p).accuracy, 33);
        p.record_correct("c", 0);
        // 2/4 -> 50
        let s = compute_stats(&p);
        assert_eq!((s.words, s.seen, s.correct, s.accuracy), (3, 4, 2, 50));
        p.record_correct("b", 0);
        p.record_correct("b", 0);
        p.record_correct("b", 0);
        p.record_seen("b", 0);
        p.record_seen("b", 0);
        p.record_seen("b", 0);
        p.record_seen("b", 0);
        // 5/11 = 45.45 -> 45
        assert_eq!(compute_stats(&p).accuracy, 45);
    }

    #[test]
    fn test_stats_round_half_up() {
        let mut p = Progress::new();
        // 1 correct of 8 seen = 12.5% -> 13
        p.record_correct("a", 0);
        for _ in 0..7 {
            p.record_seen("a", 0);
        }
        assert_eq!(compute_stats(&p).accuracy, 13);
    }

    #[test]
    fn test_most_practiced_orders_by_seen() {
        let mut p = Progress::new();
        p.record_seen("a", 0);
        for _ in 0..3 {
            p.record_seen("b", 0);
        }
        p.record_seen("c", 0);
        p.record_seen("c", 0);
        let top: Vec<_> = p.most_practiced(2).into_iter().map(|(id, _)| id).collect();
        assert_eq!(top, vec!["b", "c"]);
    }

    #[test]
    fn test_reset_all_clears() {
        let mut p = Progress::new();
        p.record_seen("a", 0);
        p.reset_all();
        assert!(p.is_empty());
    }

    #[test]
    fn test_reads_stored_layout() {
        let p: Progress =
            serde_json::from_str(r#"{"kucing__cat":{"seen":3,"correct":1,"lastTs":1700000000000}}"#)
                .unwrap();
        let e = p.entry("kucing__cat").unwrap();
        assert_eq!((e.seen, e.correct, e.last_ts), (3, 1, 1_700_000_000_000));
    }
}
