//! Malay Mouse core crate.
//!
//! Vocabulary trainer for Bahasa Malaysia: flashcards, a multiple-choice quiz
//! and the mouse & cheese arcade game all practise the same session of words
//! and feed the same progress counters. The engines here are plain Rust and
//! run under `cargo test`; `web` wires them to the browser (localStorage,
//! speechSynthesis, timers and keyboard input) and exposes them to the page.

use wasm_bindgen::prelude::*;

pub mod app;
pub mod command;
pub mod config;
pub mod flashcards;
pub mod game;
pub mod progress;
pub mod quiz;
pub mod session;
pub mod speech;
pub mod store;
pub mod web;
pub mod words;

pub use app::{AppState, Theme};
pub use command::Command;
pub use config::{AppConfig, GameConfig, SpeechConfig};
pub use game::{Arcade, Cell, Direction, GameState, Tick, TickEvent, advance_tick};
pub use progress::{Progress, ProgressEntry, Stats, compute_stats};
pub use quiz::{Choice, Quiz, Verdict};
pub use session::draw_session;
pub use words::{WordBank, WordPair};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // A second init (hot reload) fails harmlessly.
    let _ = console_log::init_with_level(log::Level::Info);
}

// -----------------------------------------------------------------------------
// Starter word bank (Malay, English). Used whenever no bank is stored yet.
// -----------------------------------------------------------------------------

pub const DEFAULT_WORDS: &[(&str, &str)] = &[
    ("makan", "eat"), ("minum", "drink"), ("kucing", "cat"), ("anjing", "dog"),
    ("buku", "book"), ("pensel", "pencil"), ("sekolah", "school"), ("guru", "teacher"),
    ("murid", "student"), ("rumah", "house"), ("kereta", "car"), ("basikal", "bicycle"),
    ("jalan", "road"), ("air", "water"), ("susu", "milk"), ("nasi", "rice"),
    ("ayam", "chicken"), ("ikan", "fish"), ("buah", "fruit"), ("epal", "apple"),
    ("pisang", "banana"), ("oren", "orange (fruit)"), ("anggur", "grape"), ("durian", "durian"),
    ("tangan", "hand"), ("kaki", "leg/foot"), ("mata", "eye"), ("telinga", "ear"),
    ("mulut", "mouth"), ("hidung", "nose"), ("kepala", "head"), ("baju", "shirt"),
    ("seluar", "pants"), ("kasut", "shoes"), ("topi", "hat"), ("bola", "ball"),
    ("meja", "table"), ("kerusi", "chair"), ("tingkap", "window"), ("pintu", "door"),
    ("bilik", "room"), ("dapur", "kitchen"), ("tandas", "toilet"), ("taman", "park"),
    ("pantai", "beach"), ("laut", "sea"), ("gunung", "mountain"), ("langit", "sky"),
    ("hujan", "rain"), ("matahari", "sun"), ("bulan", "moon"), ("bintang", "star"),
    ("panas", "hot"), ("sejuk", "cold"), ("besar", "big"), ("kecil", "small"),
    ("cepat", "fast"), ("lambat", "slow"), ("cantik", "pretty"), ("kuat", "strong"),
    ("lemah", "weak"), ("gembira", "happy"), ("sedih", "sad"), ("marah", "angry"),
    ("takut", "scared"), ("tidur", "sleep"), ("bangun", "wake up"), ("pergi", "go"),
    ("datang", "come"), ("lihat", "look"), ("dengar", "listen"), ("cakap", "speak"),
    ("baca", "read"), ("tulis", "write"), ("kira", "count"), ("tambah", "add"),
    ("tolak", "subtract"), ("kali", "multiply"), ("bahagi", "divide"), ("warna", "color"),
    ("merah", "red"), ("biru", "blue"), ("hijau", "green"), ("kuning", "yellow"),
    ("hitam", "black"), ("putih", "white"), ("coklat", "brown"), ("ungu", "purple"),
    ("oren (warna)", "orange (color)"),
];
