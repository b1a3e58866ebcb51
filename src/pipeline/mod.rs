//! Pure stages of summarisation and flashcard synthesis.
//!
//! Nothing in here performs I/O, reads the clock, logs, or holds shared
//! mutable state; identical input gives byte-identical output.
//!
//! ## Data Flow
//!
//! ```text
//!                 ┌──▶ summarize ──▶ Summary
//! notes ─▶ segment ─▶ score ─┤
//!                 └──▶ flashcards ──▶ FlashcardSet
//!                          ▲
//!              payload ─▶ repair
//! ```
//!
//! 1. [`segment`]    — sentences and words, shared by both components
//! 2. [`score`]      — position, length and keyword-density signals
//! 3. [`summarize`]  — top sentences restored to document order
//! 4. [`repair`]     — parse a structured payload from an upstream generator
//! 5. [`flashcards`] — Q/A synthesis, falling back from [`repair`] failures

pub mod flashcards;
pub mod repair;
pub mod score;
pub mod segment;
pub mod summarize;
