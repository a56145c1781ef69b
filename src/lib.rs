//! Time Machine: persona dialogue for historical era immersion.
//!
//! Answers a visitor's questions in the voice of an era's residents using
//! keyword-triggered overrides and curated per-character response pools,
//! and carries the era's phrase book and scene catalog alongside.

pub mod core;
pub mod schema;
