//! Top-level module for the word-transition chat model.
//!
//! This crate provides an incremental first-order text generator, including:
//! - A word tokenizer (`tokenizer`)
//! - Weighted random sampling (`Sampler`)
//! - Internal statistics storage (`TransitionStore`)
//! - Construction parameters (`ModelConfig`)
//! - A high-level learn/generate interface (`LanguageModel`)

/// Construction parameters for the model.
///
/// Block size, storage directory and sampler seed as explicit
/// per-instance values.
pub mod config;

/// The fixed emotion enumeration and its weight-boost factors.
pub mod emotion;

/// First-order word-transition model.
///
/// Handles text ingestion, block rotation and persistence,
/// and weighted text generation.
pub mod language_model;

/// Seedable weighted random choice.
///
/// Exposes reproducible sampling over non-negative weight lists.
pub mod sampler;

/// Internal statistics store for the active block and the cumulative
/// vocabulary.
///
/// Tracks unigram counts and per-predecessor successor maps.
/// This module is not exposed publicly.
pub(crate) mod store;

/// Separator-driven word tokenizer.
pub mod tokenizer;
