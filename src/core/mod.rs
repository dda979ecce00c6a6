// src/core/mod.rs

pub mod applicator;
pub mod diff;
pub mod engine;
pub mod extractor;
pub mod normalize;
pub mod spellcheck;
pub mod synthesizer;
pub mod types;
