// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod learning;
pub mod logging;
pub mod persistence;

pub use crate::core::applicator::CorrectionApplicator;
pub use crate::core::engine::CorrectionEngine;
pub use crate::core::types::{CorrectionRuleSet, PatternFix, TrainingSample, WordSubstitution};
pub use crate::error::{LearnError, Result};
pub use crate::learning::{LearningEngine, LearningOutcome};
