// Clean raw OCR output for speech: learned corrections, then normalization.
// Run with: cargo run --bin clean_text -- /tmp/text.txt   (or pipe text on stdin)
use anyhow::{Context, Result};
use correction_core::config::LearnerConfig;
use correction_core::logging::{init_logging, LoggingConfig};
use correction_core::CorrectionEngine;
use std::io::{self, Read};

fn main() -> Result<()> {
    init_logging(&LoggingConfig { level: "warn".to_string(), ..LoggingConfig::default() });

    let config = LearnerConfig::load().context("could not load configuration")?;
    let engine = CorrectionEngine::from_config(&config);

    let raw = match std::env::args_os().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("could not read {}", path.to_string_lossy()))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("could not read stdin")?;
            buf
        }
    };

    println!("{}", engine.clean_text(&raw));
    Ok(())
}
