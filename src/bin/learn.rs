// Learn from corrected training samples and write learned_corrections.json.
// Run with: cargo run --bin learn
use anyhow::{Context, Result};
use correction_core::config::LearnerConfig;
use correction_core::learning::{load_corpus, LearningEngine, LearningOutcome};
use correction_core::logging::{init_logging, LoggingConfig};
use correction_core::persistence::{save_rule_set, SampleStore};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::Stylize;
use crossterm::terminal;
use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitCode;
use tracing::warn;

const RULE: &str = "======================================================================";
/// A user interrupt is a normal way to leave, not a failure.
const INTERRUPTED_EXIT_CODE: u8 = 0;

enum Status {
    Done,
    Interrupted,
}

enum Answer {
    Yes,
    No,
    Interrupted,
}

fn main() -> ExitCode {
    init_logging(&LoggingConfig::default());

    // Raw mode turns Ctrl-C into a key event, so this covers everything outside the prompt.
    if let Err(e) = ctrlc::set_handler(|| {
        println!("\n\nInterrupted by user");
        std::process::exit(i32::from(INTERRUPTED_EXIT_CODE));
    }) {
        warn!("could not install Ctrl-C handler: {}", e);
    }

    ExitCode::from(exit_status(run()))
}

fn exit_status(result: Result<Status>) -> u8 {
    match result {
        Ok(Status::Done) => 0,
        Ok(Status::Interrupted) => {
            println!("\n\nInterrupted by user");
            INTERRUPTED_EXIT_CODE
        }
        Err(e) => {
            eprintln!("\n{} {:#}", "✗ Error:".red(), e);
            1
        }
    }
}

fn run() -> Result<Status> {
    println!("{}", RULE);
    println!("{}", "LEARNING FROM CORRECTIONS".bold());
    println!("{}", RULE);

    let config = LearnerConfig::load().context("could not load configuration")?;
    let store = SampleStore::new(config.training_data_dir());

    println!("Loading training samples...");
    if !store.exists() {
        println!("{} Training directory not found: {}", "Error:".red(), store.dir().display());
        println!("Collect samples first with the reader in training mode.");
        return Ok(Status::Done);
    }

    // Unreadable records are already logged as warnings by the store.
    let corpus = load_corpus(&store).context("could not read training samples")?;
    println!("Loaded {} samples", corpus.samples.len());

    if corpus.samples.is_empty() {
        print_no_samples_help();
        return Ok(Status::Done);
    }

    let recommended = config.learning.recommended_samples;
    if corpus.samples.len() < recommended {
        println!(
            "\n{} Only {} samples found",
            "⚠ Warning:".yellow(),
            corpus.samples.len()
        );
        println!("Recommend collecting at least {} samples for better learning", recommended);
        match confirm("Continue anyway? [y/n]")? {
            Answer::Yes => {}
            Answer::No => return Ok(Status::Done),
            Answer::Interrupted => return Ok(Status::Interrupted),
        }
    }

    println!("\nAnalyzing corrections...");
    let engine = LearningEngine::with_min_occurrences(config.learning.min_occurrences);
    let report = match engine.learn(&corpus.samples) {
        LearningOutcome::EmptyCorpus => {
            print_no_samples_help();
            return Ok(Status::Done);
        }
        LearningOutcome::NoCorrections { .. } => {
            println!("\n{} No corrections found!", "⚠".yellow());
            println!("All samples have ocr_text == corrected_text");
            println!("\nThis means either:");
            println!("1. The OCR engine was 100% accurate (unlikely)");
            println!("2. You haven't corrected the samples yet");
            println!("\nCorrect the samples, then run learn again.");
            return Ok(Status::Done);
        }
        LearningOutcome::Learned(report) => report,
    };

    for obs in &report.observations {
        println!("  Found: '{}' -> '{}'", obs.wrong, obs.right);
    }
    println!("\nTotal corrections analyzed: {}", report.corrected_samples);

    println!("\nWord replacements:");
    for kept in &report.retained {
        println!("  '{}' -> '{}' (appeared {} times)", kept.wrong, kept.right, kept.count);
    }
    println!("\nPattern fixes:");
    for fix in &report.rules.pattern_fixes {
        println!("  {}", fix.description);
    }

    let path = config.corrections_file();
    println!("\nSaving corrections to: {}", path.display());
    save_rule_set(&report.rules, &path)
        .with_context(|| format!("learning failed, could not save {}", path.display()))?;
    println!("{}", "✓ Saved successfully!".green());

    println!("\n{}", RULE);
    println!("{}", "LEARNING COMPLETE!".bold());
    println!("{}", RULE);
    println!("Word replacements: {}", report.rules.word_replacements.len());
    println!("Pattern fixes: {}", report.rules.pattern_fixes.len());
    println!("\nNew captures will have these corrections applied automatically.");
    println!("{}", RULE);
    Ok(Status::Done)
}

fn print_no_samples_help() {
    println!("\nNo samples found!");
    println!("Steps:");
    println!("1. Run the reader with training mode on");
    println!("2. Capture 5+ images");
    println!("3. Correct the samples");
    println!("4. Run: learn");
}

/// Single-key y/n prompt. Ctrl-C, Ctrl-D and a closed stdin count as an
/// interrupt rather than an answer.
fn confirm(question: &str) -> Result<Answer> {
    print!("{} ", question);
    io::stdout().flush()?;

    if !io::stdin().is_terminal() {
        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(Answer::Interrupted);
        }
        return Ok(if line.trim().eq_ignore_ascii_case("y") { Answer::Yes } else { Answer::No });
    }

    terminal::enable_raw_mode()?;
    let answer = read_key_answer();
    terminal::disable_raw_mode()?;
    println!();
    Ok(answer?)
}

fn read_key_answer() -> io::Result<Answer> {
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        return Ok(match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Answer::Interrupted
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                print!("y");
                Answer::Yes
            }
            _ => Answer::No,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupt_and_completion_exit_successfully() {
        assert_eq!(exit_status(Ok(Status::Interrupted)), 0);
        assert_eq!(exit_status(Ok(Status::Done)), 0);
        assert_eq!(INTERRUPTED_EXIT_CODE, 0);
    }

    #[test]
    fn failure_exits_with_one() {
        assert_eq!(exit_status(Err(anyhow::anyhow!("disk full"))), 1);
    }
}
