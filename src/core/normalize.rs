// File: src/core/normalize.rs
//! Deterministic cleanup that turns corrected OCR text into something a speech
//! engine reads naturally.
//!
//! The steps are order-sensitive. Digit-confusion fixes must run before
//! currency expansion, and currency expansion must run before symbols are
//! spelled out, or a `$` in front of a price would be handled by the wrong step.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref CURRENCY_GAP: Regex = Regex::new(r"\$\s+").unwrap();

    /// Applied unconditionally, independent of any learned rule.
    static ref DIGIT_CONFUSIONS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"\$[Oo]").unwrap(), "$$0"),
        (Regex::new(r"\$[lI]").unwrap(), "$$1"),
        (Regex::new(r"(\d)[Oo](\d)").unwrap(), "${1}0${2}"),
        (Regex::new(r"(\d)[lI](\d)").unwrap(), "${1}1${2}"),
        (Regex::new(r"[Oo](\d)").unwrap(), "0${1}"),
        (Regex::new(r"(\d)[Oo]").unwrap(), "${1}0"),
    ];

    static ref NUMBER_SPACING: Vec<(Regex, &'static str)> = vec![
        // times
        (Regex::new(r"(\d)\s*:\s*(\d)").unwrap(), "${1}:${2}"),
        // fractions and dates
        (Regex::new(r"(\d)\s*/\s*(\d)").unwrap(), "${1}/${2}"),
    ];

    static ref CURRENCY_AMOUNT: Regex = Regex::new(r"\$(\d+\.?\d*)").unwrap();
}

const SPOKEN_SYMBOLS: &[(&str, &str)] = &[
    ("%", " percent "),
    ("&", " and "),
    ("@", " at "),
    ("#", " number "),
    ("+", " plus "),
    ("=", " equals "),
    ("*", " times "),
    ("°", " degrees "),
];

/// Whitespace collapse and currency-gap closing. Runs on raw OCR output
/// before learned corrections, and again as the first normalization step.
pub fn basic_cleanup(text: &str) -> String {
    let collapsed = WHITESPACE.replace_all(text, " ");
    CURRENCY_GAP.replace_all(&collapsed, "$$").into_owned()
}

pub fn normalize(text: &str) -> String {
    let mut result = basic_cleanup(text);

    for (pattern, replacement) in DIGIT_CONFUSIONS.iter().chain(NUMBER_SPACING.iter()) {
        result = pattern.replace_all(&result, *replacement).into_owned();
    }

    result = CURRENCY_AMOUNT.replace_all(&result, "${1} dollars ").into_owned();

    for (symbol, spoken) in SPOKEN_SYMBOLS {
        if result.contains(symbol) {
            result = result.replace(symbol, spoken);
        }
    }

    WHITESPACE.replace_all(&result, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_and_trims() {
        assert_eq!(normalize("  hello \n\t world  "), "hello world");
    }

    #[test]
    fn expands_prices() {
        assert_eq!(normalize("only $12.50 today"), "only 12.50 dollars today");
        assert_eq!(normalize("only $ 3"), "only 3 dollars");
    }

    #[test]
    fn fixes_digit_confusions() {
        assert_eq!(normalize("room 1O5"), "room 105");
        assert_eq!(normalize("room 2l4"), "room 214");
        assert_eq!(normalize("5O"), "50");
        assert_eq!(normalize("$O.75"), "0.75 dollars");
    }

    #[test]
    fn tightens_times_and_fractions() {
        assert_eq!(normalize("opens 9 : 30"), "opens 9:30");
        assert_eq!(normalize("add 1 / 2 cup"), "add 1/2 cup");
    }

    #[test]
    fn spells_out_symbols() {
        assert_eq!(normalize("salt&pepper"), "salt and pepper");
        assert_eq!(normalize("20°"), "20 degrees");
        assert_eq!(normalize("2+2=4"), "2 plus 2 equals 4");
        assert_eq!(normalize("#1 @ home"), "number 1 at home");
    }

    #[test]
    fn currency_runs_before_symbol_expansion() {
        assert_eq!(normalize("Total $12.99 & 50% off"), "Total 12.99 dollars and 50 percent off");
    }

    #[test]
    fn is_stable_on_clean_text() {
        let clean = "the cat sat on the mat";
        assert_eq!(normalize(clean), clean);
    }
}
