// File: src/core/applicator.rs
use crate::core::types::{CorrectionRuleSet, PatternFix};
use crate::error::{LearnError, Result};
use regex::{NoExpand, Regex};
use tracing::{debug, warn};

struct WordRule {
    matcher: Regex,
    replacement: String,
}

struct PatternRule {
    matcher: Regex,
    /// Already in `${N}` form.
    template: String,
}

/// A rule that could not be compiled and is left out of every pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRule {
    pub pattern: String,
    pub reason: String,
}

/// Compiled form of a [`CorrectionRuleSet`].
///
/// Word replacements run first, then pattern fixes in stored order. Rules that
/// fail to compile are logged once and skipped; the rest still apply.
pub struct CorrectionApplicator {
    word_rules: Vec<WordRule>,
    pattern_rules: Vec<PatternRule>,
    skipped: Vec<SkippedRule>,
}

impl CorrectionApplicator {
    pub fn new(rules: &CorrectionRuleSet) -> Self {
        let mut skipped = Vec::new();

        let mut word_rules = Vec::with_capacity(rules.word_replacements.len());
        for (wrong, right) in &rules.word_replacements {
            let source = format!(r"\b{}\b", regex::escape(wrong));
            match Regex::new(&source) {
                Ok(matcher) => word_rules.push(WordRule { matcher, replacement: right.clone() }),
                Err(e) => {
                    warn!("skipping word replacement '{}': {}", wrong, e);
                    skipped.push(SkippedRule { pattern: wrong.clone(), reason: e.to_string() });
                }
            }
        }

        let mut pattern_rules = Vec::with_capacity(rules.pattern_fixes.len());
        for fix in &rules.pattern_fixes {
            match compile_pattern(fix) {
                Ok(rule) => pattern_rules.push(rule),
                Err(e) => {
                    warn!("skipping pattern fix '{}': {}", fix.description, e);
                    skipped.push(SkippedRule { pattern: fix.pattern.clone(), reason: e.to_string() });
                }
            }
        }

        Self { word_rules, pattern_rules, skipped }
    }

    pub fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();

        for rule in &self.word_rules {
            if rule.matcher.is_match(&result) {
                result = rule.matcher.replace_all(&result, NoExpand(&rule.replacement)).into_owned();
            }
        }
        for rule in &self.pattern_rules {
            if rule.matcher.is_match(&result) {
                result = rule.matcher.replace_all(&result, rule.template.as_str()).into_owned();
            }
        }

        if result != text {
            debug!("applied corrections: '{}' -> '{}'", text, result);
        }
        result
    }

    pub fn rule_count(&self) -> usize {
        self.word_rules.len() + self.pattern_rules.len()
    }

    pub fn skipped_rules(&self) -> &[SkippedRule] {
        &self.skipped
    }
}

fn compile_pattern(fix: &PatternFix) -> Result<PatternRule> {
    let matcher = Regex::new(&fix.pattern)
        .map_err(|e| LearnError::invalid_rule(&fix.pattern, e.to_string()))?;
    let template = translate_template(&fix.replacement, &matcher)
        .map_err(|reason| LearnError::invalid_rule(&fix.pattern, reason))?;
    Ok(PatternRule { matcher, template })
}

/// Converts a backslash-style replacement template (`\1`, `\g<1>`, `\g<name>`)
/// into the `${N}` syntax `regex` expects. Literal `$` is escaped.
///
/// Every group reference must exist in `matcher`; `regex` would otherwise
/// expand it to nothing.
pub fn translate_template(template: &str, matcher: &Regex) -> std::result::Result<String, String> {
    let group_count = matcher.captures_len();
    let mut out = String::with_capacity(template.len() + 8);
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '$' => out.push_str("$$"),
            '\\' => match chars.next() {
                None => return Err("bad escape (end of template)".to_string()),
                Some(d) if d.is_ascii_digit() => {
                    let mut digits = d.to_string();
                    if let Some(&next) = chars.peek() {
                        if next.is_ascii_digit() {
                            digits.push(next);
                            chars.next();
                        }
                    }
                    push_group(&mut out, &digits, group_count)?;
                }
                Some('g') => {
                    if chars.next() != Some('<') {
                        return Err("missing '<' after \\g".to_string());
                    }
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('>') => break,
                            Some(ch) => name.push(ch),
                            None => return Err("missing '>' in group reference".to_string()),
                        }
                    }
                    if name.is_empty() {
                        return Err("empty group reference".to_string());
                    }
                    if name.chars().all(|ch| ch.is_ascii_digit()) {
                        push_group(&mut out, &name, group_count)?;
                    } else if matcher.capture_names().flatten().any(|n| n == name) {
                        out.push_str(&format!("${{{}}}", name));
                    } else {
                        return Err(format!("unknown group name '{}'", name));
                    }
                }
                Some('\\') => out.push('\\'),
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) if other.is_ascii_alphabetic() => {
                    return Err(format!("bad escape \\{}", other));
                }
                Some(other) => {
                    out.push('\\');
                    if other == '$' {
                        out.push_str("$$");
                    } else {
                        out.push(other);
                    }
                }
            },
            _ => out.push(c),
        }
    }
    Ok(out)
}

fn push_group(out: &mut String, digits: &str, group_count: usize) -> std::result::Result<(), String> {
    let index: usize = digits.parse().map_err(|_| format!("bad group reference {}", digits))?;
    if index >= group_count {
        return Err(format!("invalid group reference {}", index));
    }
    out.push_str(&format!("${{{}}}", index));
    Ok(())
}
