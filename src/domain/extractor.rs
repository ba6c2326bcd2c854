//! Employee name extraction from payslip page text.
//!
//! Extraction runs an ordered list of [`ExtractionStrategy`] values over the
//! normalized page text. Every strategy is evaluated independently; the
//! captures that survive [`NameValidator`] are pooled and ranked by priority
//! tier, then by length (a longer name is less likely to be a truncated
//! label), then by position on the page.

use super::text::{fold, normalize, words};
use super::validator::NameValidator;
use crate::config::Blacklist;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use tracing::{debug, trace};

/// Priority of the employee-code layout rule.
pub const LAYOUT_PRIORITY: u8 = 3;
/// Priority of the "Nome do Funcionário" label rule.
pub const LABEL_PRIORITY: u8 = 2;
/// Priority of the upper-case run fallback.
pub const FALLBACK_PRIORITY: u8 = 1;

/// A rule's raw capture, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCapture {
    pub text: String,
    /// Byte offset of the capture in the normalized page text
    pub position: usize,
}

/// A validated name candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCandidate {
    pub text: String,
    /// Tie-break rank; higher wins
    pub priority: u8,
    pub position: usize,
    /// Name of the rule that produced the candidate
    pub rule: &'static str,
}

impl NameCandidate {
    fn rank(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.text.chars().count().cmp(&self.text.chars().count()))
            .then_with(|| self.position.cmp(&other.position))
    }
}

/// A layout heuristic that proposes name captures from page text.
///
/// Rules receive text already passed through [`normalize`], so runs of
/// whitespace are single spaces.
pub trait ExtractionRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn pattern(&self) -> &Regex;
    fn captures(&self, text: &str, validator: &NameValidator) -> Vec<RawCapture>;
}

/// A rule paired with its priority tier.
pub struct ExtractionStrategy {
    pub rule: Box<dyn ExtractionRule>,
    pub priority: u8,
}

impl ExtractionStrategy {
    pub fn new(rule: impl ExtractionRule + 'static, priority: u8) -> Self {
        Self {
            rule: Box::new(rule),
            priority,
        }
    }
}

/// Payslip layout: `<code> [Código] <NAME> [Nome do Funcionário] [CBO] <CBO code>`.
///
/// The employee code is 1-3 digits and must fall inside the configured range
/// (1..=500 by default). The CBO occupation code is 6 digits and never starts
/// with 0, which keeps unrelated numbers from anchoring a match.
#[derive(Debug, Clone, Default)]
pub struct EmployeeCodeRule;

impl EmployeeCodeRule {
    pub fn new() -> Self {
        Self
    }

    fn regex() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(
                r"(?x)
                \b(\d{1,3})\s+                                   # employee code
                (?:(?i:c[oó]d(?:igo)?\.?)\s*:?\s+)?              # optional 'Código' label
                (\p{L}{2,}(?:\s+\p{L}{2,}){2,6}?)\s+             # name, 3-7 words
                (?:(?i:nome\s+(?:d[oa]\s+)?funcion[aá]ri[oa])\s+)?
                (?:(?i:cbo)\s*:?\s*)?
                ([1-9]\d{5})\b                                   # CBO code
                ",
            )
            .expect("Valid employee code layout regex")
        });
        &PATTERN
    }
}

impl ExtractionRule for EmployeeCodeRule {
    fn name(&self) -> &'static str {
        "employee-code-layout"
    }

    fn pattern(&self) -> &Regex {
        Self::regex()
    }

    fn captures(&self, text: &str, validator: &NameValidator) -> Vec<RawCapture> {
        let config = validator.config();
        let blacklist = validator.blacklist();
        self.pattern()
            .captures_iter(text)
            .filter_map(|caps| {
                let code: u32 = caps.get(1)?.as_str().parse().ok()?;
                if code < config.min_employee_code || code > config.max_employee_code {
                    trace!("employee code {} out of range", code);
                    return None;
                }
                let name = caps.get(2)?;
                let tokens = words(name.as_str());
                let (start, end) = leading_name(&tokens, blacklist);
                let skipped: usize = tokens[..start].iter().map(|w| w.len() + 1).sum();
                Some(RawCapture {
                    text: tokens[start..end].join(" "),
                    position: name.start() + skipped,
                })
            })
            .filter(|capture| !capture.text.is_empty())
            .collect()
    }
}

/// Name written next to the "Nome do Funcionário" label, on either side.
///
/// Captures are bounded by the configured window and stop at digits. Label
/// words between the label and the name (e.g. `CÓDIGO`, `CBO`) are cut off.
#[derive(Debug, Clone, Default)]
pub struct EmployeeLabelRule;

impl EmployeeLabelRule {
    pub fn new() -> Self {
        Self
    }

    /// Name immediately before the label.
    fn before_label() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(
                r"\b((?:\p{L}{2,}\s+){1,6}\p{L}{2,})\s*:?\s+(?i:nome\s+(?:d[oa]\s+)?funcion[aá]ri[oa])\b",
            )
            .expect("Valid label lookbehind regex")
        });
        &PATTERN
    }

    /// Name immediately after the label.
    fn after_label() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(
                r"(?i:nome\s+(?:d[oa]\s+)?funcion[aá]ri[oa])\s*:?\s*((?:\p{L}{2,}\s+){1,6}\p{L}{2,})\b",
            )
            .expect("Valid label lookahead regex")
        });
        &PATTERN
    }
}

impl ExtractionRule for EmployeeLabelRule {
    fn name(&self) -> &'static str {
        "employee-name-label"
    }

    fn pattern(&self) -> &Regex {
        Self::before_label()
    }

    fn captures(&self, text: &str, validator: &NameValidator) -> Vec<RawCapture> {
        let window = validator.config().label_window;
        let blacklist = validator.blacklist();
        let mut captures = Vec::new();

        for caps in Self::before_label().captures_iter(text) {
            if let Some(m) = caps.get(1) {
                let tokens = words(m.as_str());
                let start = tokens
                    .iter()
                    .rposition(|w| is_label_word(w, blacklist))
                    .map_or(0, |i| i + 1);
                let kept = tail_within(&tokens[start..], window);
                let skipped: usize = m.as_str().len() - kept.len();
                captures.push(RawCapture {
                    text: kept,
                    position: m.start() + skipped,
                });
            }
        }

        for caps in Self::after_label().captures_iter(text) {
            if let Some(m) = caps.get(1) {
                let tokens = words(m.as_str());
                let end = tokens
                    .iter()
                    .position(|w| is_label_word(w, blacklist))
                    .unwrap_or(tokens.len());
                captures.push(RawCapture {
                    text: head_within(&tokens[..end], window),
                    position: m.start(),
                });
            }
        }

        captures.retain(|capture| !capture.text.is_empty());
        captures
    }
}

/// Any run of 3+ upper-case words anywhere on the page.
///
/// Runs are split at blacklisted words so that a name printed right after a
/// label line still surfaces on its own.
#[derive(Debug, Clone, Default)]
pub struct UppercaseRunRule;

impl UppercaseRunRule {
    pub fn new() -> Self {
        Self
    }

    fn regex() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"\b\p{Lu}{2,}(?:\s+\p{Lu}{2,}){2,}\b").expect("Valid upper-case run regex")
        });
        &PATTERN
    }
}

impl ExtractionRule for UppercaseRunRule {
    fn name(&self) -> &'static str {
        "uppercase-run"
    }

    fn pattern(&self) -> &Regex {
        Self::regex()
    }

    fn captures(&self, text: &str, validator: &NameValidator) -> Vec<RawCapture> {
        let min_len = validator.config().fallback_min_len;
        let blacklist = validator.blacklist();
        let mut captures = Vec::new();

        for m in self.pattern().find_iter(text) {
            let mut segment: Vec<&str> = Vec::new();
            let mut segment_start = m.start();
            let mut offset = m.start();

            for word in m.as_str().split(' ') {
                if is_label_word(word, blacklist) {
                    push_segment(&mut captures, &segment, segment_start, min_len);
                    segment.clear();
                    segment_start = offset + word.len() + 1;
                } else {
                    segment.push(word);
                }
                offset += word.len() + 1;
            }
            push_segment(&mut captures, &segment, segment_start, min_len);
        }

        captures
    }
}

fn push_segment(captures: &mut Vec<RawCapture>, words: &[&str], position: usize, min_len: usize) {
    if words.len() < 3 {
        return;
    }
    let text = words.join(" ");
    if text.chars().count() >= min_len {
        captures.push(RawCapture { text, position });
    }
}

fn is_label_word(word: &str, blacklist: &Blacklist) -> bool {
    blacklist.is_blacklisted_word(&fold(word))
}

/// Word range of the name in a layout capture.
///
/// Leading label words are skipped and the name ends at the next label word.
/// When the name is shorter than the pattern's minimum, the capture runs on
/// into the label (`JOAO SILVA NOME DO FUNCIONARIO`), and everything from
/// `NOME` on is dropped.
fn leading_name(words: &[&str], blacklist: &Blacklist) -> (usize, usize) {
    let start = words
        .iter()
        .position(|w| !is_label_word(w, blacklist))
        .unwrap_or(words.len());
    let end = words[start..]
        .iter()
        .position(|w| is_label_word(w, blacklist))
        .map_or(words.len(), |i| start + i);
    (start, end)
}

/// Joins the longest suffix of `words` that fits in `window` characters.
fn tail_within(words: &[&str], window: usize) -> String {
    let mut len = 0;
    let mut start = words.len();
    for (i, word) in words.iter().enumerate().rev() {
        let added = word.chars().count() + usize::from(len > 0);
        if len + added > window {
            break;
        }
        len += added;
        start = i;
    }
    words[start..].join(" ")
}

/// Joins the longest prefix of `words` that fits in `window` characters.
fn head_within(words: &[&str], window: usize) -> String {
    let mut len = 0;
    let mut end = 0;
    for (i, word) in words.iter().enumerate() {
        let added = word.chars().count() + usize::from(len > 0);
        if len + added > window {
            break;
        }
        len += added;
        end = i + 1;
    }
    words[..end].join(" ")
}

/// Extracts the employee name from one payslip page.
///
/// ```
/// use holerite::NameExtractor;
///
/// let extractor = NameExtractor::default();
/// let text = "20 Código AMANDA SANTOS COSTA Nome do Funcionário CBO 212405";
/// assert_eq!(extractor.extract(text).as_deref(), Some("AMANDA SANTOS COSTA"));
/// ```
pub struct NameExtractor {
    validator: NameValidator,
    strategies: Vec<ExtractionStrategy>,
}

impl NameExtractor {
    /// Creates an extractor with the standard payslip strategies.
    pub fn new(validator: NameValidator) -> Self {
        Self::with_strategies(validator, Self::default_strategies())
    }

    /// Creates an extractor with a caller-chosen strategy list.
    pub fn with_strategies(validator: NameValidator, strategies: Vec<ExtractionStrategy>) -> Self {
        Self {
            validator,
            strategies,
        }
    }

    /// Layout rule, then label rule, then upper-case fallback.
    pub fn default_strategies() -> Vec<ExtractionStrategy> {
        vec![
            ExtractionStrategy::new(EmployeeCodeRule::new(), LAYOUT_PRIORITY),
            ExtractionStrategy::new(EmployeeLabelRule::new(), LABEL_PRIORITY),
            ExtractionStrategy::new(UppercaseRunRule::new(), FALLBACK_PRIORITY),
        ]
    }

    pub fn validator(&self) -> &NameValidator {
        &self.validator
    }

    /// Returns every validated candidate, best first.
    pub fn candidates(&self, page_text: &str) -> Vec<NameCandidate> {
        let text = normalize(page_text);
        let mut pooled = Vec::new();

        for strategy in &self.strategies {
            let rule = strategy.rule.name();
            for capture in strategy.rule.captures(&text, &self.validator) {
                // Title-case captures are reported the way payslips print names.
                let name = normalize(&capture.text).to_uppercase();
                match self.validator.check(&name) {
                    Ok(()) => pooled.push(NameCandidate {
                        text: name,
                        priority: strategy.priority,
                        position: capture.position,
                        rule,
                    }),
                    Err(reason) => trace!("{} rejected '{}': {}", rule, name, reason),
                }
            }
        }

        pooled.sort_by(|a, b| a.rank(b));
        pooled
    }

    /// Returns the best candidate's text, or `None` if nothing validates.
    pub fn extract(&self, page_text: &str) -> Option<String> {
        let best = self.candidates(page_text).into_iter().next()?;
        debug!(
            "selected '{}' via {} (priority {})",
            best.text, best.rule, best.priority
        );
        Some(best.text)
    }
}

impl Default for NameExtractor {
    fn default() -> Self {
        Self::new(NameValidator::default())
    }
}
