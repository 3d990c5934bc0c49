//! Greeting extraction from a compiled prompt.
//!
//! The first thing an agent says must be a natural utterance, never the
//! "You are ..." meta-description that opens most compiled prompts.

use std::sync::LazyLock;

use regex::Regex;

/// Spoken when nothing usable can be found in the prompt.
pub const DEFAULT_GREETING: &str = "Hello! How can I help you today?";

/// `Introduction:` followed by the first non-blank line (same line or later).
static INTRODUCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Introduction:\s*([^\n]+)").expect("introduction pattern is valid")
});

static ROLE_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^You are\s").expect("role line pattern is valid"));

static HEADER_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(You are\s|Primary Objective|Tone:|Constraints:|Call Flow|Strict Rules)")
        .expect("header line pattern is valid")
});

/// Bare section headers the spec template emits; never spoken.
const SECTION_HEADERS: [&str; 7] = [
    "introduction:",
    "verification:",
    "purpose:",
    "information gathering:",
    "closing:",
    "memory context:",
    "strict rules:",
];

/// Pull the opening line an agent should speak out of `compiled_prompt`.
///
/// Order of preference: the line after `Introduction:`, then the first line
/// of at least ten characters that is not a known section header, then
/// [`DEFAULT_GREETING`]. Never empty.
pub fn extract_greeting_from_compiled_prompt(compiled_prompt: &str) -> String {
    let trimmed = compiled_prompt.trim();
    if trimmed.is_empty() {
        return DEFAULT_GREETING.to_string();
    }

    if let Some(greeting) = introduction_line(trimmed) {
        return greeting.to_string();
    }

    trimmed
        .lines()
        .map(str::trim)
        .filter(|line| line.chars().count() >= 10)
        .find(|line| !HEADER_LINE_RE.is_match(line) && !is_section_header(line))
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_GREETING.to_string())
}

fn introduction_line(prompt: &str) -> Option<&str> {
    let line = INTRODUCTION_RE.captures(prompt)?.get(1)?.as_str().trim();

    // An empty introduction lets the regex run on into the next section.
    (line.chars().count() > 3 && !ROLE_LINE_RE.is_match(line) && !is_section_header(line))
        .then_some(line)
}

fn is_section_header(line: &str) -> bool {
    SECTION_HEADERS.contains(&line.to_lowercase().as_str())
}
