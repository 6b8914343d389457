//! crates/studyplan_core/src/transcript.rs
//!
//! Turns a pasted video-course listing into ordered, timed sections.
//!
//! The input is whatever a course page renders as text, so this is a narrow
//! line classifier rather than a grammar: each line is noise, a duration for
//! the most recent title, or a new title. Ambiguity is resolved by dropping
//! data instead of erroring; a lecture title with no duration line simply
//! never becomes a section.

use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

use crate::domain::Section;

/// Flat minutes added to every section for review and note-taking.
const REVIEW_OVERHEAD_MINUTES: u32 = 20;

/// Phrases marking a line as site chrome rather than course content.
const NOISE_MARKERS: [&str; 4] = ["free preview", "download", "course material", "class material"];

/// `MM:SS` or `HH:MM:SS`, anywhere in the line.
fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d{1,2}:\d{2}(:\d{2})?").expect("time pattern compiles"))
}

/// Parser output: the emitted sections plus their aggregate duration/count.
#[derive(Debug, Clone, Default)]
pub struct ParsedTranscript {
    pub sections: Vec<Section>,
    /// Minutes across all emitted sections, review overhead included.
    pub total_duration: u32,
    pub total_count: u32,
}

/// How a single line is treated, in precedence order.
#[derive(Debug, PartialEq, Eq)]
enum LineClass<'a> {
    /// Blank, purely numeric (chapter markers), or a known noise phrase.
    Skip,
    /// Carries a time token; closes out the pending title.
    Duration(&'a str),
    /// Anything else becomes the new pending title.
    Title(&'a str),
}

fn classify(line: &str) -> LineClass<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineClass::Skip;
    }
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return LineClass::Skip;
    }
    let lowered = trimmed.to_lowercase();
    if NOISE_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        return LineClass::Skip;
    }
    if let Some(token) = time_pattern().find(trimmed) {
        return LineClass::Duration(token.as_str());
    }
    LineClass::Title(trimmed)
}

/// Parses a raw course listing into sections with sequential order indices.
///
/// A duration line with no pending title is dropped, as is a trailing title
/// with no duration line; both are expected artifacts of the loose input
/// format, not errors.
pub fn parse_transcript(text: &str) -> ParsedTranscript {
    let mut sections: Vec<Section> = Vec::new();
    let mut pending_title: Option<&str> = None;

    for line in text.lines() {
        match classify(line) {
            LineClass::Skip => {}
            LineClass::Title(title) => {
                pending_title = Some(title);
            }
            LineClass::Duration(token) => {
                let Some(title) = pending_title.take() else {
                    continue;
                };
                let order = sections.len() as u32;
                sections.push(Section {
                    id: Uuid::new_v4(),
                    title: title.to_string(),
                    duration: time_to_minutes(token),
                    completed: false,
                    order,
                });
            }
        }
    }

    if let Some(title) = pending_title {
        tracing::debug!(title, "listing ended with a title that has no duration line");
    }

    let total_duration = sections.iter().map(|s| s.duration).sum();
    let total_count = sections.len() as u32;
    ParsedTranscript {
        sections,
        total_duration,
        total_count,
    }
}

/// Converts a `MM:SS` / `HH:MM:SS` token to whole minutes, rounding seconds
/// up, and adds the review overhead. Malformed numeric components count as
/// zero; a token with an unexpected shape contributes the overhead alone.
fn time_to_minutes(token: &str) -> u32 {
    let parts: Vec<u32> = token
        .split(':')
        .map(|part| part.parse().unwrap_or(0))
        .collect();
    let raw = match parts.as_slice() {
        [minutes, seconds] => minutes + seconds.div_ceil(60),
        [hours, minutes, seconds] => hours * 60 + minutes + seconds.div_ceil(60),
        _ => 0,
    };
    raw + REVIEW_OVERHEAD_MINUTES
}
