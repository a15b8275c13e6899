//! Sensitive Content Detection
//!
//! Heuristic scan of free text for age and birth disclosures, plus a scrubber
//! that masks inline emails and phone numbers before text reaches a log.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::mask::{mask_str, FieldKind};

/// Characters of the source text kept in a detection snippet.
pub const SNIPPET_CHARS: usize = 20;

// == Patterns ==
static AGE_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:i\s*am|i'm|im)\s+\d{1,3}\s*(?:years?|yrs?)\b|\b\d{1,3}\s*(?:years?|yrs?)[\s-]*old\b|\bage[d]?\s*[:=]?\s*\d{1,3}\b",
    )
    .expect("age phrase pattern is valid")
});

static AGE_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    // Hindi and Marathi words for age, standing alone. `\b` does not treat
    // vowel signs as word characters, so the edges are spelled out.
    Regex::new(r"(?:^|[^\p{Devanagari}])(?:उम्र|आयु|वय)(?:$|[^\p{Devanagari}])")
        .expect("age keyword pattern is valid")
});

static BIRTH_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bborn\s+(?:in|on)\b|\bdate\s+of\s+birth\b|\bd\.?o\.?b\b|\bbirthday\b|जन्म")
        .expect("birth phrase pattern is valid")
});

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("email pattern is valid")
});

static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\d[\d\s-]{6,}\d").expect("phone pattern is valid"));

// == Sensitive Category ==
/// Category tag attached to a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SensitiveCategory {
    AgeDisclosure,
    BirthDate,
}

impl SensitiveCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensitiveCategory::AgeDisclosure => "ageDisclosure",
            SensitiveCategory::BirthDate => "birthDate",
        }
    }
}

// == Sensitive Match ==
/// Result of a positive scan. Never holds the full text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensitiveMatch {
    pub category: SensitiveCategory,
    pub snippet: String,
}

/// Scans free text for age or birth disclosures.
///
/// Birth phrases take precedence over age phrases when both match.
pub fn detect_sensitive(text: &str) -> Option<SensitiveMatch> {
    let category = if BIRTH_PHRASE.is_match(text) {
        SensitiveCategory::BirthDate
    } else if AGE_PHRASE.is_match(text) || AGE_KEYWORD.is_match(text) {
        SensitiveCategory::AgeDisclosure
    } else {
        return None;
    };

    Some(SensitiveMatch {
        category,
        snippet: snippet(text),
    })
}

/// First `SNIPPET_CHARS` characters of `text`, with `...` when truncated.
pub fn snippet(text: &str) -> String {
    let mut out: String = text.chars().take(SNIPPET_CHARS).collect();
    if text.chars().nth(SNIPPET_CHARS).is_some() {
        out.push_str("...");
    }
    out
}

/// Masks emails and phone-like digit runs embedded in free text.
pub fn scrub(text: &str) -> String {
    let text = EMAIL.replace_all(text, |caps: &regex::Captures<'_>| {
        mask_str(&caps[0], FieldKind::Email)
    });
    PHONE
        .replace_all(&text, |caps: &regex::Captures<'_>| mask_str(&caps[0], FieldKind::Phone))
        .into_owned()
}
