//! Operation Policy
//!
//! Maps each cached operation to its TTL class.

use std::fmt;
use std::str::FromStr;

// == TTL Class ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlClass {
    /// Listings that change as contributors add sentences
    ShortList,
    /// Analysis results of medium confidence
    NlpResult,
    /// Translations, expensive to recompute
    Translation,
}

impl TtlClass {
    pub const fn seconds(self) -> u64 {
        match self {
            TtlClass::ShortList => 600,
            TtlClass::NlpResult => 1800,
            TtlClass::Translation => 3600,
        }
    }
}

// == Operation ==
/// Cached read operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    NerSentences,
    NerAnalysis,
    PosTagging,
    SentimentAnalysis,
    EmotionDetection,
    Translation,
}

impl Operation {
    /// Name used as the cache key prefix.
    pub const fn name(self) -> &'static str {
        match self {
            Operation::NerSentences => "ner_sentences",
            Operation::NerAnalysis => "ner_analysis",
            Operation::PosTagging => "pos_tagging",
            Operation::SentimentAnalysis => "sentiment_analysis",
            Operation::EmotionDetection => "emotion_detection",
            Operation::Translation => "translation",
        }
    }

    pub const fn ttl_class(self) -> TtlClass {
        match self {
            Operation::NerSentences => TtlClass::ShortList,
            Operation::Translation => TtlClass::Translation,
            Operation::NerAnalysis
            | Operation::PosTagging
            | Operation::SentimentAnalysis
            | Operation::EmotionDetection => TtlClass::NlpResult,
        }
    }

    pub const fn ttl_seconds(self) -> u64 {
        self.ttl_class().seconds()
    }

    /// Whether the operation's parameters carry contributor free text.
    pub const fn touches_pii(self) -> bool {
        !matches!(self, Operation::NerSentences)
    }

    /// Table a validated result is read from.
    pub const fn table(self) -> &'static str {
        match self {
            Operation::NerSentences => "sentences",
            Operation::NerAnalysis => "ner_annotations",
            Operation::PosTagging => "pos_annotations",
            Operation::SentimentAnalysis => "sentiment_annotations",
            Operation::EmotionDetection => "emotion_annotations",
            Operation::Translation => "translations",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Operation::NerSentences,
            Operation::NerAnalysis,
            Operation::PosTagging,
            Operation::SentimentAnalysis,
            Operation::EmotionDetection,
            Operation::Translation,
        ]
        .into_iter()
        .find(|op| op.name() == s)
        .ok_or_else(|| format!("unknown operation: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_classes() {
        assert_eq!(Operation::NerSentences.ttl_seconds(), 600);
        assert_eq!(Operation::NerAnalysis.ttl_seconds(), 1800);
        assert_eq!(Operation::SentimentAnalysis.ttl_seconds(), 1800);
        assert_eq!(Operation::Translation.ttl_seconds(), 3600);
    }

    #[test]
    fn test_operation_name_roundtrip() {
        let op: Operation = "emotion_detection".parse().unwrap();
        assert_eq!(op, Operation::EmotionDetection);
        assert!("weather".parse::<Operation>().is_err());
    }

    #[test]
    fn test_listing_is_not_sensitive() {
        assert!(!Operation::NerSentences.touches_pii());
        assert!(Operation::Translation.touches_pii());
    }
}
