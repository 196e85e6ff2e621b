//! Unicode boundary analysis behind a small capability interface.
//!
//! A [`Segmenter`] partitions text into consecutive [`Segment`]s and tags
//! each one with a [`RuleStatus`]. The statistics code only ever talks to
//! these traits, so another implementation can replace
//! [`UnicodeSegmenters`] without touching the counting logic.

use icu_segmenter::{WordSegmenter, WordType};
use unicode_segmentation::UnicodeSegmentation;

/// How the segmenter classified a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleStatus {
    /// No word characters: whitespace, punctuation, symbols, line breaks.
    /// Grapheme segments always carry this status.
    None,
    /// Word content made of digits (`42`, `3.14`).
    Number,
    /// Any other word content, including kana and ideographs.
    Letter,
}

impl RuleStatus {
    pub fn is_word(self) -> bool {
        self != RuleStatus::None
    }
}

impl From<WordType> for RuleStatus {
    fn from(word_type: WordType) -> Self {
        match word_type {
            WordType::Letter => RuleStatus::Letter,
            WordType::Number => RuleStatus::Number,
            _ => RuleStatus::None,
        }
    }
}

/// A boundary-to-boundary span, as byte offsets into the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
    pub status: RuleStatus,
}

/// Walks a text from left to right, yielding the segments between
/// consecutive boundaries. Every call starts a fresh scan.
pub trait Segmenter {
    fn segments<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = Segment> + 'a>;
}

#[derive(Debug, thiserror::Error)]
pub enum SegmenterError {
    #[error("{kind} segmenter unavailable: {reason}")]
    Unavailable { kind: &'static str, reason: String },
}

/// Builds segmenters on demand. Word and grapheme segmenters are constructed
/// independently so one failing does not take the other down.
pub trait SegmenterProvider {
    fn word_segmenter(&self) -> Result<Box<dyn Segmenter>, SegmenterError>;
    fn grapheme_segmenter(&self) -> Result<Box<dyn Segmenter>, SegmenterError>;
}

/// ICU4X word breaks and `unicode-segmentation` grapheme clusters.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeSegmenters;

impl SegmenterProvider for UnicodeSegmenters {
    fn word_segmenter(&self) -> Result<Box<dyn Segmenter>, SegmenterError> {
        Ok(Box::new(WordBoundaries::new()))
    }

    fn grapheme_segmenter(&self) -> Result<Box<dyn Segmenter>, SegmenterError> {
        Ok(Box::new(GraphemeBoundaries))
    }
}

/// Word boundaries with the rule status ICU4X reports for each segment.
///
/// Uses dictionary segmentation for Chinese and Japanese and LSTM models for
/// Southeast Asian scripts, UAX #29 rules everywhere else.
pub struct WordBoundaries {
    segmenter: WordSegmenter,
}

impl WordBoundaries {
    pub fn new() -> Self {
        Self {
            segmenter: WordSegmenter::new_auto(),
        }
    }
}

impl Default for WordBoundaries {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter for WordBoundaries {
    fn segments<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = Segment> + 'a> {
        let mut boundaries = self.segmenter.segment_str(text);
        let mut start = 0;
        Box::new(std::iter::from_fn(move || {
            loop {
                let end = boundaries.next()?;
                // The first boundary is the start of the text.
                if end <= start {
                    continue;
                }
                let segment = Segment {
                    start,
                    end,
                    status: boundaries.word_type().into(),
                };
                start = end;
                return Some(segment);
            }
        }))
    }
}

/// Extended grapheme clusters (UAX #29 §3).
#[derive(Debug, Default, Clone, Copy)]
pub struct GraphemeBoundaries;

impl Segmenter for GraphemeBoundaries {
    fn segments<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = Segment> + 'a> {
        Box::new(text.grapheme_indices(true).map(|(start, cluster)| Segment {
            start,
            end: start + cluster.len(),
            status: RuleStatus::None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses(segmenter: &dyn Segmenter, text: &str) -> Vec<(String, RuleStatus)> {
        segmenter
            .segments(text)
            .map(|s| (text[s.start..s.end].to_owned(), s.status))
            .collect()
    }

    #[test]
    fn word_segments_are_classified() {
        let got = statuses(&WordBoundaries::new(), "Hello, 3.14 world!");
        assert_eq!(
            got,
            vec![
                ("Hello".to_owned(), RuleStatus::Letter),
                (",".to_owned(), RuleStatus::None),
                (" ".to_owned(), RuleStatus::None),
                ("3.14".to_owned(), RuleStatus::Number),
                (" ".to_owned(), RuleStatus::None),
                ("world".to_owned(), RuleStatus::Letter),
                ("!".to_owned(), RuleStatus::None),
            ]
        );
    }

    #[test]
    fn ideograph_runs_split_by_dictionary() {
        let got = statuses(&WordBoundaries::new(), "你好世界");
        assert_eq!(
            got,
            vec![
                ("你好".to_owned(), RuleStatus::Letter),
                ("世界".to_owned(), RuleStatus::Letter),
            ]
        );
    }

    #[test]
    fn punctuation_runs_have_no_word_status() {
        let words = WordBoundaries::new();
        assert!(words.segments("... !! \n").all(|s| !s.status.is_word()));
        assert!(words.segments("abc123").all(|s| s.status == RuleStatus::Letter));
    }

    #[test]
    fn segments_tile_the_text() {
        let text = "naïve café — e\u{301}t\u{e9} 👩\u{200d}💻!";
        let words = WordBoundaries::new();
        for segmenter in [&words as &dyn Segmenter, &GraphemeBoundaries] {
            let mut expected_start = 0;
            for seg in segmenter.segments(text) {
                assert_eq!(seg.start, expected_start);
                assert!(seg.end > seg.start);
                expected_start = seg.end;
            }
            assert_eq!(expected_start, text.len());
        }
    }

    #[test]
    fn grapheme_segments_merge_clusters() {
        let got = statuses(&GraphemeBoundaries, "e\u{301}\r\n");
        assert_eq!(
            got,
            vec![
                ("e\u{301}".to_owned(), RuleStatus::None),
                ("\r\n".to_owned(), RuleStatus::None),
            ]
        );
    }

    #[test]
    fn empty_text_has_no_segments() {
        assert_eq!(WordBoundaries::new().segments("").count(), 0);
        assert_eq!(GraphemeBoundaries.segments("").count(), 0);
    }

    #[test]
    fn default_provider_builds_both_segmenters() {
        let provider = UnicodeSegmenters;
        assert!(provider.word_segmenter().is_ok());
        assert!(provider.grapheme_segmenter().is_ok());
    }
}
