use std::fmt;

use tracing::{debug, warn};

use crate::segment::{SegmenterProvider, UnicodeSegmenters};

/// Word and user-perceived character counts for one snapshot of a text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TextStatistics {
    pub words: usize,
    pub graphemes: usize,
}

impl TextStatistics {
    /// Counts with the default segmenters.
    pub fn compute(text: &str) -> Self {
        Self::compute_with(&UnicodeSegmenters, text)
    }

    /// Counts words and grapheme clusters in one pass each.
    ///
    /// A segmenter that cannot be built reports zero for its own metric;
    /// the other metric is still computed.
    pub fn compute_with(provider: &dyn SegmenterProvider, text: &str) -> Self {
        let words = match provider.word_segmenter() {
            Ok(segmenter) => segmenter
                .segments(text)
                .filter(|segment| segment.status.is_word())
                .count(),
            Err(err) => {
                warn!("word count unavailable: {err}");
                0
            }
        };

        let graphemes = match provider.grapheme_segmenter() {
            Ok(segmenter) => segmenter.segments(text).count(),
            Err(err) => {
                warn!("character count unavailable: {err}");
                0
            }
        };

        debug!(words, graphemes, bytes = text.len(), "statistics recomputed");
        Self { words, graphemes }
    }
}

impl fmt::Display for TextStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Words: {} | Characters: {}", self.words, self.graphemes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{GraphemeBoundaries, Segmenter, SegmenterError, WordBoundaries};

    /// Provider whose segmenters can be switched off one at a time.
    struct Partial {
        words: bool,
        graphemes: bool,
    }

    impl SegmenterProvider for Partial {
        fn word_segmenter(&self) -> Result<Box<dyn Segmenter>, SegmenterError> {
            if self.words {
                Ok(Box::new(WordBoundaries::new()))
            } else {
                Err(SegmenterError::Unavailable {
                    kind: "word",
                    reason: "no break rules".into(),
                })
            }
        }

        fn grapheme_segmenter(&self) -> Result<Box<dyn Segmenter>, SegmenterError> {
            if self.graphemes {
                Ok(Box::new(GraphemeBoundaries))
            } else {
                Err(SegmenterError::Unavailable {
                    kind: "grapheme",
                    reason: "no break rules".into(),
                })
            }
        }
    }

    #[test]
    fn counts_words_and_characters() {
        let stats = TextStatistics::compute("Hello, world!");
        assert_eq!(stats, TextStatistics { words: 2, graphemes: 13 });
    }

    #[test]
    fn punctuation_and_whitespace_are_not_words() {
        let stats = TextStatistics::compute("   ... !!\n\t--");
        assert_eq!(stats.words, 0);
        assert_eq!(stats.graphemes, 13);
    }

    #[test]
    fn numbers_count_as_words() {
        assert_eq!(TextStatistics::compute("pi is 3.14").words, 3);
    }

    #[test]
    fn missing_word_segmenter_only_zeroes_words() {
        let provider = Partial { words: false, graphemes: true };
        let stats = TextStatistics::compute_with(&provider, "two words");
        assert_eq!(stats, TextStatistics { words: 0, graphemes: 9 });
    }

    #[test]
    fn missing_grapheme_segmenter_only_zeroes_characters() {
        let provider = Partial { words: true, graphemes: false };
        let stats = TextStatistics::compute_with(&provider, "two words");
        assert_eq!(stats, TextStatistics { words: 2, graphemes: 0 });
    }

    #[test]
    fn status_line_format() {
        let stats = TextStatistics { words: 4, graphemes: 21 };
        assert_eq!(stats.to_string(), "Words: 4 | Characters: 21");
        assert_eq!(TextStatistics::default().to_string(), "Words: 0 | Characters: 0");
    }
}
