//! Syntax colouring for the editor widget, delegated to `syntect`, plus
//! brace matching at the caret.

use std::path::Path;

use egui::text::{LayoutJob, LayoutSection, TextFormat};
use egui::{Color32, FontId};
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use tracing::debug;

/// Syntax used for untitled documents.
pub const DEFAULT_SYNTAX: &str = "C++";

const THEME: &str = "InspiredGitHub";
const MATCHED_BRACE: Color32 = Color32::from_rgb(180, 230, 180);
const UNMATCHED_BRACE: Color32 = Color32::from_rgb(255, 180, 180);

/// A brace next to the caret and, if it is balanced, its partner. Both are
/// byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BraceMatch {
    pub brace: usize,
    pub partner: Option<usize>,
}

/// Finds the brace just before the caret, or else just after it, and scans
/// for its partner. `caret` is a char index.
pub fn match_brace(text: &str, caret: usize) -> Option<BraceMatch> {
    let caret = text.char_indices().nth(caret).map_or(text.len(), |(i, _)| i);

    let before = text[..caret]
        .char_indices()
        .next_back()
        .filter(|(_, c)| is_brace(*c));
    let after = text[caret..]
        .chars()
        .next()
        .filter(|c| is_brace(*c))
        .map(|c| (caret, c));

    let (brace, c) = before.or(after)?;
    Some(BraceMatch {
        brace,
        partner: find_partner(text, brace, c),
    })
}

fn is_brace(c: char) -> bool {
    matches!(c, '(' | ')' | '[' | ']' | '{' | '}')
}

fn find_partner(text: &str, at: usize, brace: char) -> Option<usize> {
    let (open, close) = match brace {
        '(' | ')' => ('(', ')'),
        '[' | ']' => ('[', ']'),
        _ => ('{', '}'),
    };

    let mut depth = 0usize;
    if brace == open {
        for (i, c) in text[at..].char_indices() {
            if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth == 0 {
                    return Some(at + i);
                }
            }
        }
    } else {
        for (i, c) in text[..=at].char_indices().rev() {
            if c == close {
                depth += 1;
            } else if c == open {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
        }
    }
    None
}

#[derive(Debug, Clone, PartialEq)]
struct CacheKey {
    text: String,
    syntax: String,
    caret: Option<usize>,
    font_size: f32,
}

/// Turns editor text into a coloured [`LayoutJob`]. The last job is cached
/// since egui asks for a layout every frame.
pub struct Highlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
    cache: Option<(CacheKey, LayoutJob)>,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    pub fn new() -> Self {
        let theme = ThemeSet::load_defaults()
            .themes
            .remove(THEME)
            .unwrap_or_default();
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme,
            cache: None,
        }
    }

    /// Syntax name for a document: by file extension, C++ when untitled,
    /// plain text when the extension is unknown.
    pub fn syntax_for(&self, path: Option<&Path>) -> String {
        let Some(path) = path else {
            return DEFAULT_SYNTAX.to_owned();
        };
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.syntaxes.find_syntax_by_extension(ext))
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text())
            .name
            .clone()
    }

    pub fn layout(
        &mut self,
        text: &str,
        syntax: &str,
        caret: Option<usize>,
        font_size: f32,
    ) -> LayoutJob {
        if let Some((key, job)) = &self.cache {
            if key.caret == caret
                && key.font_size == font_size
                && key.syntax == syntax
                && key.text == text
            {
                return job.clone();
            }
        }

        let font_id = FontId::monospace(font_size);
        let mut job = self.colour(text, syntax, &font_id);
        if let Some(found) = caret.and_then(|caret| match_brace(text, caret)) {
            match found.partner {
                Some(partner) => {
                    mark_byte(&mut job, found.brace, MATCHED_BRACE);
                    mark_byte(&mut job, partner, MATCHED_BRACE);
                }
                None => mark_byte(&mut job, found.brace, UNMATCHED_BRACE),
            }
        }

        let key = CacheKey {
            text: text.to_owned(),
            syntax: syntax.to_owned(),
            caret,
            font_size,
        };
        self.cache = Some((key, job.clone()));
        job
    }

    fn colour(&self, text: &str, syntax: &str, font_id: &FontId) -> LayoutJob {
        let syntax = self
            .syntaxes
            .find_syntax_by_name(syntax)
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());
        let mut lines = HighlightLines::new(syntax, &self.theme);
        let plain = TextFormat {
            font_id: font_id.clone(),
            color: Color32::BLACK,
            ..Default::default()
        };

        let mut job = LayoutJob::default();
        let mut done = 0;
        for line in LinesWithEndings::from(text) {
            let ranges = match lines.highlight_line(line, &self.syntaxes) {
                Ok(ranges) => ranges,
                Err(err) => {
                    debug!("highlighting stopped: {err}");
                    break;
                }
            };
            for (style, piece) in ranges {
                let format = TextFormat {
                    color: Color32::from_rgb(
                        style.foreground.r,
                        style.foreground.g,
                        style.foreground.b,
                    ),
                    italics: style.font_style.contains(FontStyle::ITALIC),
                    ..plain.clone()
                };
                job.append(piece, 0.0, format);
            }
            done += line.len();
        }

        if done < text.len() {
            job.append(&text[done..], 0.0, plain);
        }
        job
    }
}

/// Gives the one-byte section at `byte` a background colour, splitting the
/// section that holds it.
fn mark_byte(job: &mut LayoutJob, byte: usize, background: Color32) {
    let Some(index) = job
        .sections
        .iter()
        .position(|section| section.byte_range.contains(&byte))
    else {
        return;
    };

    let section = job.sections.remove(index);
    let range = section.byte_range.clone();
    let mut parts = Vec::with_capacity(3);

    if range.start < byte {
        parts.push(LayoutSection {
            byte_range: range.start..byte,
            ..section.clone()
        });
    }
    parts.push(LayoutSection {
        leading_space: if range.start < byte { 0.0 } else { section.leading_space },
        byte_range: byte..byte + 1,
        format: TextFormat {
            background,
            ..section.format.clone()
        },
    });
    if byte + 1 < range.end {
        parts.push(LayoutSection {
            leading_space: 0.0,
            byte_range: byte + 1..range.end,
            format: section.format,
        });
    }

    job.sections.splice(index..index, parts);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(brace: usize, partner: Option<usize>) -> Option<BraceMatch> {
        Some(BraceMatch { brace, partner })
    }

    #[test]
    fn brace_before_caret_wins() {
        // Caret between `(` and `(`: the one before is used.
        assert_eq!(match_brace("f((a))", 2), found(1, Some(5)));
    }

    #[test]
    fn brace_after_caret_is_used_when_none_before() {
        assert_eq!(match_brace("(x)", 0), found(0, Some(2)));
        assert_eq!(match_brace("a {b}", 2), found(2, Some(4)));
    }

    #[test]
    fn closing_brace_scans_backwards() {
        assert_eq!(match_brace("{[]}", 4), found(3, Some(0)));
        assert_eq!(match_brace("{[]}", 3), found(2, Some(1)));
    }

    #[test]
    fn nesting_and_other_kinds_are_respected() {
        let text = "f(a, [b], (c))";
        assert_eq!(match_brace(text, 2), found(1, Some(13)));
    }

    #[test]
    fn unbalanced_brace_has_no_partner() {
        assert_eq!(match_brace("(()", 1), found(0, None));
        assert_eq!(match_brace("])", 1), found(0, None));
    }

    #[test]
    fn no_brace_near_caret() {
        assert_eq!(match_brace("abc", 1), None);
        assert_eq!(match_brace("", 0), None);
    }

    #[test]
    fn offsets_are_bytes_for_multibyte_text() {
        assert_eq!(match_brace("é(x)", 1), found(2, Some(4)));
    }

    fn sections_tile(job: &LayoutJob) -> bool {
        let mut next = 0;
        for section in &job.sections {
            if section.byte_range.start != next {
                return false;
            }
            next = section.byte_range.end;
        }
        next == job.text.len()
    }

    #[test]
    fn cpp_keywords_are_coloured() {
        let mut highlighter = Highlighter::new();
        let text = "int main() {\n    return 0; // done\n}\n";
        let job = highlighter.layout(text, DEFAULT_SYNTAX, None, 14.0);

        assert_eq!(job.text, text);
        assert!(sections_tile(&job));
        let first = job.sections[0].format.color;
        assert!(job.sections.iter().any(|s| s.format.color != first));
    }

    #[test]
    fn matched_braces_get_a_background() {
        let mut highlighter = Highlighter::new();
        let text = "f(x)";
        let job = highlighter.layout(text, "Plain Text", Some(2), 14.0);

        assert!(sections_tile(&job));
        let marked: Vec<_> = job
            .sections
            .iter()
            .filter(|s| s.format.background == MATCHED_BRACE)
            .map(|s| s.byte_range.clone())
            .collect();
        assert_eq!(marked, vec![1..2, 3..4]);
    }

    #[test]
    fn unmatched_brace_is_flagged() {
        let mut highlighter = Highlighter::new();
        let job = highlighter.layout("(x", "Plain Text", Some(0), 14.0);
        assert_eq!(job.sections[0].byte_range, 0..1);
        assert_eq!(job.sections[0].format.background, UNMATCHED_BRACE);
    }

    #[test]
    fn syntax_follows_the_file_extension() {
        let highlighter = Highlighter::new();
        assert_eq!(highlighter.syntax_for(None), DEFAULT_SYNTAX);
        assert_eq!(highlighter.syntax_for(Some(Path::new("main.rs"))), "Rust");
        assert_eq!(highlighter.syntax_for(Some(Path::new("notes.txt"))), "Plain Text");
        assert_eq!(highlighter.syntax_for(Some(Path::new("data.zzz"))), "Plain Text");
    }
}
