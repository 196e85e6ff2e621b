//! Small editing conveniences layered on top of the plain text widget:
//! soft tabs, auto-indent, and the line-number gutter.

use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentSettings {
    pub tab_width: usize,
    pub use_spaces: bool,
    pub auto_indent: bool,
}

impl Default for IndentSettings {
    fn default() -> Self {
        Self {
            tab_width: 4,
            use_spaces: true,
            auto_indent: true,
        }
    }
}

/// Looks at an edit that turned `old` into `new` with the caret ending at
/// char index `cursor`. When the edit typed a single tab or newline, returns
/// the adjusted text and caret; otherwise `None`.
pub fn fix_up_insertion(
    old: &str,
    new: &str,
    cursor: usize,
    settings: IndentSettings,
) -> Option<(String, usize)> {
    if cursor == 0 || new.len() != old.len() + 1 {
        return None;
    }

    let at = byte_offset(new, cursor - 1)?;
    let inserted = new[at..].chars().next()?;
    if inserted.len_utf8() != 1 {
        return None;
    }
    // The rest of the text must be untouched.
    if old.get(..at) != Some(&new[..at]) || old.get(at..) != Some(&new[at + 1..]) {
        return None;
    }

    let line_start = new[..at].rfind('\n').map_or(0, |i| i + 1);

    let replacement = match inserted {
        '\t' if settings.use_spaces && settings.tab_width > 0 => {
            let column = new[line_start..at].chars().count();
            " ".repeat(settings.tab_width - column % settings.tab_width)
        }
        '\n' if settings.auto_indent => {
            let indent = leading_whitespace(&new[line_start..at]);
            if indent.is_empty() {
                return None;
            }
            format!("\n{indent}")
        }
        _ => return None,
    };

    let caret = cursor - 1 + replacement.chars().count();
    let mut fixed = String::with_capacity(new.len() + replacement.len());
    fixed.push_str(&new[..at]);
    fixed.push_str(&replacement);
    fixed.push_str(&new[at + 1..]);
    Some((fixed, caret))
}

fn leading_whitespace(line: &str) -> &str {
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

fn byte_offset(text: &str, char_index: usize) -> Option<usize> {
    text.char_indices().nth(char_index).map(|(i, _)| i)
}

/// Right-aligned line numbers, one per line of `text`.
pub fn line_number_gutter(text: &str, min_digits: usize) -> String {
    // `lines()` drops a trailing empty line, but the caret can sit there.
    let lines = text.split('\n').count();
    let width = min_digits.max(lines.to_string().len());

    let mut gutter = String::with_capacity(lines * (width + 1));
    for n in 1..=lines {
        if n > 1 {
            gutter.push('\n');
        }
        let _ = write!(gutter, "{n:>width$}");
    }
    gutter
}
