//! Word wrapping for the transcript.
//!
//! The messages pane pre-wraps every line to the pane width and renders the
//! result without ratatui's own wrapping. Knowing the exact number of visual
//! lines is what lets the pane compute its bottom scroll offset.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Wrap `text` to at most `width` display columns per line.
///
/// Explicit newlines are kept, words move to the next line when they do not
/// fit, and words wider than `width` are split. A width of zero disables
/// wrapping.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for raw_line in text.split('\n') {
        let raw_line = raw_line.trim_end_matches('\r');
        if width == 0 {
            out.push(raw_line.to_string());
            continue;
        }
        wrap_line(raw_line, width, &mut out);
    }
    out
}

fn wrap_line(line: &str, width: usize, out: &mut Vec<String>) {
    if line.width() <= width {
        out.push(line.to_string());
        return;
    }

    let mut current = String::new();
    let mut current_width = 0;

    for word in line.split(' ') {
        let word_width = word.width();
        let needed = if current.is_empty() {
            word_width
        } else {
            current_width + 1 + word_width
        };

        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(word);
            current_width += word_width;
            continue;
        }

        if !current.is_empty() {
            out.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if word_width <= width {
            current.push_str(word);
            current_width = word_width;
        } else {
            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if current_width + ch_width > width && !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += ch_width;
            }
        }
    }

    out.push(current);
}
