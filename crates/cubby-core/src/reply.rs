//! Reply shaping: symbol stripping and sentence-boundary truncation.
//!
//! Model replies are capped at a small number of sentences -- a hard
//! engagement constraint for young listeners -- and stripped of emoji
//! and decorative symbols that trip up speech synthesis.

use std::sync::LazyLock;

use regex::Regex;

/// Hard cap on sentences per spoken reply.
pub const MAX_REPLY_SENTENCES: usize = 3;

/// Anything outside word characters, whitespace, and plain punctuation.
static SYMBOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^\w\s.,!?;:()\-'"]"#).unwrap());

/// Remove emoji and decorative symbols so the synthesizer never tries
/// to pronounce them.
pub fn strip_symbols(text: &str) -> String {
    SYMBOL_RE.replace_all(text, "").into_owned()
}

/// Truncate `text` to at most `max` sentences.
///
/// Cuts only at sentence boundaries (runs of `.`/`!`/`?` followed by
/// whitespace, or a line break), never mid-word. Text with fewer
/// boundaries than `max` passes through whole, so a reply that is one
/// long clause is never left dangling.
pub fn truncate_sentences(text: &str, max: usize) -> String {
    let text = text.trim();
    if max == 0 || text.is_empty() {
        return String::new();
    }

    let mut count = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        let boundary_end = if matches!(ch, '.' | '!' | '?') {
            // Swallow the whole punctuation run ("?!", "...").
            let mut end = idx + ch.len_utf8();
            while let Some(&(next_idx, next_ch)) = chars.peek() {
                if matches!(next_ch, '.' | '!' | '?') {
                    end = next_idx + next_ch.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            // Only a boundary when followed by whitespace or the end.
            match chars.peek() {
                None => Some(end),
                Some(&(_, next_ch)) if next_ch.is_whitespace() => Some(end),
                Some(_) => None,
            }
        } else if ch == '\n' {
            Some(idx)
        } else {
            None
        };

        if let Some(end) = boundary_end {
            count += 1;
            if count == max {
                return text[..end].trim().to_string();
            }
        }
    }

    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_reply_unchanged() {
        assert_eq!(
            truncate_sentences("Hi there! Want a story?", 3),
            "Hi there! Want a story?"
        );
    }

    #[test]
    fn test_caps_at_three_sentences() {
        let long = "One. Two! Three? Four. Five.";
        assert_eq!(truncate_sentences(long, 3), "One. Two! Three?");
    }

    #[test]
    fn test_never_cuts_mid_word() {
        let text = "Dinosaurs are huge. Some ate plants. Some ate meat. T-rex was king.";
        let out = truncate_sentences(text, 3);
        assert_eq!(out, "Dinosaurs are huge. Some ate plants. Some ate meat.");
        assert!(out.ends_with('.'));
    }

    #[test]
    fn test_punctuation_runs_kept_whole() {
        assert_eq!(
            truncate_sentences("Wow!!! That is so cool... Right? And more. Extra.", 3),
            "Wow!!! That is so cool... Right?"
        );
    }

    #[test]
    fn test_decimal_point_is_not_a_boundary() {
        let text = "A cheetah runs 75.5 miles an hour. That is fast. Very fast. Zoom.";
        assert_eq!(
            truncate_sentences(text, 3),
            "A cheetah runs 75.5 miles an hour. That is fast. Very fast."
        );
    }

    #[test]
    fn test_newline_is_a_boundary() {
        let text = "First line\nSecond line\nThird line\nFourth line";
        assert_eq!(
            truncate_sentences(text, 3),
            "First line\nSecond line\nThird line"
        );
    }

    #[test]
    fn test_no_boundary_passes_through() {
        let clause = "a single long clause with no terminator at all";
        assert_eq!(truncate_sentences(clause, 3), clause.to_string());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(truncate_sentences("", 3), "");
        assert_eq!(truncate_sentences("   ", 3), "");
    }

    #[test]
    fn test_strip_symbols_removes_emoji() {
        assert_eq!(strip_symbols("Yay \u{1F389} let's go! \u{2728}"), "Yay  let's go! ");
    }

    #[test]
    fn test_strip_symbols_keeps_plain_punctuation() {
        let text = "Hi! How are you? (It's me, Sparkle.)";
        assert_eq!(strip_symbols(text), text);
    }
}
