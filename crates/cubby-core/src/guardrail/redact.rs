//! Stateless PII redaction over free-text input.
//!
//! Runs before any data crosses the boundary to the language-model
//! collaborator, never after, so raw PII is never transmitted
//! externally. Each category is replaced by a fixed placeholder token;
//! placeholders contain no digits, which makes redaction idempotent.
//!
//! Overlapping matches are resolved leftmost-longest, with a fixed
//! category priority (SSN > phone > ZIP) breaking ties on identical
//! spans -- a structured SSN wins over a coincidental digit run.

use std::sync::LazyLock;

use regex::Regex;

/// PII categories in priority order (lower index wins on equal spans).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Category {
    Ssn,
    Phone,
    Email,
    Zip,
}

impl Category {
    fn placeholder(self) -> &'static str {
        match self {
            Category::Ssn => "[ssn]",
            Category::Phone => "[phone]",
            Category::Email => "[email]",
            Category::Zip => "[zip]",
        }
    }
}

/// 3-2-4 digit groups, separated uniformly by hyphens or spaces, or
/// a bare 9-digit run. Mixed separators are not an SSN -- "12345-6789"
/// must stay eligible for ZIP+4.
static SSN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\d{3}-\d{2}-\d{4}|\d{3} \d{2} \d{4}|\d{9})\b").unwrap()
});

/// Candidate phone runs: digits with optional separators and country
/// code. The digit count (7-15) and group shape are verified in code;
/// a regex alone cannot count digits across separators.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\(?\d[\d\-\s().]{4,18}\d").unwrap());

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

/// US ZIP: 5 digits or 5+4.
static ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{5}(?:-\d{4})?\b").unwrap());

#[derive(Debug)]
struct Span {
    start: usize,
    end: usize,
    category: Category,
}

/// Whether a phone candidate is plausibly a phone number.
///
/// Rejects runs outside 7-15 digits and the 5+4 shape, which is a
/// ZIP+4 and must fall through to the ZIP category.
fn is_plausible_phone(candidate: &str) -> bool {
    let digits = candidate.chars().filter(|c| c.is_ascii_digit()).count();
    if !(7..=15).contains(&digits) {
        return false;
    }
    let groups: Vec<usize> = candidate
        .split(|c: char| !c.is_ascii_digit())
        .filter(|g| !g.is_empty())
        .map(str::len)
        .collect();
    groups != [5, 4]
}

/// Replace SSNs, phone numbers, email addresses, and ZIP codes with
/// per-category placeholder tokens.
///
/// Total on any input: empty and non-matching text pass through
/// unchanged, and redacting already-redacted text is a no-op.
pub fn redact(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut spans: Vec<Span> = Vec::new();
    for m in SSN_RE.find_iter(text) {
        spans.push(Span {
            start: m.start(),
            end: m.end(),
            category: Category::Ssn,
        });
    }
    for m in PHONE_RE.find_iter(text) {
        if is_plausible_phone(m.as_str()) {
            spans.push(Span {
                start: m.start(),
                end: m.end(),
                category: Category::Phone,
            });
        }
    }
    for m in EMAIL_RE.find_iter(text) {
        spans.push(Span {
            start: m.start(),
            end: m.end(),
            category: Category::Email,
        });
    }
    for m in ZIP_RE.find_iter(text) {
        spans.push(Span {
            start: m.start(),
            end: m.end(),
            category: Category::Zip,
        });
    }

    if spans.is_empty() {
        return text.to_string();
    }

    // Leftmost first, then longest, then category priority.
    spans.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(b.end.cmp(&a.end))
            .then(a.category.cmp(&b.category))
    });

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in spans {
        if span.start < cursor {
            continue; // swallowed by an earlier, longer match
        }
        out.push_str(&text[cursor..span.start]);
        out.push_str(span.category.placeholder());
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssn_hyphenated() {
        assert_eq!(redact("my ssn is 123-45-6789 ok"), "my ssn is [ssn] ok");
    }

    #[test]
    fn test_ssn_spaces_and_bare() {
        assert_eq!(redact("123 45 6789"), "[ssn]");
        assert_eq!(redact("123456789"), "[ssn]");
    }

    #[test]
    fn test_phone_variants() {
        assert_eq!(
            redact("My number is 555-123-4567"),
            "My number is [phone]"
        );
        assert_eq!(redact("(555) 123-4567"), "[phone]");
        assert_eq!(redact("call +1 555 123 4567 now"), "call [phone] now");
        assert_eq!(redact("5551234"), "[phone]");
    }

    #[test]
    fn test_email() {
        assert_eq!(
            redact("write to kid@example.com please"),
            "write to [email] please"
        );
    }

    #[test]
    fn test_zip_plain_and_plus4() {
        assert_eq!(redact("we live at 90210"), "we live at [zip]");
        assert_eq!(redact("zip 12345-6789 here"), "zip [zip] here");
    }

    #[test]
    fn test_no_pii_unchanged() {
        let text = "I love dinosaurs and my cat Max!";
        assert_eq!(redact(text), text);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(redact(""), "");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "ssn 123-45-6789 phone 555-123-4567 mail a@b.co zip 90210",
            "already [ssn] and [phone] here",
            "nothing to do",
        ];
        for input in inputs {
            let once = redact(input);
            let twice = redact(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_no_original_digits_survive() {
        let out = redact("ssn 123-45-6789, phone 555-123-4567, zip 90210");
        assert!(!out.contains("123"));
        assert!(!out.contains("4567"));
        assert!(!out.contains("90210"));
    }

    #[test]
    fn test_ssn_wins_over_phone_on_same_span() {
        // 9 digits in 3-2-4 grouping matches both patterns; SSN has priority.
        assert_eq!(redact("123-45-6789"), "[ssn]");
    }

    #[test]
    fn test_zip_plus4_not_eaten_by_phone() {
        // 9 digits in 5-4 grouping is a ZIP+4, not a phone number.
        assert_eq!(redact("12345-6789"), "[zip]");
    }

    #[test]
    fn test_multiple_categories_in_one_text() {
        let out = redact("I'm at 90210, call 555-123-4567 or mail me@kids.org");
        assert_eq!(out, "I'm at [zip], call [phone] or mail [email]");
    }

    #[test]
    fn test_short_digit_runs_untouched() {
        assert_eq!(redact("I am 7 and have 123 toys"), "I am 7 and have 123 toys");
    }
}
