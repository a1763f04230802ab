//! Post-processing for generated email text

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// `**span**` on a single line, non-greedy so `**a** and **b**` is two matches.
/// CR and the Unicode line/paragraph separators also end a line.
static BOLD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*([^\r\n\x{2028}\x{2029}]*?)\*\*").expect("bold pattern is a valid regex")
});

/// Strip bold markdown (`**text**`) from generated text, keeping the enclosed text.
///
/// Other markdown (headers, single-asterisk italics, lists) is left untouched.
/// Replacement is repeated until nothing matches, so runs of asterisks that
/// only form a new pair after an inner pair is removed are also cleaned up.
pub fn strip_bold(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = match BOLD.replace_all(&current, "$1") {
            Cow::Borrowed(_) => return current,
            Cow::Owned(next) => next,
        };
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strips_bold_spans() {
        assert_eq!(
            strip_bold("Hello **world**, this is **bold**."),
            "Hello world, this is bold."
        );
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(strip_bold("plain text"), "plain text");
        assert_eq!(strip_bold(""), "");
    }

    #[test]
    fn test_empty_span() {
        assert_eq!(strip_bold("a****b"), "ab");
    }

    #[test]
    fn test_adjacent_spans() {
        assert_eq!(strip_bold("**one****two**"), "onetwo");
    }

    #[test]
    fn test_other_markdown_kept() {
        let text = "# Subject\n*note*\n- item";
        assert_eq!(strip_bold(text), text);
    }

    #[test]
    fn test_unbalanced_markers_kept() {
        assert_eq!(strip_bold("price **rises"), "price **rises");
    }

    #[test]
    fn test_does_not_span_lines() {
        assert_eq!(strip_bold("**Dear\nteam**"), "**Dear\nteam**");
        assert_eq!(strip_bold("**Dear** team,\n**Thanks**"), "Dear team,\nThanks");
    }

    #[test]
    fn test_carriage_return_ends_span() {
        assert_eq!(strip_bold("**a\rb**"), "**a\rb**");
        assert_eq!(strip_bold("**a\u{2028}b**"), "**a\u{2028}b**");
        assert_eq!(strip_bold("**Dear** team,\r\n**Thanks**"), "Dear team,\r\nThanks");
    }

    #[test]
    fn test_multibyte_content() {
        assert_eq!(strip_bold("Grüße **für** Sie ✉"), "Grüße für Sie ✉");
    }

    proptest! {
        #[test]
        fn prop_idempotent(text in "[a-c* \r\n]{0,48}") {
            let once = strip_bold(&text);
            prop_assert_eq!(strip_bold(&once), once);
        }

        #[test]
        fn prop_no_stars_is_identity(text in "[^*]{0,64}") {
            prop_assert_eq!(strip_bold(&text), text);
        }
    }
}
