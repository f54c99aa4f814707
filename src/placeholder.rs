//! Placeholder expansion for text drawn on the chart
//!
//! Two placeholders are recognised:
//!
//! - `{date}` expands to the render date, e.g. `9 March 2024`
//! - `{u<hex>}` expands to the character with that code point, e.g. `{u05D0}` is `א`
//!
//! Code point tokens are closed by the nearest `}`, so several tokens on one
//! line expand independently. A token that is not 1 to 8 hex digits naming a
//! Unicode scalar value is left as written.

use std::borrow::Cow;

use chrono::NaiveDate;
use tracing::warn;

pub const DATE_TOKEN: &str = "{date}";

const CODE_POINT_OPEN: &str = "{u";
const CODE_POINT_CLOSE: char = '}';
const MAX_HEX_DIGITS: usize = 8;

/// Format a date as `<day> <Month> <year>`, without a leading zero on the day
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

/// Expand every placeholder in `text`.
///
/// Text without placeholders is returned borrowed.
pub fn expand(text: &str, today: NaiveDate) -> Cow<'_, str> {
    let mut expanded = Cow::Borrowed(text);
    if expanded.contains(DATE_TOKEN) {
        expanded = Cow::Owned(expanded.replace(DATE_TOKEN, &format_date(today)));
    }
    if expanded.contains(CODE_POINT_OPEN) {
        let decoded = expand_code_points(&expanded);
        if let Some(decoded) = decoded {
            expanded = Cow::Owned(decoded);
        }
    }
    expanded
}

/// Replace `{u<hex>}` tokens left to right; `None` when nothing was replaced
fn expand_code_points(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut replaced = false;

    while let Some(open) = rest.find(CODE_POINT_OPEN) {
        let body = open + CODE_POINT_OPEN.len();
        let Some(len) = rest[body..].find(CODE_POINT_CLOSE) else {
            break;
        };
        let digits = &rest[body..body + len];
        match decode_code_point(digits) {
            Some(ch) => {
                out.push_str(&rest[..open]);
                out.push(ch);
                rest = &rest[body + len + CODE_POINT_CLOSE.len_utf8()..];
                replaced = true;
            }
            None => {
                if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()) {
                    let token = &rest[open..=body + len];
                    warn!(%token, "code point placeholder does not name a character");
                }
                // keep the opener literally and rescan right after it
                out.push_str(&rest[..body]);
                rest = &rest[body..];
            }
        }
    }

    if !replaced {
        return None;
    }
    out.push_str(rest);
    Some(out)
}

fn decode_code_point(digits: &str) -> Option<char> {
    if digits.is_empty()
        || digits.len() > MAX_HEX_DIGITS
        || !digits.chars().all(|c| c.is_ascii_hexdigit())
    {
        return None;
    }
    u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_has_no_leading_zero() {
        assert_eq!(expand("{date}", day(2024, 3, 9)), "9 March 2024");
        assert_eq!(expand("{date}", day(1999, 12, 31)), "31 December 1999");
    }

    #[test]
    fn test_every_date_occurrence_is_replaced() {
        assert_snapshot!(
            expand("from {date} to {date}", day(2024, 1, 2)),
            @"from 2 January 2024 to 2 January 2024"
        );
    }

    #[test]
    fn test_single_code_point() {
        assert_eq!(expand("{u0041}", day(2024, 1, 1)), "A");
        assert_eq!(expand("{u000005D0}", day(2024, 1, 1)), "\u{05D0}");
        assert_eq!(expand("{u1F600}", day(2024, 1, 1)), "\u{1F600}");
    }

    #[test]
    fn test_adjacent_tokens_are_independent() {
        assert_eq!(expand("{u0041}-{u0042}", day(2024, 1, 1)), "A-B");
        assert_eq!(expand("{u0041}{u0042}", day(2024, 1, 1)), "AB");
    }

    #[test]
    fn test_plain_text_is_borrowed_and_unchanged() {
        let out = expand("plain text", day(2024, 1, 1));
        assert!(matches!(out, Cow::Borrowed("plain text")));
    }

    #[test]
    fn test_invalid_tokens_stay_literal() {
        let today = day(2024, 1, 1);
        assert_eq!(expand("{u}", today), "{u}");
        assert_eq!(expand("{uZZ}", today), "{uZZ}");
        assert_eq!(expand("{u123456789}", today), "{u123456789}");
        // surrogate code points are not characters
        assert_eq!(expand("{uD800}", today), "{uD800}");
        assert_eq!(expand("{u0041", today), "{u0041");
    }

    #[test]
    fn test_invalid_token_does_not_swallow_following_one() {
        assert_eq!(expand("{u{u0041}", day(2024, 1, 1)), "{uA");
        assert_eq!(expand("{user} {u0042}", day(2024, 1, 1)), "{user} B");
    }

    #[test]
    fn test_markup_passes_through() {
        assert_eq!(
            expand("<sub>{u0041}</sub> & more", day(2024, 1, 1)),
            "<sub>A</sub> & more"
        );
    }

    #[test]
    fn test_date_and_code_points_together() {
        assert_snapshot!(
            expand("{u00A9} {date}", day(2024, 3, 9)),
            @"© 9 March 2024"
        );
    }
}
