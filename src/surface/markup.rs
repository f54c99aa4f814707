//! Inline style markup for rich text
//!
//! `k<sub>h</sub>` splits into a plain `k` and an `h` in the `sub` style.
//! Only names the surface knows are treated as markup; unknown tags and tags
//! without a closing partner are drawn literally. Spans do not nest.

/// A run of text and the inline style it is drawn in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    pub text: &'a str,
    pub style: Option<&'a str>,
}

impl<'a> Span<'a> {
    fn plain(text: &'a str) -> Self {
        Self { text, style: None }
    }
}

/// Split `text` into plain and styled spans; empty spans are dropped
pub fn parse_spans<'a>(text: &'a str, is_known: impl Fn(&str) -> bool) -> Vec<Span<'a>> {
    let mut spans = Vec::new();
    let mut plain_start = 0;
    let mut cursor = 0;

    while let Some(rel) = text[cursor..].find('<') {
        let open = cursor + rel;
        let Some(styled) = styled_span_at(text, open, &is_known) else {
            cursor = open + 1;
            continue;
        };
        if open > plain_start {
            spans.push(Span::plain(&text[plain_start..open]));
        }
        if !styled.span.text.is_empty() {
            spans.push(styled.span);
        }
        plain_start = styled.end;
        cursor = styled.end;
    }

    if plain_start < text.len() {
        spans.push(Span::plain(&text[plain_start..]));
    }
    spans
}

struct StyledAt<'a> {
    span: Span<'a>,
    /// Byte offset just past the closing tag
    end: usize,
}

fn styled_span_at<'a>(
    text: &'a str,
    open: usize,
    is_known: &impl Fn(&str) -> bool,
) -> Option<StyledAt<'a>> {
    let after_open = open + 1;
    let name_len = text[after_open..].find('>')?;
    let name = &text[after_open..after_open + name_len];
    if name.is_empty() || name.starts_with('/') || !is_known(name) {
        return None;
    }
    let body = after_open + name_len + 1;
    let closing = format!("</{name}>");
    let body_len = text[body..].find(&closing)?;
    Some(StyledAt {
        span: Span {
            text: &text[body..body + body_len],
            style: Some(name),
        },
        end: body + body_len + closing.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sub_only(name: &str) -> bool {
        name == "sub"
    }

    #[test]
    fn test_plain_text_is_one_span() {
        assert_eq!(parse_spans("kh", sub_only), vec![Span::plain("kh")]);
    }

    #[test]
    fn test_styled_span() {
        assert_eq!(
            parse_spans("k<sub>h</sub>a", sub_only),
            vec![
                Span::plain("k"),
                Span {
                    text: "h",
                    style: Some("sub")
                },
                Span::plain("a"),
            ]
        );
    }

    #[test]
    fn test_unknown_and_unclosed_tags_are_literal() {
        assert_eq!(
            parse_spans("a<b>c</b>", sub_only),
            vec![Span::plain("a<b>c</b>")]
        );
        assert_eq!(
            parse_spans("x <sub>y", sub_only),
            vec![Span::plain("x <sub>y")]
        );
        assert_eq!(parse_spans("1 < 2", sub_only), vec![Span::plain("1 < 2")]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_spans("", sub_only).is_empty());
    }
}
