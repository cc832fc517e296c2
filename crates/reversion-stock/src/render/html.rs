//! Regex-based HTML flattening

use regex::{Captures, Regex};
use std::sync::LazyLock;

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("HTML pattern is a valid regex")
}

static HTML_HINT: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"(?i)<\s*/?\s*(?:html|body|div|p|br|hr|b|i|u|em|strong|span|a|font|table|thead|tbody|tr|td|th|ul|ol|li|h[1-6]|pre|code|blockquote)\b[^>]*>",
    )
});
static SCRIPT_OR_STYLE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?is)<(?:script|style)\b[^>]*>.*?</(?:script|style)\s*>"));
static COMMENT: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?s)<!--.*?-->"));
static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)<br\s*/?>"));
static RULE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)<hr\b[^>]*>"));
static BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"(?i)</?(?:p|div|h[1-6]|table|thead|tbody|tr|ul|ol|blockquote|pre|section|article|header|footer|html|body)\b[^>]*>",
    )
});
static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)<li\b[^>]*>"));
static CELL_END: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)</t[dh]\s*>"));
static BOLD: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)</?(?:b|strong)\b[^>]*>"));
static ITALIC: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)</?(?:i|em)\b[^>]*>"));
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| pattern(r"<[^>]+>"));
static NUMERIC_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"&#(?:([0-9]{1,7})|[xX]([0-9a-fA-F]{1,6}));"));
static TRAILING_SPACE: LazyLock<Regex> = LazyLock::new(|| pattern(r"[ \t]+\n"));
static EXTRA_NEWLINES: LazyLock<Regex> = LazyLock::new(|| pattern(r"\n{3,}"));

/// Whether `text` contains recognisable HTML tags
pub fn looks_like_html(text: &str) -> bool {
    !text.is_empty() && HTML_HINT.is_match(text)
}

/// Remove every angle-bracket tag, keeping the text between them
pub fn strip_tags(text: &str) -> String {
    ANY_TAG.replace_all(text, "").into_owned()
}

/// Convert an HTML fragment to markdown-flavoured plain text
///
/// Block elements become paragraph breaks, `<br>` a newline, list items
/// `- ` bullets, bold and italic become `**` and `_`. Remaining tags are
/// stripped and common entities decoded.
pub fn html_to_text(html: &str) -> String {
    let text = SCRIPT_OR_STYLE.replace_all(html, "");
    let text = COMMENT.replace_all(&text, "");
    let text = LINE_BREAK.replace_all(&text, "\n");
    let text = RULE.replace_all(&text, "\n\n---\n\n");
    let text = BLOCK.replace_all(&text, "\n\n");
    let text = LIST_ITEM.replace_all(&text, "\n- ");
    let text = CELL_END.replace_all(&text, " | ");
    let text = BOLD.replace_all(&text, "**");
    let text = ITALIC.replace_all(&text, "_");
    let text = strip_tags(&text);
    let text = decode_entities(&text);
    let text = TRAILING_SPACE.replace_all(&text, "\n");
    let text = EXTRA_NEWLINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}

fn decode_entities(text: &str) -> String {
    let text = NUMERIC_ENTITY.replace_all(text, |caps: &Captures| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(dec), _) => dec.as_str().parse::<u32>().ok(),
            (None, Some(hex)) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (None, None) => None,
        };
        code.and_then(char::from_u32)
            .map_or_else(|| caps[0].to_string(), String::from)
    });

    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
