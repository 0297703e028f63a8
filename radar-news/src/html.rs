//! Markup cleanup for search result snippets

/// Strip HTML tags from text and decode the entities the search API emits.
///
/// A tag is `<` followed by at least one character and a closing `>`; a lone
/// `<` with no closing bracket is kept as text.
pub fn strip_html(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        match rest[open..].find('>') {
            Some(close) if close > 1 => {
                result.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            _ => {
                result.push_str(&rest[..=open]);
                rest = &rest[open + 1..];
            }
        }
    }
    result.push_str(rest);

    // Clean up whitespace and HTML entities
    result
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
