use regex::Regex;
use std::sync::OnceLock;

/// Characters stripped from the end of a matched link
const TRAILING_PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '?', '(', ')', '[', ']', '{', '}', '"', '\'', '`',
];

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"https?://[^\s\]]+").expect("URL pattern is valid"))
}

/// Extracts every http(s) URL from markdown text
///
/// Matches both `[text](url)` links and bare URLs. Trailing punctuation,
/// closing brackets, and trailing slashes left over from markdown syntax are
/// trimmed.
pub fn parse_markdown_urls(content: &str) -> Vec<String> {
    url_pattern()
        .find_iter(content)
        .map(|m| clean_url(m.as_str()))
        .filter(|url| !url.is_empty())
        .collect()
}

fn clean_url(raw: &str) -> String {
    raw.trim_end_matches(TRAILING_PUNCTUATION)
        .trim_end_matches(&['/', ')'][..])
        .to_string()
}
