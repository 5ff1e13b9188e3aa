use url::Url;

/// Parses a plain-text URL list
///
/// Blank lines and lines starting with `#` are skipped. Remaining lines are
/// kept only if they parse as `http` or `https` URLs.
pub fn parse_text_urls(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| is_http_url(line))
        .map(str::to_string)
        .collect()
}

fn is_http_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}
