//! HTML text extraction
//!
//! This module turns a fetched HTML page into a title and plain body text:
//! - Title from `<head><title>`, falling back to the first `<h1>`
//! - Body text with script, style, navigation, header, footer, and embedded
//!   frame elements skipped
//! - Content capped at [`MAX_CONTENT_CHARS`] characters

use scraper::{ElementRef, Html, Selector};

/// Maximum number of characters of body text kept per document
pub const MAX_CONTENT_CHARS: usize = 50_000;

/// Appended to content that was cut at [`MAX_CONTENT_CHARS`]
pub const TRUNCATION_MARKER: &str = "\n\n...(content truncated)";

/// Elements whose text never reaches the extracted content
const NOISE_TAGS: &[&str] = &[
    "script", "style", "nav", "header", "footer", "iframe", "noscript",
];

/// Title and text extracted from an HTML page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    /// Resolved page title, empty if none was found
    pub title: String,

    /// Trimmed body text, possibly truncated
    pub content: String,
}

/// Extracts title and body text from an HTML document
///
/// # Arguments
///
/// * `html` - The raw HTML content
///
/// # Returns
///
/// The extracted page. `content` is empty when the body holds no visible
/// text; callers treat that as a failed fetch.
///
/// # Example
///
/// ```
/// use krio_fetch::fetcher::extract_page;
///
/// let html = r#"<html><head><title>Test</title></head><body><nav>Menu</nav><p>Hello</p></body></html>"#;
/// let page = extract_page(html);
/// assert_eq!(page.title, "Test");
/// assert_eq!(page.content, "Hello");
/// ```
pub fn extract_page(html: &str) -> ExtractedPage {
    let document = Html::parse_document(html);

    let title = extract_title(&document);
    let content = truncate_content(extract_body_text(&document).trim());

    ExtractedPage { title, content }
}

/// Resolves the title: `<head><title>`, else the first `<h1>`, else empty
fn extract_title(document: &Html) -> String {
    first_text(document, "head title")
        .or_else(|| first_text(document, "h1"))
        .unwrap_or_default()
}

/// Returns the trimmed text of the first element matching `selector`, if non-empty
fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Collects the body's visible text, skipping noise subtrees
fn extract_body_text(document: &Html) -> String {
    let mut text = String::new();

    if let Ok(body_selector) = Selector::parse("body") {
        if let Some(body) = document.select(&body_selector).next() {
            push_visible_text(body, &mut text);
        }
    }

    text
}

fn push_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !NOISE_TAGS.contains(&child_element.value().name()) {
                push_visible_text(child_element, out);
            }
        }
    }
}

/// Cuts content to [`MAX_CONTENT_CHARS`] characters and appends the marker
fn truncate_content(text: &str) -> String {
    match text.char_indices().nth(MAX_CONTENT_CHARS) {
        Some((byte_index, _)) => format!("{}{}", &text[..byte_index], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title_from_head() {
        let html = r#"<html><head><title>  Test Page  </title></head><body><h1>Heading</h1><p>x</p></body></html>"#;
        let page = extract_page(html);
        assert_eq!(page.title, "Test Page");
    }

    #[test]
    fn test_title_falls_back_to_h1() {
        let html = r#"<html><head></head><body><h1>First</h1><h1>Second</h1><p>x</p></body></html>"#;
        let page = extract_page(html);
        assert_eq!(page.title, "First");
    }

    #[test]
    fn test_empty_title_falls_back_to_h1() {
        let html = r#"<html><head><title>   </title></head><body><h1>Heading</h1></body></html>"#;
        let page = extract_page(html);
        assert_eq!(page.title, "Heading");
    }

    #[test]
    fn test_no_title() {
        let html = r#"<html><head></head><body><p>Body only</p></body></html>"#;
        let page = extract_page(html);
        assert_eq!(page.title, "");
        assert_eq!(page.content, "Body only");
    }

    #[test]
    fn test_noise_elements_removed() {
        let html = r#"
            <html>
            <head><style>body { color: red; }</style></head>
            <body>
                <header>Site Header</header>
                <nav><a href="/">Home</a></nav>
                <script>var tracking = true;</script>
                <article>Main article text</article>
                <iframe src="https://ads.example.com"></iframe>
                <noscript>Enable JS</noscript>
                <footer>Copyright</footer>
            </body>
            </html>
        "#;
        let page = extract_page(html);
        assert_eq!(page.content, "Main article text");
    }

    #[test]
    fn test_nested_noise_removed() {
        let html = r#"<html><body><div>Keep <span>this<script>drop()</script></span></div></body></html>"#;
        let page = extract_page(html);
        assert_eq!(page.content, "Keep this");
    }

    #[test]
    fn test_content_is_trimmed() {
        let html = "<html><body>\n\n   Hello world   \n\n</body></html>";
        let page = extract_page(html);
        assert_eq!(page.content, "Hello world");
    }

    #[test]
    fn test_empty_body_yields_empty_content() {
        let html = r#"<html><head><title>Only Title</title></head><body><script>x()</script>   </body></html>"#;
        let page = extract_page(html);
        assert_eq!(page.title, "Only Title");
        assert!(page.content.is_empty());
    }

    #[test]
    fn test_content_truncated_at_limit() {
        let body = "a".repeat(MAX_CONTENT_CHARS + 10);
        let html = format!("<html><body>{}</body></html>", body);
        let page = extract_page(&html);
        assert!(page.content.ends_with(TRUNCATION_MARKER));
        assert_eq!(
            page.content.chars().count(),
            MAX_CONTENT_CHARS + TRUNCATION_MARKER.chars().count()
        );
    }

    #[test]
    fn test_content_at_limit_not_truncated() {
        let body = "a".repeat(MAX_CONTENT_CHARS);
        let html = format!("<html><body>{}</body></html>", body);
        let page = extract_page(&html);
        assert_eq!(page.content.len(), MAX_CONTENT_CHARS);
        assert!(!page.content.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let text = "é".repeat(MAX_CONTENT_CHARS + 1);
        let truncated = truncate_content(&text);
        assert_eq!(
            truncated.chars().count(),
            MAX_CONTENT_CHARS + TRUNCATION_MARKER.chars().count()
        );
    }
}
