//! HTML parser for extracting anchors
//!
//! Both page shapes the scraper handles are consumed the same way: every
//! `<a href>` element, in document order, with its href and text.

use scraper::{Html, Selector};

/// One `<a href="...">` element of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// The raw `href` attribute value
    pub href: String,

    /// Concatenated text of the element, neither trimmed nor unescaped further
    pub text: String,
}

/// Extracts all anchors carrying an `href` from raw page bytes
///
/// The body is decoded as UTF-8, replacing invalid sequences, so a page with
/// a stray byte still yields its links.
///
/// # Example
///
/// ```
/// use gutenberg_scraper::crawler::extract_anchors;
///
/// let anchors = extract_anchors(br#"<p><a href="/ebooks/1">One</a><a>none</a></p>"#);
/// assert_eq!(anchors.len(), 1);
/// assert_eq!(anchors[0].href, "/ebooks/1");
/// assert_eq!(anchors[0].text, "One");
/// ```
pub fn extract_anchors(body: &[u8]) -> Vec<Anchor> {
    let html = String::from_utf8_lossy(body);
    let document = Html::parse_document(&html);

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            Some(Anchor {
                href: href.to_string(),
                text: element.text().collect(),
            })
        })
        .collect()
}
