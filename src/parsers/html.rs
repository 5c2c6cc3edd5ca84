use super::{Extracted, text};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector should parse")
}

/// Elements that never carry article content
static NOISE: LazyLock<Selector> = LazyLock::new(|| {
    selector("script, style, noscript, iframe, svg, nav, header, footer, aside, form, template")
});

/// Candidates for the main content root, most specific first
static MAIN_ROOTS: LazyLock<[Selector; 4]> = LazyLock::new(|| {
    [
        selector("article"),
        selector("main"),
        selector("[role=main]"),
        selector("body"),
    ]
});

static BLOCKS: LazyLock<Selector> = LazyLock::new(|| {
    selector("p, h1, h2, h3, h4, h5, h6, li, pre, blockquote, td, th, dt, dd, figcaption")
});

static LINKS: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static LD_JSON: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"script[type="application/ld+json"]"#));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static H1: LazyLock<Selector> = LazyLock::new(|| selector("h1"));

/// Extracts title, byline, cleaned content and links from an HTML document
pub fn extract(html: &str) -> Extracted {
    let mut doc = Html::parse_document(html);

    // Links and metadata come from the full document, before cleaning.
    let links = extract_links(&doc);
    let title = extract_title(&doc);
    let byline = extract_byline(&doc);
    let site_name = extract_site_name(&doc);
    let metadata = extract_metadata(&doc);

    let noise: Vec<_> = doc.root_element().select(&NOISE).map(|e| e.id()).collect();
    for id in noise {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }

    let root = main_root(&doc);
    let content = match htmd::convert(&root.inner_html()) {
        Ok(markdown) => markdown.trim().to_string(),
        Err(e) => {
            ::log::warn!("Failed to convert page content to Markdown: {}", e);
            String::new()
        }
    };
    let text_content = block_text(root);

    ::log::debug!(
        "HTML extraction found {} links, {} chars of text",
        links.len(),
        text_content.len()
    );

    Extracted {
        title,
        content,
        text_content,
        byline,
        site_name,
        links,
        metadata,
    }
}

/// Collects the raw href of every anchor, in document order
pub fn extract_links(doc: &Html) -> Vec<String> {
    doc.root_element()
        .select(&LINKS)
        .filter_map(|e| e.value().attr("href"))
        .map(|s| s.to_string())
        .collect()
}

fn extract_title(doc: &Html) -> String {
    meta_content(doc, r#"meta[property="og:title"]"#)
        .or_else(|| first_text(doc, &TITLE))
        .or_else(|| first_text(doc, &H1))
        .unwrap_or_default()
}

fn extract_byline(doc: &Html) -> Option<String> {
    meta_content(doc, r#"meta[name="author"]"#).or_else(|| {
        ["[rel=author]", ".byline", ".author"]
            .iter()
            .find_map(|css| first_text(doc, &selector(css)))
    })
}

fn extract_site_name(doc: &Html) -> Option<String> {
    meta_content(doc, r#"meta[property="og:site_name"]"#)
        .or_else(|| meta_content(doc, r#"meta[name="application-name"]"#))
}

/// Parses embedded JSON-LD blocks; the values are passed through untouched
fn extract_metadata(doc: &Html) -> Option<serde_json::Value> {
    let mut blocks: Vec<serde_json::Value> = doc
        .root_element()
        .select(&LD_JSON)
        .filter_map(|e| serde_json::from_str(&e.text().collect::<String>()).ok())
        .collect();

    match blocks.len() {
        0 => None,
        1 => blocks.pop(),
        _ => Some(serde_json::Value::Array(blocks)),
    }
}

fn meta_content(doc: &Html, css: &str) -> Option<String> {
    doc.root_element()
        .select(&selector(css))
        .filter_map(|e| e.value().attr("content"))
        .map(text::collapse_whitespace)
        .find(|s| !s.is_empty())
}

fn first_text(doc: &Html, selector: &Selector) -> Option<String> {
    doc.root_element()
        .select(selector)
        .map(|e| text::collapse_whitespace(&e.text().collect::<String>()))
        .find(|s| !s.is_empty())
}

fn main_root(doc: &Html) -> ElementRef<'_> {
    MAIN_ROOTS
        .iter()
        .find_map(|sel| doc.root_element().select(sel).next())
        .unwrap_or_else(|| doc.root_element())
}

/// Plain text of the content root, one paragraph per outermost block element
fn block_text(root: ElementRef<'_>) -> String {
    let paragraphs: Vec<String> = root
        .select(&BLOCKS)
        .filter(|el| {
            !el.ancestors()
                .filter_map(ElementRef::wrap)
                .any(|a| BLOCKS.matches(&a))
        })
        .map(|el| text::collapse_whitespace(&el.text().collect::<String>()))
        .filter(|s| !s.is_empty())
        .collect();

    if paragraphs.is_empty() {
        return text::normalize(&root.text().collect::<Vec<_>>().join(" "));
    }

    text::normalize(&paragraphs.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"<html>
<head>
  <title>Fallback Title</title>
  <meta property="og:title" content="Shipping Rust">
  <meta property="og:site_name" content="Example Blog">
  <meta name="author" content="Jane Doe">
  <script type="application/ld+json">{"@type": "Article", "headline": "Shipping Rust"}</script>
  <style>body { color: red; }</style>
</head>
<body>
  <nav><a href="/home">Home</a><a href="/about">About</a></nav>
  <article>
    <h1>Shipping   Rust</h1>
    <p>First <a href="/docs#intro">paragraph</a>.</p>
    <ul><li>One</li><li><p>Two</p></li></ul>
    <script>console.log("tracking")</script>
  </article>
  <footer><a href="mailto:team@example.com">Contact</a></footer>
</body>
</html>"#;

    #[test]
    fn test_extracts_metadata() {
        let page = extract(ARTICLE);
        assert_eq!(page.title, "Shipping Rust");
        assert_eq!(page.byline.as_deref(), Some("Jane Doe"));
        assert_eq!(page.site_name.as_deref(), Some("Example Blog"));
        assert_eq!(page.metadata.unwrap()["@type"], "Article");
    }

    #[test]
    fn test_links_include_navigation_in_document_order() {
        let page = extract(ARTICLE);
        assert_eq!(
            page.links,
            vec!["/home", "/about", "/docs#intro", "mailto:team@example.com"]
        );
    }

    #[test]
    fn test_content_is_cleaned() {
        let page = extract(ARTICLE);
        assert_eq!(page.text_content, "Shipping Rust\n\nFirst paragraph.\n\nOne\n\nTwo");
        assert!(page.content.contains("First"));
        assert!(!page.content.contains("tracking"));
        assert!(!page.content.contains("About"));
    }

    #[test]
    fn test_falls_back_to_title_and_body() {
        let page = extract("<html><head><title> Plain </title></head><body>Just text</body></html>");
        assert_eq!(page.title, "Plain");
        assert_eq!(page.text_content, "Just text");
        assert!(page.byline.is_none());
        assert!(page.site_name.is_none());
        assert!(page.metadata.is_none());
    }

    #[test]
    fn test_title_from_heading_when_head_is_empty() {
        let page = extract("<body><main><h1>Heading</h1><p>Body</p></main></body>");
        assert_eq!(page.title, "Heading");
    }

    #[test]
    fn test_byline_from_markup() {
        let page = extract(r#"<body><p class="byline">By  Sam</p><p>Text</p></body>"#);
        assert_eq!(page.byline.as_deref(), Some("By Sam"));
    }
}
