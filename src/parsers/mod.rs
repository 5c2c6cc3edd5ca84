pub mod html;
pub mod text;

use scraper::Html;

/// How a fetched document's source should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserType {
    /// HTML page; content is cleaned and links are extracted
    Html,
    /// Plain text served to the browser; no links
    Text,
}

impl ParserType {
    /// Determines the parser type from the URL path
    pub fn from_url(url: &str) -> Self {
        let path = url::Url::parse(url)
            .map(|u| u.path().to_ascii_lowercase())
            .unwrap_or_default();

        if [".txt", ".md", ".yaml", ".yml", ".csv"]
            .iter()
            .any(|ext| path.ends_with(ext))
        {
            ::log::debug!("Classifying as Text: {}", url);
            ParserType::Text
        } else {
            ParserType::Html
        }
    }
}

/// Content pulled out of one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extracted {
    pub title: String,
    pub content: String,
    pub text_content: String,
    pub byline: Option<String>,
    pub site_name: Option<String>,
    pub links: Vec<String>,
    pub metadata: Option<serde_json::Value>,
}

/// Dispatches page source to the matching extractor
pub struct Parser;

impl Parser {
    pub fn parse(source: &str, parser_type: ParserType) -> Extracted {
        match parser_type {
            ParserType::Html => html::extract(source),
            ParserType::Text => parse_text_document(source),
        }
    }

    /// Determine the parser type from the URL, then parse
    pub fn parse_from_url(source: &str, url: &str) -> Extracted {
        let mut extracted = Self::parse(source, ParserType::from_url(url));
        if extracted.title.is_empty() {
            extracted.title = title_from_url(url);
        }
        extracted
    }
}

/// Browsers wrap plain text in a minimal HTML shell; unwrap it and keep line structure
fn parse_text_document(source: &str) -> Extracted {
    let doc = Html::parse_document(source);
    let raw = doc.root_element().text().collect::<String>();
    let options = text::TextOptions {
        preserve_paragraphs: true,
        preserve_line_breaks: true,
    };
    let body = text::normalize_with_options(&raw, &options);

    Extracted {
        content: body.clone(),
        text_content: body,
        ..Extracted::default()
    }
}

/// Last non-empty path segment of a URL, or its host
fn title_from_url(url: &str) -> String {
    let Ok(parsed) = url::Url::parse(url) else {
        return String::new();
    };

    parsed
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(|s| s.to_string())
        .or_else(|| parsed.host_str().map(|h| h.to_string()))
        .unwrap_or_default()
}
