//! HTML document loader

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use crate::domain::{Document, DocumentLoader, DomainError, LoaderInput};

/// Title and visible text extracted from an HTML page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedHtml {
    pub title: Option<String>,
    pub text: String,
}

impl ExtractedHtml {
    /// Build a document carrying `source` and, when present, `title`
    pub fn into_document(self, source: impl Into<String>) -> Document {
        let doc = Document::new(self.text).with_source(source);

        match self.title {
            Some(title) => doc.with_metadata("title", title),
            None => doc,
        }
    }
}

/// Loader for HTML files
#[derive(Debug, Clone, Default)]
pub struct HtmlLoader;

impl HtmlLoader {
    /// Create a new HTML loader
    pub fn new() -> Self {
        Self
    }

    /// Extract the title and body text of an HTML document
    pub fn extract(raw: &str) -> ExtractedHtml {
        let document = Html::parse_document(raw);

        ExtractedHtml {
            title: Self::extract_title(&document),
            text: Self::extract_text(&document),
        }
    }

    fn extract_title(document: &Html) -> Option<String> {
        let title_selector = Selector::parse("title").ok()?;
        document
            .select(&title_selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn extract_text(document: &Html) -> String {
        let body = Selector::parse("body")
            .ok()
            .and_then(|sel| document.select(&sel).next());

        let text = match body {
            Some(body) => Self::extract_element_text(&body),
            None => Self::extract_element_text(&document.root_element()),
        };

        Self::normalize_text(&text)
    }

    fn extract_element_text(element: &ElementRef) -> String {
        let mut text = String::new();

        for node in element.children() {
            if let Some(el) = ElementRef::wrap(node) {
                let tag_name = el.value().name();

                if matches!(tag_name, "script" | "style" | "noscript" | "head" | "template") {
                    continue;
                }

                if is_block(tag_name) && !text.is_empty() && !text.ends_with('\n') {
                    text.push('\n');
                }

                text.push_str(&Self::extract_element_text(&el));

                if is_block(tag_name) {
                    text.push('\n');
                }
            } else if let Some(txt) = node.value().as_text() {
                text.push_str(txt);
            }
        }

        text
    }

    fn normalize_text(text: &str) -> String {
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn is_block(tag_name: &str) -> bool {
    matches!(
        tag_name,
        "p" | "div"
            | "section"
            | "article"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "br"
            | "li"
            | "tr"
            | "td"
            | "th"
    )
}

#[async_trait]
impl DocumentLoader for HtmlLoader {
    fn name(&self) -> &'static str {
        "html"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["html"]
    }

    async fn load(&self, input: LoaderInput) -> Result<Vec<Document>, DomainError> {
        let raw = input.read_text("html").await?;
        let extracted = Self::extract(&raw);

        Ok(vec![extracted.into_document(input.source)])
    }
}
