//! PDF document loader

use async_trait::async_trait;
use lopdf::Document as PdfDocument;
use tracing::debug;

use crate::domain::{Document, DocumentLoader, DomainError, LoaderInput};

/// Loader for PDF files, producing one document per page.
///
/// Page metadata is zero-based.
#[derive(Debug, Clone, Default)]
pub struct PdfLoader;

impl PdfLoader {
    /// Create a new PDF loader
    pub fn new() -> Self {
        Self
    }

    /// Extract the text of every page
    pub fn load_bytes(raw: &[u8], source: &str) -> Result<Vec<Document>, DomainError> {
        let pdf = PdfDocument::load_mem(raw)
            .map_err(|e| DomainError::parse("pdf", format!("Failed to open PDF: {}", e)))?;

        let pages = pdf.get_pages();
        debug!(source = %source, pages = pages.len(), "Extracting PDF text");

        pages
            .keys()
            .enumerate()
            .map(|(index, page_number)| {
                let text = pdf.extract_text(&[*page_number]).map_err(|e| {
                    DomainError::parse(
                        "pdf",
                        format!("Failed to extract text from page {}: {}", page_number, e),
                    )
                })?;

                Ok(Document::new(text)
                    .with_source(source)
                    .with_metadata("page", index))
            })
            .collect()
    }
}

#[async_trait]
impl DocumentLoader for PdfLoader {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    async fn load(&self, input: LoaderInput) -> Result<Vec<Document>, DomainError> {
        let raw = input.read_bytes().await?;
        let source = input.source;

        tokio::task::spawn_blocking(move || Self::load_bytes(&raw, &source))
            .await
            .map_err(|e| DomainError::internal(format!("PDF extraction task failed: {}", e)))?
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Build a PDF with one page per entry in `pages`
    pub(crate) fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = PdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn test_one_document_per_page() {
        let pdf = build_pdf(&["First page", "Second page"]);

        let docs = PdfLoader::load_bytes(&pdf, "report.pdf").unwrap();

        assert_eq!(docs.len(), 2);
        assert!(docs[0].page_content.contains("First page"));
        assert!(docs[1].page_content.contains("Second page"));
        assert_eq!(docs[0].metadata["page"], 0);
        assert_eq!(docs[1].metadata["page"], 1);
        assert_eq!(docs[0].source(), Some("report.pdf"));
    }

    #[test]
    fn test_invalid_pdf() {
        let result = PdfLoader::load_bytes(b"not a pdf", "broken.pdf");
        assert!(matches!(result, Err(DomainError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_load_pdf_file() {
        let file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        std::fs::write(file.path(), build_pdf(&["Hello PDF"])).unwrap();

        let docs = PdfLoader::new()
            .load(LoaderInput::from_path(file.path()).with_source("https://host/doc.pdf"))
            .await
            .unwrap();

        assert_eq!(docs.len(), 1);
        assert!(docs[0].page_content.contains("Hello PDF"));
        assert_eq!(docs[0].source(), Some("https://host/doc.pdf"));
    }

    #[test]
    fn test_supports_file() {
        assert!(PdfLoader::new().supports_file("Scan.PDF"));
        assert!(!PdfLoader::new().supports_file("scan.png"));
    }
}
