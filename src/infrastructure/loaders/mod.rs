//! Document loader implementations

mod csv;
mod factory;
mod html;
mod jq;
mod json;
mod pdf;
mod text;
mod word;

pub use self::csv::CsvLoader;
pub use factory::LoaderFactory;
pub use html::{ExtractedHtml, HtmlLoader};
pub use jq::JqFilter;
pub use json::JsonLoader;
pub use pdf::PdfLoader;
pub use text::TextLoader;
pub use word::WordLoader;

#[cfg(test)]
pub(crate) use pdf::tests::build_pdf;
#[cfg(test)]
pub(crate) use word::tests::build_docx;
