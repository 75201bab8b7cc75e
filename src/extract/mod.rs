//! Text extraction for the corpus
//!
//! An extractor turns a fetched HTML document into the text that goes into
//! the corpus, or reports that the page has nothing worth keeping. Having no
//! qualifying text is an ordinary outcome, not an error.

mod nepali;

pub use nepali::{clean_text, LanguageFilter, NepaliExtractor};

/// Outcome of running an extractor on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Cleaned text ready to be written
    Extracted(String),
    /// The page carries no qualifying text
    NoText,
}

/// Produces corpus text from an HTML document
pub trait TextExtractor {
    fn extract(&self, html: &str) -> Extraction;
}
