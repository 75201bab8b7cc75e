use crate::config::ExtractorConfig;
use crate::extract::{Extraction, TextExtractor};
use scraper::{Html, Selector};
use whatlang::{Lang, Script};

/// Devanagari Unicode block
const DEVANAGARI: std::ops::RangeInclusive<char> = '\u{0900}'..='\u{097F}';

/// Punctuation kept alongside Devanagari text
const KEPT_PUNCTUATION: &[char] = &['।', '?', '!'];

/// Decides whether a paragraph is written in the target language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageFilter {
    /// Paragraph must be detected as Nepali
    Nepali,
    /// Paragraph must be written mostly in Devanagari script
    Devanagari,
}

impl LanguageFilter {
    pub fn accepts(&self, text: &str) -> bool {
        match self {
            Self::Nepali => whatlang::detect(text).is_some_and(|info| info.lang() == Lang::Nep),
            Self::Devanagari => whatlang::detect_script(text) == Some(Script::Devanagari),
        }
    }
}

/// Removes everything but Devanagari, whitespace and `।?!`, then collapses whitespace
///
/// The result never contains control characters or line breaks.
pub fn clean_text(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| DEVANAGARI.contains(c) || c.is_whitespace() || KEPT_PUNCTUATION.contains(c))
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts Nepali paragraphs from `<p>` elements
///
/// Each accepted paragraph becomes one line of output. A page qualifies when
/// at least `min_lines` paragraphs survive filtering and cleaning.
#[derive(Debug, Clone)]
pub struct NepaliExtractor {
    min_lines: usize,
    filter: LanguageFilter,
}

impl NepaliExtractor {
    pub fn new(min_lines: usize, filter: LanguageFilter) -> Self {
        Self {
            min_lines: min_lines.max(1),
            filter,
        }
    }

    pub fn from_config(config: &ExtractorConfig) -> Self {
        let filter = if config.require_nepali {
            LanguageFilter::Nepali
        } else {
            LanguageFilter::Devanagari
        };
        Self::new(config.min_lines, filter)
    }

    /// Returns the cleaned paragraphs that pass the language filter
    pub fn paragraphs(&self, html: &str) -> Vec<String> {
        let Ok(selector) = Selector::parse("p") else {
            return Vec::new();
        };
        let document = Html::parse_document(html);

        document
            .select(&selector)
            .filter_map(|element| {
                let raw = element.text().collect::<String>();
                let raw = raw.trim();
                if raw.is_empty() || !self.filter.accepts(raw) {
                    return None;
                }
                let cleaned = clean_text(raw);
                (!cleaned.is_empty()).then_some(cleaned)
            })
            .collect()
    }
}

impl TextExtractor for NepaliExtractor {
    fn extract(&self, html: &str) -> Extraction {
        let paragraphs = self.paragraphs(html);
        if paragraphs.len() >= self.min_lines {
            Extraction::Extracted(paragraphs.join("\n"))
        } else {
            Extraction::NoText
        }
    }
}
