//! One source document, end to end.
//!
//! A [`PayslipBatch`] holds the extracted name of every page of one document.
//! Display names and filename stems are derived from the whole batch, because
//! duplicate numbering depends on page order. Directory matching works page
//! by page on the extracted names.

use crate::directory::{DirectoryMatcher, MatchResult};
use crate::domain::dedupe::{deduplicate, deduplicate_within};
use crate::domain::extractor::NameExtractor;
use crate::domain::sanitize::{sanitize, MAX_FILENAME_LEN};
use crate::domain::text::normalize;
use crate::error::{HoleriteError, HoleriteResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Page separator in `pdftotext` output.
const FORM_FEED: char = '\u{0C}';

/// Text of one source page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// 1-based
    pub page_number: usize,
    pub raw_text: String,
}

impl PageText {
    pub fn new(page_number: usize, raw_text: impl Into<String>) -> Self {
        Self {
            page_number,
            raw_text: raw_text.into(),
        }
    }
}

/// Supplies page text by 0-based page index.
///
/// Implemented by whatever decodes the source document.
pub trait PageTextSource {
    fn page_count(&self) -> usize;
    fn page_text(&self, page_index: usize) -> HoleriteResult<PageText>;
}

impl PageTextSource for [PageText] {
    fn page_count(&self) -> usize {
        self.len()
    }

    fn page_text(&self, page_index: usize) -> HoleriteResult<PageText> {
        self.get(page_index)
            .cloned()
            .ok_or_else(|| HoleriteError::PageSource {
                page: page_index + 1,
                reason: format!("only {} pages available", self.len()),
            })
    }
}

impl PageTextSource for Vec<PageText> {
    fn page_count(&self) -> usize {
        self.as_slice().page_count()
    }

    fn page_text(&self, page_index: usize) -> HoleriteResult<PageText> {
        self.as_slice().page_text(page_index)
    }
}

/// Pages of `pdftotext`-style output, separated by form feeds.
///
/// The form feed that terminates the last page does not start a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFeedPages {
    pages: Vec<PageText>,
}

impl FormFeedPages {
    pub fn parse(text: &str) -> Self {
        let mut raw: Vec<&str> = text.split(FORM_FEED).collect();
        if raw.len() > 1 && raw.last().is_some_and(|p| p.trim().is_empty()) {
            raw.pop();
        }
        let pages = raw
            .into_iter()
            .enumerate()
            .map(|(i, text)| PageText::new(i + 1, text))
            .collect();
        Self { pages }
    }

    /// Reads and splits a text file.
    pub fn load(path: &Path) -> HoleriteResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| HoleriteError::io(path, e))?;
        Ok(Self::parse(&content))
    }

    pub fn pages(&self) -> &[PageText] {
        &self.pages
    }
}

impl PageTextSource for FormFeedPages {
    fn page_count(&self) -> usize {
        self.pages.page_count()
    }

    fn page_text(&self, page_index: usize) -> HoleriteResult<PageText> {
        self.pages.page_text(page_index)
    }
}

/// Display name for a page without an extracted name.
pub fn no_name_label(page_number: usize) -> String {
    format!("SEM NOME - PAGINA {}", page_number)
}

/// Extraction outcome for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageResult {
    pub page_index: usize,
    pub page_number: usize,
    pub name: Option<String>,
}

/// Extracted names for every page of one document.
#[derive(Debug, Clone, Default)]
pub struct PayslipBatch {
    pages: Vec<PageResult>,
}

impl PayslipBatch {
    /// Runs the extractor over every page of `source`.
    pub fn extract<S>(source: &S, extractor: &NameExtractor) -> HoleriteResult<Self>
    where
        S: PageTextSource + ?Sized,
    {
        let count = source.page_count();
        let mut pages = Vec::with_capacity(count);

        for page_index in 0..count {
            let page = source.page_text(page_index)?;
            if page.page_number == 0 {
                return Err(HoleriteError::InvalidInput {
                    parameter: "page_number".to_string(),
                    reason: format!("page at index {} is numbered 0", page_index),
                });
            }
            let name = extractor.extract(&page.raw_text);
            if name.is_none() {
                debug!("page {}: no name found", page.page_number);
            }
            pages.push(PageResult {
                page_index,
                page_number: page.page_number,
                name,
            });
        }

        let batch = Self { pages };
        info!(
            "extracted {} of {} page names",
            batch.named_count(),
            batch.len()
        );
        Ok(batch)
    }

    /// Wraps results produced elsewhere (e.g. restored from a session).
    pub fn from_results(pages: Vec<PageResult>) -> Self {
        Self { pages }
    }

    pub fn pages(&self) -> &[PageResult] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Pages with an extracted or manually set name.
    pub fn named_count(&self) -> usize {
        self.pages.iter().filter(|p| p.name.is_some()).count()
    }

    /// Replaces a page's name; a blank name clears it.
    pub fn set_name(&mut self, page_index: usize, name: Option<&str>) -> HoleriteResult<()> {
        let page = self
            .pages
            .iter_mut()
            .find(|p| p.page_index == page_index)
            .ok_or_else(|| HoleriteError::InvalidInput {
                parameter: "page_index".to_string(),
                reason: format!("no page with index {}", page_index),
            })?;
        page.name = name.map(normalize).filter(|n| !n.is_empty());
        Ok(())
    }

    /// One unique display name per page, in page order.
    pub fn display_names(&self) -> Vec<String> {
        let names: Vec<String> = self
            .pages
            .iter()
            .map(|p| {
                p.name
                    .clone()
                    .unwrap_or_else(|| no_name_label(p.page_number))
            })
            .collect();
        deduplicate(&names)
    }

    /// One unique filename stem per page, in page order.
    pub fn filename_stems(&self) -> Vec<String> {
        let stems: Vec<String> = self.display_names().iter().map(|n| sanitize(n)).collect();
        // Stripping characters or truncating can make two display names
        // equal again, and the renumbered stem must still fit the limit.
        deduplicate_within(&stems, MAX_FILENAME_LEN)
    }

    /// Matches every page against the directory.
    pub fn match_directory(&self, matcher: &DirectoryMatcher) -> Vec<MatchResult> {
        self.pages
            .iter()
            .map(|p| matcher.match_page(p.page_index, p.page_number, p.name.as_deref()))
            .collect()
    }
}
