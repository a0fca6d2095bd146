//! Page-wise text extraction.
//!
//! Pages are read concurrently on a small bounded pool, then stitched back
//! together in page order.

use std::path::Path;

use rayon::prelude::*;
use tracing::debug;

use super::ParseError;

/// Default number of page extraction workers.
pub const DEFAULT_WORKERS: usize = 4;

/// A document that can hand out plain text one page at a time.
pub trait PagedDocument: Sync {
    /// Page numbers in reading order.
    fn page_numbers(&self) -> Vec<u32>;

    /// Plain text of a single page.
    fn page_text(&self, page: u32) -> Result<String, ParseError>;
}

/// A PDF opened with `lopdf`.
pub struct PdfDocument {
    inner: lopdf::Document,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let inner = lopdf::Document::load(path).map_err(|e| ParseError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self { inner })
    }

    pub fn page_count(&self) -> usize {
        self.inner.get_pages().len()
    }
}

impl PagedDocument for PdfDocument {
    fn page_numbers(&self) -> Vec<u32> {
        self.inner.get_pages().keys().copied().collect()
    }

    fn page_text(&self, page: u32) -> Result<String, ParseError> {
        self.inner
            .extract_text(&[page])
            .map_err(|e| ParseError::Page {
                page,
                reason: e.to_string(),
            })
    }
}

/// Extract every page of `doc` with `workers` threads and join the pages
/// with newlines, in page order.
///
/// The first page that fails aborts the whole extraction.
pub fn extract_text<D: PagedDocument + ?Sized>(doc: &D, workers: usize) -> Result<String, ParseError> {
    let pages = doc.page_numbers();
    let workers = workers.max(1);
    debug!("Extracting {} pages with {} workers", pages.len(), workers);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("page-extract-{}", i))
        .build()
        .map_err(|e| ParseError::WorkerPool(e.to_string()))?;

    let texts: Vec<String> = pool.install(|| {
        pages
            .par_iter()
            .map(|&page| doc.page_text(page))
            .collect::<Result<Vec<_>, _>>()
    })?;

    Ok(texts.join("\n"))
}
