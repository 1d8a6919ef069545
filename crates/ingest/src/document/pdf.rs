use super::{ExtractionError, PageContent};

/// Extract page-ordered text from PDF bytes.
///
/// pdf-extract emits form feeds (`\x0C`) between pages; blank pages are dropped.
pub fn extract_pdf(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    let text = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| ExtractionError::PdfError("parser panicked on malformed PDF".into()))?
        .map_err(|e| ExtractionError::PdfError(e.to_string()))?;

    Ok(split_pages(&text))
}

fn split_pages(text: &str) -> Vec<PageContent> {
    text.split('\x0C')
        .enumerate()
        .filter(|(_, page)| !page.trim().is_empty())
        .map(|(i, page)| PageContent {
            page_number: i + 1,
            text: page.trim().to_string(),
        })
        .collect()
}
