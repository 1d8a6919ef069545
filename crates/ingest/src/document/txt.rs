use super::PageContent;

pub fn extract_txt(bytes: &[u8]) -> Vec<PageContent> {
    vec![PageContent {
        page_number: 1,
        text: decode(bytes).trim().to_string(),
    }]
}

/// UTF-8 first, lossy fallback for legacy encodings.
pub(super) fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    }
}
