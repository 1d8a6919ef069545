use super::txt::decode;
use super::PageContent;

/// Markdown is kept verbatim, heading markers included.
pub fn extract_md(bytes: &[u8]) -> Vec<PageContent> {
    vec![PageContent {
        page_number: 1,
        text: decode(bytes).trim().to_string(),
    }]
}
