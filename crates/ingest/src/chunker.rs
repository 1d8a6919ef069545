//! Fixed-size sliding-window chunking.
//!
//! Windows are measured in characters, not bytes, so multi-byte text never
//! splits inside a code point.

use rfp_core::config::ChunkingConfig;
use rfp_core::error::ConfigError;
use serde::Serialize;

/// A window of the source text. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// 0-based position within the chunk sequence.
    pub index: usize,
    /// Character offset of the first character in the source text.
    pub start_offset: usize,
    pub text: String,
}

impl Chunk {
    /// Number of characters in the chunk.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Split `text` into windows of `size` characters, consecutive windows
/// sharing `overlap` characters. Requires `0 < overlap < size`.
pub fn chunk(text: &str, size: usize, overlap: usize) -> Result<Vec<Chunk>, ConfigError> {
    chunk_text(text, &ChunkingConfig::new(size, overlap)?)
}

pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Result<Vec<Chunk>, ConfigError> {
    config.validate()?;

    // Byte position of every char start, plus the end of the string.
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let len = bounds.len() - 1;

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < len {
        let end = (start + config.size).min(len);
        chunks.push(Chunk {
            index: chunks.len(),
            start_offset: start,
            text: text[bounds[start]..bounds[end]].to_string(),
        });
        if end == len {
            break;
        }
        start = end - config.overlap;
    }
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_count(len: usize, size: usize, overlap: usize) -> usize {
        if len == 0 {
            0
        } else if len <= overlap {
            1
        } else {
            (len - overlap).div_ceil(size - overlap)
        }
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk("", 10, 2).unwrap().is_empty());
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert_eq!(
            chunk("abc", 10, 0),
            Err(ConfigError::InvalidChunking { size: 10, overlap: 0 })
        );
        assert_eq!(
            chunk("abc", 10, 10),
            Err(ConfigError::InvalidChunking { size: 10, overlap: 10 })
        );
        assert!(chunk("abc", 10, 12).is_err());
    }

    #[test]
    fn short_text_is_single_chunk() {
        let chunks = chunk("hello", 10, 2).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "hello");
        assert_eq!(chunks[0].start_offset, 0);
    }

    #[test]
    fn windows_overlap_and_final_chunk_is_shorter() {
        let text = "abcdefghijklmnopqrstuvwxyz";
        let chunks = chunk(text, 10, 3).unwrap();
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["abcdefghij", "hijklmnopq", "opqrstuvwx", "vwxyz"]);
        assert_eq!(
            chunks.iter().map(|c| c.start_offset).collect::<Vec<_>>(),
            vec![0, 7, 14, 21]
        );
        assert_eq!(chunks.iter().map(|c| c.index).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn exact_fit_does_not_emit_tail() {
        // 1000 chars, size 400, overlap 100: [0,400) [300,700) [600,1000)
        let text = "x".repeat(1000);
        let chunks = chunk(&text, 400, 100).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].start_offset, 600);
        assert_eq!(chunks[2].char_len(), 400);
    }

    #[test]
    fn count_and_coverage_hold_across_lengths() {
        for (size, overlap) in [(10, 1), (10, 9), (7, 3), (1000, 200)] {
            for len in [1, 2, 9, 10, 11, 17, 64, 999, 1000, 1001, 2500] {
                let text: String = (0..len).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
                let chunks = chunk(&text, size, overlap).unwrap();
                assert_eq!(
                    chunks.len(),
                    expected_count(len, size, overlap),
                    "len={len} size={size} overlap={overlap}"
                );

                let mut covered = vec![false; len];
                for c in &chunks {
                    assert!(c.char_len() <= size);
                    let expected: String = text.chars().skip(c.start_offset).take(c.char_len()).collect();
                    assert_eq!(c.text, expected);
                    for slot in covered.iter_mut().skip(c.start_offset).take(c.char_len()) {
                        *slot = true;
                    }
                }
                assert!(covered.iter().all(|c| *c), "len={len} not fully covered");

                for pair in chunks.windows(2) {
                    let prev_end = pair[0].start_offset + pair[0].char_len();
                    assert_eq!(prev_end - pair[1].start_offset, overlap);
                }
            }
        }
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let text = "•é漢字•é漢字•é";
        let chunks = chunk(text, 4, 1).unwrap();
        assert_eq!(chunks[0].text, "•é漢字");
        assert_eq!(chunks[1].text, "字•é漢");
        assert_eq!(chunks[1].start_offset, 3);
        let total_chars = text.chars().count();
        let last = chunks.last().unwrap();
        assert_eq!(last.start_offset + last.char_len(), total_chars);
    }
}
