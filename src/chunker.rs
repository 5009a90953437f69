use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ConfigError;

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

lazy_static! {
    /// Break points, strongest first. A chunk ends right after a match.
    static ref SEPARATORS: [Regex; 4] = [
        Regex::new(r"\n[ \t]*\n").unwrap(),
        Regex::new(r"\n").unwrap(),
        Regex::new(r#"[.!?]["')\]]?\s"#).unwrap(),
        Regex::new(r"\s").unwrap(),
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub index: usize,
    pub text: String,
}

/// Splits text into overlapping windows of at most `chunk_size` characters.
///
/// Each window is cut at the strongest boundary available in its second
/// half (paragraph, line, sentence, word) and falls back to a hard cut.
/// The next window starts exactly `overlap` characters before the cut.
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl Chunker {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, ConfigError> {
        if chunk_size == 0 || overlap >= chunk_size {
            return Err(ConfigError::Invalid(format!(
                "chunk overlap ({overlap}) must be smaller than chunk size ({chunk_size})"
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    pub fn split(&self, text: &str) -> Vec<TextChunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        // Byte offset of every char, plus the end of the text.
        let offsets: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let char_count = offsets.len() - 1;

        let mut chunks = Vec::new();
        let mut start = 0;
        loop {
            if char_count - start <= self.chunk_size {
                chunks.push(TextChunk {
                    index: chunks.len(),
                    text: text[offsets[start]..].to_string(),
                });
                break;
            }

            let end = self.find_break(text, &offsets, start);
            chunks.push(TextChunk {
                index: chunks.len(),
                text: text[offsets[start]..offsets[end]].to_string(),
            });
            start = end - self.overlap;
        }

        chunks
    }

    /// Char index where the chunk starting at `start` should end.
    fn find_break(&self, text: &str, offsets: &[usize], start: usize) -> usize {
        let hi = start + self.chunk_size;
        let lo = start + (self.overlap + 1).max(self.chunk_size / 2);
        if lo >= hi {
            return hi;
        }

        let window_start = offsets[lo];
        let window = &text[window_start..offsets[hi]];
        for separator in SEPARATORS.iter() {
            if let Some(m) = separator.find_iter(window).last() {
                let byte_end = window_start + m.end();
                if let Ok(end) = offsets.binary_search(&byte_end) {
                    return end;
                }
            }
        }
        hi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_len(s: &str) -> usize {
        s.chars().count()
    }

    fn suffix(s: &str, n: usize) -> String {
        let chars: Vec<char> = s.chars().collect();
        chars[chars.len() - n..].iter().collect()
    }

    fn prefix(s: &str, n: usize) -> String {
        s.chars().take(n).collect()
    }

    fn assert_overlaps(chunks: &[TextChunk], overlap: usize) {
        for pair in chunks.windows(2) {
            assert_eq!(suffix(&pair[0].text, overlap), prefix(&pair[1].text, overlap));
        }
    }

    fn prose(sentences: usize) -> String {
        (0..sentences)
            .map(|i| format!("Sentence number {i} talks about retrieval and embeddings."))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_empty_input() {
        assert!(Chunker::default().split("").is_empty());
        assert!(Chunker::default().split("  \n\t ").is_empty());
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunks = Chunker::default().split("Paris is the capital of France.");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Paris is the capital of France.");
        assert_eq!(chunks[0].index, 0);
    }

    #[test]
    fn test_bounded_size_and_exact_overlap() {
        let text = prose(120);
        let chunks = Chunker::default().split(&text);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| char_len(&c.text) <= 1000));
        assert_overlaps(&chunks, 200);
        assert!(text.ends_with(&chunks.last().unwrap().text));
        assert!(chunks.iter().enumerate().all(|(i, c)| c.index == i));
    }

    #[test]
    fn test_prefers_sentence_boundaries() {
        let text = prose(60);
        let chunks = Chunker::default().split(&text);
        for chunk in &chunks[..chunks.len() - 1] {
            assert!(
                chunk.text.ends_with(". "),
                "chunk ended mid-sentence: {:?}",
                suffix(&chunk.text, 20)
            );
        }
    }

    #[test]
    fn test_prefers_paragraphs_over_sentences() {
        let para = prose(10);
        let text = format!("{para}\n\n{para}\n\n{para}\n\n{para}");
        let chunks = Chunker::default().split(&text);
        assert!(chunks[0].text.ends_with("\n\n"));
        assert_overlaps(&chunks, 200);
    }

    #[test]
    fn test_hard_cut_without_boundaries() {
        let text = "x".repeat(2500);
        let chunks = Chunker::default().split(&text);
        assert_eq!(
            chunks.iter().map(|c| char_len(&c.text)).collect::<Vec<_>>(),
            vec![1000, 1000, 900]
        );
        assert_overlaps(&chunks, 200);
    }

    #[test]
    fn test_multibyte_text() {
        let text = "é".repeat(1500);
        let chunks = Chunker::new(1000, 200).unwrap().split(&text);
        assert_eq!(chunks.len(), 2);
        assert_eq!(char_len(&chunks[0].text), 1000);
        assert_eq!(char_len(&chunks[1].text), 700);
    }

    #[test]
    fn test_deterministic() {
        let text = prose(80);
        let chunker = Chunker::default();
        assert_eq!(chunker.split(&text), chunker.split(&text));
    }

    #[test]
    fn test_custom_sizes() {
        let chunker = Chunker::new(20, 5).unwrap();
        let text = "This is a test. It has multiple sentences! How will it be split? Let's see.";
        let chunks = chunker.split(text);
        assert!(chunks.iter().all(|c| char_len(&c.text) <= 20));
        assert!(chunks.len() > 1);
        assert_overlaps(&chunks, 5);
    }

    #[test]
    fn test_rejects_overlap_not_smaller_than_size() {
        assert!(Chunker::new(100, 100).is_err());
        assert!(Chunker::new(0, 0).is_err());
    }
}
