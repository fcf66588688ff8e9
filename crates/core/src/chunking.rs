use crate::error::ConfigurationError;
use crate::extractor::PageText;
use crate::models::DocumentChunk;
use uuid::Uuid;

/// Chunk sizing, in characters.
#[derive(Debug, Clone, Copy)]
pub struct ChunkingOptions {
    pub max_chars: usize,
    pub overlap_chars: usize,
}

impl Default for ChunkingOptions {
    fn default() -> Self {
        Self {
            max_chars: 1_000,
            overlap_chars: 200,
        }
    }
}

impl ChunkingOptions {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_chars == 0 {
            return Err(ConfigurationError::ZeroChunkSize);
        }
        if self.overlap_chars >= self.max_chars {
            return Err(ConfigurationError::OverlapTooLarge {
                max_chars: self.max_chars,
                overlap_chars: self.overlap_chars,
            });
        }
        Ok(())
    }
}

/// Split a document's pages into overlapping chunks.
///
/// Page text is concatenated with a paragraph break between pages, then cut
/// along a hierarchy of boundaries: paragraph break, line break, word break,
/// and finally an arbitrary character cut. Within the size limit the latest
/// eligible boundary wins, so chunks stay as close to `max_chars` as the
/// text allows. Each chunk after the first starts exactly `overlap_chars`
/// characters before the end of its predecessor.
///
/// All arithmetic is in characters, not bytes. Output order is the document
/// order, so identical input yields identical chunks on every call.
pub fn split_pages(
    pages: &[PageText],
    document: &str,
    options: &ChunkingOptions,
) -> Result<Vec<DocumentChunk>, ConfigurationError> {
    options.validate()?;

    let mut text: Vec<char> = Vec::new();
    let mut page_starts: Vec<(usize, u32)> = Vec::new();

    for page in pages {
        if page.text.trim().is_empty() {
            continue;
        }
        if !text.is_empty() {
            text.extend("\n\n".chars());
        }
        page_starts.push((text.len(), page.number));
        text.extend(page.text.trim_end().chars());
    }

    if text.is_empty() {
        return Ok(Vec::new());
    }

    let mut chunks = Vec::new();
    let mut start = 0usize;

    loop {
        let end_limit = start + options.max_chars;
        if end_limit >= text.len() {
            chunks.push(make_chunk(&text, start, text.len(), document, &page_starts));
            break;
        }

        let end = best_break(&text, start, end_limit, options.overlap_chars);
        chunks.push(make_chunk(&text, start, end, document, &page_starts));
        start = end - options.overlap_chars;
    }

    Ok(chunks)
}

/// Pick the cut point for a chunk spanning `[start, end_limit)`.
///
/// A boundary is eligible only if it leaves the next chunk start past the
/// current one (`end > start + overlap`), otherwise the pass falls through
/// to the next boundary kind and ultimately to a hard character cut.
fn best_break(text: &[char], start: usize, end_limit: usize, overlap: usize) -> usize {
    let floor = start + overlap;

    let paragraph = (start..end_limit.saturating_sub(1))
        .rev()
        .find(|&at| text[at] == '\n' && text[at + 1] == '\n');
    if let Some(at) = paragraph {
        if at > floor {
            return at;
        }
    }

    let line = (start..end_limit).rev().find(|&at| text[at] == '\n');
    if let Some(at) = line {
        if at > floor {
            return at;
        }
    }

    let word = (start..end_limit).rev().find(|&at| text[at] == ' ');
    if let Some(at) = word {
        if at > floor {
            return at;
        }
    }

    end_limit
}

fn make_chunk(
    text: &[char],
    start: usize,
    end: usize,
    document: &str,
    page_starts: &[(usize, u32)],
) -> DocumentChunk {
    let page = page_starts
        .iter()
        .take_while(|(offset, _)| *offset <= start)
        .last()
        .map(|(_, number)| *number)
        .unwrap_or(1);

    DocumentChunk {
        chunk_id: Uuid::new_v4(),
        document: document.to_string(),
        page,
        text: text[start..end].iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: u32, text: &str) -> PageText {
        PageText {
            number,
            text: text.to_string(),
        }
    }

    fn options(max_chars: usize, overlap_chars: usize) -> ChunkingOptions {
        ChunkingOptions {
            max_chars,
            overlap_chars,
        }
    }

    #[test]
    fn overlap_must_be_smaller_than_max() {
        let result = split_pages(&[page(1, "text")], "doc.pdf", &options(100, 100));
        assert!(matches!(
            result,
            Err(ConfigurationError::OverlapTooLarge { .. })
        ));

        let result = split_pages(&[page(1, "text")], "doc.pdf", &options(0, 0));
        assert!(matches!(result, Err(ConfigurationError::ZeroChunkSize)));
    }

    #[test]
    fn no_chunk_exceeds_max_chars() {
        let body = "lorem ipsum dolor sit amet consectetur adipiscing elit sed do "
            .repeat(40);
        let chunks = split_pages(&[page(1, &body)], "doc.pdf", &options(100, 20)).unwrap();

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 100);
        }
    }

    #[test]
    fn consecutive_chunks_overlap_exactly() {
        let body = "word ".repeat(400);
        let opts = options(100, 20);
        let chunks = split_pages(&[page(1, &body)], "doc.pdf", &opts).unwrap();

        assert!(chunks.len() > 2);
        for pair in chunks.windows(2) {
            let previous: Vec<char> = pair[0].text.chars().collect();
            let next: Vec<char> = pair[1].text.chars().collect();
            let tail = &previous[previous.len() - opts.overlap_chars..];
            assert_eq!(tail, &next[..opts.overlap_chars]);
        }
    }

    #[test]
    fn paragraph_break_is_preferred() {
        let body = format!("{}\n\n{}", "a".repeat(500), "b".repeat(600));
        let chunks = split_pages(&[page(1, &body)], "doc.pdf", &options(1_000, 200)).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "a".repeat(500));
        assert!(chunks[1].text.starts_with(&"a".repeat(200)));
        assert!(chunks[1].text.ends_with(&"b".repeat(600)));
    }

    #[test]
    fn word_break_beats_character_cut() {
        let body = format!("{} {}", "a".repeat(60), "b".repeat(60));
        let chunks = split_pages(&[page(1, &body)], "doc.pdf", &options(100, 10)).unwrap();

        assert_eq!(chunks[0].text, "a".repeat(60));
    }

    #[test]
    fn unbroken_text_falls_back_to_character_cut() {
        let body = "x".repeat(100);
        let chunks = split_pages(&[page(1, &body)], "doc.pdf", &options(40, 10)).unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].text.len(), 40);
        assert_eq!(chunks[1].text.len(), 40);
        assert_eq!(chunks[2].text.len(), 40);
    }

    #[test]
    fn input_shorter_than_overlap_still_yields_one_chunk() {
        let chunks = split_pages(&[page(1, "hi")], "doc.pdf", &options(1_000, 200)).unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "hi");
    }

    #[test]
    fn chunks_carry_the_page_of_their_first_character() {
        let pages = [page(1, &"a".repeat(100)), page(2, &"b".repeat(300))];
        let chunks = split_pages(&pages, "doc.pdf", &options(150, 20)).unwrap();

        assert!(chunks.len() >= 2);
        assert_eq!(chunks[0].page, 1);
        assert_eq!(chunks.last().unwrap().page, 2);
        assert_eq!(chunks[0].document, "doc.pdf");
    }

    #[test]
    fn blank_pages_produce_no_chunks() {
        let chunks = split_pages(&[page(1, "  \n ")], "doc.pdf", &options(100, 10)).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn three_page_document_with_default_sizing() {
        let paragraph = "The results of the measurement campaign were consistent with \
                         the model predictions across every tested configuration. "
            .repeat(5);
        let pages = [
            page(1, &paragraph),
            page(2, &paragraph),
            page(3, &paragraph),
        ];
        let opts = ChunkingOptions::default();
        let chunks = split_pages(&pages, "report.pdf", &opts).unwrap();

        assert!(chunks.len() >= 3);
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= opts.max_chars);
        }
        for pair in chunks.windows(2) {
            let previous: Vec<char> = pair[0].text.chars().collect();
            let next: Vec<char> = pair[1].text.chars().collect();
            let tail = &previous[previous.len() - opts.overlap_chars..];
            assert_eq!(tail, &next[..opts.overlap_chars]);
        }
    }
}
