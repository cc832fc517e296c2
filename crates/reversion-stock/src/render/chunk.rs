//! Paragraph-aligned chunking

/// Separator between paragraphs inside a chunk
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Greedily pack blank-line separated paragraphs into chunks of at most
/// `max_chars` characters
///
/// Paragraphs are trimmed and empty ones dropped. Each paragraph is counted
/// with its two-character separator. A paragraph longer than the budget is
/// emitted whole as its own chunk. Whitespace-only input yields no chunks.
pub fn paragraph_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0;

    for paragraph in text.split(PARAGRAPH_SEPARATOR).map(str::trim).filter(|p| !p.is_empty()) {
        let cost = paragraph.chars().count() + PARAGRAPH_SEPARATOR.len();
        if current_len + cost > max_chars && !current.is_empty() {
            chunks.push(current.join(PARAGRAPH_SEPARATOR));
            current.clear();
            current_len = 0;
        }
        current.push(paragraph);
        current_len += cost;
    }

    if !current.is_empty() {
        chunks.push(current.join(PARAGRAPH_SEPARATOR));
    }
    chunks
}
