//! Markdown renderer and chunker for heterogeneous tool output
//!
//! Input is any `serde_json::Value`. Text payloads are located by an ordered
//! chain of probes, HTML is flattened, and the result is either one bounded
//! snippet or a list of paragraph-aligned chunks. Malformed input degrades
//! to "no text found"; nothing here returns an error.

pub mod chunk;
pub mod html;
pub mod markdown;
pub mod probe;

pub use chunk::paragraph_chunks;
pub use html::{html_to_text, looks_like_html, strip_tags};
pub use markdown::{
    CHARS_PER_TOKEN, DEFAULT_MAX_TOKENS, MarkdownChunk, NO_TEXT_PLACEHOLDER, RenderMode,
    RenderOptions, RenderedMarkdown, render_structured_result,
};
pub use probe::{TextEntry, collect_text_entries};
