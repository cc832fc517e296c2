//! Snippet and chunked rendering of structured results

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use super::chunk::{PARAGRAPH_SEPARATOR, paragraph_chunks};
use super::html::{html_to_text, looks_like_html};
use super::probe::{TextEntry, collect_text_entries};

/// Approximate characters per model token
pub const CHARS_PER_TOKEN: usize = 4;
/// Token budget used when none is given
pub const DEFAULT_MAX_TOKENS: usize = 1200;
/// Floor on the character budget
pub const MIN_MAX_CHARS: usize = 256;
/// Snippet output when no text was found
pub const NO_TEXT_PLACEHOLDER: &str = "(no text available)";

const ENTRY_SEPARATOR: &str = "\n\n---\n\n";

/// Output shape
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// One bounded markdown string
    #[default]
    Snippet,
    /// Paragraph-aligned chunks
    Chunked,
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snippet" => Ok(Self::Snippet),
            "chunked" => Ok(Self::Chunked),
            other => Err(format!("unknown render mode '{other}', expected 'snippet' or 'chunked'")),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Snippet => f.write_str("snippet"),
            Self::Chunked => f.write_str("chunked"),
        }
    }
}

/// Rendering options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    #[serde(default)]
    pub mode: RenderMode,
    /// Approximate token budget; 0 selects [`DEFAULT_MAX_TOKENS`]
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

fn default_max_tokens() -> usize {
    DEFAULT_MAX_TOKENS
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            mode: RenderMode::Snippet,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl RenderOptions {
    pub fn new(mode: RenderMode, max_tokens: usize) -> Self {
        Self { mode, max_tokens }
    }

    /// Character budget derived from the token budget
    pub fn max_chars(&self) -> usize {
        let tokens = if self.max_tokens == 0 {
            DEFAULT_MAX_TOKENS
        } else {
            self.max_tokens
        };
        tokens.saturating_mul(CHARS_PER_TOKEN).max(MIN_MAX_CHARS)
    }
}

/// One chunk of chunked output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownChunk {
    pub index: usize,
    pub markdown: String,
    /// Character count of `markdown`
    pub length: usize,
}

/// Rendered output, tagged by `mode` when serialized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RenderedMarkdown {
    Snippet {
        markdown: String,
        /// Character count of `markdown`
        length: usize,
    },
    Chunked {
        chunks: Vec<MarkdownChunk>,
    },
}

impl RenderedMarkdown {
    pub fn mode(&self) -> RenderMode {
        match self {
            Self::Snippet { .. } => RenderMode::Snippet,
            Self::Chunked { .. } => RenderMode::Chunked,
        }
    }
}

/// Render an arbitrary structured result as markdown
///
/// Text is located with [`collect_text_entries`], HTML is flattened, and the
/// entries are packed according to `options`. Never fails: missing text
/// gives the placeholder snippet or an empty chunk list.
pub fn render_structured_result(structured: &Value, options: RenderOptions) -> RenderedMarkdown {
    let max_chars = options.max_chars();
    let entries: Vec<TextEntry> = collect_text_entries(structured)
        .into_iter()
        .map(|mut entry| {
            if looks_like_html(&entry.text) {
                entry.text = html_to_text(&entry.text);
            }
            entry
        })
        .collect();

    debug!(
        mode = %options.mode,
        entries = entries.len(),
        max_chars,
        "rendering structured result"
    );

    match options.mode {
        RenderMode::Snippet => render_snippet(&entries, max_chars),
        RenderMode::Chunked => render_chunks(&entries, max_chars),
    }
}

fn render_snippet(entries: &[TextEntry], max_chars: usize) -> RenderedMarkdown {
    let mut parts = Vec::new();
    let mut used = 0;

    for entry in entries {
        let mut piece = String::new();
        if !entry.meta.is_empty() {
            let lines: Vec<String> = entry
                .meta
                .iter()
                .map(|(key, value)| format!("- {key}: {value}"))
                .collect();
            piece.push('\n');
            piece.push_str(&lines.join("\n"));
            piece.push_str("\n\n");
        }
        piece.push_str(&entry.text);

        let piece_len = piece.chars().count();
        if used + piece_len > max_chars && used > 0 {
            break;
        }
        used += piece_len;
        parts.push(piece);
    }

    let joined = parts.join(ENTRY_SEPARATOR);
    let trimmed = joined.trim();
    let markdown = if trimmed.is_empty() {
        NO_TEXT_PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    };
    let length = markdown.chars().count();
    RenderedMarkdown::Snippet { markdown, length }
}

fn render_chunks(entries: &[TextEntry], max_chars: usize) -> RenderedMarkdown {
    let combined = entries
        .iter()
        .map(|e| e.text.as_str())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR);

    let chunks = paragraph_chunks(&combined, max_chars)
        .into_iter()
        .enumerate()
        .map(|(index, markdown)| MarkdownChunk {
            index,
            length: markdown.chars().count(),
            markdown,
        })
        .collect();
    RenderedMarkdown::Chunked { chunks }
}
