//! # Chunk splitter
//!
//! Splits text that is too long for a single chat message into ordered chunks, preferring natural
//! break points over hard cuts.
//!
//! ## Break points
//!
//! Searched backward from the size boundary, in strict priority order:
//!
//! 1. paragraph (`"\n\n"`)
//! 2. markdown heading (`"\n#"`), only with [`ChunkOptions::with_heading_breaks`]
//! 3. line break (`"\n"`)
//! 4. sentence end (`". "`)
//! 5. space (`" "`)
//!
//! The first kind whose last occurrence lies at or beyond half the maximum size wins; otherwise the
//! text is cut at exactly the maximum size. Leading whitespace of the remainder is dropped, so
//! rejoining the chunks with the boundary whitespace restored gives back the source.
//!
//! Lengths are counted in `char`s, which is how Discord counts its message limit.

use tracing::debug;

/// Discord's hard limit for one message.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Chunk size used for follow-up messages; leaves room below [`DISCORD_MESSAGE_LIMIT`].
pub const DEFAULT_CHUNK_SIZE: usize = 1900;

/// What happens to the visible part of a delimiter at a chunk boundary.
///
/// Only sentence breaks carry a visible character (the period); whitespace at a boundary is
/// always dropped from the start of the next chunk and a heading `#` always starts the next chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DelimiterPolicy {
    /// The period stays at the end of the sentence it terminates.
    #[default]
    Retain,
    /// The chunk ends right before the delimiter; the period starts the next chunk.
    Exclude,
}

/// Parameters for [`split`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkOptions {
    pub max_chars: usize,
    pub heading_breaks: bool,
    pub delimiter: DelimiterPolicy,
}

impl ChunkOptions {
    /// Options with the given size, no heading breaks, and [`DelimiterPolicy::Retain`].
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars,
            heading_breaks: false,
            delimiter: DelimiterPolicy::Retain,
        }
    }

    /// Enables splitting before markdown headings (used for generated long-form content).
    pub fn with_heading_breaks(mut self, enabled: bool) -> Self {
        self.heading_breaks = enabled;
        self
    }

    pub fn with_delimiter(mut self, policy: DelimiterPolicy) -> Self {
        self.delimiter = policy;
        self
    }
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BreakPoint {
    Paragraph,
    Heading,
    Line,
    Sentence,
    Space,
}

const PRIORITY: [BreakPoint; 5] = [
    BreakPoint::Paragraph,
    BreakPoint::Heading,
    BreakPoint::Line,
    BreakPoint::Sentence,
    BreakPoint::Space,
];

impl BreakPoint {
    fn pattern(self) -> &'static str {
        match self {
            BreakPoint::Paragraph => "\n\n",
            BreakPoint::Heading => "\n#",
            BreakPoint::Line => "\n",
            BreakPoint::Sentence => ". ",
            BreakPoint::Space => " ",
        }
    }

    /// Bytes of the delimiter kept at the end of the chunk under [`DelimiterPolicy::Retain`].
    fn retained_len(self) -> usize {
        match self {
            BreakPoint::Sentence => 1,
            _ => 0,
        }
    }
}

/// Number of `char`s in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Splits `text` into chunks of at most `options.max_chars` chars each.
///
/// Empty input gives no chunks; input that already fits gives exactly one chunk equal to it.
/// Every chunk is non-empty. A `max_chars` of zero is treated as one.
pub fn split(text: &str, options: &ChunkOptions) -> Vec<String> {
    let max = options.max_chars.max(1);
    let min_offset = (max / 2).max(1);
    let mut chunks = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        let window_end = match remaining.char_indices().nth(max) {
            Some((idx, _)) => idx,
            None => {
                chunks.push(remaining.to_string());
                break;
            }
        };
        let window = &remaining[..window_end];
        let cut = find_cut(window, min_offset, options).unwrap_or(window_end);
        chunks.push(remaining[..cut].to_string());
        remaining = remaining[cut..].trim_start();
    }

    debug!(
        source_chars = char_len(text),
        max_chars = max,
        chunk_count = chunks.len(),
        "split text into chunks"
    );
    chunks
}

/// Byte offset in `window` where the current chunk ends, or None when only a hard cut is possible.
fn find_cut(window: &str, min_offset: usize, options: &ChunkOptions) -> Option<usize> {
    for point in PRIORITY {
        if point == BreakPoint::Heading && !options.heading_breaks {
            continue;
        }
        let Some(idx) = window.rfind(point.pattern()) else {
            continue;
        };
        if char_len(&window[..idx]) < min_offset {
            continue;
        }
        return Some(match options.delimiter {
            DelimiterPolicy::Retain => idx + point.retained_len(),
            DelimiterPolicy::Exclude => idx,
        });
    }
    None
}
