//! Passage splitting for indexing: chunk-splitter boundaries plus a char overlap between neighbours.

use chunk_splitter::{split, ChunkOptions};

pub const DEFAULT_PASSAGE_SIZE: usize = 2000;
pub const DEFAULT_PASSAGE_OVERLAP: usize = 300;

/// A piece of document text with its position in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    pub index: usize,
    pub text: String,
}

/// Splits `text` into passages of at most `size` chars. Every passage after the first starts with
/// the last `overlap` chars of the previous chunk. `overlap` is clamped below `size`.
pub fn split_passages(text: &str, size: usize, overlap: usize) -> Vec<Passage> {
    let size = size.max(1);
    let overlap = overlap.min(size - 1);
    let chunks = split(text, &ChunkOptions::new(size - overlap));

    let mut passages = Vec::with_capacity(chunks.len());
    let mut previous: Option<&str> = None;
    for (index, chunk) in chunks.iter().enumerate() {
        let text = match previous {
            Some(prev) if overlap > 0 => {
                let tail = char_tail(prev, overlap).trim_start();
                if tail.is_empty() {
                    chunk.clone()
                } else {
                    format!("{} {}", tail, chunk)
                        .chars()
                        .take(size)
                        .collect()
                }
            }
            _ => chunk.clone(),
        };
        passages.push(Passage { index, text });
        previous = Some(chunk);
    }
    passages
}

fn char_tail(s: &str, n: usize) -> &str {
    let count = s.chars().count();
    if count <= n {
        return s;
    }
    match s.char_indices().nth(count - n) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}
