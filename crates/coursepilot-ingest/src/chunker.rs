//! Sentence-aware overlapping text windows.

/// Split text into sentences. A sentence ends at '.', '!' or '?'
/// followed by whitespace (or end of input). No lookbehind for
/// abbreviations — occasional over-splitting is acceptable here.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            let next_is_break = chars.peek().is_none_or(|n| n.is_whitespace());
            if next_is_break {
                let trimmed = current.trim();
                if !trimmed.is_empty() {
                    sentences.push(trimmed.to_string());
                }
                current.clear();
            }
        }
    }
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
    sentences
}

/// Split `text` into windows of at most `chunk_size` characters with
/// roughly `overlap` characters shared between consecutive windows,
/// breaking at sentence boundaries when possible. A single sentence
/// longer than `chunk_size` is hard-split at word boundaries.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return Vec::new();
    }
    if normalized.len() <= chunk_size {
        return vec![normalized];
    }

    let mut chunks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_len = 0usize;

    for sentence in split_sentences(&normalized) {
        if sentence.len() > chunk_size {
            // Oversized sentence: flush what we have, then hard-split.
            if !current.is_empty() {
                chunks.push(current.join(" "));
                current.clear();
                current_len = 0;
            }
            chunks.extend(split_words(&sentence, chunk_size));
            continue;
        }

        let sep = if current.is_empty() { 0 } else { 1 };
        if current_len + sep + sentence.len() > chunk_size && !current.is_empty() {
            chunks.push(current.join(" "));
            // Seed the next window with trailing sentences up to `overlap` chars.
            let mut tail: Vec<String> = Vec::new();
            let mut tail_len = 0usize;
            for prev in current.iter().rev() {
                if tail_len + prev.len() > overlap {
                    break;
                }
                tail_len += prev.len() + 1;
                tail.push(prev.clone());
            }
            tail.reverse();
            current = tail;
            current_len = current.iter().map(|s| s.len() + 1).sum::<usize>().saturating_sub(1);
        }

        if current.is_empty() {
            current_len = sentence.len();
        } else {
            current_len += 1 + sentence.len();
        }
        current.push(sentence);
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }
    chunks
}

/// Hard-split an oversized sentence into word-boundary windows.
fn split_words(sentence: &str, chunk_size: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for word in sentence.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > chunk_size {
            pieces.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}
