use regex::Regex;

use super::patterns::{
    ADDRESS, BOLD_MARKER, MARKDOWN_LINK, TRAILING_TRANSACTION_LABEL, TRANSACTION, URL, WHITESPACE,
};
use super::response::StructuredData;

const SIGNATURE_MIN: usize = 88;
const SIGNATURE_MAX: usize = 176;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Address(String),
}

/// Prose split into plain and address segments, with any transaction
/// signature lifted out so it can be shown on its own.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HighlightedText {
    pub segments: Vec<Segment>,
    pub transaction: Option<String>,
}

impl HighlightedText {
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Address(address) => Some(address.as_str()),
            Segment::Text(_) => None,
        })
    }

    /// The prose with addresses put back in place.
    pub fn plain(&self) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Text(text) | Segment::Address(text) => text.as_str(),
            })
            .collect()
    }
}

fn strip_markup(text: &str) -> String {
    let text = MARKDOWN_LINK.replace_all(text, "$1");
    let text = URL.replace_all(&text, "");
    BOLD_MARKER.replace_all(&text, "").into_owned()
}

fn normalize_base58(raw: &str) -> String {
    WHITESPACE.replace_all(raw, "").into_owned()
}

// The capture class admits spaces, so it can take in prose on either side
// of the signature. A piece of full signature length wins outright.
// Otherwise the longest piece anchors the join, and the shortest run of
// neighbouring pieces around it that reaches signature length is used.
// Ties go to the run whose length is closest to a whole signature.
fn signature_from_capture(capture: &str) -> Option<String> {
    let pieces: Vec<&str> = capture.split_whitespace().collect();
    let signature_len = SIGNATURE_MIN..=SIGNATURE_MAX;
    if let Some(whole) = pieces.iter().find(|piece| signature_len.contains(&piece.len())) {
        return Some((*whole).to_string());
    }

    let anchor = pieces
        .iter()
        .enumerate()
        .max_by_key(|(_, piece)| piece.len())
        .map(|(index, _)| index)?;

    let mut best: Option<((usize, usize), usize, usize)> = None;
    for start in 0..=anchor {
        let mut len = 0;
        for end in start..pieces.len() {
            len += pieces[end].len();
            if end < anchor || len < SIGNATURE_MIN {
                continue;
            }
            if len <= SIGNATURE_MAX {
                let rank = (end - start, len - SIGNATURE_MIN);
                if best.map_or(true, |(best_rank, _, _)| rank < best_rank) {
                    best = Some((rank, start, end));
                }
            }
            break;
        }
    }
    let (_, start, end) = best?;
    Some(pieces[start..=end].concat())
}

fn find_transaction(text: &str, structured: Option<&StructuredData>) -> Option<String> {
    if let Some(transaction) = structured.and_then(StructuredData::transaction) {
        let transaction = normalize_base58(&transaction);
        if !transaction.is_empty() {
            return Some(transaction);
        }
    }
    let captures = TRANSACTION.captures(text)?;
    signature_from_capture(captures.get(1)?.as_str())
}

fn remove_transaction(text: &str, transaction: &str) -> String {
    let spread = transaction
        .chars()
        .map(|ch| regex::escape(&ch.to_string()))
        .collect::<Vec<_>>()
        .join(r"\s*");
    let text = match Regex::new(&spread) {
        Ok(spread) => spread.replace_all(text, "").into_owned(),
        Err(err) => {
            tracing::debug!(error = %err, "Could not build signature matcher");
            text.replace(transaction, "")
        }
    };
    let text = TRAILING_TRANSACTION_LABEL.replace(&text, "");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

fn segment(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;
    for found in ADDRESS.find_iter(text) {
        if found.start() > last {
            segments.push(Segment::Text(text[last..found.start()].to_string()));
        }
        segments.push(Segment::Address(found.as_str().to_string()));
        last = found.end();
    }
    if last < text.len() {
        segments.push(Segment::Text(text[last..].to_string()));
    }
    segments
}

pub fn highlight(text: &str, structured: Option<&StructuredData>) -> HighlightedText {
    let cleaned = strip_markup(text);
    match find_transaction(&cleaned, structured) {
        Some(transaction) => {
            let prose = remove_transaction(&cleaned, &transaction);
            HighlightedText {
                segments: segment(&prose),
                transaction: Some(transaction),
            }
        }
        None => HighlightedText {
            segments: segment(&cleaned),
            transaction: None,
        },
    }
}
