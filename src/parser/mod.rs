//! Heuristic extraction of structured data from free-form agent replies.

pub mod classify;
pub mod clean;
pub mod format;
pub mod highlight;
pub mod patterns;
pub mod response;

pub use classify::{classify, classify_parsed, Fragment, Rule, DEFAULT_ERROR_MESSAGE, MATCHERS};
pub use clean::clean_reply;
pub use format::{format_number, format_number_str, format_supply, to_fixed, truncate_address};
pub use highlight::{highlight, HighlightedText, Segment};
pub use response::{
    clean_text, extract_json, parse_response, JsonExtraction, ParsedResponse, StructuredData,
};
