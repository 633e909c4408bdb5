use crate::parser::patterns::{BOLD_SPAN, NUMBERED_ITEM};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Plain(String),
    Bold(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormattedLine {
    /// `"3"` for a line that starts with `3. `.
    pub number: Option<String>,
    pub spans: Vec<Span>,
}

fn bold_spans(line: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut last = 0;
    for captures in BOLD_SPAN.captures_iter(line) {
        let (Some(whole), Some(inner)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        if whole.start() > last {
            spans.push(Span::Plain(line[last..whole.start()].to_string()));
        }
        spans.push(Span::Bold(inner.as_str().to_string()));
        last = whole.end();
    }
    if last < line.len() {
        spans.push(Span::Plain(line[last..].to_string()));
    }
    spans
}

/// Numbered-list markers and `**bold**` spans; one entry per input line.
pub fn format_markdown(text: &str) -> Vec<FormattedLine> {
    text.split('\n')
        .map(|line| match NUMBERED_ITEM.captures(line) {
            Some(captures) => {
                let rest = captures.get(0).map_or(0, |found| found.end());
                FormattedLine {
                    number: captures.get(1).map(|found| found.as_str().to_string()),
                    spans: bold_spans(&line[rest..]),
                }
            }
            None => FormattedLine {
                number: None,
                spans: bold_spans(line),
            },
        })
        .collect()
}
