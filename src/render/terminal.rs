use std::fmt::Write as _;
use std::time::Instant;

use colored::Colorize;

use super::cards::{Action, Card, CardKind, Field, Inline};
use super::clipboard::CopyTracker;
use super::markdown::{format_markdown, Span};

pub fn network_badge(network: &str) -> String {
    format!("[{network}]").magenta().bold().to_string()
}

pub fn header(network: &str, connected: bool) -> String {
    let status = if connected {
        "Connected".green().to_string()
    } else {
        "Connect Wallet (/key)".blue().to_string()
    };
    format!(
        "{} {}  {}\n{}",
        "Solana Agent".cyan().bold(),
        network_badge(network),
        status,
        "═".repeat(50).dimmed()
    )
}

pub fn typing_indicator() -> String {
    "agent is typing...".dimmed().italic().to_string()
}

fn copy_marker(value: &str, targets: &[&str], tracker: &CopyTracker, now: Instant) -> String {
    let Some(index) = targets.iter().position(|target| *target == value) else {
        return String::new();
    };
    if tracker.is_copied(value, now) {
        format!(" {}", "✓ copied".green())
    } else {
        format!(" {}", format!("[/copy {}]", index + 1).dimmed())
    }
}

fn explore_links(actions: &[Action]) -> Vec<&str> {
    actions
        .iter()
        .filter_map(|action| match action {
            Action::Explore(url) => Some(url.as_str()),
            Action::Copy(_) => None,
        })
        .collect()
}

fn write_field(
    out: &mut String,
    field: &Field,
    targets: &[&str],
    tracker: &CopyTracker,
    now: Instant,
) {
    let display = if field.actions.is_empty() {
        field.display.normal()
    } else {
        field.display.white().bold()
    };
    let _ = writeln!(
        out,
        "  {:<15} {}{}",
        format!("{}:", field.label).dimmed(),
        display,
        copy_marker(&field.value, targets, tracker, now)
    );
    for url in explore_links(&field.actions) {
        let _ = writeln!(out, "  {:<15} {}", "", url.blue().underline());
    }
}

/// Terminal rendering of one agent card. Copyable values carry their
/// `/copy` index; recently copied values show a check mark instead.
pub fn format_card(card: &Card, tracker: &CopyTracker, now: Instant) -> String {
    let targets = card.copy_targets();
    let mut out = String::new();

    if let Some(headline) = &card.headline {
        let _ = writeln!(out, "  {}", headline.bold());
    }

    if !card.inline.is_empty() {
        let mut line = String::new();
        let mut links = Vec::new();
        for inline in &card.inline {
            match inline {
                Inline::Text(text) if card.kind == CardKind::Error => {
                    line.push_str(&text.red().to_string())
                }
                Inline::Text(text) => line.push_str(text),
                Inline::Address {
                    value,
                    display,
                    actions,
                } => {
                    line.push_str(&display.yellow().to_string());
                    line.push_str(&copy_marker(value, &targets, tracker, now));
                    links.extend(explore_links(actions));
                }
            }
        }
        let _ = writeln!(out, "  {line}");
        for url in links {
            let _ = writeln!(out, "    {}", url.blue().underline());
        }
    }

    for field in &card.fields {
        write_field(&mut out, field, &targets, tracker, now);
    }

    if let Some(footer) = &card.footer {
        let _ = writeln!(out, "  {}", footer.dimmed());
    }
    out
}

pub fn format_user_message(text: &str) -> String {
    let mut out = String::new();
    for line in format_markdown(text) {
        out.push_str("  ");
        if let Some(number) = &line.number {
            let _ = write!(out, "{} ", format!("{number}.").blue());
        }
        for span in &line.spans {
            match span {
                Span::Plain(text) => out.push_str(text),
                Span::Bold(text) => out.push_str(&text.bold().blue().to_string()),
            }
        }
        out.push('\n');
    }
    out
}

pub fn format_quick_actions<'a>(labels: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for (index, label) in labels.into_iter().enumerate() {
        let _ = writeln!(out, "  {} {}", format!("/use {}", index + 1).dimmed(), label);
    }
    out
}
