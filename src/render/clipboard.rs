use std::collections::HashMap;
use std::io::Write;
use std::time::{Duration, Instant};

use base64::Engine;

use crate::error::{Result, SolanaAgentChatError};

pub const COPY_ACKNOWLEDGEMENT: Duration = Duration::from_secs(2);

pub trait Clipboard {
    fn copy(&mut self, text: &str) -> Result<()>;
}

/// Asks the terminal to set the system clipboard with an OSC 52 sequence.
pub struct Osc52Clipboard<W: Write> {
    out: W,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl Osc52Clipboard<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

pub fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn copy(&mut self, text: &str) -> Result<()> {
        self.out
            .write_all(osc52_sequence(text).as_bytes())
            .and_then(|_| self.out.flush())
            .map_err(|e| SolanaAgentChatError::Runtime(format!("clipboard write failed: {e}")))
    }
}

/// Remembers which values were copied recently so the UI can show a short
/// "copied" mark. Nothing is retried.
#[derive(Debug, Default)]
pub struct CopyTracker {
    copied_at: HashMap<String, Instant>,
}

impl CopyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, value: &str, now: Instant) {
        self.copied_at.retain(|_, at| now.duration_since(*at) < COPY_ACKNOWLEDGEMENT);
        self.copied_at.insert(value.to_string(), now);
    }

    pub fn is_copied(&self, value: &str, now: Instant) -> bool {
        self.copied_at
            .get(value)
            .is_some_and(|at| now.duration_since(*at) < COPY_ACKNOWLEDGEMENT)
    }

    pub fn copy_with(
        &mut self,
        clipboard: &mut dyn Clipboard,
        value: &str,
        now: Instant,
    ) -> Result<()> {
        clipboard.copy(value)?;
        self.record(value, now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn osc52_wraps_base64_payload() {
        assert_eq!(osc52_sequence("abc"), "\x1b]52;c;YWJj\x07");
    }

    #[test]
    fn writes_sequence_to_sink() {
        let mut clipboard = Osc52Clipboard::new(Vec::new());
        clipboard.copy("wallet").unwrap();
        let written = String::from_utf8(clipboard.into_inner()).unwrap();
        assert_eq!(written, osc52_sequence("wallet"));
    }

    #[test]
    fn acknowledgement_lasts_two_seconds() {
        let start = Instant::now();
        let mut tracker = CopyTracker::new();
        tracker.record("addr", start);
        assert!(tracker.is_copied("addr", start + Duration::from_millis(1999)));
        assert!(!tracker.is_copied("addr", start + Duration::from_secs(2)));
        assert!(!tracker.is_copied("other", start));
    }

    #[test]
    fn failed_copy_is_not_acknowledged() {
        struct Broken;
        impl Clipboard for Broken {
            fn copy(&mut self, _text: &str) -> Result<()> {
                Err(SolanaAgentChatError::Runtime("no terminal".to_string()))
            }
        }

        let now = Instant::now();
        let mut tracker = CopyTracker::new();
        assert!(tracker.copy_with(&mut Broken, "addr", now).is_err());
        assert!(!tracker.is_copied("addr", now));
    }
}
