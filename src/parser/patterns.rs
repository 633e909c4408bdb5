use once_cell::sync::Lazy;
use regex::Regex;

// Base58 alphabet: digits 1-9 and letters without 0, O, I and l.
pub const BASE58_CLASS: &str = "1-9A-HJ-NP-Za-km-z";

fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => panic!("invalid built-in pattern {pattern:?}: {err}"),
    }
}

/// Flat `{...}` spans; nested braces are not balanced.
pub static JSON_OBJECT: Lazy<Regex> = Lazy::new(|| compile(r"\{[^}]+\}"));

pub static ERROR_JSON: Lazy<Regex> = Lazy::new(|| compile(r#"\{"status":"error"[^}]+\}"#));

pub static ERROR_PREFIX: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)^(Error:|Failed:|Unable to:)\s*"));

pub static PROCESS_PHRASE: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)^(I will use|Let me use|I'll use|Let's use)[^.]+(to|and)[^.]+\.")
});

pub static PROCEDURAL_PHRASE: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)^(Let's proceed with|I will proceed to|Let me proceed)[^.]+\.")
});

pub static WHITESPACE: Lazy<Regex> = Lazy::new(|| compile(r"\s+"));

pub static ADDRESS: Lazy<Regex> =
    Lazy::new(|| compile(&format!("[{BASE58_CLASS}]{{32,44}}")));

/// An address followed by a non-base58 character, end of text, or a glued-on
/// "Your" (models often run the next sentence into the address).
pub static WALLET_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        "([{BASE58_CLASS}]{{32,44}})(?:Your|[^{BASE58_CLASS}]|$)"
    ))
});

/// Label-anchored signature. Only the label is case-insensitive; the
/// captured run may contain stray whitespace.
pub static TRANSACTION: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?i:transaction)(?:\s+(?i:id))?:?\s*([\s{BASE58_CLASS}]{{88,176}})"
    ))
});

pub static TRAILING_TRANSACTION_LABEL: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\s*Transaction(?:\s+ID)?:?\s*\.?\s*$"));

pub static MARKDOWN_LINK: Lazy<Regex> = Lazy::new(|| compile(r"\[([^\]]+)\]\([^)]+\)"));

pub static URL: Lazy<Regex> = Lazy::new(|| compile(r"https?://\S+"));

pub static MINT_ADDRESS_PHRASE: Lazy<Regex> =
    Lazy::new(|| compile(r"address is ([a-zA-Z0-9]+)"));

pub static TOKEN_NAME: Lazy<Regex> = Lazy::new(|| compile(r#"token "([^"]+)""#));

pub static TOKEN_SYMBOL: Lazy<Regex> = Lazy::new(|| compile(r#"symbol "([^"]+)""#));

pub static TOKEN_SUPPLY: Lazy<Regex> = Lazy::new(|| compile(r"supply of ([\d,]+)"));

pub static NUMBERED_ITEM: Lazy<Regex> = Lazy::new(|| compile(r"^(\d+)\.\s"));

pub static BOLD_SPAN: Lazy<Regex> = Lazy::new(|| compile(r"\*\*([^*]+)\*\*"));

pub static BOLD_MARKER: Lazy<Regex> = Lazy::new(|| compile(r"\*\*"));

pub fn is_base58(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() && !matches!(ch, '0' | 'O' | 'I' | 'l'))
}
