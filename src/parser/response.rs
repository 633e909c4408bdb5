use serde_json::{Map, Value};

use super::patterns::{
    ERROR_PREFIX, JSON_OBJECT, PROCEDURAL_PHRASE, PROCESS_PHRASE, WHITESPACE,
};

/// The JSON object embedded in an agent reply, with lenient accessors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructuredData {
    fields: Map<String, Value>,
}

impl StructuredData {
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    fn text(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }

    fn number(&self, key: &str) -> Option<f64> {
        match self.fields.get(key)? {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|value| value.is_finite())
    }

    pub fn status(&self) -> Option<String> {
        self.text("status")
    }

    pub fn is_error(&self) -> bool {
        self.status().as_deref() == Some("error")
    }

    pub fn balance(&self) -> Option<f64> {
        self.number("balance")
    }

    pub fn wallet(&self) -> Option<String> {
        self.text("wallet")
    }

    pub fn price_in_usdc(&self) -> Option<String> {
        self.text("priceInUSDC")
    }

    pub fn token_id(&self) -> Option<String> {
        self.text("tokenId")
    }

    pub fn mint_address(&self) -> Option<String> {
        self.text("mintAddress")
    }

    pub fn message(&self) -> Option<String> {
        self.text("message")
    }

    pub fn decimals(&self) -> Option<u32> {
        self.number("decimals")
            .filter(|value| *value >= 0.0)
            .map(|value| value as u32)
    }

    /// `transaction`, falling back to `signature`.
    pub fn transaction(&self) -> Option<String> {
        self.text("transaction").or_else(|| self.text("signature"))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedResponse {
    pub structured_data: Option<StructuredData>,
    pub clean_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JsonExtraction {
    Absent,
    Malformed,
    Object(StructuredData),
}

/// Every flat `{...}` candidate is tried in order. Candidates that do not
/// parse are skipped; parsed objects are merged with later fields winning,
/// so a reply carrying several tool results keeps all of their fields.
pub fn extract_json(content: &str) -> JsonExtraction {
    let mut merged: Option<Map<String, Value>> = None;
    let mut seen_candidate = false;
    for candidate in JSON_OBJECT.find_iter(content) {
        seen_candidate = true;
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(candidate.as_str()) {
            merged.get_or_insert_with(Map::new).extend(map);
        }
    }
    match merged {
        Some(fields) => JsonExtraction::Object(StructuredData::from_map(fields)),
        None if seen_candidate => JsonExtraction::Malformed,
        None => JsonExtraction::Absent,
    }
}

/// Strips embedded JSON, a leading error prefix and the model's narration of
/// which tool it is about to use, then collapses whitespace.
pub fn clean_text(content: &str) -> String {
    let text = JSON_OBJECT.replace_all(content, "");
    let text = ERROR_PREFIX.replace(&text, "");
    let text = PROCESS_PHRASE.replace(&text, "");
    let text = PROCEDURAL_PHRASE.replace(&text, "");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

pub fn parse_response(content: &str) -> ParsedResponse {
    match extract_json(content) {
        JsonExtraction::Malformed => {
            tracing::debug!("Embedded JSON did not parse; treating reply as plain text");
            ParsedResponse {
                structured_data: None,
                clean_text: content.trim().to_string(),
            }
        }
        JsonExtraction::Absent => ParsedResponse {
            structured_data: None,
            clean_text: clean_text(content),
        },
        JsonExtraction::Object(data) => ParsedResponse {
            structured_data: Some(data),
            clean_text: clean_text(content),
        },
    }
}
