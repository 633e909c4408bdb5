use super::highlight::{highlight, HighlightedText};
use super::patterns::{
    MINT_ADDRESS_PHRASE, TOKEN_NAME, TOKEN_SUPPLY, TOKEN_SYMBOL, WALLET_ADDRESS,
};
use super::response::{parse_response, ParsedResponse};

pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    TokenCreated {
        name: String,
        symbol: String,
        /// Digits only; separators from the reply are dropped.
        supply: String,
        mint_address: String,
    },
    Balance {
        balance: f64,
        wallet: String,
    },
    Price {
        price: String,
        token_id: String,
    },
    Transaction(HighlightedText),
    WalletAddress(String),
    Error(String),
    Text(HighlightedText),
}

/// Rendering rules in precedence order. A rule that does not find everything
/// it needs yields nothing and the next rule is tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    TokenCreation,
    Balance,
    Price,
    Transaction,
    WalletAddress,
    Error,
    Text,
}

pub const MATCHERS: [Rule; 7] = [
    Rule::TokenCreation,
    Rule::Balance,
    Rule::Price,
    Rule::Transaction,
    Rule::WalletAddress,
    Rule::Error,
    Rule::Text,
];

fn capture(regex: &regex::Regex, text: &str) -> Option<String> {
    regex
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|found| found.as_str().to_string())
}

fn token_creation(parsed: &ParsedResponse) -> Option<Fragment> {
    let text = &parsed.clean_text;
    if !(text.contains("token") && text.contains("successfully deployed")) {
        return None;
    }
    let mint_address = parsed
        .structured_data
        .as_ref()
        .and_then(|data| data.mint_address())
        .or_else(|| capture(&MINT_ADDRESS_PHRASE, text))?;
    let name = capture(&TOKEN_NAME, text)?;
    let symbol = capture(&TOKEN_SYMBOL, text)?;
    let supply = capture(&TOKEN_SUPPLY, text)?.replace(',', "");
    Some(Fragment::TokenCreated {
        name,
        symbol,
        supply,
        mint_address,
    })
}

fn balance(parsed: &ParsedResponse) -> Option<Fragment> {
    let data = parsed.structured_data.as_ref()?;
    Some(Fragment::Balance {
        balance: data.balance()?,
        wallet: data.wallet()?,
    })
}

fn price(parsed: &ParsedResponse) -> Option<Fragment> {
    let data = parsed.structured_data.as_ref()?;
    Some(Fragment::Price {
        price: data.price_in_usdc()?,
        token_id: data.token_id()?,
    })
}

fn transaction(parsed: &ParsedResponse) -> Option<Fragment> {
    let lower = parsed.clean_text.to_lowercase();
    if !(lower.contains("transaction") || lower.contains("signature")) {
        return None;
    }
    Some(Fragment::Transaction(highlight(
        &parsed.clean_text,
        parsed.structured_data.as_ref(),
    )))
}

fn wallet_address(parsed: &ParsedResponse) -> Option<Fragment> {
    if !parsed.clean_text.to_lowercase().contains("wallet address") {
        return None;
    }
    capture(&WALLET_ADDRESS, &parsed.clean_text).map(Fragment::WalletAddress)
}

fn error(parsed: &ParsedResponse) -> Option<Fragment> {
    let data = parsed.structured_data.as_ref().filter(|data| data.is_error())?;
    Some(Fragment::Error(
        data.message()
            .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
    ))
}

impl Rule {
    pub fn apply(self, parsed: &ParsedResponse) -> Option<Fragment> {
        match self {
            Rule::TokenCreation => token_creation(parsed),
            Rule::Balance => balance(parsed),
            Rule::Price => price(parsed),
            Rule::Transaction => transaction(parsed),
            Rule::WalletAddress => wallet_address(parsed),
            Rule::Error => error(parsed),
            Rule::Text => Some(Fragment::Text(highlight(
                &parsed.clean_text,
                parsed.structured_data.as_ref(),
            ))),
        }
    }
}

/// First matching rule and the fragment it produced.
pub fn classify_parsed(parsed: &ParsedResponse) -> (Rule, Fragment) {
    for rule in MATCHERS {
        if let Some(fragment) = rule.apply(parsed) {
            return (rule, fragment);
        }
    }
    (
        Rule::Text,
        Fragment::Text(highlight(&parsed.clean_text, None)),
    )
}

pub fn classify(content: &str) -> Fragment {
    let parsed = parse_response(content);
    let (rule, fragment) = classify_parsed(&parsed);
    tracing::trace!(rule = ?rule, "Classified agent reply");
    fragment
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALLET: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";

    fn rule_for(content: &str) -> Rule {
        classify_parsed(&parse_response(content)).0
    }

    #[test]
    fn balance_json_selects_balance_card() {
        let fragment = classify(r#"{"status":"success","balance":145.32,"wallet":"4Nd1mX9...wallet"}"#);
        assert_eq!(
            fragment,
            Fragment::Balance {
                balance: 145.32,
                wallet: "4Nd1mX9...wallet".to_string(),
            }
        );
    }

    #[test]
    fn balance_beats_transaction_wording() {
        let content = format!(
            r#"Your last transaction settled. {{"status":"success","balance":2,"wallet":"{WALLET}"}}"#
        );
        assert_eq!(rule_for(&content), Rule::Balance);
    }

    #[test]
    fn balance_found_after_a_non_json_brace_span() {
        let content = format!(
            r#"Template {{name}} then {{"status":"success","balance":2.5,"wallet":"{WALLET}"}}"#
        );
        assert_eq!(
            classify(&content),
            Fragment::Balance {
                balance: 2.5,
                wallet: WALLET.to_string(),
            }
        );
    }

    #[test]
    fn wallet_then_balance_tool_output_selects_balance_card() {
        let content = format!(
            r#"{{"status":"success","wallet":"{WALLET}"}}{{"status":"success","balance":1.5,"wallet":"{WALLET}"}} You hold 1.5 SOL."#
        );
        assert_eq!(rule_for(&content), Rule::Balance);
    }

    #[test]
    fn zero_balance_still_counts() {
        let content = format!(r#"{{"status":"success","balance":0,"wallet":"{WALLET}"}}"#);
        assert_eq!(rule_for(&content), Rule::Balance);
    }

    #[test]
    fn incomplete_balance_falls_through() {
        assert_eq!(rule_for(r#"{"status":"success","balance":2}"#), Rule::Text);
    }

    #[test]
    fn price_needs_both_fields() {
        let fragment = classify(
            r#"{"status":"success","tokenId":"So11111111111111111111111111111111111111112","priceInUSDC":"187.4213"}"#,
        );
        assert_eq!(
            fragment,
            Fragment::Price {
                price: "187.4213".to_string(),
                token_id: "So11111111111111111111111111111111111111112".to_string(),
            }
        );
        assert_eq!(rule_for(r#"{"priceInUSDC":"1.0"}"#), Rule::Text);
    }

    #[test]
    fn token_creation_requires_every_field() {
        let content = format!(
            r#"Your token "Meta School" with symbol "MSC" and a supply of 1,000,000 was successfully deployed. The mint address is {WALLET}"#
        );
        assert_eq!(
            classify(&content),
            Fragment::TokenCreated {
                name: "Meta School".to_string(),
                symbol: "MSC".to_string(),
                supply: "1000000".to_string(),
                mint_address: WALLET.to_string(),
            }
        );

        let missing_symbol =
            r#"Your token "Meta School" was successfully deployed with a supply of 10"#;
        assert_eq!(rule_for(missing_symbol), Rule::Text);
    }

    #[test]
    fn transaction_wording_selects_transaction_block() {
        assert_eq!(
            rule_for("The signature was rejected by the cluster"),
            Rule::Transaction
        );
    }

    #[test]
    fn wallet_address_block_extracts_glued_address() {
        let content = format!("Your wallet address is {WALLET}Your balance is low");
        assert_eq!(classify(&content), Fragment::WalletAddress(WALLET.to_string()));
    }

    #[test]
    fn wallet_address_without_address_falls_through() {
        assert_eq!(rule_for("I could not find a wallet address"), Rule::Text);
    }

    #[test]
    fn error_status_uses_message_or_default() {
        assert_eq!(
            classify(r#"{"status":"error","message":"Insufficient balance"}"#),
            Fragment::Error("Insufficient balance".to_string())
        );
        assert_eq!(
            classify(r#"{"status":"error","code":7}"#),
            Fragment::Error(DEFAULT_ERROR_MESSAGE.to_string())
        );
    }

    #[test]
    fn malformed_json_renders_as_text() {
        match classify(r#"oops {"balance": } trailing"#) {
            Fragment::Text(highlighted) => {
                assert_eq!(highlighted.plain(), r#"oops {"balance": } trailing"#)
            }
            other => panic!("unexpected fragment: {other:?}"),
        }
    }

    #[test]
    fn matchers_end_with_the_catch_all() {
        assert_eq!(MATCHERS.last(), Some(&Rule::Text));
        assert_eq!(MATCHERS.first(), Some(&Rule::TokenCreation));
    }
}
