use crate::parser::{
    format_number, format_number_str, format_supply, to_fixed, truncate_address, Fragment,
    HighlightedText, Segment,
};

use super::explorer::{Explorer, ExplorerKind};

pub const ADDRESS_FOOTER: &str = "Use this address to receive tokens and NFTs on Solana";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Copy(String),
    Explore(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    TokenCreation,
    Balance,
    Price,
    Transaction,
    WalletAddress,
    Error,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: String,
    pub value: String,
    pub display: String,
    pub actions: Vec<Action>,
}

impl Field {
    fn plain(label: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: label.to_string(),
            display: value.clone(),
            value,
            actions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Address {
        value: String,
        display: String,
        actions: Vec<Action>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub kind: CardKind,
    pub headline: Option<String>,
    pub inline: Vec<Inline>,
    pub fields: Vec<Field>,
    pub footer: Option<String>,
}

fn inline_actions(inline: &Inline) -> &[Action] {
    match inline {
        Inline::Address { actions, .. } => actions,
        Inline::Text(_) => &[],
    }
}

impl Card {
    fn new(kind: CardKind) -> Self {
        Self {
            kind,
            headline: None,
            inline: Vec::new(),
            fields: Vec::new(),
            footer: None,
        }
    }

    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.inline
            .iter()
            .flat_map(inline_actions)
            .chain(self.fields.iter().flat_map(|field| field.actions.iter()))
    }

    /// Copyable values in display order, deduplicated.
    pub fn copy_targets(&self) -> Vec<&str> {
        let mut targets: Vec<&str> = Vec::new();
        for action in self.actions() {
            if let Action::Copy(value) = action {
                if !targets.contains(&value.as_str()) {
                    targets.push(value.as_str());
                }
            }
        }
        targets
    }
}

/// What a card needs beyond the fragment itself.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub explorer: Explorer,
    /// Live SOL price for the balance card, when one was fetched.
    pub sol_price: Option<f64>,
}

impl RenderContext {
    pub fn new(explorer: Explorer) -> Self {
        Self {
            explorer,
            sol_price: None,
        }
    }

    pub fn with_sol_price(mut self, sol_price: Option<f64>) -> Self {
        self.sol_price = sol_price;
        self
    }
}

/// USD value of a balance, two fixed digits; `"0"` without a price.
pub fn usd_value(balance: f64, sol_price: Option<f64>) -> String {
    match sol_price.filter(|price| price.is_finite()) {
        Some(price) => to_fixed(balance * price, 2),
        None => "0".to_string(),
    }
}

fn address_actions(explorer: &Explorer, value: &str) -> Vec<Action> {
    vec![
        Action::Copy(value.to_string()),
        Action::Explore(explorer.url(ExplorerKind::Address, value)),
    ]
}

fn address_field(label: &str, value: &str, explorer: &Explorer) -> Field {
    Field {
        label: label.to_string(),
        value: value.to_string(),
        display: value.to_string(),
        actions: address_actions(explorer, value),
    }
}

fn highlighted(kind: CardKind, text: &HighlightedText, explorer: &Explorer) -> Card {
    let mut card = Card::new(kind);
    card.inline = text
        .segments
        .iter()
        .map(|segment| match segment {
            Segment::Text(text) => Inline::Text(text.clone()),
            Segment::Address(address) => Inline::Address {
                value: address.clone(),
                display: truncate_address(address),
                actions: address_actions(explorer, address),
            },
        })
        .collect();
    if let Some(transaction) = &text.transaction {
        card.fields.push(Field {
            label: "Transaction ID".to_string(),
            value: transaction.clone(),
            display: truncate_address(transaction),
            actions: vec![
                Action::Copy(transaction.clone()),
                Action::Explore(explorer.url(ExplorerKind::Tx, transaction)),
            ],
        });
    }
    card
}

pub fn render(fragment: &Fragment, ctx: &RenderContext) -> Card {
    let explorer = &ctx.explorer;
    match fragment {
        Fragment::TokenCreated {
            name,
            symbol,
            supply,
            mint_address,
        } => {
            let mut card = Card::new(CardKind::TokenCreation);
            card.fields = vec![
                Field::plain("Name", name.clone()),
                Field::plain("Symbol", symbol.clone()),
                Field::plain("Total Supply", format_supply(supply)),
                address_field("Mint Address", mint_address, explorer),
            ];
            card
        }
        Fragment::Balance { balance, wallet } => {
            let mut card = Card::new(CardKind::Balance);
            card.headline = Some(format!("{} SOL", format_number(*balance, 4)));
            card.fields = vec![
                Field::plain("USD Value", format!("${}", usd_value(*balance, ctx.sol_price))),
                address_field("Wallet Address", wallet, explorer),
            ];
            card
        }
        Fragment::Price { price, token_id } => {
            let mut card = Card::new(CardKind::Price);
            card.headline = Some(format!("${} per SOL", format_number_str(price, 2)));
            card.fields = vec![Field {
                label: "Token".to_string(),
                value: token_id.clone(),
                display: truncate_address(token_id),
                actions: vec![Action::Explore(
                    explorer.url(ExplorerKind::Address, token_id),
                )],
            }];
            card
        }
        Fragment::Transaction(text) => highlighted(CardKind::Transaction, text, explorer),
        Fragment::WalletAddress(address) => {
            let mut card = Card::new(CardKind::WalletAddress);
            card.fields = vec![address_field("Wallet Address", address, explorer)];
            card.footer = Some(ADDRESS_FOOTER.to_string());
            card
        }
        Fragment::Error(message) => {
            let mut card = Card::new(CardKind::Error);
            card.inline = vec![Inline::Text(message.clone())];
            card
        }
        Fragment::Text(text) => highlighted(CardKind::Text, text, explorer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::classify;

    const WALLET: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";

    fn ctx() -> RenderContext {
        RenderContext::new(Explorer::default())
    }

    #[test]
    fn balance_card_shows_four_digits_and_wallet_actions() {
        let fragment =
            classify(r#"{"status":"success","balance":145.32,"wallet":"4Nd1mX9...wallet"}"#);
        let card = render(&fragment, &ctx());
        assert_eq!(card.kind, CardKind::Balance);
        assert_eq!(card.headline.as_deref(), Some("145.3200 SOL"));
        let wallet = &card.fields[1];
        assert_eq!(wallet.value, "4Nd1mX9...wallet");
        assert_eq!(
            wallet.actions,
            vec![
                Action::Copy("4Nd1mX9...wallet".to_string()),
                Action::Explore(
                    "https://explorer.solana.com/address/4Nd1mX9...wallet?cluster=devnet"
                        .to_string()
                ),
            ]
        );
        assert_eq!(card.fields[0].value, "$0");
    }

    #[test]
    fn balance_usd_uses_fetched_price() {
        let fragment = Fragment::Balance {
            balance: 2.5,
            wallet: WALLET.to_string(),
        };
        let card = render(&fragment, &ctx().with_sol_price(Some(150.0)));
        assert_eq!(card.fields[0].value, "$375.00");
    }

    #[test]
    fn price_card_formats_two_digits() {
        let fragment = Fragment::Price {
            price: "1187.456".to_string(),
            token_id: WALLET.to_string(),
        };
        let card = render(&fragment, &ctx());
        assert_eq!(card.headline.as_deref(), Some("$1,187.46 per SOL"));
        assert!(card.copy_targets().is_empty());
    }

    #[test]
    fn token_card_groups_supply() {
        let fragment = Fragment::TokenCreated {
            name: "Metaschool".to_string(),
            symbol: "Meta".to_string(),
            supply: "1000000".to_string(),
            mint_address: WALLET.to_string(),
        };
        let card = render(&fragment, &ctx());
        assert_eq!(card.fields[2].value, "1,000,000");
        assert_eq!(card.copy_targets(), vec![WALLET]);
    }

    #[test]
    fn wallet_block_has_footer() {
        let card = render(&Fragment::WalletAddress(WALLET.to_string()), &ctx());
        assert_eq!(card.footer.as_deref(), Some(ADDRESS_FOOTER));
        assert_eq!(card.copy_targets(), vec![WALLET]);
    }

    #[test]
    fn text_addresses_are_truncated_but_copy_full_value() {
        let fragment = classify(&format!("Funds arrived at {WALLET} today"));
        let card = render(&fragment, &ctx());
        assert_eq!(card.kind, CardKind::Text);
        assert_eq!(
            card.inline[1],
            Inline::Address {
                value: WALLET.to_string(),
                display: "7xKXtg...gAsU".to_string(),
                actions: address_actions(&Explorer::default(), WALLET),
            }
        );
    }

    #[test]
    fn transaction_links_to_tx_page() {
        let sig = "5VERv8NMvzbJMEkV8xnrLkEaWRtSz9CosKDYjCJjBRnbJLgp8uirBgmQpjKhoR4tjF3ZpRzrFmBV6UjKdiSZkQUW";
        let card = render(&classify(&format!("Sent. Transaction: {sig}")), &ctx());
        assert_eq!(card.kind, CardKind::Transaction);
        let field = &card.fields[0];
        assert_eq!(field.display, "5VERv8...kQUW");
        assert!(field
            .actions
            .contains(&Action::Explore(format!(
                "https://explorer.solana.com/tx/{sig}?cluster=devnet"
            ))));
    }

    #[test]
    fn usd_value_defaults_to_zero() {
        assert_eq!(usd_value(3.0, None), "0");
        assert_eq!(usd_value(3.0, Some(f64::NAN)), "0");
    }
}
