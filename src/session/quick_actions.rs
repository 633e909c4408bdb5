pub const EXAMPLE_QUERIES: [&str; 7] = [
    "Show wallet address",
    "SOL balance",
    "SOL price",
    "Create NFT",
    "Stake SOL",
    "Send SOL",
    "Create Token",
];

pub const QUERY_TEMPLATES: [(&str, &str); 4] = [
    (
        "Create NFT",
        "Please mint me an new  NFT  collection\n\
         Token Name: Meta_School\n\
         Token Symbol: Meta\n\
         Metadata URI: https://scarlet-fancy-minnow-617.mypinata.cloud/ipfs/bafkreif43sp62yuy3sznrvqesk23tfnhpdck4npqowdwrhrzhsrgf5ao2e",
    ),
    (
        "Send SOL",
        "Send 0.0001 SOL to wallet address: YOUR_WALLET_ADDRESS",
    ),
    (
        "Stake SOL",
        "Please stake 5 SOL to validator address: YOUR_VALIDATOR_ADDRESS",
    ),
    (
        "Create Token",
        "Create a fungible token with:\n\
         Name: Metaschool\n\
         Symbol: Meta\n\
         Total Supply: 1000000",
    ),
];

/// The text a quick action puts in the input box: its template, or the
/// label itself when it has none.
pub fn quick_action_message(label: &str) -> &str {
    QUERY_TEMPLATES
        .iter()
        .find(|(name, _)| *name == label)
        .map_or(label, |(_, template)| *template)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templated_actions_expand() {
        assert_eq!(
            quick_action_message("Send SOL"),
            "Send 0.0001 SOL to wallet address: YOUR_WALLET_ADDRESS"
        );
        assert!(quick_action_message("Create Token").contains("\nSymbol: Meta\n"));
    }

    #[test]
    fn plain_actions_pass_through() {
        assert_eq!(quick_action_message("SOL balance"), "SOL balance");
    }

    #[test]
    fn every_template_has_an_example_button() {
        for (name, _) in QUERY_TEMPLATES {
            assert!(EXAMPLE_QUERIES.contains(&name));
        }
    }
}
