#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplorerKind {
    Address,
    Tx,
}

impl ExplorerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExplorerKind::Address => "address",
            ExplorerKind::Tx => "tx",
        }
    }
}

pub fn explorer_url(base_url: &str, kind: ExplorerKind, value: &str, network: &str) -> String {
    format!(
        "{}/{}/{}?cluster={}",
        base_url.trim_end_matches('/'),
        kind.as_str(),
        value,
        network
    )
}

/// Explorer host plus the single cluster every link points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explorer {
    pub base_url: String,
    pub network: String,
}

impl Explorer {
    pub fn new(base_url: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            network: network.into(),
        }
    }

    pub fn url(&self, kind: ExplorerKind, value: &str) -> String {
        explorer_url(&self.base_url, kind, value, &self.network)
    }
}

impl Default for Explorer {
    fn default() -> Self {
        Self::new("https://explorer.solana.com", "devnet")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_address_and_tx_links() {
        assert_eq!(
            explorer_url("https://explorer.solana.com", ExplorerKind::Address, "abc", "devnet"),
            "https://explorer.solana.com/address/abc?cluster=devnet"
        );
        let explorer = Explorer::new("https://explorer.solana.com/", "mainnet-beta");
        assert_eq!(
            explorer.url(ExplorerKind::Tx, "sig"),
            "https://explorer.solana.com/tx/sig?cluster=mainnet-beta"
        );
    }
}
