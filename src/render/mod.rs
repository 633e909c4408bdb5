pub mod cards;
pub mod clipboard;
pub mod explorer;
pub mod markdown;
pub mod terminal;

pub use cards::{
    render, usd_value, Action, Card, CardKind, Field, Inline, RenderContext, ADDRESS_FOOTER,
};
pub use clipboard::{Clipboard, CopyTracker, Osc52Clipboard, COPY_ACKNOWLEDGEMENT};
pub use explorer::{explorer_url, Explorer, ExplorerKind};
pub use markdown::{format_markdown, FormattedLine, Span};

use crate::interfaces::gateway::{ChatGateway, GatewayReply};
use crate::parser::parse_response;

pub const SOL_PRICE_QUERY: &str = "SOL price";

/// Live SOL price for the balance card, asked of the agent through the same
/// chat endpoint. Any failure yields `None`.
pub async fn fetch_sol_price(gateway: &dyn ChatGateway, private_key: &str) -> Option<f64> {
    let reply = match gateway.send(private_key, SOL_PRICE_QUERY).await {
        Ok(GatewayReply::Reply(reply)) => reply,
        Ok(GatewayReply::Rejected { status, .. }) => {
            tracing::debug!(status, "SOL price request rejected");
            return None;
        }
        Err(err) => {
            tracing::debug!(error = %err, "SOL price request failed");
            return None;
        }
    };

    let data = parse_response(&reply).structured_data?;
    if data.is_error() {
        return None;
    }
    data.price_in_usdc()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, SolanaAgentChatError};
    use async_trait::async_trait;

    struct Fixed(Result<GatewayReply>);

    #[async_trait]
    impl ChatGateway for Fixed {
        async fn send(&self, _key: &str, message: &str) -> Result<GatewayReply> {
            assert_eq!(message, SOL_PRICE_QUERY);
            match &self.0 {
                Ok(reply) => Ok(reply.clone()),
                Err(err) => Err(SolanaAgentChatError::Http(err.to_string())),
            }
        }
    }

    #[tokio::test]
    async fn reads_price_from_structured_reply() {
        let gateway = Fixed(Ok(GatewayReply::Reply(
            r#"SOL is trading at {"status":"success","tokenId":"So11111111111111111111111111111111111111112","priceInUSDC":"187.42"}"#
                .to_string(),
        )));
        assert_eq!(fetch_sol_price(&gateway, "key").await, Some(187.42));
    }

    #[tokio::test]
    async fn failures_yield_no_price() {
        let rejected = Fixed(Ok(GatewayReply::Rejected {
            status: 500,
            message: "boom".to_string(),
        }));
        assert_eq!(fetch_sol_price(&rejected, "key").await, None);

        let broken = Fixed(Err(SolanaAgentChatError::Http("down".to_string())));
        assert_eq!(fetch_sol_price(&broken, "key").await, None);

        let prose = Fixed(Ok(GatewayReply::Reply("about 180 dollars".to_string())));
        assert_eq!(fetch_sol_price(&prose, "key").await, None);
    }
}
