use async_trait::async_trait;

use crate::error::Result;

/// What the gateway answered for one `/api/chat` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayReply {
    Reply(String),
    Rejected { status: u16, message: String },
}

#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn send(&self, private_key_base58: &str, message: &str) -> Result<GatewayReply>;
}
