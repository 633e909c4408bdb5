use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolanaAgentChatError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("runtime error: {0}")]
    Runtime(String),
    #[error("{0}")]
    InvalidKey(String),
    #[error("agent error: {0}")]
    Agent(String),
}

pub use crate::Result;

impl From<serde_json::Error> for SolanaAgentChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for SolanaAgentChatError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}
