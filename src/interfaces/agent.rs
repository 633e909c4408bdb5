use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkSource {
    Agent,
    Tools,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentChunk {
    pub source: ChunkSource,
    pub content: String,
}

impl AgentChunk {
    pub fn agent(content: impl Into<String>) -> Self {
        Self {
            source: ChunkSource::Agent,
            content: content.into(),
        }
    }

    pub fn tools(content: impl Into<String>) -> Self {
        Self {
            source: ChunkSource::Tools,
            content: content.into(),
        }
    }
}

/// One authenticated conversation with the wallet agent.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Lazy, finite, non-restartable sequence of tagged chunks for one turn.
    fn stream(&self, message: &str) -> BoxStream<'static, Result<AgentChunk>>;

    async fn process_message(&self, message: &str) -> Result<String> {
        crate::agent::collect_reply(self.stream(message)).await
    }
}

#[async_trait]
pub trait AgentFactory: Send + Sync {
    async fn initialize(&self, private_key_base58: &str) -> Result<Arc<dyn Agent>>;
}
