pub mod solana;

use futures::stream::{Stream, StreamExt};

use crate::error::Result;
use crate::interfaces::agent::AgentChunk;

pub use solana::{SolanaAgent, SolanaAgentFactory};

/// Concatenates chunk contents in arrival order. The first error ends the
/// fold; whatever came before it is discarded with the stream.
pub async fn collect_reply<S>(stream: S) -> Result<String>
where
    S: Stream<Item = Result<AgentChunk>> + Send,
{
    futures::pin_mut!(stream);
    let mut reply = String::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        tracing::trace!(source = ?chunk.source, len = chunk.content.len(), "agent chunk");
        reply.push_str(&chunk.content);
    }
    Ok(reply)
}
