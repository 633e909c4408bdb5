use std::sync::Arc;

use async_stream::try_stream;
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::Result;
use crate::interfaces::agent::{Agent, AgentChunk, AgentFactory};
use crate::interfaces::plugins::Tool;
use crate::keys::PrivateKey;
use crate::providers::openai::{
    assistant_message, system_message, tool_message, user_message, OpenAiProvider, ToolCall,
};
use crate::tools::solana::SolanaTool;

struct Inner {
    provider: OpenAiProvider,
    tools: Vec<Arc<dyn Tool>>,
    system_prompt: String,
    max_tool_rounds: usize,
    wallet: String,
    history: Mutex<Vec<Value>>,
}

impl Inner {
    async fn run_tool(&self, call: &ToolCall) -> String {
        let Some(tool) = self.tools.iter().find(|tool| tool.name() == call.name) else {
            return json!({"status": "error", "message": format!("unknown tool: {}", call.name)})
                .to_string();
        };

        let params = if call.arguments.is_object() {
            call.arguments.clone()
        } else {
            json!({})
        };

        match tool.execute(params).await {
            Ok(output) => output.to_string(),
            Err(err) => {
                tracing::warn!(tool = %call.name, error = %err, "Tool call failed");
                json!({"status": "error", "message": err.to_string()}).to_string()
            }
        }
    }
}

/// Wallet agent backed by an OpenAI-compatible model with the `solana` tool.
/// Each handle keeps one conversation thread for its lifetime.
#[derive(Clone)]
pub struct SolanaAgent {
    inner: Arc<Inner>,
}

impl SolanaAgent {
    pub fn new(
        provider: OpenAiProvider,
        tools: Vec<Arc<dyn Tool>>,
        system_prompt: String,
        max_tool_rounds: usize,
        wallet: String,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                provider,
                tools,
                system_prompt,
                max_tool_rounds,
                wallet,
                history: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn wallet(&self) -> &str {
        &self.inner.wallet
    }

    pub async fn history_len(&self) -> usize {
        self.inner.history.lock().await.len()
    }
}

#[async_trait]
impl Agent for SolanaAgent {
    fn stream(&self, message: &str) -> BoxStream<'static, Result<AgentChunk>> {
        let inner = self.inner.clone();
        let message = message.to_string();

        Box::pin(try_stream! {
            // Held for the whole turn: turns on one handle never interleave.
            let mut history = inner.history.lock().await;
            let definitions: Vec<Value> = inner.tools.iter().map(|tool| tool.definition()).collect();

            let mut turn = vec![user_message(&message)];
            let mut rounds = 0usize;
            loop {
                let mut messages = Vec::with_capacity(history.len() + turn.len() + 1);
                messages.push(system_message(&inner.system_prompt));
                messages.extend(history.iter().cloned());
                messages.extend(turn.iter().cloned());

                let offer_tools = rounds < inner.max_tool_rounds;
                let tools: &[Value] = if offer_tools { &definitions } else { &[] };
                let response = inner.provider.complete(&messages, tools).await?;

                let calls = if offer_tools { response.tool_calls } else { Vec::new() };
                turn.push(assistant_message(&response.text, &calls));
                if !response.text.is_empty() {
                    yield AgentChunk::agent(response.text);
                }
                if calls.is_empty() {
                    break;
                }

                for call in &calls {
                    let output = inner.run_tool(call).await;
                    turn.push(tool_message(&call.id, &output));
                    yield AgentChunk::tools(output);
                }
                rounds += 1;
            }

            // Only completed turns become part of the thread.
            history.extend(turn);
        })
    }
}

pub struct SolanaAgentFactory {
    config: Config,
}

impl SolanaAgentFactory {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl AgentFactory for SolanaAgentFactory {
    async fn initialize(&self, private_key_base58: &str) -> Result<Arc<dyn Agent>> {
        let wallet = PrivateKey::from_base58(private_key_base58)?.wallet_address()?;
        let api_key = self.config.require_openai_key()?;

        let provider = OpenAiProvider::new(
            api_key,
            self.config.openai.model.clone(),
            self.config.openai.base_url.clone(),
            self.config.openai.temperature,
        );
        let tool = SolanaTool::new(
            wallet.clone(),
            self.config.solana.rpc_url.clone(),
            self.config.solana.price_api_url.clone(),
        );

        tracing::info!(
            wallet = %wallet,
            model = %provider.model(),
            network = %self.config.solana.network,
            "Initialized Solana agent"
        );

        Ok(Arc::new(SolanaAgent::new(
            provider,
            vec![Arc::new(tool)],
            self.config.agent.system_prompt.clone(),
            self.config.agent.max_tool_rounds,
            wallet,
        )))
    }
}
