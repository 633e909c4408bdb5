use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, SolanaAgentChatError};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";
pub const DEFAULT_NETWORK: &str = "devnet";
pub const DEFAULT_EXPLORER_BASE_URL: &str = "https://explorer.solana.com";
pub const DEFAULT_PRICE_API_URL: &str = "https://api.jup.ag/price/v2";

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful agent that can interact onchain using the Solana wallet tools. \
When a tool returns JSON, include that JSON verbatim in your reply so the client can render it. \
If a request needs a capability you do not have, say so plainly.";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_openai_base_url(),
            temperature: default_temperature(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SolanaConfig {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    #[serde(default = "default_network")]
    pub network: String,
    #[serde(default = "default_explorer_base_url")]
    pub explorer_base_url: String,
    #[serde(default = "default_price_api_url")]
    pub price_api_url: String,
}

impl Default for SolanaConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            network: default_network(),
            explorer_base_url: default_explorer_base_url(),
            price_api_url: default_price_api_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    #[serde(default = "default_idle_ttl_secs")]
    pub idle_ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            idle_ttl_secs: default_idle_ttl_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentConfig {
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: usize,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: default_max_tool_rounds(),
            system_prompt: default_system_prompt(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub solana: SolanaConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sessions: SessionConfig,
    #[serde(default)]
    pub agent: AgentConfig,
}

fn default_model() -> String {
    DEFAULT_OPENAI_MODEL.to_string()
}

fn default_openai_base_url() -> String {
    DEFAULT_OPENAI_BASE_URL.to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

fn default_network() -> String {
    DEFAULT_NETWORK.to_string()
}

fn default_explorer_base_url() -> String {
    DEFAULT_EXPLORER_BASE_URL.to_string()
}

fn default_price_api_url() -> String {
    DEFAULT_PRICE_API_URL.to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_entries() -> usize {
    256
}

fn default_idle_ttl_secs() -> u64 {
    3600
}

fn default_max_tool_rounds() -> usize {
    4
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SolanaAgentChatError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            SolanaAgentChatError::Config(format!("invalid config {}: {e}", path.display()))
        })
    }

    /// File (when present) first, then `.env` and process environment on top.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let config = match path {
            Some(path) if Path::new(path).exists() => Self::from_file(path)?,
            Some(path) => {
                tracing::debug!(path, "No config file found; using defaults");
                Self::default()
            }
            None => Self::default(),
        };
        Ok(config.apply_env_overrides(|key| std::env::var(key).ok()))
    }

    pub fn apply_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = non_empty("OPENAI_API_KEY") {
            self.openai.api_key = Some(value);
        }
        if let Some(value) = non_empty("OPENAI_MODEL") {
            self.openai.model = value;
        }
        if let Some(value) = non_empty("OPENAI_BASE_URL") {
            self.openai.base_url = value;
        }
        if let Some(value) = non_empty("RPC_URL") {
            self.solana.rpc_url = value;
        }
        if let Some(value) = non_empty("SOLANA_NETWORK") {
            self.solana.network = value;
        }
        self
    }

    pub fn require_openai_key(&self) -> Result<String> {
        self.openai
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                SolanaAgentChatError::Config(
                    "openai.api_key (or OPENAI_API_KEY) must be set".to_string(),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_object_gets_convention_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.openai.model, DEFAULT_OPENAI_MODEL);
        assert_eq!(config.solana.network, "devnet");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.sessions.max_entries, 256);
        assert_eq!(config.agent.max_tool_rounds, 4);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"solana":{"network":"mainnet-beta"},"server":{"port":8080}}"#)
                .unwrap();
        assert_eq!(config.solana.network, "mainnet-beta");
        assert_eq!(config.solana.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn env_overrides_win_and_blank_values_are_ignored() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("OPENAI_API_KEY", "sk-test"),
            ("RPC_URL", "http://localhost:8899"),
            ("SOLANA_NETWORK", "   "),
        ]);
        let config = Config::default().apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.openai.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.solana.rpc_url, "http://localhost:8899");
        assert_eq!(config.solana.network, DEFAULT_NETWORK);
    }

    #[test]
    fn missing_openai_key_is_a_config_error() {
        let err = Config::default().require_openai_key().unwrap_err();
        assert!(matches!(err, SolanaAgentChatError::Config(_)));
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"openai":{"api_key":"k","model":"gpt-4o-mini"}}"#).unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert_eq!(config.require_openai_key().unwrap(), "k");
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(SolanaAgentChatError::Config(_))
        ));
    }
}
