pub mod agent;
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod interfaces;
pub mod keys;
pub mod logging;
pub mod parser;
pub mod providers;
pub mod render;
pub mod runtime_paths;
pub mod session;
pub mod solana_rpc;
pub mod tools;

pub type Result<T> = std::result::Result<T, error::SolanaAgentChatError>;
