use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{Result, SolanaAgentChatError};
use crate::interfaces::plugins::Tool;
use crate::solana_rpc::{self, SOL_MINT};

/// Read-only wallet operations for the agent's own wallet.
pub struct SolanaTool {
    wallet: String,
    rpc_url: String,
    price_api_url: String,
    http: reqwest::Client,
}

impl SolanaTool {
    pub fn new(wallet: String, rpc_url: String, price_api_url: String) -> Self {
        Self {
            wallet,
            rpc_url,
            price_api_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn wallet(&self) -> &str {
        &self.wallet
    }

    fn normalize_action(raw: &str) -> &str {
        match raw.trim() {
            "address" | "get_wallet" | "get_wallet_address" => "wallet",
            "get_balance" => "balance",
            "fetch_price" | "get_price" => "price",
            other => other,
        }
    }

    fn resolve_address<'a>(&'a self, params: &'a Value) -> &'a str {
        params
            .get("address")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(&self.wallet)
    }

    fn resolve_token_id(params: &Value) -> &str {
        params
            .get("token_id")
            .or_else(|| params.get("tokenId"))
            .or_else(|| params.get("mint"))
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(SOL_MINT)
    }
}

#[async_trait]
impl Tool for SolanaTool {
    fn name(&self) -> &str {
        "solana"
    }

    fn description(&self) -> &str {
        "Solana wallet operations: get the agent wallet address, get a SOL balance, and fetch a token's USDC price."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": ["wallet", "balance", "price"]
                },
                "address": {
                    "type": "string",
                    "description": "Address to query; defaults to the agent wallet"
                },
                "token_id": {
                    "type": "string",
                    "description": "Token mint for price lookups; defaults to SOL"
                }
            },
            "required": ["action"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let action = params
            .get("action")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        match Self::normalize_action(&action) {
            "wallet" => Ok(json!({
                "status": "success",
                "wallet": self.wallet,
            })),
            "balance" => {
                let address = self.resolve_address(&params);
                let balance =
                    solana_rpc::get_balance_sol(&self.http, &self.rpc_url, address).await?;
                Ok(json!({
                    "status": "success",
                    "balance": balance,
                    "wallet": address,
                }))
            }
            "price" => {
                let token_id = Self::resolve_token_id(&params);
                let price =
                    solana_rpc::fetch_price(&self.http, &self.price_api_url, token_id).await?;
                Ok(json!({
                    "status": "success",
                    "tokenId": token_id,
                    "priceInUSDC": price,
                }))
            }
            other => Err(SolanaAgentChatError::Runtime(format!(
                "unsupported solana action: {other}"
            ))),
        }
    }
}
