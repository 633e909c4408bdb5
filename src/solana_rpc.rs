use serde_json::{json, Value};

use crate::error::{Result, SolanaAgentChatError};

pub const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;
pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";

fn normalize_rpc_result(value: Value, method: &str) -> Result<Value> {
    if let Some(error) = value.get("error") {
        return Err(SolanaAgentChatError::Runtime(format!(
            "solana rpc {method} error: {error}"
        )));
    }

    value.get("result").cloned().ok_or_else(|| {
        SolanaAgentChatError::Runtime(format!("solana rpc {method} missing result"))
    })
}

pub async fn rpc_call(
    client: &reqwest::Client,
    endpoint: &str,
    method: &str,
    params: Value,
) -> Result<Value> {
    let request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": method,
        "params": params,
    });

    let response = client
        .post(endpoint)
        .json(&request)
        .send()
        .await
        .map_err(|e| SolanaAgentChatError::Http(format!("solana rpc transport failure: {e}")))?;

    let status = response.status();
    let body: Value = response
        .json()
        .await
        .map_err(|e| SolanaAgentChatError::Http(format!("solana rpc decode failure: {e}")))?;

    if !status.is_success() {
        return Err(SolanaAgentChatError::Http(format!(
            "solana rpc http {status}: {body}"
        )));
    }

    normalize_rpc_result(body, method)
}

pub async fn get_balance_lamports(
    client: &reqwest::Client,
    endpoint: &str,
    address: &str,
) -> Result<u64> {
    let result = rpc_call(
        client,
        endpoint,
        "getBalance",
        json!([address, {"commitment": "confirmed"}]),
    )
    .await?;

    result
        .get("value")
        .and_then(|value| value.as_u64())
        .ok_or_else(|| {
            SolanaAgentChatError::Runtime("solana rpc getBalance missing value".to_string())
        })
}

pub async fn get_balance_sol(
    client: &reqwest::Client,
    endpoint: &str,
    address: &str,
) -> Result<f64> {
    let lamports = get_balance_lamports(client, endpoint, address).await?;
    Ok(lamports as f64 / LAMPORTS_PER_SOL)
}

/// USDC price of `token_id` from a Jupiter-style `?ids=` price endpoint.
/// The price is returned as the API's decimal string.
pub async fn fetch_price(client: &reqwest::Client, price_api: &str, token_id: &str) -> Result<String> {
    let response = client
        .get(price_api)
        .query(&[("ids", token_id)])
        .send()
        .await
        .map_err(|e| SolanaAgentChatError::Http(format!("price api transport failure: {e}")))?;

    let status = response.status();
    let body: Value = response
        .json()
        .await
        .map_err(|e| SolanaAgentChatError::Http(format!("price api decode failure: {e}")))?;
    if !status.is_success() {
        return Err(SolanaAgentChatError::Http(format!(
            "price api http {status}: {body}"
        )));
    }

    let price = body
        .get("data")
        .and_then(|data| data.get(token_id))
        .and_then(|entry| entry.get("price"))
        .ok_or_else(|| {
            SolanaAgentChatError::Runtime(format!("price data for {token_id} not available"))
        })?;

    match price {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(SolanaAgentChatError::Runtime(format!(
            "unexpected price value: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_error_object_becomes_runtime_error() {
        let err = normalize_rpc_result(
            json!({"jsonrpc":"2.0","error":{"code":-32602,"message":"bad"}}),
            "getBalance",
        )
        .unwrap_err();
        assert!(err.to_string().contains("getBalance error"));
    }

    #[test]
    fn missing_result_is_reported() {
        let err = normalize_rpc_result(json!({"jsonrpc":"2.0"}), "getBalance").unwrap_err();
        assert!(err.to_string().contains("missing result"));
    }

    #[test]
    fn result_is_unwrapped() {
        let value = normalize_rpc_result(
            json!({"jsonrpc":"2.0","result":{"value":5}}),
            "getBalance",
        )
        .unwrap();
        assert_eq!(value["value"], 5);
    }
}
