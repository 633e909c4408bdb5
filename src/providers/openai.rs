use serde_json::{json, Value};
use tracing::warn;

use crate::error::{Result, SolanaAgentChatError};

#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
    /// The arguments exactly as the model sent them, echoed back in history.
    pub raw_arguments: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LlmResponse {
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAiProvider {
    model: String,
    api_key: String,
    base_url: String,
    temperature: f32,
    http: reqwest::Client,
}

impl OpenAiProvider {
    fn is_openai_function_name(name: &str) -> bool {
        let trimmed = name.trim();
        !trimmed.is_empty()
            && trimmed
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
    }

    pub fn new(api_key: String, model: String, base_url: String, temperature: f32) -> Self {
        Self {
            model,
            api_key,
            base_url,
            temperature,
            http: reqwest::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn filter_tools(tools: &[Value]) -> Vec<Value> {
        tools
            .iter()
            .filter(|tool| {
                let name = tool
                    .get("function")
                    .and_then(|f| f.get("name"))
                    .and_then(|n| n.as_str())
                    .unwrap_or("");
                if Self::is_openai_function_name(name) {
                    true
                } else {
                    warn!(tool_name = %name, "Skipping invalid OpenAI function tool name");
                    false
                }
            })
            .cloned()
            .collect()
    }

    fn build_request(&self, messages: &[Value], tools: &[Value]) -> Value {
        let mut request = json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
        });
        let tools = Self::filter_tools(tools);
        if !tools.is_empty() {
            request["tools"] = Value::Array(tools);
        }
        request
    }

    fn extract_text_from_value(response: &Value) -> Option<String> {
        response
            .get("choices")
            .and_then(|v| v.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .map(|text| text.to_string())
    }

    fn extract_tool_calls_from_value(response: &Value) -> Vec<ToolCall> {
        let Some(calls) = response
            .get("choices")
            .and_then(|v| v.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("tool_calls"))
            .and_then(|calls| calls.as_array())
        else {
            return Vec::new();
        };

        calls
            .iter()
            .enumerate()
            .filter_map(|(index, call)| {
                let function = call.get("function")?;
                let name = function.get("name")?.as_str()?.to_string();
                let id = call
                    .get("id")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("call_{index}"));
                let (arguments, raw_arguments) = match function.get("arguments") {
                    Some(Value::String(text)) => (
                        serde_json::from_str(text).unwrap_or(Value::String(text.clone())),
                        text.clone(),
                    ),
                    Some(value) => (value.clone(), value.to_string()),
                    None => (Value::Null, "{}".to_string()),
                };
                Some(ToolCall {
                    id,
                    name,
                    arguments,
                    raw_arguments,
                })
            })
            .collect()
    }

    /// One non-streaming completion over the full message history.
    pub async fn complete(&self, messages: &[Value], tools: &[Value]) -> Result<LlmResponse> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let request = self.build_request(messages, tools);

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                SolanaAgentChatError::Http(format!("Chat completion transport failed: {e}"))
            })?;
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            SolanaAgentChatError::Http(format!("Chat completion read failed: {e}"))
        })?;

        if !status.is_success() {
            return Err(SolanaAgentChatError::Http(format!(
                "Chat completion failed ({status}): {body}"
            )));
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            SolanaAgentChatError::Serialization(format!("Chat completion decode failed: {e}"))
        })?;

        Ok(LlmResponse {
            text: Self::extract_text_from_value(&value).unwrap_or_default(),
            tool_calls: Self::extract_tool_calls_from_value(&value),
        })
    }
}

pub fn system_message(content: &str) -> Value {
    json!({"role": "system", "content": content})
}

pub fn user_message(content: &str) -> Value {
    json!({"role": "user", "content": content})
}

pub fn assistant_message(content: &str, tool_calls: &[ToolCall]) -> Value {
    let mut message = json!({"role": "assistant", "content": content});
    if !tool_calls.is_empty() {
        message["tool_calls"] = Value::Array(
            tool_calls
                .iter()
                .map(|call| {
                    json!({
                        "id": call.id,
                        "type": "function",
                        "function": {
                            "name": call.name,
                            "arguments": call.raw_arguments,
                        }
                    })
                })
                .collect(),
        );
    }
    message
}

pub fn tool_message(tool_call_id: &str, content: &str) -> Value {
    json!({"role": "tool", "tool_call_id": tool_call_id, "content": content})
}
