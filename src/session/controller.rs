use std::fmt;

use zeroize::Zeroizing;

use crate::error::Result;
use crate::interfaces::gateway::{ChatGateway, GatewayReply};
use crate::keys::PrivateKey;
use crate::parser::clean_reply;

use super::fsm::{transition, SessionEvent, SessionState};
use super::quick_actions::quick_action_message;

pub const ERROR_STATUS_REPLY: &str =
    "I apologize, but I'm having trouble processing your request at the moment. Please try again later.";
pub const TRANSPORT_FAILURE_REPLY: &str =
    "I apologize, but I encountered an unexpected error. Please try again.";
pub const EMPTY_REPLY_FALLBACK: &str =
    "I apologize, but I couldn't process your request properly. Please try asking your question again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Agent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// The one request allowed in flight. The key travels with it so the
/// gateway call does not need to borrow the session.
pub struct PendingRequest {
    id: u64,
    pub private_key: Zeroizing<String>,
    pub message: String,
}

impl fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRequest")
            .field("id", &self.id)
            .field("private_key", &"<redacted>")
            .field("message", &self.message)
            .finish()
    }
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Dispatched(PendingRequest),
    /// No key on file; the key prompt is now open.
    KeyRequired,
    /// Empty input, or a request is already pending.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Replied(Message),
    KeyRequired,
    Ignored,
}

#[derive(Default)]
pub struct ChatSession {
    state: SessionState,
    messages: Vec<Message>,
    input: String,
    key: Option<PrivateKey>,
    key_error: Option<String>,
    typing: bool,
    in_flight: Option<u64>,
    next_request_id: u64,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn apply_quick_action(&mut self, label: &str) {
        self.input = quick_action_message(label).to_string();
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    pub fn key_error(&self) -> Option<&str> {
        self.key_error.as_deref()
    }

    /// Whether the send control is enabled.
    pub fn can_send(&self) -> bool {
        self.state != SessionState::Sending && !self.input.trim().is_empty()
    }

    pub fn private_key_base58(&self) -> Option<String> {
        self.key.as_ref().map(PrivateKey::to_base58)
    }

    fn apply(&mut self, event: SessionEvent) -> bool {
        match transition(self.state, event) {
            Some(next) => {
                tracing::trace!(from = ?self.state, to = ?next, event = ?event, "Chat session transition");
                self.state = next;
                true
            }
            None => false,
        }
    }

    pub fn open_key_prompt(&mut self) -> bool {
        self.apply(SessionEvent::OpenKeyPrompt)
    }

    pub fn cancel_key_prompt(&mut self) -> bool {
        self.key_error = None;
        self.apply(SessionEvent::CancelKeyPrompt)
    }

    /// Validates and stores a key. On failure the prompt stays open and the
    /// validation message is kept for display.
    pub fn provide_key(&mut self, raw: &str) -> Result<()> {
        if self.state != SessionState::AwaitingKey {
            self.open_key_prompt();
        }
        match PrivateKey::parse(raw) {
            Ok(key) => {
                self.key = Some(key);
                self.key_error = None;
                self.apply(SessionEvent::KeyAccepted);
                Ok(())
            }
            Err(err) => {
                self.key_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn begin_submit(&mut self) -> SubmitOutcome {
        let Some(private_key) = self.private_key_base58() else {
            self.apply(SessionEvent::SubmitWithoutKey);
            return SubmitOutcome::KeyRequired;
        };
        if self.input.trim().is_empty() || self.in_flight.is_some() {
            return SubmitOutcome::Ignored;
        }
        if !self.apply(SessionEvent::Submit) {
            return SubmitOutcome::Ignored;
        }

        let message = std::mem::take(&mut self.input);
        self.messages.push(Message {
            role: Role::User,
            content: message.clone(),
        });
        self.typing = true;
        self.next_request_id += 1;
        self.in_flight = Some(self.next_request_id);

        SubmitOutcome::Dispatched(PendingRequest {
            id: self.next_request_id,
            private_key: Zeroizing::new(private_key),
            message,
        })
    }

    /// Settles the pending request and appends exactly one agent message.
    /// A request that is not the one in flight is dropped.
    pub fn complete(
        &mut self,
        request: PendingRequest,
        result: Result<GatewayReply>,
    ) -> Option<&Message> {
        if self.in_flight != Some(request.id) {
            tracing::warn!(request = request.id, "Dropping reply for a request that is not in flight");
            return None;
        }

        let content = match result {
            Ok(GatewayReply::Reply(reply)) => {
                let cleaned = clean_reply(&reply);
                if cleaned.is_empty() {
                    EMPTY_REPLY_FALLBACK.to_string()
                } else {
                    cleaned
                }
            }
            Ok(GatewayReply::Rejected { status, message }) => {
                tracing::warn!(status, message = %message, "API Error");
                ERROR_STATUS_REPLY.to_string()
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to send message");
                TRANSPORT_FAILURE_REPLY.to_string()
            }
        };

        self.typing = false;
        self.messages.push(Message {
            role: Role::Agent,
            content,
        });
        self.in_flight = None;
        self.apply(SessionEvent::Settle);
        self.messages.last()
    }

    pub async fn submit(&mut self, gateway: &dyn ChatGateway) -> Submission {
        match self.begin_submit() {
            SubmitOutcome::Dispatched(request) => {
                let result = gateway.send(&request.private_key, &request.message).await;
                match self.complete(request, result) {
                    Some(message) => Submission::Replied(message.clone()),
                    None => Submission::Ignored,
                }
            }
            SubmitOutcome::KeyRequired => Submission::KeyRequired,
            SubmitOutcome::Ignored => Submission::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolanaAgentChatError;
    use crate::keys::keypair_from_seed;

    fn session_with_key() -> ChatSession {
        let mut session = ChatSession::new();
        let key = keypair_from_seed([7u8; 32]).to_base58();
        session.provide_key(&key).unwrap();
        session
    }

    #[test]
    fn submit_without_key_opens_prompt_and_sends_nothing() {
        let mut session = ChatSession::new();
        session.set_input("SOL balance");
        assert!(matches!(session.begin_submit(), SubmitOutcome::KeyRequired));
        assert_eq!(session.state(), SessionState::AwaitingKey);
        assert!(session.messages().is_empty());
        assert_eq!(session.input(), "SOL balance");
    }

    #[test]
    fn invalid_key_keeps_prompt_open() {
        let mut session = ChatSession::new();
        session.open_key_prompt();
        let err = session.provide_key("abc").unwrap_err();
        assert!(err.to_string().contains("Invalid private key length"));
        assert_eq!(session.state(), SessionState::AwaitingKey);
        assert!(session.key_error().is_some());

        assert!(session.provide_key("0OIl").is_err());
        assert!(session
            .key_error()
            .is_some_and(|msg| msg.contains("Invalid private key format")));
    }

    #[test]
    fn key_accepts_json_array_form() {
        let key = keypair_from_seed([3u8; 32]);
        let mut session = ChatSession::new();
        session.provide_key(&key.to_json_array()).unwrap();
        assert_eq!(session.private_key_base58(), Some(key.to_base58()));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn second_submission_while_pending_is_ignored() {
        let mut session = session_with_key();
        session.set_input("SOL balance");
        let first = session.begin_submit();
        assert!(matches!(first, SubmitOutcome::Dispatched(_)));
        assert!(session.is_typing());
        assert!(!session.can_send());

        session.set_input("SOL price");
        assert!(matches!(session.begin_submit(), SubmitOutcome::Ignored));
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.input(), "SOL price");
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut session = session_with_key();
        session.set_input("   \n");
        assert!(matches!(session.begin_submit(), SubmitOutcome::Ignored));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn reply_is_cleaned_before_append() {
        let mut session = session_with_key();
        session.set_input("send");
        let SubmitOutcome::Dispatched(request) = session.begin_submit() else {
            panic!("expected dispatch");
        };
        assert_eq!(session.input(), "");
        let appended = session
            .complete(
                request,
                Ok(GatewayReply::Reply("Error:   insufficient   funds".to_string())),
            )
            .cloned();
        assert_eq!(
            appended,
            Some(Message {
                role: Role::Agent,
                content: "insufficient funds".to_string(),
            })
        );
        assert_eq!(session.state(), SessionState::Idle);
        assert!(!session.is_typing());
    }

    #[test]
    fn empty_cleaned_reply_uses_fallback() {
        let mut session = session_with_key();
        session.set_input("x");
        let SubmitOutcome::Dispatched(request) = session.begin_submit() else {
            panic!("expected dispatch");
        };
        let reply = r#"{"status":"error","message":"boom"}"#.to_string();
        let appended = session.complete(request, Ok(GatewayReply::Reply(reply)));
        assert_eq!(appended.map(|m| m.content.as_str()), Some(EMPTY_REPLY_FALLBACK));
    }

    #[test]
    fn failures_map_to_fixed_apologies() {
        let mut session = session_with_key();

        session.set_input("one");
        let SubmitOutcome::Dispatched(request) = session.begin_submit() else {
            panic!("expected dispatch");
        };
        session.complete(
            request,
            Ok(GatewayReply::Rejected {
                status: 500,
                message: "agent error: rpc down".to_string(),
            }),
        );

        session.set_input("two");
        let SubmitOutcome::Dispatched(request) = session.begin_submit() else {
            panic!("expected dispatch");
        };
        session.complete(request, Err(SolanaAgentChatError::Http("refused".to_string())));

        let agent: Vec<&str> = session
            .messages()
            .iter()
            .filter(|m| m.role == Role::Agent)
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(agent, vec![ERROR_STATUS_REPLY, TRANSPORT_FAILURE_REPLY]);
    }

    #[test]
    fn quick_action_fills_input() {
        let mut session = ChatSession::new();
        session.apply_quick_action("Stake SOL");
        assert_eq!(
            session.input(),
            "Please stake 5 SOL to validator address: YOUR_VALIDATOR_ADDRESS"
        );
    }

    #[test]
    fn pending_request_debug_redacts_key() {
        let mut session = session_with_key();
        session.set_input("hi");
        let SubmitOutcome::Dispatched(request) = session.begin_submit() else {
            panic!("expected dispatch");
        };
        let debug = format!("{request:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains(request.private_key.as_str()));
    }

    #[test]
    fn pending_request_key_is_wiped_on_drop() {
        let mut session = session_with_key();
        session.set_input("hi");
        let SubmitOutcome::Dispatched(request) = session.begin_submit() else {
            panic!("expected dispatch");
        };
        let key: &Zeroizing<String> = &request.private_key;
        assert_eq!(Some(key.as_str().to_string()), session.private_key_base58());
    }
}
