pub mod controller;
pub mod fsm;
pub mod quick_actions;

pub use controller::{
    ChatSession, Message, PendingRequest, Role, Submission, SubmitOutcome, EMPTY_REPLY_FALLBACK,
    ERROR_STATUS_REPLY, TRANSPORT_FAILURE_REPLY,
};
pub use fsm::{SessionEvent, SessionState};
pub use quick_actions::{quick_action_message, EXAMPLE_QUERIES, QUERY_TEMPLATES};
